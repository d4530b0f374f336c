use crate::record::{InventoryRecord, ResourceType};
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io;
use std::path::Path;

pub const HEADER: [&str; 4] = ["Type", "Name", "Account / ARN", "Region / Namespace"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub instances: usize,
    pub nodes: usize,
    pub pods: usize,
    pub faults: usize,
}

impl Totals {
    fn count(&mut self, resource_type: ResourceType) {
        match resource_type {
            ResourceType::Instance => self.instances += 1,
            ResourceType::Node => self.nodes += 1,
            ResourceType::Pod => self.pods += 1,
        }
    }

    pub fn get(&self, resource_type: ResourceType) -> usize {
        match resource_type {
            ResourceType::Instance => self.instances,
            ResourceType::Node => self.nodes,
            ResourceType::Pod => self.pods,
        }
    }
}

/// CSV inventory, written one row at a time in discovery order.
pub struct Report<W: io::Write> {
    writer: csv::Writer<W>,
    totals: Totals,
}

impl Report<File> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed creating output file {}", path.display()))?;
        Self::new(file)
    }
}

impl<W: io::Write> Report<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self {
            writer,
            totals: Default::default(),
        })
    }

    pub fn append(&mut self, record: &InventoryRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.totals.count(record.resource_type());
        Ok(())
    }

    pub fn note_fault(&mut self) {
        self.totals.faults += 1;
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Flushes the CSV and hands back the final counts with the writer.
    pub fn finish(mut self) -> Result<(Totals, W)> {
        self.writer.flush()?;
        let inner = self
            .writer
            .into_inner()
            .map_err(|err| anyhow!("Failed flushing output: {}", err.error()))?;
        Ok((self.totals, inner))
    }
}
