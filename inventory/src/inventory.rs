use crate::collect::{collect_instances, collect_nodes, collect_pods, Collection};
use crate::enumerate::{Plan, Unit};
use crate::record::ResourceType;
use crate::report::Report;
use crate::sources::{PodSource, SessionFactory};
use anyhow::Result;
use std::io;
use tracing::info;

/// Instances and nodes found in one account and region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCounts {
    pub unit: Unit,
    pub instances: usize,
    pub nodes: usize,
}

impl UnitCounts {
    pub fn is_empty(&self) -> bool {
        self.instances == 0 && self.nodes == 0
    }
}

/// Counts the collection's faults and writes its records to the report.
///
/// The faults were already logged by the collector when they happened.
pub fn absorb<W: io::Write>(report: &mut Report<W>, collection: Collection) -> Result<()> {
    for _ in &collection.faults {
        report.note_fault();
    }
    for record in &collection.records {
        report.append(record)?;
    }
    Ok(())
}

/// Collects instances and nodes for every unit of the plan.
///
/// Returns the counts of the units where anything was found.
pub async fn collect_accounts<S, W>(
    plan: &Plan,
    sessions: &S,
    report: &mut Report<W>,
) -> Result<Vec<UnitCounts>>
where
    S: SessionFactory + ?Sized,
    W: io::Write,
{
    let mut found = Vec::new();

    for account in &plan.accounts {
        info!("Account: {}", account);

        for region in &plan.regions {
            let unit = Unit::new(account, region);
            info!("Account: {} Region: {}", unit.account, unit.region);
            let session = sessions.session(&unit).await;

            let instances = collect_instances(&session, &unit).await;
            let nodes = collect_nodes(&session, &unit).await;

            let counts = UnitCounts {
                unit: unit.clone(),
                instances: instances.count(ResourceType::Instance),
                nodes: nodes.count(ResourceType::Node),
            };
            absorb(report, instances)?;
            absorb(report, nodes)?;

            if !counts.is_empty() {
                info!(
                    "Account: {} Region: {} EC2 Instances: {}",
                    unit.account, unit.region, counts.instances
                );
                info!(
                    "Account: {} Region: {} K8s Nodes: {}",
                    unit.account, unit.region, counts.nodes
                );
                found.push(counts);
            }
        }
    }

    Ok(found)
}

pub async fn collect_cluster_pods<P, W>(pods: &P, report: &mut Report<W>) -> Result<usize>
where
    P: PodSource + ?Sized,
    W: io::Write,
{
    let collection = collect_pods(pods).await;
    let count = collection.count(ResourceType::Pod);
    absorb(report, collection)?;
    Ok(count)
}
