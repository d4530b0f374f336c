use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_inventory::sources::{
    ClusterApi, ComputeApi, ContextInfo, PodRef, PodSource, SessionFactory,
};
use aws_inventory::Unit;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

/// What one account/region looks like. `None` makes the call fail.
#[derive(Debug, Clone)]
pub struct FakeRegion {
    pub instances: Option<Vec<String>>,
    /// cluster name -> nodegroup listing
    pub clusters: Option<Vec<(String, Option<Vec<String>>)>>,
    /// (cluster, nodegroup) -> auto scaling groups
    pub nodes: HashMap<(String, String), Option<Vec<String>>>,
}

pub fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl FakeRegion {
    pub fn instances(mut self, ids: &[&str]) -> Self {
        self.instances = Some(names(ids));
        self
    }

    pub fn failing_instances(mut self) -> Self {
        self.instances = None;
        self
    }

    pub fn cluster(mut self, cluster: &str, nodegroups: Option<&[&str]>) -> Self {
        self.clusters
            .get_or_insert_with(Vec::new)
            .push((cluster.to_owned(), nodegroups.map(names)));
        self
    }

    pub fn failing_clusters(mut self) -> Self {
        self.clusters = None;
        self
    }

    pub fn nodegroup(mut self, cluster: &str, nodegroup: &str, asgs: Option<&[&str]>) -> Self {
        self.nodes
            .insert((cluster.to_owned(), nodegroup.to_owned()), asgs.map(names));
        self
    }
}

pub fn empty_region() -> FakeRegion {
    FakeRegion {
        instances: Some(Vec::new()),
        clusters: Some(Vec::new()),
        nodes: HashMap::new(),
    }
}

#[async_trait]
impl ComputeApi for FakeRegion {
    async fn instance_ids(&self) -> Result<Vec<String>> {
        self.instances
            .clone()
            .ok_or_else(|| anyhow!("AuthFailure: not authorized"))
    }
}

#[async_trait]
impl ClusterApi for FakeRegion {
    async fn cluster_names(&self) -> Result<Vec<String>> {
        self.clusters
            .as_ref()
            .map(|clusters| clusters.iter().map(|(name, _)| name.clone()).collect())
            .ok_or_else(|| anyhow!("AccessDeniedException"))
    }

    async fn nodegroup_names(&self, cluster: &str) -> Result<Vec<String>> {
        self.clusters
            .iter()
            .flatten()
            .find(|(name, _)| name == cluster)
            .and_then(|(_, nodegroups)| nodegroups.clone())
            .ok_or_else(|| anyhow!("ResourceNotFoundException: {cluster}"))
    }

    async fn nodegroup_nodes(&self, cluster: &str, nodegroup: &str) -> Result<Vec<String>> {
        match self.nodes.get(&(cluster.to_owned(), nodegroup.to_owned())) {
            Some(Some(asgs)) => Ok(asgs.clone()),
            Some(None) => Err(anyhow!("ThrottlingException")),
            None => Ok(Vec::new()),
        }
    }
}

/// Sessions keyed by unit; units that aren't configured are empty.
#[derive(Default)]
pub struct FakeCloud {
    regions: HashMap<Unit, FakeRegion>,
    pub visited: Mutex<Vec<Unit>>,
}

impl FakeCloud {
    pub fn with(mut self, account: &str, region: &str, fake: FakeRegion) -> Self {
        self.regions.insert(Unit::new(account, region), fake);
        self
    }

    pub fn visited(&self) -> Vec<Unit> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionFactory for FakeCloud {
    type Session = FakeRegion;

    async fn session(&self, unit: &Unit) -> FakeRegion {
        self.visited.lock().unwrap().push(unit.clone());
        self.regions
            .get(unit)
            .cloned()
            .unwrap_or_else(empty_region)
    }
}

/// How a fake context answers.
#[derive(Debug, Clone)]
pub enum FakeContext {
    Pods(Vec<PodRef>),
    /// No client can be built for the context.
    Refused,
    /// The client is built but listing pods fails.
    Failing,
}

/// Contexts in order; `None` makes the kubeconfig unreadable.
pub struct FakeKube {
    pub contexts: Option<Vec<(String, FakeContext)>>,
}

impl FakeKube {
    fn context(&self, name: &str) -> Option<&FakeContext> {
        self.contexts
            .iter()
            .flatten()
            .find(|(context, _)| context == name)
            .map(|(_, fake)| fake)
    }
}

pub fn pod(name: &str, namespace: &str) -> PodRef {
    PodRef {
        name: name.to_owned(),
        namespace: namespace.to_owned(),
    }
}

#[async_trait]
impl PodSource for FakeKube {
    /// The context name.
    type Connection = String;

    async fn contexts(&self) -> Result<Vec<ContextInfo>> {
        let contexts = self
            .contexts
            .as_ref()
            .ok_or_else(|| anyhow!("invalid kubeconfig"))?;
        Ok(contexts
            .iter()
            .map(|(name, _)| ContextInfo {
                name: name.clone(),
                cluster: format!("{name}-cluster"),
                user: format!("{name}-user"),
            })
            .collect())
    }

    async fn connect(&self, context: &ContextInfo) -> Result<String> {
        match self.context(&context.name) {
            Some(FakeContext::Refused) | None => {
                Err(anyhow!("Failed to create config for context: {}", context.name))
            }
            Some(_) => Ok(context.name.clone()),
        }
    }

    async fn pods(&self, connection: &String) -> Result<Vec<PodRef>> {
        match self.context(connection) {
            Some(FakeContext::Pods(pods)) => Ok(pods.clone()),
            _ => Err(anyhow!("error trying to connect: connection refused")),
        }
    }
}

/// Log lines written while the guard from [`CapturedLogs::install`] is alive.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let logs = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .with_writer(move || logs.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Index of the first line containing `needle`.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.lines().iter().position(|line| line.contains(needle))
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
