//! The external services the inventory is read from.
//!
//! Collectors only talk to these traits, the AWS and Kubernetes backed
//! implementations live in [`crate::aws`] and [`crate::k8s`].

use crate::enumerate::Unit;
use anyhow::Result;
use async_trait::async_trait;

/// Lists the regions the compute service is available in.
#[async_trait]
pub trait RegionSource {
    async fn regions(&self) -> Result<Vec<String>>;
}

/// Creates a session scoped to one account and region.
#[async_trait]
pub trait SessionFactory {
    type Session: ComputeApi + ClusterApi + Send + Sync;

    async fn session(&self, unit: &Unit) -> Self::Session;
}

#[async_trait]
pub trait ComputeApi {
    /// Ids of all instances, across every page of the listing.
    async fn instance_ids(&self) -> Result<Vec<String>>;
}

#[async_trait]
pub trait ClusterApi {
    async fn cluster_names(&self) -> Result<Vec<String>>;

    async fn nodegroup_names(&self, cluster: &str) -> Result<Vec<String>>;

    /// Names of the auto scaling groups backing a nodegroup.
    async fn nodegroup_nodes(&self, cluster: &str, nodegroup: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    pub name: String,
    pub cluster: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodRef {
    pub name: String,
    pub namespace: String,
}

#[async_trait]
pub trait PodSource {
    /// Client for one context's cluster.
    type Connection: Send + Sync;

    async fn contexts(&self) -> Result<Vec<ContextInfo>>;

    async fn connect(&self, context: &ContextInfo) -> Result<Self::Connection>;

    /// Pods in all namespaces of the connected cluster.
    async fn pods(&self, connection: &Self::Connection) -> Result<Vec<PodRef>>;
}
