use super::session::AwsSession;
use crate::sources::ClusterApi;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_eks::types::NodegroupResources;
use tracing::{debug, warn};

#[async_trait]
impl ClusterApi for AwsSession {
    async fn cluster_names(&self) -> Result<Vec<String>> {
        let mut pages = self.eks.list_clusters().into_paginator().send();
        let mut cluster_names = Vec::new();
        while let Some(page) = pages.next().await {
            cluster_names.extend(page?.clusters.unwrap_or_default());
        }
        Ok(cluster_names)
    }

    async fn nodegroup_names(&self, cluster: &str) -> Result<Vec<String>> {
        let mut pages = self
            .eks
            .list_nodegroups()
            .cluster_name(cluster)
            .into_paginator()
            .send();
        let mut nodegroup_names = Vec::new();
        while let Some(page) = pages.next().await {
            nodegroup_names.extend(page?.nodegroups.unwrap_or_default());
        }
        Ok(nodegroup_names)
    }

    async fn nodegroup_nodes(&self, cluster: &str, nodegroup_name: &str) -> Result<Vec<String>> {
        debug!(cluster, nodegroup = nodegroup_name, "describing");
        let nodegroup = self
            .eks
            .describe_nodegroup()
            .cluster_name(cluster)
            .nodegroup_name(nodegroup_name)
            .send()
            .await?
            .nodegroup
            .ok_or_else(|| anyhow!("describe_nodegroup returned empty nodegroup"))?;

        let Some(resources) = nodegroup.resources else {
            debug!("Nodegroup has no resources yet");
            return Ok(Vec::new());
        };

        Ok(asg_names(resources, nodegroup_name))
    }
}

fn asg_names(resources: NodegroupResources, nodegroup_name: &str) -> Vec<String> {
    let mut names = Vec::new();
    for asg in resources.auto_scaling_groups.unwrap_or_default() {
        match asg.name {
            Some(name) => names.push(name),
            None => warn!(
                "Skipping unnamed auto scaling group in nodegroup {}",
                nodegroup_name
            ),
        }
    }
    names
}
