use crate::enumerate::Unit;
use crate::error::CollectError;
use crate::record::{InventoryRecord, ResourceType};
use crate::sources::{ClusterApi, ComputeApi, PodSource};
use tracing::{error, info, warn};

/// Records found by a collector, and the faults that made it skip work.
#[derive(Debug, Default)]
pub struct Collection {
    pub records: Vec<InventoryRecord>,
    pub faults: Vec<CollectError>,
}

impl Collection {
    fn push(&mut self, record: Option<InventoryRecord>) {
        match record {
            Some(record) => self.records.push(record),
            None => warn!("Skipping resource with an empty name, scope or location"),
        }
    }

    /// Logs the fault as it happens and keeps it for the totals.
    fn skip(&mut self, fault: CollectError) {
        error!("{}", fault);
        self.faults.push(fault);
    }

    fn fault(fault: CollectError) -> Self {
        let mut collection = Self::default();
        collection.skip(fault);
        collection
    }

    pub fn count(&self, resource_type: ResourceType) -> usize {
        self.records
            .iter()
            .filter(|record| record.resource_type() == resource_type)
            .count()
    }
}

pub async fn collect_instances<C>(api: &C, unit: &Unit) -> Collection
where
    C: ComputeApi + ?Sized,
{
    let instance_ids = match api.instance_ids().await {
        Ok(ids) => ids,
        Err(source) => {
            return Collection::fault(CollectError::Instances {
                account: unit.account.clone(),
                region: unit.region.clone(),
                source,
            })
        }
    };

    let mut collection = Collection::default();
    for instance_id in instance_ids {
        info!("EC2 Instance: {}", instance_id);
        collection.push(InventoryRecord::new(
            ResourceType::Instance,
            instance_id,
            &unit.account,
            &unit.region,
        ));
    }
    collection
}

pub async fn collect_nodes<C>(api: &C, unit: &Unit) -> Collection
where
    C: ClusterApi + ?Sized,
{
    let clusters = match api.cluster_names().await {
        Ok(clusters) => clusters,
        Err(source) => {
            return Collection::fault(CollectError::Clusters {
                account: unit.account.clone(),
                region: unit.region.clone(),
                source,
            })
        }
    };

    let mut collection = Collection::default();
    for cluster in clusters {
        info!("Cluster: {}", cluster);
        let nodegroups = match api.nodegroup_names(&cluster).await {
            Ok(nodegroups) => nodegroups,
            Err(source) => {
                collection.skip(CollectError::Nodegroups {
                    account: unit.account.clone(),
                    region: unit.region.clone(),
                    cluster,
                    source,
                });
                continue;
            }
        };

        for nodegroup in nodegroups {
            info!("Nodegroup: {}", nodegroup);
            let nodes = match api.nodegroup_nodes(&cluster, &nodegroup).await {
                Ok(nodes) => nodes,
                Err(source) => {
                    collection.skip(CollectError::Nodegroup {
                        account: unit.account.clone(),
                        region: unit.region.clone(),
                        cluster: cluster.clone(),
                        nodegroup,
                        source,
                    });
                    continue;
                }
            };

            for node in nodes {
                info!("Node: {}", node);
                collection.push(InventoryRecord::new(
                    ResourceType::Node,
                    node,
                    &unit.account,
                    &unit.region,
                ));
            }
        }
    }
    collection
}

pub async fn collect_pods<P>(pods_source: &P) -> Collection
where
    P: PodSource + ?Sized,
{
    let contexts = match pods_source.contexts().await {
        Ok(contexts) => contexts,
        Err(source) => return Collection::fault(CollectError::Contexts { source }),
    };

    let mut collection = Collection::default();
    for context in contexts {
        info!(
            "Context: {} (user: {}, cluster: {})",
            context.name, context.user, context.cluster
        );

        let connection = match pods_source.connect(&context).await {
            Ok(connection) => connection,
            Err(source) => {
                collection.skip(CollectError::Client {
                    context: context.name,
                    source,
                });
                continue;
            }
        };

        let pods = match pods_source.pods(&connection).await {
            Ok(pods) => pods,
            Err(source) => {
                collection.skip(CollectError::Pods {
                    context: context.name,
                    source,
                });
                continue;
            }
        };

        for pod in pods {
            info!("Pod: {}", pod.name);
            collection.push(InventoryRecord::new(
                ResourceType::Pod,
                pod.name,
                &context.name,
                pod.namespace,
            ));
        }
    }
    collection
}
