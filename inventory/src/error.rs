/// A fault reported by one of the inventory sources.
///
/// Each variant names the unit of work that was skipped because of it.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Error enumerating regions through {account}: {source:#}")]
    Regions {
        account: String,
        source: anyhow::Error,
    },

    #[error("Error enumerating ec2 instances in {account}/{region}: {source:#}")]
    Instances {
        account: String,
        region: String,
        source: anyhow::Error,
    },

    #[error("Error enumerating eks clusters in {account}/{region}: {source:#}")]
    Clusters {
        account: String,
        region: String,
        source: anyhow::Error,
    },

    #[error("Error enumerating nodegroups of cluster {cluster} in {account}/{region}: {source:#}")]
    Nodegroups {
        account: String,
        region: String,
        cluster: String,
        source: anyhow::Error,
    },

    #[error("Error enumerating eks nodes of {cluster}/{nodegroup} in {account}/{region}: {source:#}")]
    Nodegroup {
        account: String,
        region: String,
        cluster: String,
        nodegroup: String,
        source: anyhow::Error,
    },

    #[error("Error enumerating kubeconfig contexts: {source:#}")]
    Contexts { source: anyhow::Error },

    #[error("Error connecting to context {context}: {source:#}")]
    Client {
        context: String,
        source: anyhow::Error,
    },

    #[error("Error enumerating pods in context {context}: {source:#}")]
    Pods {
        context: String,
        source: anyhow::Error,
    },
}
