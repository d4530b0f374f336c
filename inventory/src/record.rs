use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Instance,
    Node,
    Pod,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance => write!(f, "instance"),
            Self::Node => write!(f, "node"),
            Self::Pod => write!(f, "pod"),
        }
    }
}

/// One row of the inventory.
///
/// `scope` is the AWS profile for instances and nodes, or the kubeconfig
/// context for pods. `location` is the region, or the pod's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecord {
    resource_type: ResourceType,
    name: String,
    scope: String,
    location: String,
}

impl InventoryRecord {
    /// Returns `None` if any of the fields would be empty.
    pub fn new(
        resource_type: ResourceType,
        name: impl Into<String>,
        scope: impl Into<String>,
        location: impl Into<String>,
    ) -> Option<Self> {
        let record = Self {
            resource_type,
            name: name.into(),
            scope: scope.into(),
            location: location.into(),
        };
        if record.name.is_empty() || record.scope.is_empty() || record.location.is_empty() {
            None
        } else {
            Some(record)
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}
