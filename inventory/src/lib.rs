pub mod aws;
pub mod collect;
pub mod enumerate;
pub mod error;
pub mod inventory;
pub mod k8s;
pub mod record;
pub mod report;
pub mod sources;

pub use collect::Collection;
pub use enumerate::{Plan, Unit};
pub use error::CollectError;
pub use record::{InventoryRecord, ResourceType};
pub use report::{Report, Totals};
