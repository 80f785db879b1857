//! Collaborator traits consumed by the lookup service

use crate::error::Result;
use crate::instance::{BusyDevice, InstanceList};
use async_trait::async_trait;

/// Source of provider instance snapshots
///
/// Implementations own transport concerns (authentication, retries,
/// timeouts). Every call returns the full current list.
#[async_trait]
pub trait InstanceSource: Send + Sync {
    /// List every instance currently known to the provider
    async fn list_instances(&self) -> Result<InstanceList>;
}

/// Registry of devices claimed by active sessions
#[async_trait]
pub trait BusyRegistry: Send + Sync {
    /// Devices currently claimed, across all recipes and users
    async fn list_busy_devices(&self) -> Result<Vec<BusyDevice>>;
}

/// A busy registry that can also claim and release devices atomically
#[async_trait]
pub trait DeviceClaims: BusyRegistry {
    /// Mark a device busy. Returns false if its id is already claimed.
    async fn try_claim(&self, device: BusyDevice) -> Result<bool>;

    /// Release a device. Returns false if it was not claimed.
    async fn release(&self, id: &str) -> Result<bool>;
}

/// Naming convention oracle
pub trait InstanceNaming: Send + Sync {
    /// Whether `name` belongs to the caller's family of instances
    fn is_familial(&self, name: &str) -> bool;
}
