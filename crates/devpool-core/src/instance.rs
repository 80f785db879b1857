//! Instance snapshot types
//!
//! Field names on the wire follow the `gmsaas --format compactjson` output
//! (`uuid`, `adb_serial`, ...); the Rust side uses domain names.

use serde::{Deserialize, Serialize};

/// Address reported by the provider while an instance has no reachable
/// ADB endpoint yet.
pub const DISCONNECTED_ADDRESS: &str = "0.0.0.0";

/// Returns true if `address` is the "not connectable yet" sentinel.
pub fn is_disconnected(address: &str) -> bool {
    address == DISCONNECTED_ADDRESS
}

/// Lifecycle status of a provider instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    Creating,
    Starting,
    Booting,
    /// The only state eligible for allocation
    Online,
    Stopping,
    Offline,
    Recycling,
    /// Auto-shutdown after inactivity
    Recycled,
    Deleting,
    Deleted,
    Error,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for InstanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InstanceState::Creating => "CREATING",
            InstanceState::Starting => "STARTING",
            InstanceState::Booting => "BOOTING",
            InstanceState::Online => "ONLINE",
            InstanceState::Stopping => "STOPPING",
            InstanceState::Offline => "OFFLINE",
            InstanceState::Recycling => "RECYCLING",
            InstanceState::Recycled => "RECYCLED",
            InstanceState::Deleting => "DELETING",
            InstanceState::Deleted => "DELETED",
            InstanceState::Error => "ERROR",
            InstanceState::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Reference to the recipe (template) an instance was created from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRef {
    #[serde(rename = "uuid", default)]
    pub id: String,

    #[serde(default)]
    pub name: String,
}

/// Provider-reported instance snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "uuid")]
    pub id: String,

    pub name: String,

    /// ADB serial; [`DISCONNECTED_ADDRESS`] until the provider assigns one
    #[serde(rename = "adb_serial", default = "disconnected_address")]
    pub connection_address: String,

    pub state: InstanceState,

    pub recipe: RecipeRef,
}

fn disconnected_address() -> String {
    DISCONNECTED_ADDRESS.to_string()
}

impl Instance {
    pub fn is_online(&self) -> bool {
        self.state == InstanceState::Online
    }

    pub fn is_adb_connected(&self) -> bool {
        !is_disconnected(&self.connection_address)
    }

    /// Still on its way to ONLINE
    pub fn is_initializing(&self) -> bool {
        matches!(
            self.state,
            InstanceState::Creating | InstanceState::Starting | InstanceState::Booting
        )
    }
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GenyCloud:{} ({} {})",
            self.name, self.id, self.connection_address
        )
    }
}

/// Result of listing the provider's instances
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceList {
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl InstanceList {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self { instances }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// An instance that passed every allocation check at lookup time
///
/// Kept apart from [`Instance`] so that allocation-specific data can be
/// attached later without widening the raw snapshot type. Being free at
/// lookup time does not mean the instance is reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeInstance {
    pub id: String,
    pub name: String,
    pub connection_address: String,
    pub state: InstanceState,
    pub recipe: RecipeRef,
}

impl From<Instance> for FreeInstance {
    fn from(instance: Instance) -> Self {
        Self {
            id: instance.id,
            name: instance.name,
            connection_address: instance.connection_address,
            state: instance.state,
            recipe: instance.recipe,
        }
    }
}

impl FreeInstance {
    /// Registry record to claim this instance with
    pub fn busy_record(&self) -> BusyDevice {
        BusyDevice::new(&self.id, &self.connection_address)
    }
}

impl std::fmt::Display for FreeInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GenyCloud:{} ({} {})",
            self.name, self.id, self.connection_address
        )
    }
}

/// A device claimed by an active session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyDevice {
    pub id: String,

    #[serde(default)]
    pub connection_address: String,
}

impl BusyDevice {
    pub fn new(id: impl Into<String>, connection_address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            connection_address: connection_address.into(),
        }
    }
}
