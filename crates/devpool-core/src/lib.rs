//! devpool core
//!
//! Lookup and allocation of cloud-hosted device instances (Genymotion SaaS
//! virtual Android devices) for automated test sessions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │            Allocator (claim / release)           │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 LookupService                    │
//! │   find_free_instance(recipe) / get_instance(id)  │
//! └───────┬─────────────────┬─────────────────┬─────┘
//!         │                 │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐ ┌───────▼───────┐
//! │InstanceSource │ │ BusyRegistry  │ │InstanceNaming │
//! │   (gmsaas)    │ │ (file / mem)  │ │   (session)   │
//! └───────────────┘ └───────────────┘ └───────────────┘
//! ```
//!
//! The lookup service never claims anything. Callers that need an instance
//! for themselves go through [`Allocator`], which claims atomically in the
//! registry and looks again when it loses a race.

pub mod allocator;
pub mod error;
pub mod instance;
pub mod lookup;
pub mod naming;
pub mod provider;
pub mod registry;

// Re-exports
pub use allocator::{Allocator, DEFAULT_CLAIM_ATTEMPTS};
pub use error::{PoolError, Result};
pub use instance::{
    BusyDevice, DISCONNECTED_ADDRESS, FreeInstance, Instance, InstanceList, InstanceState,
    RecipeRef, is_disconnected,
};
pub use lookup::{EligibilityCheck, LookupService};
pub use naming::{DEFAULT_PREFIX, SessionNaming};
pub use provider::{BusyRegistry, DeviceClaims, InstanceNaming, InstanceSource};
pub use registry::{FileRegistry, InMemoryRegistry};
