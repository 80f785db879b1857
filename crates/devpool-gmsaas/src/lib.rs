//! Genymotion SaaS instance source for devpool
//!
//! Implements [`devpool_core::InstanceSource`] on top of the `gmsaas` CLI.
//!
//! # Requirements
//!
//! - `gmsaas` must be installed and logged in (`gmsaas auth login`)
//!
//! # Example
//!
//! ```ignore
//! use devpool_gmsaas::{Gmsaas, GmsaasSource};
//! use devpool_core::InstanceSource;
//!
//! let source = GmsaasSource::new(Gmsaas::new("gmsaas"));
//! let list = source.list_instances().await?;
//! ```

pub mod error;
pub mod gmsaas;
pub mod source;

pub use error::{GmsaasError, Result};
pub use gmsaas::{DEFAULT_BINARY, Gmsaas};
pub use source::GmsaasSource;
