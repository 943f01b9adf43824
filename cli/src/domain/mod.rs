//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod container;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod outcome;
pub mod pool;
pub mod request;

pub use credentials::{AuthScheme, AzureContext, Credentials, RegistryCredentials, Secret};
pub use error::{ConfigError, ProvisionError};
pub use identity::AgentIdentity;
pub use outcome::{Stage, TeardownResult, WorkflowResult};
pub use pool::{AgentStatus, PoolRef};
pub use request::{ProvisioningRequest, RunEnvironment, TeardownRequest};
