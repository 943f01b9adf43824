//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Configuration errors ──────────────────────────────────────────────────────

/// Bad or missing input. Raised before any provider call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required inputs: {}", .0.join(", "))]
    MissingInputs(Vec<String>),

    #[error("A virtual network name is mandatory when a subnet name is specified.")]
    SubnetWithoutVnet,

    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Service connection '{endpoint}' has no '{key}' parameter.")]
    MissingEndpointParameter { endpoint: String, key: String },

    #[error(
        "Authentication scheme '{0}' is not supported. Use ServicePrincipal or ManagedServiceIdentity."
    )]
    UnsupportedAuthScheme(String),

    #[error("Azure CLI is not available: {0}")]
    CliUnavailable(String),

    #[error("Cannot write service principal certificate: {0}")]
    CertificateFile(String),
}

// ── Workflow errors ───────────────────────────────────────────────────────────

/// Terminal failure reason of a provisioning run.
///
/// Best-effort cleanup failures (container delete, agent delete, logout) are
/// never represented here; they are reported as warnings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProvisionError {
    #[error("{0}")]
    Configuration(#[from] ConfigError),

    #[error("Agent pool '{pool}' is not valid: {reason}")]
    InvalidPool { pool: String, reason: String },

    #[error("Azure login failed: {0}")]
    Authentication(String),

    #[error("Failed to create container: {0}")]
    Provisioning(String),

    #[error("Agent '{agent}' did not come online within {seconds} seconds.")]
    Timeout { agent: String, seconds: u64 },
}

impl ProvisionError {
    /// Stable machine-readable code used in JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::InvalidPool { .. } => "invalid_pool",
            Self::Authentication(_) => "authentication",
            Self::Provisioning(_) => "provisioning",
            Self::Timeout { .. } => "timeout",
        }
    }
}
