//! Identity and authentication material for one provisioning run.

use std::fmt;
use std::path::{Path, PathBuf};

use aci_agent_common::inputs::endpoint;
use zeroize::Zeroize;

use crate::domain::error::ConfigError;

/// A secret string that is zeroized on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the plaintext. Callers must only hand it to the secret channel
    /// of a provider call.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(***)")
    }
}

/// Authorization scheme declared on an ARM service connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    ServicePrincipal,
    ManagedIdentity,
}

impl AuthScheme {
    /// Parse the endpoint scheme name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedAuthScheme` for anything other than
    /// `ServicePrincipal` or `ManagedServiceIdentity`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let scheme = raw.trim();
        if scheme.eq_ignore_ascii_case(endpoint::SCHEME_SERVICE_PRINCIPAL) {
            Ok(Self::ServicePrincipal)
        } else if scheme.eq_ignore_ascii_case(endpoint::SCHEME_MANAGED_IDENTITY) {
            Ok(Self::ManagedIdentity)
        } else {
            Err(ConfigError::UnsupportedAuthScheme(scheme.to_string()))
        }
    }
}

/// Resolved login credentials. Exactly one variant is active per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    ServicePrincipalKey { id: String, secret: Secret },
    /// `cert_path` points at a run-scoped PEM file owned by the workflow.
    ServicePrincipalCertificate { id: String, cert_path: PathBuf },
    ManagedIdentity,
}

impl Credentials {
    #[must_use]
    pub fn service_principal_id(&self) -> Option<&str> {
        match self {
            Self::ServicePrincipalKey { id, .. } | Self::ServicePrincipalCertificate { id, .. } => {
                Some(id)
            }
            Self::ManagedIdentity => None,
        }
    }

    /// Only the key variant carries a secret that can be handed to the agent.
    #[must_use]
    pub fn service_principal_secret(&self) -> Option<&Secret> {
        match self {
            Self::ServicePrincipalKey { secret, .. } => Some(secret),
            _ => None,
        }
    }

    #[must_use]
    pub fn certificate_path(&self) -> Option<&Path> {
        match self {
            Self::ServicePrincipalCertificate { cert_path, .. } => Some(cert_path),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_managed_identity(&self) -> bool {
        matches!(self, Self::ManagedIdentity)
    }

    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServicePrincipalKey { .. } => "service principal (key)",
            Self::ServicePrincipalCertificate { .. } => "service principal (certificate)",
            Self::ManagedIdentity => "managed identity",
        }
    }
}

/// Subscription context read from the ARM service connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureContext {
    pub subscription_id: String,
    pub tenant_id: Option<String>,
    /// Cloud name for `az cloud set`, e.g. `AzureCloud` or `AzureUSGovernment`.
    pub cloud: Option<String>,
}

/// Credentials for a private image registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: Secret,
}
