//! Application service: credential resolution from service connections.
//!
//! Turns the authorization parameters of a named service-connection endpoint
//! into [`Credentials`] plus the tenant/subscription context. The certificate
//! variant materializes its PEM content into a scoped temporary file owned by
//! the caller.

use std::io::Write;
use std::path::Path;

use aci_agent_common::inputs::endpoint;
use tempfile::NamedTempFile;

use crate::application::ports::InputSource;
use crate::domain::{AuthScheme, AzureContext, ConfigError, Credentials, RegistryCredentials, Secret};

/// File name prefix of the materialized certificate.
const CERT_FILE_PREFIX: &str = "spnCert";

/// Credentials for one run, together with the file backing a certificate.
///
/// Dropping `cert_file` deletes the certificate from disk.
#[derive(Debug)]
pub struct ResolvedCredentials {
    pub credentials: Credentials,
    pub context: AzureContext,
    pub cert_file: Option<NamedTempFile>,
}

/// Resolve the login credentials of an ARM service connection.
///
/// `temp_dir` receives the certificate file; the system temp directory is
/// used when it is `None`.
///
/// # Errors
///
/// Returns `ConfigError` for an unsupported auth scheme, a missing endpoint
/// parameter, or a certificate that cannot be written.
pub fn resolve_credentials(
    source: &impl InputSource,
    connection: &str,
    temp_dir: Option<&Path>,
) -> Result<ResolvedCredentials, ConfigError> {
    let scheme = source
        .endpoint_scheme(connection)
        .ok_or_else(|| missing(connection, "scheme"))?;
    let scheme = AuthScheme::parse(&scheme)?;

    let subscription_id = require_data(source, connection, endpoint::SUBSCRIPTION_ID)?;
    let cloud = source.endpoint_data(connection, endpoint::ENVIRONMENT);

    let (credentials, tenant_id, cert_file) = match scheme {
        AuthScheme::ManagedIdentity => (
            Credentials::ManagedIdentity,
            source.endpoint_auth(connection, endpoint::TENANT_ID),
            None,
        ),
        AuthScheme::ServicePrincipal => {
            let id = require_auth(source, connection, endpoint::SERVICE_PRINCIPAL_ID)?;
            let tenant = require_auth(source, connection, endpoint::TENANT_ID)?;
            let uses_certificate = source
                .endpoint_auth(connection, endpoint::AUTHENTICATION_TYPE)
                .is_some_and(|t| t.eq_ignore_ascii_case(endpoint::AUTH_TYPE_CERTIFICATE));

            if uses_certificate {
                let pem =
                    require_auth(source, connection, endpoint::SERVICE_PRINCIPAL_CERTIFICATE)?;
                let file = write_certificate(&pem, temp_dir)?;
                let cert_path = file.path().to_path_buf();
                (
                    Credentials::ServicePrincipalCertificate { id, cert_path },
                    Some(tenant),
                    Some(file),
                )
            } else {
                let secret = require_auth(source, connection, endpoint::SERVICE_PRINCIPAL_KEY)?;
                (
                    Credentials::ServicePrincipalKey {
                        id,
                        secret: Secret::new(secret),
                    },
                    Some(tenant),
                    None,
                )
            }
        }
    };

    tracing::debug!(
        connection,
        kind = credentials.kind(),
        cloud = cloud.as_deref().unwrap_or("default"),
        "resolved service connection"
    );

    Ok(ResolvedCredentials {
        credentials,
        context: AzureContext {
            subscription_id,
            tenant_id,
            cloud,
        },
        cert_file,
    })
}

/// Resolve the pull credentials of a container registry connection.
///
/// ACR connections authenticate with their service principal; every other
/// registry type uses a username/password pair.
///
/// # Errors
///
/// Returns `ConfigError::MissingEndpointParameter` if a credential is absent.
pub fn resolve_registry(
    source: &impl InputSource,
    connection: &str,
) -> Result<RegistryCredentials, ConfigError> {
    let is_acr = source
        .endpoint_data(connection, endpoint::REGISTRY_TYPE)
        .is_some_and(|t| t.eq_ignore_ascii_case(endpoint::REGISTRY_TYPE_ACR));

    let (user_key, password_key) = if is_acr {
        (endpoint::SERVICE_PRINCIPAL_ID, endpoint::SERVICE_PRINCIPAL_KEY)
    } else {
        (endpoint::USERNAME, endpoint::PASSWORD)
    };

    Ok(RegistryCredentials {
        username: require_auth(source, connection, user_key)?,
        password: Secret::new(require_auth(source, connection, password_key)?),
    })
}

// ── Private helpers ──────────────────────────────────────────────────────────

fn missing(connection: &str, key: &str) -> ConfigError {
    ConfigError::MissingEndpointParameter {
        endpoint: connection.to_string(),
        key: key.to_string(),
    }
}

fn require_auth(
    source: &impl InputSource,
    connection: &str,
    key: &str,
) -> Result<String, ConfigError> {
    source
        .endpoint_auth(connection, key)
        .ok_or_else(|| missing(connection, key))
}

fn require_data(
    source: &impl InputSource,
    connection: &str,
    key: &str,
) -> Result<String, ConfigError> {
    source
        .endpoint_data(connection, key)
        .ok_or_else(|| missing(connection, key))
}

fn write_certificate(pem: &str, temp_dir: Option<&Path>) -> Result<NamedTempFile, ConfigError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(CERT_FILE_PREFIX).suffix(".pem");
    let created = match temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    };
    let mut file = created.map_err(|e| ConfigError::CertificateFile(e.to_string()))?;
    file.write_all(pem.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| ConfigError::CertificateFile(e.to_string()))?;
    Ok(file)
}
