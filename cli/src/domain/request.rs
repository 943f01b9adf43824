//! Provisioning inputs and their validation.
//!
//! Pure functions only. Values arrive through a lookup closure so the same
//! validation runs against pipeline environment variables, an inputs file,
//! or a test map.

use std::path::PathBuf;
use std::sync::LazyLock;

use aci_agent_common::inputs;
use regex::Regex;

use crate::domain::credentials::Secret;
use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_CPU: &str = "1";
pub const DEFAULT_MEMORY: &str = "1.0";
pub const DEFAULT_ONLINE_TIMEOUT_SECS: u64 = 240;
pub const VALID_OS_TYPES: &[&str] = &["Linux", "Windows"];

/// Agent prefixes become the head of a container name, which Azure restricts
/// to lowercase alphanumerics and hyphens, starting with an alphanumeric.
pub static AGENT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^([a-z0-9][a-z0-9-]*)?$").expect("valid regex")
});

// ── Request types ────────────────────────────────────────────────────────────

/// Virtual network placement for the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRef {
    pub vnet: String,
    pub subnet: String,
    /// Resource group of the vnet; defaults to the container's resource group.
    pub resource_group: String,
}

/// Immutable input bundle for one `create` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    pub pool: String,
    pub token: Secret,
    pub service_connection: String,
    pub resource_group: String,
    pub location: String,
    pub image: String,
    pub os_type: String,
    pub cpu: String,
    pub memory: String,
    /// Already lower-cased.
    pub agent_prefix: String,
    pub registry_endpoint: Option<String>,
    pub network: Option<NetworkRef>,
    pub add_spn_to_container: bool,
    pub skip_deletion_on_error: bool,
    pub use_global_config: bool,
    /// Zero disables the online wait.
    pub online_timeout_secs: u64,
}

/// Immutable input bundle for one `delete` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownRequest {
    pub pool: String,
    pub token: Secret,
    pub service_connection: String,
    pub resource_group: String,
    pub container_name: String,
    pub use_global_config: bool,
}

/// Ambient pipeline variables describing the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEnvironment {
    pub collection_uri: String,
    pub build_id: Option<String>,
    pub release_id: Option<String>,
    /// `Agent.TempDirectory`, falling back to `System.DefaultWorkingDirectory`.
    pub temp_dir: Option<PathBuf>,
    pub agent_temp_dir: Option<PathBuf>,
    pub system_access_token: Option<Secret>,
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Return every name in `required` whose value is absent or blank.
pub fn missing_inputs(lookup: impl Fn(&str) -> Option<String>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| non_blank(lookup(name)).is_none())
        .map(|name| (*name).to_string())
        .collect()
}

/// Task-lib boolean semantics: only a case-insensitive `true` is true.
#[must_use]
pub fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

impl ProvisioningRequest {
    /// Validate inputs and build a request.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingInputs` naming all absent required inputs
    /// at once, `ConfigError::SubnetWithoutVnet` when a subnet is given
    /// without a vnet, or `ConfigError::InvalidValue` for malformed values.
    pub fn from_inputs(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| non_blank(lookup(name));

        let missing = missing_inputs(&lookup, inputs::REQUIRED_CREATE_INPUTS);
        if !missing.is_empty() {
            return Err(ConfigError::MissingInputs(missing));
        }

        let resource_group = get(inputs::RESOURCE_GROUP).unwrap_or_default();
        let network = match (get(inputs::SUBNET_NAME), get(inputs::VNET_NAME)) {
            (Some(_), None) => return Err(ConfigError::SubnetWithoutVnet),
            (Some(subnet), Some(vnet)) => Some(NetworkRef {
                vnet,
                subnet,
                resource_group: get(inputs::VNET_RESOURCE_GROUP)
                    .unwrap_or_else(|| resource_group.clone()),
            }),
            (None, _) => None,
        };

        let os_type = validate_os_type(&get(inputs::OS_TYPE).unwrap_or_default())?;
        let cpu = validate_positive_number(
            inputs::CPU,
            get(inputs::CPU).unwrap_or_else(|| DEFAULT_CPU.to_string()),
        )?;
        let memory = validate_positive_number(
            inputs::MEMORY,
            get(inputs::MEMORY).unwrap_or_else(|| DEFAULT_MEMORY.to_string()),
        )?;
        let online_timeout_secs = match get(inputs::TIMEOUT_AGENT_ONLINE) {
            None => DEFAULT_ONLINE_TIMEOUT_SECS,
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: inputs::TIMEOUT_AGENT_ONLINE.to_string(),
                value: raw.clone(),
                reason: "expected a whole number of seconds".to_string(),
            })?,
        };
        let agent_prefix = validate_agent_prefix(get(inputs::AGENT_PREFIX).unwrap_or_default())?;

        Ok(Self {
            pool: get(inputs::AGENT_POOL).unwrap_or_default(),
            token: Secret::new(get(inputs::AZURE_DEVOPS_TOKEN).unwrap_or_default()),
            service_connection: get(inputs::SERVICE_CONNECTION).unwrap_or_default(),
            resource_group,
            location: get(inputs::LOCATION).unwrap_or_default(),
            image: get(inputs::IMAGE_NAME).unwrap_or_default(),
            os_type,
            cpu,
            memory,
            agent_prefix,
            registry_endpoint: get(inputs::CONTAINER_REGISTRY),
            network,
            add_spn_to_container: parse_bool(lookup(inputs::ADD_SPN_TO_CONTAINER).as_deref()),
            skip_deletion_on_error: parse_bool(lookup(inputs::SKIP_DELETION_ON_ERROR).as_deref()),
            use_global_config: parse_bool(lookup(inputs::USE_GLOBAL_CONFIG).as_deref()),
            online_timeout_secs,
        })
    }
}

impl TeardownRequest {
    /// Validate inputs and build a teardown request.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingInputs` naming all absent required inputs.
    pub fn from_inputs(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| non_blank(lookup(name)).unwrap_or_default();

        let missing = missing_inputs(&lookup, inputs::REQUIRED_DELETE_INPUTS);
        if !missing.is_empty() {
            return Err(ConfigError::MissingInputs(missing));
        }

        Ok(Self {
            pool: get(inputs::AGENT_POOL),
            token: Secret::new(get(inputs::AZURE_DEVOPS_TOKEN)),
            service_connection: get(inputs::SERVICE_CONNECTION),
            resource_group: get(inputs::RESOURCE_GROUP),
            container_name: get(inputs::CONTAINER_NAME),
            use_global_config: parse_bool(lookup(inputs::USE_GLOBAL_CONFIG).as_deref()),
        })
    }
}

impl RunEnvironment {
    /// Read the ambient pipeline variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingInputs` when the collection URI is unset;
    /// without it neither the REST API nor the agent can reach the pool.
    pub fn from_variables(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| non_blank(lookup(name));

        let collection_uri = get(inputs::COLLECTION_URI)
            .ok_or_else(|| ConfigError::MissingInputs(vec![inputs::COLLECTION_URI.to_string()]))?;
        let agent_temp_dir = get(inputs::AGENT_TEMP_DIRECTORY).map(PathBuf::from);
        let temp_dir = agent_temp_dir
            .clone()
            .or_else(|| get(inputs::DEFAULT_WORKING_DIRECTORY).map(PathBuf::from));

        Ok(Self {
            collection_uri,
            build_id: get(inputs::BUILD_ID),
            release_id: get(inputs::RELEASE_ID),
            temp_dir,
            agent_temp_dir,
            system_access_token: get(inputs::SYSTEM_ACCESS_TOKEN).map(Secret::new),
        })
    }

    /// Build id followed by release id; either may be empty.
    #[must_use]
    pub fn run_id(&self) -> String {
        format!(
            "{}{}",
            self.build_id.as_deref().unwrap_or(""),
            self.release_id.as_deref().unwrap_or("")
        )
    }
}

/// Token used against the control plane: the caller-supplied token, or the
/// job's `System.AccessToken` when the caller supplied none.
#[must_use]
pub fn effective_token<'a>(supplied: &'a Secret, env: &'a RunEnvironment) -> Option<&'a Secret> {
    if supplied.expose().is_empty() {
        env.system_access_token.as_ref()
    } else {
        Some(supplied)
    }
}

// ── Private helpers ──────────────────────────────────────────────────────────

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_os_type(raw: &str) -> Result<String, ConfigError> {
    VALID_OS_TYPES
        .iter()
        .find(|t| t.eq_ignore_ascii_case(raw))
        .map(|t| (*t).to_string())
        .ok_or_else(|| ConfigError::InvalidValue {
            name: inputs::OS_TYPE.to_string(),
            value: raw.to_string(),
            reason: format!("expected one of {}", VALID_OS_TYPES.join(", ")),
        })
}

fn validate_positive_number(name: &str, raw: String) -> Result<String, ConfigError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(raw),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
            reason: "expected a positive number".to_string(),
        }),
    }
}

fn validate_agent_prefix(raw: String) -> Result<String, ConfigError> {
    let prefix = raw.to_lowercase();
    if AGENT_PREFIX_RE.is_match(&prefix) {
        Ok(prefix)
    } else {
        Err(ConfigError::InvalidValue {
            name: inputs::AGENT_PREFIX.to_string(),
            value: raw,
            reason: "only letters, digits and hyphens are allowed, starting with a letter or digit"
                .to_string(),
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
