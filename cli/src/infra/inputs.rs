//! Infrastructure implementation of the `InputSource` port.
//!
//! Three layers, highest priority first:
//! 1. `--input NAME=VALUE` overrides from the command line.
//! 2. A YAML inputs file.
//! 3. The Azure Pipelines task environment (`INPUT_*`, variables,
//!    `ENDPOINT_*`).
//!
//! Lookups are case-insensitive and blank values count as absent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;

use crate::application::ports::InputSource;

/// Environment variable naming the inputs file.
pub const INPUTS_FILE_ENV: &str = "ACI_AGENT_INPUTS";

/// One service connection described in the inputs file.
#[derive(Debug, Default, Deserialize)]
pub struct EndpointFile {
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub auth: HashMap<String, Value>,
    #[serde(default)]
    pub data: HashMap<String, Value>,
}

/// On-disk shape of the inputs file.
///
/// ```yaml
/// inputs:
///   agentPool: linux-aci
/// variables:
///   System.TeamFoundationCollectionUri: https://dev.azure.com/contoso
/// endpoints:
///   arm-prod:
///     scheme: ServicePrincipal
///     auth: { serviceprincipalid: ..., serviceprincipalkey: ..., tenantid: ... }
///     data: { SubscriptionID: ... }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct InputsFile {
    #[serde(default)]
    pub inputs: HashMap<String, Value>,
    #[serde(default)]
    pub variables: HashMap<String, Value>,
    #[serde(default)]
    pub endpoints: HashMap<String, EndpointFile>,
}

impl InputsFile {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }
}

/// Layered, case-insensitive input source.
#[derive(Debug, Default)]
pub struct LayeredInputs {
    overrides: HashMap<String, String>,
    inputs: HashMap<String, String>,
    variables: HashMap<String, String>,
    endpoints: HashMap<String, NormalizedEndpoint>,
    env: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct NormalizedEndpoint {
    scheme: Option<String>,
    auth: HashMap<String, String>,
    data: HashMap<String, String>,
}

impl LayeredInputs {
    /// Build from already-loaded layers. `env` is a snapshot of the process
    /// environment.
    #[must_use]
    pub fn from_parts(
        overrides: impl IntoIterator<Item = (String, String)>,
        file: InputsFile,
        env: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
            inputs: normalize_map(file.inputs),
            variables: normalize_map(file.variables),
            endpoints: file
                .endpoints
                .into_iter()
                .map(|(name, ep)| {
                    (
                        name.to_lowercase(),
                        NormalizedEndpoint {
                            scheme: ep.scheme,
                            auth: normalize_map(ep.auth),
                            data: normalize_map(ep.data),
                        },
                    )
                })
                .collect(),
            env: env
                .into_iter()
                .map(|(k, v)| (k.to_uppercase(), v))
                .collect(),
        }
    }

    /// Load all layers for this process.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named inputs file cannot be loaded.
    pub fn load(
        overrides: impl IntoIterator<Item = (String, String)>,
        inputs_file: Option<&Path>,
    ) -> Result<Self> {
        let file = match resolve_inputs_path(inputs_file) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading inputs file");
                InputsFile::load(&path)?
            }
            None => InputsFile::default(),
        };
        Ok(Self::from_parts(overrides, file, std::env::vars()))
    }

    fn env_var(&self, name: &str) -> Option<String> {
        non_blank(self.env.get(&env_key(name)).cloned())
    }

    fn endpoint(&self, endpoint: &str) -> Option<&NormalizedEndpoint> {
        self.endpoints.get(&endpoint.to_lowercase())
    }
}

impl InputSource for LayeredInputs {
    fn input(&self, name: &str) -> Option<String> {
        let key = name.to_lowercase();
        non_blank(self.overrides.get(&key).cloned())
            .or_else(|| non_blank(self.inputs.get(&key).cloned()))
            .or_else(|| self.env_var(&format!("INPUT_{name}")))
    }

    fn variable(&self, name: &str) -> Option<String> {
        non_blank(self.variables.get(&name.to_lowercase()).cloned())
            .or_else(|| self.env_var(name))
    }

    fn endpoint_scheme(&self, endpoint: &str) -> Option<String> {
        non_blank(self.endpoint(endpoint).and_then(|e| e.scheme.clone()))
            .or_else(|| self.env_var(&format!("ENDPOINT_AUTH_SCHEME_{endpoint}")))
    }

    fn endpoint_auth(&self, endpoint: &str, key: &str) -> Option<String> {
        non_blank(
            self.endpoint(endpoint)
                .and_then(|e| e.auth.get(&key.to_lowercase()).cloned()),
        )
        .or_else(|| self.env_var(&format!("ENDPOINT_AUTH_PARAMETER_{endpoint}_{key}")))
    }

    fn endpoint_data(&self, endpoint: &str, key: &str) -> Option<String> {
        non_blank(
            self.endpoint(endpoint)
                .and_then(|e| e.data.get(&key.to_lowercase()).cloned()),
        )
        .or_else(|| self.env_var(&format!("ENDPOINT_DATA_{endpoint}_{key}")))
    }
}

// ── Private helpers ──────────────────────────────────────────────────────────

/// Explicit path, then `ACI_AGENT_INPUTS`, then `~/.aci-agent/inputs.yaml`
/// when it exists.
fn resolve_inputs_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(val) = std::env::var(INPUTS_FILE_ENV) {
        if !val.trim().is_empty() {
            return Some(PathBuf::from(val));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".aci-agent").join("inputs.yaml"))
        .filter(|path| path.exists())
}

/// Azure Pipelines exposes names upper-cased with `.` and spaces as `_`.
fn env_key(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '.' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

fn normalize_map(map: HashMap<String, Value>) -> HashMap<String, String> {
    map.into_iter()
        .filter_map(|(k, v)| scalar(&v).map(|v| (k.to_lowercase(), v)))
        .collect()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
