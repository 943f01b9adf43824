//! Canonical task input, pipeline variable, endpoint parameter and output names.
//!
//! Names follow the Azure Pipelines task contract so the same binary can run
//! as a pipeline step (inputs arrive as `INPUT_*` environment variables) or
//! from a shell with an inputs file.

// ── Task inputs ──────────────────────────────────────────────────────────────

pub const AGENT_POOL: &str = "agentPool";
pub const AZURE_DEVOPS_TOKEN: &str = "azureDevOpsToken";
pub const SERVICE_CONNECTION: &str = "connectedServiceNameARM";
pub const RESOURCE_GROUP: &str = "resourceGroupName";
pub const LOCATION: &str = "location";
pub const IMAGE_NAME: &str = "imageName";
pub const OS_TYPE: &str = "osType";
pub const CPU: &str = "CPU";
pub const MEMORY: &str = "memory";
pub const AGENT_PREFIX: &str = "agentPrefix";
pub const CONTAINER_REGISTRY: &str = "containerRegistry";
pub const VNET_RESOURCE_GROUP: &str = "vnetResourceGroupName";
pub const VNET_NAME: &str = "vnetName";
pub const SUBNET_NAME: &str = "subnetName";
pub const ADD_SPN_TO_CONTAINER: &str = "addSPNToContainer";
pub const SKIP_DELETION_ON_ERROR: &str = "skipContainerDeletionOnError";
pub const USE_GLOBAL_CONFIG: &str = "useGlobalConfig";
pub const TIMEOUT_AGENT_ONLINE: &str = "timeoutAgentOnline";
pub const CONTAINER_NAME: &str = "containerName";

/// Inputs that must be present for `create`, in the order they are reported.
pub const REQUIRED_CREATE_INPUTS: &[&str] = &[
    AGENT_POOL,
    AZURE_DEVOPS_TOKEN,
    SERVICE_CONNECTION,
    RESOURCE_GROUP,
    LOCATION,
    IMAGE_NAME,
    OS_TYPE,
];

/// Inputs that must be present for `delete`.
pub const REQUIRED_DELETE_INPUTS: &[&str] = &[
    AGENT_POOL,
    AZURE_DEVOPS_TOKEN,
    SERVICE_CONNECTION,
    RESOURCE_GROUP,
    CONTAINER_NAME,
];

// ── Pipeline variables ───────────────────────────────────────────────────────

pub const COLLECTION_URI: &str = "System.TeamFoundationCollectionUri";
pub const BUILD_ID: &str = "Build.BuildId";
pub const RELEASE_ID: &str = "Release.ReleaseId";
pub const AGENT_TEMP_DIRECTORY: &str = "Agent.TempDirectory";
pub const DEFAULT_WORKING_DIRECTORY: &str = "System.DefaultWorkingDirectory";
pub const SYSTEM_ACCESS_TOKEN: &str = "System.AccessToken";

// ── Service-connection endpoint parameters ───────────────────────────────────

pub mod endpoint {
    pub const SCHEME_SERVICE_PRINCIPAL: &str = "ServicePrincipal";
    pub const SCHEME_MANAGED_IDENTITY: &str = "ManagedServiceIdentity";

    pub const AUTHENTICATION_TYPE: &str = "authenticationType";
    pub const AUTH_TYPE_CERTIFICATE: &str = "spnCertificate";
    pub const SERVICE_PRINCIPAL_ID: &str = "serviceprincipalid";
    pub const SERVICE_PRINCIPAL_KEY: &str = "serviceprincipalkey";
    pub const SERVICE_PRINCIPAL_CERTIFICATE: &str = "servicePrincipalCertificate";
    pub const TENANT_ID: &str = "tenantid";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";

    pub const SUBSCRIPTION_ID: &str = "SubscriptionID";
    pub const ENVIRONMENT: &str = "environment";
    pub const REGISTRY_TYPE: &str = "registrytype";
    pub const REGISTRY_TYPE_ACR: &str = "ACR";
}

// ── Task outputs ─────────────────────────────────────────────────────────────

pub const OUTPUT_CONTAINER_NAME: &str = "ImageNameOutput";
pub const OUTPUT_CONTAINER_ID: &str = "ImageIdOutput";
