use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// How a missing resource was looked up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResourceKey {
    Name(String),
    Guid(String),
    #[default]
    Unspecified,
}

impl ResourceKey {
    pub fn name(name: impl Into<String>) -> Self {
        ResourceKey::Name(name.into())
    }

    pub fn guid(guid: impl Into<String>) -> Self {
        ResourceKey::Guid(guid.into())
    }

    fn describe(&self, kind: &str) -> String {
        match self {
            ResourceKey::Name(name) => format!("{kind} {name} not found"),
            ResourceKey::Guid(guid) => format!("{kind} with GUID {guid} not found"),
            ResourceKey::Unspecified => format!("{kind} not found"),
        }
    }
}

struct NotFound<'a>(&'a str, &'a ResourceKey);

impl fmt::Display for NotFound<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.1.describe(self.0))
    }
}

/// Domain errors raised by the actors. They carry only the lookup key; rendering for the
/// user happens in the command layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("{}", NotFound("Application", .0))]
    ApplicationNotFound(ResourceKey),

    #[error("{}", NotFound("Service instance", .0))]
    ServiceInstanceNotFound(ResourceKey),

    #[error("{}", NotFound("Domain", .0))]
    DomainNotFound(ResourceKey),

    #[error("{}", NotFound("Security group", .0))]
    SecurityGroupNotFound(ResourceKey),

    #[error("{}", NotFound("Organization", .0))]
    OrganizationNotFound(ResourceKey),

    #[error("{}", NotFound("Space", .0))]
    SpaceNotFound(ResourceKey),

    #[error("Process not found")]
    ProcessNotFound { process_type: String },

    #[error("route '{route}' is in a different space")]
    RouteInDifferentSpace { route: String },

    #[error("HTTP route on domain '{domain}' cannot have a port")]
    InvalidHttpRouteSettings { domain: String },

    #[error("TCP route on domain '{domain}' cannot have a host or path")]
    InvalidTcpRouteSettings { domain: String },

    #[error("a hostname is required for shared domains")]
    NoHostnameAndSharedDomain,

    #[error("no orphaned routes found")]
    OrphanedRoutesNotFound,

    #[error("service instance is not shareable")]
    ServiceInstanceNotShareable {
        feature_flag_enabled: bool,
        service_broker_sharing_enabled: bool,
    },

    #[error("service instance '{name}' not found")]
    SharedServiceInstanceNotFound { name: String },

    #[error("service instance is already shared with that space")]
    ServiceInstanceAlreadyShared,

    #[error("no API endpoint set")]
    NoApiSet { binary_name: String },

    #[error("not logged in")]
    NotLoggedIn { binary_name: String },

    #[error("no organization targeted")]
    NoOrganizationTargeted { binary_name: String },

    #[error("no space targeted")]
    NoSpaceTargeted { binary_name: String },

    #[error("API version {current} is below the minimum {minimum}")]
    MinimumApiVersionNotMet { current: String, minimum: String },

    #[error("app {name} failed to start within the startup timeout")]
    StartupTimeout { name: String },

    #[error("app {app_name} staging did not complete within {}s", .timeout.as_secs())]
    StagingTimeout { app_name: String, timeout: Duration },

    #[error("staging failed: {reason}")]
    StagingFailed { reason: String },

    #[error("staging failed: {reason}")]
    StagingFailedNoAppDetected { reason: String },

    #[error("app instance of {name} crashed")]
    ApplicationInstanceCrashed { name: String },

    #[error("app instance of {name} is flapping")]
    ApplicationInstanceFlapping { name: String },

    #[error("{message}")]
    TaskWorkersUnavailable { message: String },

    #[error("the following arguments cannot be used together: {}", .properties.join(", "))]
    PropertyCombination { properties: Vec<String> },

    #[error("timeout connecting to log cache")]
    LogCacheTimeout,
}
