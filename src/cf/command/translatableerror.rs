//! User-facing errors.
//!
//! Every error that reaches a command is funneled through [`convert`] into a
//! [`TranslatableError`]: a closed set of messages, each an English template with named
//! placeholders that the [`Translator`] can swap for the user's locale. Errors without a
//! dedicated message stay [`TranslatableError::Untranslated`] and print as they are.

use crate::actor::{ActionError, ResourceKey};
use crate::api::uaa::UaaError;
use crate::api::CcError;
use crate::config::BINARY_NAME;
use crate::error::Error;
use cfui::{Translatable, Translator};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

const DROPLET_MISSING: &str =
    "Task must have a droplet. Specify droplet or assign current droplet to app.";

#[derive(Debug)]
pub enum TranslatableError {
    ApplicationNotFound { name: String, guid: String },
    ServiceInstanceNotFound { name: String, guid: String },
    DomainNotFound { name: String, guid: String },
    SecurityGroupNotFound { name: String },
    OrgNotFound { name: String },
    SpaceNotFound { name: String },
    ProcessNotFound { process_type: String },
    RouteInDifferentSpace { route: String },
    PortNotAllowedWithHttpDomain { domain: String },
    HostAndPathNotAllowedWithTcpDomain { domain: String },
    NoHostnameAndSharedDomain,
    OrphanedRoutesNotFound,
    ServiceInstanceNotShareable {
        feature_flag_enabled: bool,
        service_broker_sharing_enabled: bool,
    },
    SharedServiceInstanceNotFound,
    ServiceInstanceAlreadyShared,
    NoApiSet { binary_name: String },
    NotLoggedIn { binary_name: String },
    NoOrganizationTargeted { binary_name: String },
    NoSpaceTargeted { binary_name: String },
    MinimumApiVersionNotMet { current: String, minimum: String },
    LifecycleMinimumApiVersionNotMet { current: String, minimum: String },
    StartupTimeout { app_name: String },
    StagingTimeout { app_name: String, timeout: Duration },
    StagingFailed { message: String },
    StagingFailedNoAppDetected { message: String },
    UnsuccessfulStart { app_name: String },
    RunTask { message: String },
    PropertyCombination { properties: Vec<String> },
    LogCacheTimeout,
    ApiRequest { message: String },
    InvalidSslCert { url: String },
    SslCert { message: String },
    ApiNotFound { url: String },
    MultiError { messages: Vec<String> },
    BadCredentials,
    UnauthorizedToPerformAction,
    InvalidRefreshToken,
    JsonSyntax { message: String },
    ArgumentCombination { args: Vec<String> },
    IncorrectUsage { message: String },
    UnknownCommand { name: String },
    Untranslated(Error),
}

fn key_parts(key: ResourceKey) -> (String, String) {
    match key {
        ResourceKey::Name(name) => (name, String::new()),
        ResourceKey::Guid(guid) => (String::new(), guid),
        ResourceKey::Unspecified => (String::new(), String::new()),
    }
}

fn key_label(key: ResourceKey) -> String {
    match key {
        ResourceKey::Name(s) | ResourceKey::Guid(s) => s,
        ResourceKey::Unspecified => String::new(),
    }
}

fn convert_action(err: ActionError) -> TranslatableError {
    use TranslatableError as T;
    match err {
        ActionError::ApplicationNotFound(key) => {
            let (name, guid) = key_parts(key);
            T::ApplicationNotFound { name, guid }
        }
        ActionError::ServiceInstanceNotFound(key) => {
            let (name, guid) = key_parts(key);
            T::ServiceInstanceNotFound { name, guid }
        }
        ActionError::DomainNotFound(key) => {
            let (name, guid) = key_parts(key);
            T::DomainNotFound { name, guid }
        }
        ActionError::SecurityGroupNotFound(key) => T::SecurityGroupNotFound {
            name: key_label(key),
        },
        ActionError::OrganizationNotFound(key) => T::OrgNotFound {
            name: key_label(key),
        },
        ActionError::SpaceNotFound(key) => T::SpaceNotFound {
            name: key_label(key),
        },
        ActionError::ProcessNotFound { process_type } => T::ProcessNotFound { process_type },
        ActionError::RouteInDifferentSpace { route } => T::RouteInDifferentSpace { route },
        ActionError::InvalidHttpRouteSettings { domain } => {
            T::PortNotAllowedWithHttpDomain { domain }
        }
        ActionError::InvalidTcpRouteSettings { domain } => {
            T::HostAndPathNotAllowedWithTcpDomain { domain }
        }
        ActionError::NoHostnameAndSharedDomain => T::NoHostnameAndSharedDomain,
        ActionError::OrphanedRoutesNotFound => T::OrphanedRoutesNotFound,
        ActionError::ServiceInstanceNotShareable {
            feature_flag_enabled,
            service_broker_sharing_enabled,
        } => T::ServiceInstanceNotShareable {
            feature_flag_enabled,
            service_broker_sharing_enabled,
        },
        ActionError::SharedServiceInstanceNotFound { .. } => T::SharedServiceInstanceNotFound,
        ActionError::ServiceInstanceAlreadyShared => T::ServiceInstanceAlreadyShared,
        ActionError::NoApiSet { binary_name } => T::NoApiSet { binary_name },
        ActionError::NotLoggedIn { binary_name } => T::NotLoggedIn { binary_name },
        ActionError::NoOrganizationTargeted { binary_name } => {
            T::NoOrganizationTargeted { binary_name }
        }
        ActionError::NoSpaceTargeted { binary_name } => T::NoSpaceTargeted { binary_name },
        ActionError::MinimumApiVersionNotMet { current, minimum } => {
            T::MinimumApiVersionNotMet { current, minimum }
        }
        ActionError::StartupTimeout { name } => T::StartupTimeout { app_name: name },
        ActionError::StagingTimeout { app_name, timeout } => {
            T::StagingTimeout { app_name, timeout }
        }
        ActionError::StagingFailed { reason } => T::StagingFailed { message: reason },
        ActionError::StagingFailedNoAppDetected { reason } => {
            T::StagingFailedNoAppDetected { message: reason }
        }
        ActionError::ApplicationInstanceCrashed { name }
        | ActionError::ApplicationInstanceFlapping { name } => {
            T::UnsuccessfulStart { app_name: name }
        }
        ActionError::TaskWorkersUnavailable { message } => T::RunTask { message },
        ActionError::PropertyCombination { properties } => T::PropertyCombination { properties },
        ActionError::LogCacheTimeout => T::LogCacheTimeout,
    }
}

fn convert_cc(err: CcError) -> TranslatableError {
    use TranslatableError as T;
    match err {
        CcError::Request { message } => T::ApiRequest { message },
        CcError::UnverifiedServer { url } => T::InvalidSslCert { url },
        CcError::SslValidationHostname { message } => T::SslCert { message },
        CcError::ApiNotFound { url } => T::ApiNotFound { url },
        CcError::MultiError { errors, .. } => T::MultiError {
            messages: errors.into_iter().map(|e| e.detail).collect(),
        },
        CcError::UnprocessableEntity { ref message } if message.contains(DROPLET_MISSING) => {
            T::RunTask {
                message: "App is not staged.".to_string(),
            }
        }
        CcError::Json { message } => T::JsonSyntax { message },
        other => T::Untranslated(other.into()),
    }
}

fn convert_uaa(err: UaaError) -> TranslatableError {
    match err {
        UaaError::BadCredentials { .. } => TranslatableError::BadCredentials,
        UaaError::InsufficientScope { .. } => TranslatableError::UnauthorizedToPerformAction,
        UaaError::InvalidAuthToken { .. } => TranslatableError::InvalidRefreshToken,
        other => TranslatableError::Untranslated(other.into()),
    }
}

/// Maps any crate error to the message shown to the user.
pub fn convert(err: Error) -> TranslatableError {
    match err {
        Error::Action(e) => convert_action(e),
        Error::Api(e) => convert_cc(e),
        Error::Uaa(e) => convert_uaa(e),
        Error::Json(e) => TranslatableError::JsonSyntax {
            message: e.to_string(),
        },
        other => TranslatableError::Untranslated(other),
    }
}

impl From<Error> for TranslatableError {
    fn from(err: Error) -> Self {
        convert(err)
    }
}

impl From<ActionError> for TranslatableError {
    fn from(err: ActionError) -> Self {
        convert_action(err)
    }
}

impl From<std::io::Error> for TranslatableError {
    fn from(err: std::io::Error) -> Self {
        TranslatableError::Untranslated(err.into())
    }
}

/// `15m0s`, `90s` → `1m30s`, `45s`.
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

type Data = Vec<(&'static str, String)>;

impl TranslatableError {
    /// The English template and its placeholder values. `None` for untranslated errors.
    pub fn template(&self) -> Option<(&'static str, Data)> {
        use TranslatableError as T;
        let binary = || ("binary_name", BINARY_NAME.to_string());
        let out = match self {
            T::ApplicationNotFound { name, guid } if name.is_empty() && !guid.is_empty() => (
                "App with GUID '{{ guid }}' not found.",
                vec![("guid", guid.clone())],
            ),
            T::ApplicationNotFound { name, .. } => (
                "App '{{ app_name }}' not found.",
                vec![("app_name", name.clone())],
            ),
            T::ServiceInstanceNotFound { name, guid } if name.is_empty() && !guid.is_empty() => (
                "Service instance (GUID: {{ guid }}) not found.",
                vec![("guid", guid.clone())],
            ),
            T::ServiceInstanceNotFound { name, .. } => (
                "Service instance {{ service_instance }} not found.",
                vec![("service_instance", name.clone())],
            ),
            T::DomainNotFound { name, guid } if name.is_empty() && !guid.is_empty() => (
                "Domain with GUID {{ guid }} not found.",
                vec![("guid", guid.clone())],
            ),
            T::DomainNotFound { name, .. } => (
                "Domain {{ domain }} not found.",
                vec![("domain", name.clone())],
            ),
            T::SecurityGroupNotFound { name } => (
                "Security group '{{ name }}' not found.",
                vec![("name", name.clone())],
            ),
            T::OrgNotFound { name } => (
                "Organization '{{ name }}' not found.",
                vec![("name", name.clone())],
            ),
            T::SpaceNotFound { name } => (
                "Space '{{ name }}' not found.",
                vec![("name", name.clone())],
            ),
            T::ProcessNotFound { process_type } => (
                "Process {{ process_type }} not found",
                vec![("process_type", process_type.clone())],
            ),
            T::RouteInDifferentSpace { route } => (
                "Route {{ route }} has been registered to another space.",
                vec![("route", route.clone())],
            ),
            T::PortNotAllowedWithHttpDomain { domain } => (
                "Port not allowed in HTTP domain {{ domain }}",
                vec![("domain", domain.clone())],
            ),
            T::HostAndPathNotAllowedWithTcpDomain { domain } => (
                "Host and path not allowed in route with TCP domain {{ domain }}",
                vec![("domain", domain.clone())],
            ),
            T::NoHostnameAndSharedDomain => (
                "The route is invalid: a hostname is required for shared domains.",
                vec![],
            ),
            T::OrphanedRoutesNotFound => ("No orphaned routes were found.", vec![]),
            T::ServiceInstanceNotShareable {
                feature_flag_enabled,
                service_broker_sharing_enabled,
            } => match (feature_flag_enabled, service_broker_sharing_enabled) {
                (false, false) => (
                    "The {{ feature_flag }} feature flag is disabled for this Cloud Foundry platform. Also, service instance sharing is disabled for this service.",
                    vec![("feature_flag", "\"service_instance_sharing\"".to_string())],
                ),
                (false, true) => (
                    "The {{ feature_flag }} feature flag is disabled for this Cloud Foundry platform.",
                    vec![("feature_flag", "\"service_instance_sharing\"".to_string())],
                ),
                _ => ("Service instance sharing is disabled for this service.", vec![]),
            },
            T::SharedServiceInstanceNotFound => (
                "Specified instance not found or not a managed service instance. Sharing is not supported for user provided services.",
                vec![],
            ),
            T::ServiceInstanceAlreadyShared => (
                "Service instance is already shared with that space.",
                vec![],
            ),
            T::NoApiSet { binary_name } => (
                "No API endpoint set. Use '{{ login_tip }}' to log in to a Cloud Foundry installation or '{{ api_tip }}' to target an endpoint.",
                vec![
                    ("login_tip", format!("{binary_name} login")),
                    ("api_tip", format!("{binary_name} api")),
                ],
            ),
            T::NotLoggedIn { binary_name } => (
                "Not logged in. Use '{{ command }}' to log in.",
                vec![("command", format!("{binary_name} login"))],
            ),
            T::NoOrganizationTargeted { binary_name } => (
                "No org targeted, use '{{ command }}' to target an org.",
                vec![("command", format!("{binary_name} target -o ORG"))],
            ),
            T::NoSpaceTargeted { binary_name } => (
                "No space targeted, use '{{ command }}' to target a space.",
                vec![("command", format!("{binary_name} target -s"))],
            ),
            T::MinimumApiVersionNotMet { current, minimum } => (
                "This command requires CF API version {{ minimum }} or higher. Your target is {{ current }}.",
                vec![("minimum", minimum.clone()), ("current", current.clone())],
            ),
            T::LifecycleMinimumApiVersionNotMet { current, minimum } => (
                "Lifecycle value 'staging' requires CF API version {{ minimum }} or higher. Your target is {{ current }}.",
                vec![("minimum", minimum.clone()), ("current", current.clone())],
            ),
            T::StartupTimeout { app_name } => (
                "Start app timeout\n\nTIP: Application must be listening on the right port. Instead of hard coding the port, use the $PORT environment variable.\n\nUse '{{ binary_name }} logs {{ app_name }} --recent' for more information",
                vec![binary(), ("app_name", app_name.clone())],
            ),
            T::StagingTimeout { app_name, timeout } => (
                "Error staging application {{ app_name }}: timed out after {{ timeout }}",
                vec![
                    ("app_name", app_name.clone()),
                    ("timeout", format_duration(*timeout)),
                ],
            ),
            T::StagingFailed { message } => (
                "Error staging application: {{ message }}",
                vec![("message", message.clone())],
            ),
            T::StagingFailedNoAppDetected { message } => (
                "Error staging application: {{ message }}\n\nTIP: Use '{{ command }}' to see a list of supported buildpacks.",
                vec![
                    ("message", message.clone()),
                    ("command", format!("{BINARY_NAME} buildpacks")),
                ],
            ),
            T::UnsuccessfulStart { app_name } => (
                "Start unsuccessful\n\nTIP: use '{{ binary_name }} logs {{ app_name }} --recent' for more information",
                vec![binary(), ("app_name", app_name.clone())],
            ),
            T::RunTask { message } => (
                "Error running task: {{ message }}",
                vec![("message", message.clone())],
            ),
            T::PropertyCombination { properties } => (
                "Cannot specify {{ properties }} together.",
                vec![("properties", properties.join(", "))],
            ),
            T::LogCacheTimeout => (
                "timeout connecting to log server, no log will be shown",
                vec![],
            ),
            T::ApiRequest { message } => (
                "Request error: {{ error }}\nTIP: If you are behind a firewall and require an HTTP proxy, verify the https_proxy environment variable is correctly set. Else, check your network connection.",
                vec![("error", message.clone())],
            ),
            T::InvalidSslCert { url } => (
                "Invalid SSL Cert for {{ url }}\nTIP: Use '{{ command }}' to continue with an insecure API endpoint",
                vec![
                    ("url", url.clone()),
                    ("command", format!("{BINARY_NAME} api --skip-ssl-validation")),
                ],
            ),
            T::SslCert { message } => (
                "SSL Certificate Error {{ message }}\nTIP: Use '{{ command }}' to continue with an insecure API endpoint",
                vec![
                    ("message", message.clone()),
                    ("command", format!("{BINARY_NAME} api --skip-ssl-validation")),
                ],
            ),
            T::ApiNotFound { url } => (
                "API endpoint not found at '{{ url }}'",
                vec![("url", url.clone())],
            ),
            T::MultiError { messages } => (
                "Multiple errors occurred:\n{{ errors }}",
                vec![("errors", messages.join("\n"))],
            ),
            T::BadCredentials => ("Credentials were rejected, please try again.", vec![]),
            T::UnauthorizedToPerformAction => (
                "You are not authorized to perform the requested action",
                vec![],
            ),
            T::InvalidRefreshToken => (
                "The token expired, was revoked, or the token ID is incorrect. Please log back in to re-authenticate.",
                vec![],
            ),
            T::JsonSyntax { message } => (
                "Invalid JSON content from server: {{ err }}",
                vec![("err", message.clone())],
            ),
            T::ArgumentCombination { args } => (
                "Incorrect Usage: The following arguments cannot be used together: {{ args }}",
                vec![("args", args.join(", "))],
            ),
            T::IncorrectUsage { message } => (
                "Incorrect Usage: {{ message }}",
                vec![("message", message.clone())],
            ),
            T::UnknownCommand { name } => (
                "'{{ name }}' is not a registered command. See '{{ command }}'",
                vec![
                    ("name", name.clone()),
                    ("command", format!("{BINARY_NAME} help")),
                ],
            ),
            T::Untranslated(_) => return None,
        };
        Some(out)
    }
}

impl Translatable for TranslatableError {
    fn translate(&self, translator: &Translator) -> String {
        match self.template() {
            Some((template, data)) => {
                let map: BTreeMap<&str, &str> =
                    data.iter().map(|(k, v)| (*k, v.as_str())).collect();
                translator.translate(template, &map)
            }
            None => match self {
                TranslatableError::Untranslated(err) => err.to_string(),
                _ => String::new(),
            },
        }
    }
}

impl fmt::Display for TranslatableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.translate(&Translator::default()))
    }
}

impl std::error::Error for TranslatableError {}
