//! # Config
//!
//! The CLI's persistent state lives in `$CF_HOME/.cf/config.json` (`~/.cf/config.json` when
//! `CF_HOME` is unset). The file uses the PascalCase keys every CF CLI writes, and keys this
//! version does not know are carried through a rewrite untouched.
//!
//! A [`Config`] is the file plus an environment overlay captured at load time. The overlay
//! is never persisted. The file is read once at startup, mutated through the `set_*` and
//! `unset_*` methods, and written back whole with [`Config::write`].

use crate::actor::v2action::PollingSettings;
use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CURRENT_CONFIG_VERSION: u32 = 3;
pub const DEFAULT_STAGING_TIMEOUT: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_UAA_OAUTH_CLIENT: &str = "cf";
pub const DEFAULT_SSH_OAUTH_CLIENT: &str = "ssh-proxy";
pub const BINARY_NAME: &str = "cf";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationFields {
    #[serde(rename = "GUID", default)]
    pub guid: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceFields {
    #[serde(rename = "GUID", default)]
    pub guid: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "AllowSSH", default)]
    pub allow_ssh: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRepo {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "URL", default)]
    pub url: String,
}

fn default_plugin_repos() -> Vec<PluginRepo> {
    vec![PluginRepo {
        name: "CF-Community".to_string(),
        url: "https://plugins.cloudfoundry.org".to_string(),
    }]
}

fn current_config_version() -> u32 {
    CURRENT_CONFIG_VERSION
}

fn default_uaa_oauth_client() -> String {
    DEFAULT_UAA_OAUTH_CLIENT.to_string()
}

fn default_ssh_oauth_client() -> String {
    DEFAULT_SSH_OAUTH_CLIENT.to_string()
}

/// The on-disk document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonConfig {
    #[serde(default = "current_config_version")]
    pub config_version: u32,
    #[serde(default)]
    pub target: String,
    #[serde(rename = "APIVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub authorization_endpoint: String,
    #[serde(rename = "DopplerEndPoint", default)]
    pub doppler_endpoint: String,
    #[serde(default)]
    pub uaa_endpoint: String,
    #[serde(rename = "RoutingAPIEndpoint", default)]
    pub routing_endpoint: String,
    #[serde(rename = "LogCacheEndPoint", default)]
    pub log_cache_endpoint: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(rename = "UAAOAuthClient", default = "default_uaa_oauth_client")]
    pub uaa_oauth_client: String,
    #[serde(rename = "UAAOAuthClientSecret", default)]
    pub uaa_oauth_client_secret: String,
    #[serde(rename = "UAAGrantType", default)]
    pub uaa_grant_type: String,
    #[serde(rename = "SSHOAuthClient", default = "default_ssh_oauth_client")]
    pub ssh_oauth_client: String,
    #[serde(rename = "SSLDisabled", default)]
    pub skip_ssl_validation: bool,
    /// Minutes; zero means the built-in default.
    #[serde(default)]
    pub async_timeout: u32,
    #[serde(default)]
    pub trace: String,
    /// `"true"`, `"false"` or empty for auto-detection.
    #[serde(default)]
    pub color_enabled: String,
    #[serde(default)]
    pub locale: String,
    #[serde(rename = "MinCLIVersion", default)]
    pub min_cli_version: String,
    #[serde(rename = "MinRecommendedCLIVersion", default)]
    pub min_recommended_cli_version: String,
    #[serde(default)]
    pub organization_fields: OrganizationFields,
    #[serde(default)]
    pub space_fields: SpaceFields,
    #[serde(default = "default_plugin_repos")]
    pub plugin_repos: Vec<PluginRepo>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION,
            target: String::new(),
            api_version: String::new(),
            authorization_endpoint: String::new(),
            doppler_endpoint: String::new(),
            uaa_endpoint: String::new(),
            routing_endpoint: String::new(),
            log_cache_endpoint: String::new(),
            access_token: String::new(),
            refresh_token: String::new(),
            uaa_oauth_client: default_uaa_oauth_client(),
            uaa_oauth_client_secret: String::new(),
            uaa_grant_type: String::new(),
            ssh_oauth_client: default_ssh_oauth_client(),
            skip_ssl_validation: false,
            async_timeout: 0,
            trace: String::new(),
            color_enabled: String::new(),
            locale: String::new(),
            min_cli_version: String::new(),
            min_recommended_cli_version: String::new(),
            organization_fields: OrganizationFields::default(),
            space_fields: SpaceFields::default(),
            plugin_repos: default_plugin_repos(),
            extra: BTreeMap::new(),
        }
    }
}

/// Environment variables consulted by the CLI, captured once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverride {
    pub cf_home: Option<String>,
    pub cf_plugin_home: Option<String>,
    pub cf_color: Option<String>,
    pub cf_trace: Option<String>,
    pub cf_log_level: Option<String>,
    pub cf_staging_timeout: Option<String>,
    pub cf_startup_timeout: Option<String>,
    pub cf_dial_timeout: Option<String>,
    pub lc_all: Option<String>,
    pub lang: Option<String>,
    pub https_proxy: Option<String>,
}

impl EnvOverride {
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            cf_home: var("CF_HOME"),
            cf_plugin_home: var("CF_PLUGIN_HOME"),
            cf_color: var("CF_COLOR"),
            cf_trace: var("CF_TRACE"),
            cf_log_level: var("CF_LOG_LEVEL"),
            cf_staging_timeout: var("CF_STAGING_TIMEOUT"),
            cf_startup_timeout: var("CF_STARTUP_TIMEOUT"),
            cf_dial_timeout: var("CF_DIAL_TIMEOUT"),
            lc_all: var("LC_ALL"),
            lang: var("LANG"),
            https_proxy: var("https_proxy").or_else(|| var("HTTPS_PROXY")),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn minutes(raw: Option<&str>) -> Option<Duration> {
    raw?.trim().parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
}

#[derive(Deserialize)]
struct TokenClaims {
    #[serde(default)]
    user_name: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    json: JsonConfig,
    env: EnvOverride,
    home: PathBuf,
}

impl Config {
    /// The directory holding `.cf/`: `CF_HOME`, else the user's home directory.
    pub fn home_dir(env: &EnvOverride) -> PathBuf {
        if let Some(home) = &env.cf_home {
            return PathBuf::from(home);
        }
        BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Loads from the process environment.
    pub fn load() -> Result<Self> {
        let env = EnvOverride::from_env();
        let home = Self::home_dir(&env);
        Self::load_from(&home, env)
    }

    /// Missing file: defaults. Empty file: [`Error::EmptyConfig`]. Malformed: [`Error::Json`].
    pub fn load_from(home: &Path, env: EnvOverride) -> Result<Self> {
        let path = Self::file_path_in(home);
        let json = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                return Err(Error::EmptyConfig { path });
            }
            serde_json::from_str(&content)?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            JsonConfig::default()
        };

        Ok(Self {
            json,
            env,
            home: home.to_path_buf(),
        })
    }

    /// A fresh config rooted at `home`, used when the file on disk cannot be read.
    pub fn defaults(home: &Path, env: EnvOverride) -> Self {
        Self {
            json: JsonConfig::default(),
            env,
            home: home.to_path_buf(),
        }
    }

    fn file_path_in(home: &Path) -> PathBuf {
        home.join(".cf").join("config.json")
    }

    pub fn file_path(&self) -> PathBuf {
        Self::file_path_in(&self.home)
    }

    pub fn plugin_home(&self) -> PathBuf {
        let base = self
            .env
            .cf_plugin_home
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.home.clone());
        base.join(".cf").join("plugins")
    }

    /// Replaces the file as a whole: the new content goes to a sibling temp file which is
    /// then renamed over the target.
    pub fn write(&self) -> Result<()> {
        let path = self.file_path();
        let dir = path.parent().unwrap_or(&self.home);
        fs::create_dir_all(dir)?;

        let content = serde_json::to_string_pretty(&self.json)?;
        let tmp = dir.join(format!(".config.json.{}.tmp", std::process::id()));
        fs::write(&tmp, content)?;
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        debug!(path = %path.display(), "wrote config");
        Ok(())
    }

    pub fn json(&self) -> &JsonConfig {
        &self.json
    }

    pub fn env(&self) -> &EnvOverride {
        &self.env
    }

    pub fn binary_name(&self) -> &str {
        BINARY_NAME
    }

    pub fn target(&self) -> &str {
        &self.json.target
    }

    pub fn api_version(&self) -> &str {
        &self.json.api_version
    }

    pub fn uaa_endpoint(&self) -> &str {
        if self.json.uaa_endpoint.is_empty() {
            &self.json.authorization_endpoint
        } else {
            &self.json.uaa_endpoint
        }
    }

    pub fn log_cache_endpoint(&self) -> &str {
        &self.json.log_cache_endpoint
    }

    pub fn access_token(&self) -> &str {
        &self.json.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.json.refresh_token
    }

    pub fn uaa_oauth_client(&self) -> &str {
        &self.json.uaa_oauth_client
    }

    pub fn uaa_oauth_client_secret(&self) -> &str {
        &self.json.uaa_oauth_client_secret
    }

    pub fn skip_ssl_validation(&self) -> bool {
        self.json.skip_ssl_validation
    }

    pub fn min_cli_version(&self) -> &str {
        &self.json.min_cli_version
    }

    pub fn target_organization(&self) -> &OrganizationFields {
        &self.json.organization_fields
    }

    pub fn target_space(&self) -> &SpaceFields {
        &self.json.space_fields
    }

    pub fn has_targeted_organization(&self) -> bool {
        !self.json.organization_fields.guid.is_empty()
    }

    pub fn has_targeted_space(&self) -> bool {
        !self.json.space_fields.guid.is_empty()
    }

    pub fn staging_timeout(&self) -> Duration {
        minutes(self.env.cf_staging_timeout.as_deref()).unwrap_or(DEFAULT_STAGING_TIMEOUT)
    }

    pub fn startup_timeout(&self) -> Duration {
        minutes(self.env.cf_startup_timeout.as_deref()).unwrap_or(DEFAULT_STARTUP_TIMEOUT)
    }

    pub fn polling_interval(&self) -> Duration {
        DEFAULT_POLLING_INTERVAL
    }

    /// Minutes to wait on asynchronous service operations; 0 means no limit.
    pub fn async_timeout(&self) -> u32 {
        self.json.async_timeout
    }

    pub fn dial_timeout(&self) -> Duration {
        self.env
            .cf_dial_timeout
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_DIAL_TIMEOUT)
    }

    pub fn polling_settings(&self) -> PollingSettings {
        PollingSettings {
            staging_timeout: self.staging_timeout(),
            startup_timeout: self.startup_timeout(),
            polling_interval: self.polling_interval(),
        }
    }

    /// `CF_COLOR`, then the file, then whether stdout looks like a color terminal.
    pub fn color_enabled(&self) -> bool {
        if let Some(enabled) = self.env.cf_color.as_deref().and_then(parse_bool) {
            return enabled;
        }
        if let Some(enabled) = parse_bool(&self.json.color_enabled) {
            return enabled;
        }
        console::colors_enabled()
    }

    /// The raw locale: config, then `LC_ALL`, then `LANG`.
    pub fn locale(&self) -> Option<&str> {
        if !self.json.locale.is_empty() {
            return Some(&self.json.locale);
        }
        self.env.lc_all.as_deref().or(self.env.lang.as_deref())
    }

    /// `CF_TRACE` wins over the file's `Trace`.
    pub fn trace(&self) -> Option<&str> {
        self.env
            .cf_trace
            .as_deref()
            .or(Some(self.json.trace.as_str()).filter(|t| !t.is_empty()))
    }

    /// The `user_name` claim of the access token, if there is a readable one.
    pub fn current_user(&self) -> Option<String> {
        let token = self.json.access_token.trim();
        let token = token
            .strip_prefix("bearer ")
            .or_else(|| token.strip_prefix("Bearer "))
            .unwrap_or(token);
        let payload = token.split('.').nth(1)?;
        let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: TokenClaims = serde_json::from_slice(&decoded).ok()?;
        Some(claims.user_name).filter(|name| !name.is_empty())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_target_information(
        &mut self,
        api: &str,
        api_version: &str,
        auth: &str,
        min_cli_version: &str,
        doppler: &str,
        routing: &str,
        log_cache: &str,
        skip_ssl_validation: bool,
    ) {
        self.json.target = api.to_string();
        self.json.api_version = api_version.to_string();
        self.json.authorization_endpoint = auth.to_string();
        self.json.min_cli_version = min_cli_version.to_string();
        self.json.doppler_endpoint = doppler.to_string();
        self.json.routing_endpoint = routing.to_string();
        self.json.log_cache_endpoint = log_cache.to_string();
        self.json.skip_ssl_validation = skip_ssl_validation;
        self.unset_organization_and_space_information();
    }

    pub fn set_uaa_endpoint(&mut self, uaa: &str) {
        self.json.uaa_endpoint = uaa.to_string();
    }

    pub fn set_token_information(&mut self, access_token: &str, refresh_token: &str) {
        self.json.access_token = access_token.to_string();
        self.json.refresh_token = refresh_token.to_string();
    }

    pub fn set_organization_information(&mut self, guid: &str, name: &str) {
        self.json.organization_fields = OrganizationFields {
            guid: guid.to_string(),
            name: name.to_string(),
        };
    }

    pub fn set_space_information(&mut self, guid: &str, name: &str, allow_ssh: bool) {
        self.json.space_fields = SpaceFields {
            guid: guid.to_string(),
            name: name.to_string(),
            allow_ssh,
        };
    }

    pub fn unset_organization_and_space_information(&mut self) {
        self.json.organization_fields = OrganizationFields::default();
        self.json.space_fields = SpaceFields::default();
    }

    pub fn unset_space_information(&mut self) {
        self.json.space_fields = SpaceFields::default();
    }

    /// Forgets the API endpoint and everything derived from it.
    pub fn unset_target_information(&mut self) {
        self.set_target_information("", "", "", "", "", "", "", false);
        self.json.uaa_endpoint.clear();
        self.set_token_information("", "");
    }

    pub fn set_color_enabled(&mut self, enabled: bool) {
        self.json.color_enabled = enabled.to_string();
    }

    pub fn set_locale(&mut self, locale: &str) {
        self.json.locale = locale.to_string();
    }

    pub fn set_async_timeout(&mut self, minutes: u32) {
        self.json.async_timeout = minutes;
    }

    pub fn set_trace(&mut self, trace: &str) {
        self.json.trace = trace.to_string();
    }
}
