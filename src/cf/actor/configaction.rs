//! Operations that only read or rewrite the local [`Config`]: targeting an API, logging in
//! and checking that enough is targeted for a command to run.

use crate::actor::ActionError;
use crate::api::ccv2::CloudControllerV2;
use crate::api::ccv3::CloudControllerV3;
use crate::api::uaa::UaaClient;
use crate::api::CcError;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::warnings::{Warned, Warnings};
use std::cmp::Ordering;
use tracing::debug;

/// What `api URL` was asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSettings {
    pub url: String,
    pub skip_ssl_validation: bool,
}

pub struct Actor<'c> {
    config: &'c mut Config,
}

impl<'c> Actor<'c> {
    pub fn new(config: &'c mut Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Reads `GET /` and `GET /v2/info` from the new endpoint and records what they
    /// advertise. Both clients must already point at `settings.url`. Tokens, org and space
    /// are forgotten even if the endpoint did not change.
    pub fn set_target<V2, V3>(&mut self, v2: V2, v3: V3, settings: &TargetSettings) -> Warned<()>
    where
        V2: CloudControllerV2,
        V3: CloudControllerV3,
    {
        let api_not_found = |e: CcError| {
            if e.is_not_found() {
                Error::from(CcError::ApiNotFound {
                    url: settings.url.clone(),
                })
            } else {
                Error::from(e)
            }
        };

        Warned::collect(|warnings: &mut Warnings| {
            let root = v3.get_root().merge_into(warnings).map_err(api_not_found)?;
            let info = v2.get_info().merge_into(warnings).map_err(api_not_found)?;
            debug!(url = %settings.url, api_version = %info.api_version, "targeted");

            let routing = if root.routing_url.is_empty() {
                info.routing_endpoint.clone().unwrap_or_default()
            } else {
                root.routing_url.clone()
            };
            self.config.set_target_information(
                &settings.url,
                &info.api_version,
                &info.authorization_endpoint,
                info.min_cli_version.as_deref().unwrap_or_default(),
                &info.doppler_endpoint,
                &routing,
                &root.log_cache_url,
                settings.skip_ssl_validation,
            );
            self.config.set_uaa_endpoint(&root.uaa_url);
            self.config.set_token_information("", "");
            Ok(())
        })
    }

    pub fn clear_target(&mut self) {
        self.config.unset_target_information();
    }

    /// Password grant against UAA. A targeted org or space belongs to the previous user,
    /// so both are cleared.
    pub fn authenticate<U: UaaClient>(&mut self, uaa: U, username: &str, password: &str) -> Result<()> {
        let tokens = uaa.authenticate(username, password)?;
        self.config
            .set_token_information(&tokens.authorization(), &tokens.refresh_token);
        self.config.unset_organization_and_space_information();
        Ok(())
    }
}

/// Fails with the first thing missing, in the order a user has to fix them.
pub fn check_target(config: &Config, org_required: bool, space_required: bool) -> Result<()> {
    let binary_name = config.binary_name().to_string();
    if config.target().is_empty() {
        return Err(ActionError::NoApiSet { binary_name }.into());
    }
    if config.access_token().is_empty() && config.refresh_token().is_empty() {
        return Err(ActionError::NotLoggedIn { binary_name }.into());
    }
    if org_required && !config.has_targeted_organization() {
        return Err(ActionError::NoOrganizationTargeted { binary_name }.into());
    }
    if space_required && !config.has_targeted_space() {
        return Err(ActionError::NoSpaceTargeted { binary_name }.into());
    }
    Ok(())
}

/// Compares dotted numeric versions; missing or non-numeric parts count as zero.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parts = |v: &str| -> Vec<u64> {
        v.trim()
            .trim_start_matches('v')
            .split(['.', '-', '+'])
            .take(3)
            .map(|p| p.parse().unwrap_or(0))
            .collect()
    };
    let (a, b) = (parts(a), parts(b));
    for i in 0..a.len().max(b.len()) {
        let ord = a.get(i).unwrap_or(&0).cmp(b.get(i).unwrap_or(&0));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// An empty `current` means the server did not say, which passes.
pub fn min_version_check(current: &str, minimum: &str) -> std::result::Result<(), ActionError> {
    if current.is_empty() || compare_versions(current, minimum) != Ordering::Less {
        return Ok(());
    }
    Err(ActionError::MinimumApiVersionNotMet {
        current: current.to_string(),
        minimum: minimum.to_string(),
    })
}
