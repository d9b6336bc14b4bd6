//! # Commands
//!
//! One struct per CLI command, holding its parsed arguments. `execute` checks the target,
//! prints a flavor line, drives the actors, prints warnings and results, and finally `OK`.
//! Commands never print an error themselves: they return a [`TranslatableError`] and the
//! binary renders it with `FAILED`.
//!
//! Commands get their API clients from a [`Clients`] factory rather than building them,
//! so tests can hand them the in-memory fakes.

pub mod registry;
pub mod shared;
pub mod translatableerror;

mod api;
mod app;
mod auth;
mod bind_security_group;
mod config;
mod delete_orphaned_routes;
mod domains;
mod help;
mod run_task;
mod share_service;
mod start;
mod target;
mod version;

pub use api::ApiCommand;
pub use app::AppCommand;
pub use auth::AuthCommand;
pub use bind_security_group::BindSecurityGroupCommand;
pub use config::ConfigCommand;
pub use delete_orphaned_routes::DeleteOrphanedRoutesCommand;
pub use domains::DomainsCommand;
pub use help::HelpCommand;
pub use run_task::RunTaskCommand;
pub use share_service::ShareServiceCommand;
pub use start::StartCommand;
pub use target::TargetCommand;
pub use translatableerror::{convert, TranslatableError};
pub use version::{version_string, VersionCommand};

use crate::api::ccv2::CloudControllerV2;
use crate::api::ccv3::CloudControllerV3;
use crate::api::logcache::LogCacheClient;
use crate::api::uaa::UaaClient;
use crate::config::Config;
use crate::error::Error;
use crate::warnings::{Warned, Warnings};
use cfui::Ui;

pub type Result<T = ()> = std::result::Result<T, TranslatableError>;

/// Builds the API clients a command talks to.
pub trait Clients {
    type V2: CloudControllerV2 + Sync;
    type V3: CloudControllerV3;
    type LogCache: LogCacheClient + Sync;
    type Uaa: UaaClient;

    /// A `/v2` client for `target`, which may differ from the configured one.
    fn cloud_controller_v2(&self, target: &str, config: &Config) -> std::result::Result<Self::V2, Error>;
    fn cloud_controller_v3(&self, target: &str, config: &Config) -> std::result::Result<Self::V3, Error>;
    fn log_cache(&self, config: &Config) -> std::result::Result<Self::LogCache, Error>;
    fn uaa(&self, config: &Config) -> std::result::Result<Self::Uaa, Error>;
}

pub trait Command {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result;
}

/// Prints `warnings` to stderr.
pub(crate) fn display_warnings(ui: &mut Ui, warnings: &Warnings) -> Result {
    ui.display_warnings(&warnings[..])?;
    Ok(())
}

/// Prints the warnings of `warned` and unwraps it into a command result.
pub(crate) fn settle<T>(ui: &mut Ui, warned: Warned<T>) -> Result<T> {
    let (result, warnings) = warned.into_parts();
    display_warnings(ui, &warnings)?;
    result.map_err(TranslatableError::from)
}

/// The user name for flavor text. Unreadable tokens show as an empty name.
pub(crate) fn current_user(config: &Config) -> String {
    config.current_user().unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared scaffolding for command tests: a targeted config in a temp home and a
    //! [`Clients`] factory handing out fakes.

    use super::Clients;
    use crate::api::fakes::{
        FakeCloudControllerV2, FakeCloudControllerV3, FakeLogCacheClient, FakeUaaClient,
    };
    use crate::config::{Config, EnvOverride};
    use crate::error::Error;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use cfui::{Buffer, Translator, Ui};
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    pub struct FakeClients {
        pub v2: FakeCloudControllerV2,
        pub v3: FakeCloudControllerV3,
        pub log_cache: FakeLogCacheClient,
        pub uaa: FakeUaaClient,
        pub targets: RefCell<Vec<String>>,
    }

    impl<'a> Clients for &'a FakeClients {
        type V2 = &'a FakeCloudControllerV2;
        type V3 = &'a FakeCloudControllerV3;
        type LogCache = &'a FakeLogCacheClient;
        type Uaa = &'a FakeUaaClient;

        fn cloud_controller_v2(&self, target: &str, _: &Config) -> Result<Self::V2, Error> {
            let this: &'a FakeClients = *self;
            this.targets.borrow_mut().push(target.to_string());
            Ok(&this.v2)
        }

        fn cloud_controller_v3(&self, _: &str, _: &Config) -> Result<Self::V3, Error> {
            let this: &'a FakeClients = *self;
            Ok(&this.v3)
        }

        fn log_cache(&self, _: &Config) -> Result<Self::LogCache, Error> {
            let this: &'a FakeClients = *self;
            Ok(&this.log_cache)
        }

        fn uaa(&self, _: &Config) -> Result<Self::Uaa, Error> {
            let this: &'a FakeClients = *self;
            Ok(&this.uaa)
        }
    }

    pub fn token_for(user: &str) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"user_name":"{user}"}}"#));
        format!("bearer eyJhbGciOiJIUzI1NiJ9.{payload}.signature")
    }

    pub fn empty_config(home: &TempDir) -> Config {
        Config::load_from(home.path(), EnvOverride::default()).unwrap()
    }

    /// Logged in as `some-user` with org `some-org` and space `some-space` targeted.
    pub fn targeted_config(home: &TempDir) -> Config {
        let mut config = empty_config(home);
        config.set_target_information(
            "https://api.example.com",
            "2.100.0",
            "https://login.example.com",
            "",
            "",
            "",
            "https://log-cache.example.com",
            false,
        );
        config.set_token_information(&token_for("some-user"), "some-refresh-token");
        config.set_organization_information("some-org-guid", "some-org");
        config.set_space_information("some-space-guid", "some-space", false);
        config
    }

    pub fn ui() -> (Ui, Buffer, Buffer) {
        Ui::buffered(Translator::default(), "")
    }
}
