//! Pieces used by more than one command.

pub mod app_summary;
pub mod new_clients;
pub mod poll_start;

pub use app_summary::display_app_summary;
pub use new_clients::HttpClients;
pub use poll_start::poll_start;

use crate::actor::configaction::compare_versions;
use crate::command::Result;
use crate::config::Config;
use cfui::Ui;
use std::cmp::Ordering;

/// Warns on stderr when the targeted API asks for a newer CLI than `cli_version`.
pub fn warn_if_cli_version_below_minimum(ui: &mut Ui, config: &Config, cli_version: &str) -> Result {
    let minimum = config.min_cli_version();
    if minimum.is_empty() || compare_versions(cli_version, minimum) != Ordering::Less {
        return Ok(());
    }
    ui.display_warning(
        "Cloud Foundry API version {{ api_version }} requires CLI version {{ min_cli_version }}. You are currently on version {{ bin_version }}. To upgrade your CLI, please visit: https://github.com/cloudfoundry/cli#downloads",
        &[
            ("api_version", config.api_version()),
            ("min_cli_version", minimum),
            ("bin_version", cli_version),
        ],
    )?;
    ui.display_new_line()?;
    Ok(())
}
