use super::{Clients, Command, Result};
use crate::config::Config;
use cfui::Ui;
use once_cell::sync::OnceCell;

/// `6.40.1` for release builds, `6.40.1+<sha>.<date>` otherwise.
pub fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const BUILD_SHA: &str = env!("CF_BUILD_SHA");
    const BUILD_DATE: &str = env!("CF_BUILD_DATE");
    const IS_RELEASE: &str = env!("CF_IS_RELEASE");

    static VERSION_STRING: OnceCell<String> = OnceCell::new();
    VERSION_STRING.get_or_init(|| build_version(VERSION, BUILD_SHA, BUILD_DATE, IS_RELEASE == "true"))
}

fn build_version(version: &str, sha: &str, date: &str, release: bool) -> String {
    if release || sha.is_empty() {
        return version.to_string();
    }
    if date.is_empty() {
        format!("{version}+{sha}")
    } else {
        format!("{version}+{sha}.{date}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCommand;

impl Command for VersionCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, _clients: &C) -> Result {
        ui.display_text(
            "{{ binary_name }} version {{ version }}",
            &[("binary_name", config.binary_name()), ("version", version_string())],
        )?;
        Ok(())
    }
}
