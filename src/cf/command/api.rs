use super::shared::warn_if_cli_version_below_minimum;
use super::{display_warnings, version_string, Clients, Command, Result};
use crate::actor::configaction::{self, TargetSettings};
use crate::config::Config;
use cfui::Ui;

/// `api [URL] [--unset] [--skip-ssl-validation]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiCommand {
    pub url: Option<String>,
    pub unset: bool,
    pub skip_ssl_validation: bool,
}

/// Adds `https://` when no scheme is given and drops trailing slashes.
fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn display_target(ui: &mut Ui, config: &Config) -> Result {
    ui.display_key_value_table(
        "",
        &[
            ("api endpoint:".to_string(), config.target().to_string()),
            ("api version:".to_string(), config.api_version().to_string()),
        ],
        3,
    )?;
    Ok(())
}

impl ApiCommand {
    fn clear(&self, ui: &mut Ui, config: &mut Config) -> Result {
        ui.display_text("Unsetting api endpoint...", &[])?;
        configaction::Actor::new(config).clear_target();
        config.write()?;
        ui.display_ok()?;
        Ok(())
    }

    fn show(&self, ui: &mut Ui, config: &Config) -> Result {
        if config.target().is_empty() {
            let command = format!("{} api", config.binary_name());
            ui.display_text(
                "No api endpoint set. Use '{{ name }}' to set an endpoint",
                &[("name", command.as_str())],
            )?;
            return Ok(());
        }
        display_target(ui, config)
    }

    fn set<C: Clients>(&self, url: &str, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        let settings = TargetSettings {
            url: normalize_url(url),
            skip_ssl_validation: self.skip_ssl_validation,
        };
        ui.display_text_with_flavor(
            "Setting api endpoint to {{ endpoint }}...",
            &[("endpoint", settings.url.as_str())],
        )?;

        // The new endpoint is probed without the old token and with the requested TLS mode.
        let mut probe = config.clone();
        probe.set_target_information(&settings.url, "", "", "", "", "", "", settings.skip_ssl_validation);
        probe.set_token_information("", "");
        let v2 = clients.cloud_controller_v2(&settings.url, &probe)?;
        let v3 = clients.cloud_controller_v3(&settings.url, &probe)?;

        let (result, warnings) = configaction::Actor::new(config)
            .set_target(v2, v3, &settings)
            .into_parts();
        display_warnings(ui, &warnings)?;
        result?;
        config.write()?;

        if settings.url.starts_with("http:") {
            ui.display_warning(
                "Warning: Insecure http API endpoint detected: secure https API endpoints are recommended",
                &[],
            )?;
        }
        ui.display_ok()?;
        ui.display_new_line()?;
        display_target(ui, config)?;
        ui.display_new_line()?;

        let login = format!("{} login", config.binary_name());
        ui.display_text("Not logged in. Use '{{ command }}' to log in.", &[("command", login.as_str())])?;
        warn_if_cli_version_below_minimum(ui, config, version_string())
    }
}

impl Command for ApiCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        if self.unset {
            return self.clear(ui, config);
        }
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => self.set(url, ui, config, clients),
            _ => self.show(ui, config),
        }
    }
}
