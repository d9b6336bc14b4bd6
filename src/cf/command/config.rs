use super::{Clients, Command, Result, TranslatableError};
use crate::config::Config;
use cfui::i18n::{normalize_locale, SUPPORTED_LOCALES};
use cfui::Ui;

/// `config [--async-timeout MIN] [--trace VALUE] [--color true|false] [--locale LOCALE|CLEAR]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigCommand {
    pub async_timeout: Option<u32>,
    pub trace: Option<String>,
    pub color: Option<String>,
    pub locale: Option<String>,
}

fn incorrect_usage(message: String) -> TranslatableError {
    TranslatableError::IncorrectUsage { message }
}

fn parse_color(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(incorrect_usage(format!(
            "--color must be 'true' or 'false', got '{other}'"
        ))),
    }
}

/// `CLEAR` maps to the empty locale, which defers to the environment.
fn parse_locale(value: &str) -> Result<String> {
    if value == "CLEAR" {
        return Ok(String::new());
    }
    match normalize_locale(value) {
        Some(locale) if SUPPORTED_LOCALES.contains(&locale.as_str()) => Ok(locale),
        _ => Err(incorrect_usage(format!(
            "Invalid locale {value}. Supported locales are: {}",
            SUPPORTED_LOCALES.join(", ")
        ))),
    }
}

impl Command for ConfigCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, _clients: &C) -> Result {
        if self.async_timeout.is_none()
            && self.trace.is_none()
            && self.color.is_none()
            && self.locale.is_none()
        {
            return Err(incorrect_usage(
                "at least one of --async-timeout, --trace, --color or --locale is required"
                    .to_string(),
            ));
        }

        // Validate everything before touching the config.
        let color = self.color.as_deref().map(parse_color).transpose()?;
        let locale = self.locale.as_deref().map(parse_locale).transpose()?;

        ui.display_text("Setting values in config...", &[])?;
        if let Some(minutes) = self.async_timeout {
            config.set_async_timeout(minutes);
        }
        if let Some(trace) = self.trace.as_deref() {
            config.set_trace(trace);
        }
        if let Some(enabled) = color {
            config.set_color_enabled(enabled);
        }
        if let Some(locale) = locale.as_deref() {
            config.set_locale(locale);
        }
        config.write()?;
        ui.display_ok()?;
        Ok(())
    }
}
