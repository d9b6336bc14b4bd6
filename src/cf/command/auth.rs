use super::{Clients, Command, Result};
use crate::actor::configaction;
use crate::actor::ActionError;
use crate::config::Config;
use cfui::Ui;

/// `auth USERNAME PASSWORD`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthCommand {
    pub username: String,
    pub password: String,
}

impl Command for AuthCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        // Only an endpoint is needed; the point is to log in.
        if config.target().is_empty() {
            return Err(ActionError::NoApiSet {
                binary_name: config.binary_name().to_string(),
            }
            .into());
        }

        ui.display_text_with_flavor(
            "API endpoint: {{ endpoint }}",
            &[("endpoint", config.target())],
        )?;
        ui.display_text("Authenticating...", &[])?;

        let uaa = clients.uaa(config)?;
        configaction::Actor::new(config).authenticate(uaa, &self.username, &self.password)?;
        config.write()?;

        ui.display_ok()?;
        ui.display_new_line()?;
        let command = format!("{} target", config.binary_name());
        ui.display_text(
            "Use '{{ command }}' to view or set your target org and space.",
            &[("command", command.as_str())],
        )?;
        Ok(())
    }
}
