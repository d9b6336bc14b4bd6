use super::{current_user, display_warnings, settle, Clients, Command, Result};
use crate::actor::configaction::{check_target, min_version_check};
use crate::actor::v3action::{self, MIN_VERSION_SHARE_SERVICE};
use crate::actor::{v2action, v2v3action, ActionError};
use crate::config::Config;
use crate::error::Error;
use cfui::Ui;

/// `share-service SERVICE_INSTANCE -s OTHER_SPACE [-o OTHER_ORG]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareServiceCommand {
    pub service_instance: String,
    pub space: String,
    pub organization: Option<String>,
}

impl Command for ShareServiceCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        check_target(config, true, true)?;

        let v3 = v3action::Actor::new(clients.cloud_controller_v3(config.target(), config)?);
        let version = settle(ui, v3.cloud_controller_api_version())?;
        min_version_check(&version, MIN_VERSION_SHARE_SERVICE)?;

        let v2 = v2action::Actor::new(clients.cloud_controller_v2(config.target(), config)?);
        let actor = v2v3action::Actor::new(v2, v3);

        let user = current_user(config);
        let org_name = self
            .organization
            .as_deref()
            .unwrap_or(&config.target_organization().name)
            .to_string();
        ui.display_text_with_flavor(
            "Sharing service instance {{ service_instance }} into org {{ org }} / space {{ space }} as {{ username }}...",
            &[
                ("service_instance", self.service_instance.as_str()),
                ("org", org_name.as_str()),
                ("space", self.space.as_str()),
                ("username", user.as_str()),
            ],
        )?;

        let source_space = config.target_space().guid.clone();
        let shared = match self.organization.as_deref() {
            Some(org) => actor
                .share_service_instance_to_space_name_by_name_and_space_and_organization_name(
                    &self.space,
                    &self.service_instance,
                    &source_space,
                    org,
                ),
            None => actor.share_service_instance_to_space_name_by_name_and_space_and_organization(
                &self.space,
                &self.service_instance,
                &source_space,
                &config.target_organization().guid,
            ),
        };

        let (result, warnings) = shared.into_parts();
        display_warnings(ui, &warnings)?;
        match result {
            Ok(()) | Err(Error::Action(ActionError::ServiceInstanceAlreadyShared)) => {
                ui.display_ok()?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
