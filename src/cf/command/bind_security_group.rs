use super::{current_user, settle, Clients, Command, Result, TranslatableError};
use crate::actor::configaction::{check_target, min_version_check};
use crate::actor::v2action::{self, SecurityGroupLifecycle};
use crate::config::Config;
use cfui::Ui;

/// First `/v2` version that accepts staging security groups per space.
const MIN_VERSION_LIFECYCLE_STAGING: &str = "2.68.0";

/// `bind-security-group SECURITY_GROUP ORG [SPACE] [--lifecycle running|staging]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindSecurityGroupCommand {
    pub security_group: String,
    pub organization: String,
    pub space: Option<String>,
    pub lifecycle: SecurityGroupLifecycle,
}

impl Command for BindSecurityGroupCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        if self.lifecycle == SecurityGroupLifecycle::Staging {
            min_version_check(config.api_version(), MIN_VERSION_LIFECYCLE_STAGING).map_err(
                |_| TranslatableError::LifecycleMinimumApiVersionNotMet {
                    current: config.api_version().to_string(),
                    minimum: MIN_VERSION_LIFECYCLE_STAGING.to_string(),
                },
            )?;
        }
        check_target(config, false, false)?;

        let user = current_user(config);
        let actor = v2action::Actor::new(clients.cloud_controller_v2(config.target(), config)?);

        let group = settle(ui, actor.get_security_group_by_name(&self.security_group))?;
        let org = settle(ui, actor.get_organization_by_name(&self.organization))?;
        let spaces = match self.space.as_deref() {
            Some(name) => vec![settle(
                ui,
                actor.get_space_by_organization_and_name(&org.guid, name),
            )?],
            None => settle(ui, actor.get_organization_spaces(&org.guid))?,
        };

        for space in &spaces {
            ui.display_text_with_flavor(
                "Assigning security group {{ security_group }} to space {{ space }} in org {{ org }} as {{ username }}...",
                &[
                    ("security_group", group.name.as_str()),
                    ("space", space.name.as_str()),
                    ("org", org.name.as_str()),
                    ("username", user.as_str()),
                ],
            )?;
            settle(
                ui,
                actor.bind_security_group_to_space(&group.guid, &space.guid, self.lifecycle),
            )?;
            ui.display_ok()?;
            ui.display_new_line()?;
        }

        ui.display_text(
            "TIP: Changes require an app restart (for running) or restage (for staging) to apply to existing applications.",
            &[],
        )?;
        Ok(())
    }
}
