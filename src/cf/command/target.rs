use super::{current_user, settle, Clients, Command, Result};
use crate::actor::configaction::check_target;
use crate::actor::v2action::{self, Organization};
use crate::actor::ActionError;
use crate::api::ccv2::CloudControllerV2;
use crate::config::Config;
use cfui::Ui;

/// `target [-o ORG] [-s SPACE]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetCommand {
    pub organization: Option<String>,
    pub space: Option<String>,
}

/// Keeps the config consistent with what failed: a bad org clears org and space, a bad
/// space clears only the space.
fn forget_on_error<T>(
    config: &mut Config,
    result: Result<T>,
    forget: fn(&mut Config),
) -> Result<T> {
    if result.is_err() {
        forget(config);
        config.write()?;
    }
    result
}

impl TargetCommand {
    fn target_org<V2: CloudControllerV2>(
        &self,
        name: &str,
        ui: &mut Ui,
        config: &mut Config,
        actor: &v2action::Actor<V2>,
    ) -> Result {
        let org = settle(ui, actor.get_organization_by_name(name));
        let org: Organization =
            forget_on_error(config, org, Config::unset_organization_and_space_information)?;
        config.set_organization_information(&org.guid, &org.name);
        config.unset_space_information();

        if self.space.is_none() {
            let spaces = settle(ui, actor.get_organization_spaces(&org.guid))?;
            if let [space] = spaces.as_slice() {
                config.set_space_information(&space.guid, &space.name, space.allow_ssh);
            }
        }
        Ok(())
    }

    fn target_space<V2: CloudControllerV2>(
        &self,
        name: &str,
        ui: &mut Ui,
        config: &mut Config,
        actor: &v2action::Actor<V2>,
    ) -> Result {
        if !config.has_targeted_organization() {
            return Err(ActionError::NoOrganizationTargeted {
                binary_name: config.binary_name().to_string(),
            }
            .into());
        }
        let org_guid = config.target_organization().guid.clone();
        let space = settle(ui, actor.get_space_by_organization_and_name(&org_guid, name));
        let space = forget_on_error(config, space, Config::unset_space_information)?;
        config.set_space_information(&space.guid, &space.name, space.allow_ssh);
        Ok(())
    }
}

fn display_target(ui: &mut Ui, config: &Config) -> Result {
    let mut rows = vec![
        ("api endpoint:".to_string(), config.target().to_string()),
        ("api version:".to_string(), config.api_version().to_string()),
        ("user:".to_string(), current_user(config)),
    ];
    if config.has_targeted_organization() {
        rows.push(("org:".to_string(), config.target_organization().name.clone()));
    }
    if config.has_targeted_space() {
        rows.push(("space:".to_string(), config.target_space().name.clone()));
    }
    ui.display_key_value_table("", &rows, 3)?;

    let binary = config.binary_name();
    if !config.has_targeted_organization() {
        let command = format!("{binary} target -o ORG -s SPACE");
        ui.display_text(
            "No org or space targeted, use '{{ command }}'",
            &[("command", command.as_str())],
        )?;
    } else if !config.has_targeted_space() {
        let command = format!("{binary} target -s SPACE");
        ui.display_text(
            "No space targeted, use '{{ command }}'",
            &[("command", command.as_str())],
        )?;
    }
    Ok(())
}

impl Command for TargetCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        check_target(config, false, false)?;

        if self.organization.is_some() || self.space.is_some() {
            let client = clients.cloud_controller_v2(config.target(), config)?;
            let actor = v2action::Actor::new(client);
            if let Some(org) = self.organization.as_deref() {
                self.target_org(org, ui, config, &actor)?;
            }
            if let Some(space) = self.space.as_deref() {
                self.target_space(space, ui, config, &actor)?;
            }
            config.write()?;
        }

        display_target(ui, config)
    }
}
