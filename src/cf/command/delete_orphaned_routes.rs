use super::{current_user, display_warnings, settle, Clients, Command, Result};
use crate::actor::configaction::check_target;
use crate::actor::{v2action, ActionError};
use crate::config::Config;
use crate::error::Error;
use cfui::Ui;

/// `delete-orphaned-routes [-f]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOrphanedRoutesCommand {
    pub force: bool,
}

impl Command for DeleteOrphanedRoutesCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        check_target(config, true, true)?;

        if !self.force && !ui.display_boolean_prompt(false, "Really delete orphaned routes?", &[])? {
            return Ok(());
        }

        let user = current_user(config);
        ui.display_text_with_flavor(
            "Getting routes as {{ username }} ...",
            &[("username", user.as_str())],
        )?;
        ui.display_new_line()?;

        let actor = v2action::Actor::new(clients.cloud_controller_v2(config.target(), config)?);
        let (routes, warnings) = actor
            .get_orphaned_routes_by_space(&config.target_space().guid)
            .into_parts();
        display_warnings(ui, &warnings)?;
        let routes = match routes {
            Ok(routes) => routes,
            Err(Error::Action(ActionError::OrphanedRoutesNotFound)) => {
                ui.display_ok()?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        for route in &routes {
            let name = route.to_string();
            ui.display_text_with_flavor("Deleting route {{ route }}...", &[("route", name.as_str())])?;
            settle(ui, actor.delete_route(&route.guid))?;
        }
        ui.display_ok()?;
        Ok(())
    }
}
