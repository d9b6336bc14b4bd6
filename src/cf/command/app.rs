use super::shared::display_app_summary;
use super::{current_user, settle, Clients, Command, Result};
use crate::actor::configaction::check_target;
use crate::actor::{v2action, v2v3action, v3action};
use crate::config::Config;
use cfui::Ui;

/// `app APP_NAME [--guid]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppCommand {
    pub app_name: String,
    pub guid: bool,
}

impl Command for AppCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        check_target(config, true, true)?;
        let space_guid = config.target_space().guid.clone();
        let v2 = v2action::Actor::new(clients.cloud_controller_v2(config.target(), config)?);

        if self.guid {
            let app = settle(ui, v2.get_application_by_name_and_space(&self.app_name, &space_guid))?;
            ui.display_text("{{ guid }}", &[("guid", app.guid.as_str())])?;
            return Ok(());
        }

        let user = current_user(config);
        ui.display_text_with_flavor(
            "Showing health and status for app {{ app_name }} in org {{ org }} / space {{ space }} as {{ username }}...",
            &[
                ("app_name", self.app_name.as_str()),
                ("org", config.target_organization().name.as_str()),
                ("space", config.target_space().name.as_str()),
                ("username", user.as_str()),
            ],
        )?;
        ui.display_new_line()?;

        let v3 = v3action::Actor::new(clients.cloud_controller_v3(config.target(), config)?);
        let actor = v2v3action::Actor::new(v2, v3);
        let summary = settle(
            ui,
            actor.get_application_summary_by_name_and_space(&self.app_name, &space_guid),
        )?;
        display_app_summary(ui, &summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ccv2;
    use crate::api::ccv3::{self, Process};
    use crate::command::testing::{targeted_config, ui, FakeClients};
    use crate::command::TranslatableError;
    use crate::warnings::{Warned, Warnings};
    use tempfile::TempDir;

    fn command(guid: bool) -> AppCommand {
        AppCommand {
            app_name: "some-app".into(),
            guid,
        }
    }

    #[test]
    fn needs_a_space() {
        let home = TempDir::new().unwrap();
        let mut config = targeted_config(&home);
        config.unset_space_information();
        let (mut ui, _, _) = ui();

        let err = command(false)
            .execute(&mut ui, &mut config, &&FakeClients::default())
            .unwrap_err();
        assert!(matches!(err, TranslatableError::NoSpaceTargeted { .. }));
    }

    #[test]
    fn guid_flag_prints_only_the_guid() {
        let home = TempDir::new().unwrap();
        let mut config = targeted_config(&home);
        let clients = FakeClients::default();
        clients.v2.get_applications.returns(Warned::ok(
            vec![ccv2::Application {
                guid: "some-app-guid".into(),
                name: "some-app".into(),
                ..ccv2::Application::default()
            }],
            Warnings::from_strs(&["app-warning"]),
        ));
        let (mut ui, out, err) = ui();

        command(true).execute(&mut ui, &mut config, &&clients).unwrap();

        assert_eq!(out.contents(), "some-app-guid\n");
        assert_eq!(err.contents(), "app-warning\n");
    }

    #[test]
    fn shows_the_summary() {
        let home = TempDir::new().unwrap();
        let mut config = targeted_config(&home);
        let clients = FakeClients::default();
        clients.v3.get_applications.returns(Warned::ok(
            vec![ccv3::Application {
                guid: "some-app-guid".into(),
                name: "some-app".into(),
                state: "STOPPED".into(),
                ..ccv3::Application::default()
            }],
            Warnings::from_strs(&["v3-app-warning"]),
        ));
        clients.v3.get_application_processes.returns(Warned::ok(
            vec![Process {
                guid: "web-guid".into(),
                process_type: "web".into(),
                memory_in_mb: 64,
                ..Process::default()
            }],
            Warnings::new(),
        ));
        let (mut ui, out, err) = ui();

        command(false).execute(&mut ui, &mut config, &&clients).unwrap();

        let out = out.contents();
        assert!(out.starts_with(
            "Showing health and status for app some-app in org some-org / space some-space as some-user...\n\n"
        ));
        assert!(out.contains("name:              some-app\n"));
        assert!(out.contains("requested state:   stopped\n"));
        assert!(out.contains("memory usage:   64M\n"));
        assert!(out.contains("There are no running instances of this process."));
        assert!(err.contents().contains("v3-app-warning"));
        assert_eq!(
            clients.v2.get_application_instance_statuses.call_count(),
            0
        );
    }

    #[test]
    fn unknown_app() {
        let home = TempDir::new().unwrap();
        let mut config = targeted_config(&home);
        let (mut ui, _, _) = ui();

        let err = command(false)
            .execute(&mut ui, &mut config, &&FakeClients::default())
            .unwrap_err();
        assert!(matches!(
            err,
            TranslatableError::ApplicationNotFound { ref name, .. } if name == "some-app"
        ));
    }
}
