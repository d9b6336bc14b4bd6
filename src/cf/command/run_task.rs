use super::{current_user, settle, Clients, Command, Result};
use crate::actor::configaction::check_target;
use crate::actor::v3action::{self, Task};
use crate::config::Config;
use cfui::Ui;

/// `run-task APP_NAME COMMAND [--name TASK_NAME]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTaskCommand {
    pub app_name: String,
    pub command: String,
    pub name: Option<String>,
}

impl Command for RunTaskCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        check_target(config, true, true)?;
        let space_guid = config.target_space().guid.clone();
        let actor = v3action::Actor::new(clients.cloud_controller_v3(config.target(), config)?);

        let app = settle(ui, actor.get_application_by_name_and_space(&self.app_name, &space_guid))?;

        let user = current_user(config);
        ui.display_text_with_flavor(
            "Creating task for app {{ app_name }} in org {{ org }} / space {{ space }} as {{ username }}...",
            &[
                ("app_name", self.app_name.as_str()),
                ("org", config.target_organization().name.as_str()),
                ("space", config.target_space().name.as_str()),
                ("username", user.as_str()),
            ],
        )?;

        let request = Task {
            command: self.command.clone(),
            name: self.name.clone().unwrap_or_default(),
            ..Task::default()
        };
        let task = settle(ui, actor.run_application_task(&app.guid, &request))?;

        ui.display_ok()?;
        ui.display_new_line()?;
        ui.display_text("Task has been submitted successfully for execution.", &[])?;
        ui.display_key_value_table(
            "",
            &[
                ("task name:".to_string(), task.name),
                ("task id:".to_string(), task.sequence_id.to_string()),
            ],
            3,
        )?;
        Ok(())
    }
}
