use super::shared::{display_app_summary, poll_start};
use super::{current_user, settle, Clients, Command, Result};
use crate::actor::configaction::check_target;
use crate::actor::{v2action, v2v3action, v3action};
use crate::config::Config;
use cfui::Ui;
use std::thread;
use std::time::Duration;

/// Longest wait for trailing staging logs once the app is up.
const MAX_LOG_FLUSH: Duration = Duration::from_secs(1);

/// `start APP_NAME`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartCommand {
    pub app_name: String,
}

impl Command for StartCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        check_target(config, true, true)?;
        let space_guid = config.target_space().guid.clone();

        let user = current_user(config);
        ui.display_text_with_flavor(
            "Starting app {{ app_name }} in org {{ org }} / space {{ space }} as {{ username }}...",
            &[
                ("app_name", self.app_name.as_str()),
                ("org", config.target_organization().name.as_str()),
                ("space", config.target_space().name.as_str()),
                ("username", user.as_str()),
            ],
        )?;

        let v2 = v2action::Actor::new(clients.cloud_controller_v2(config.target(), config)?);
        let app = settle(ui, v2.get_application_by_name_and_space(&self.app_name, &space_guid))?;
        if app.started() {
            ui.display_warning(
                "App {{ app_name }} is already started",
                &[("app_name", self.app_name.as_str())],
            )?;
            return Ok(());
        }

        let log_client = clients.log_cache(config)?;
        let settings = config.polling_settings();
        let flush_window = settings.polling_interval.min(MAX_LOG_FLUSH);
        thread::scope(|scope| {
            let streams = v2.start_application(scope, app, &log_client, settings);
            poll_start(ui, streams, flush_window)
        })?;

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
