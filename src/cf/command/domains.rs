use super::{current_user, settle, Clients, Command, Result};
use crate::actor::configaction::check_target;
use crate::actor::v2action::{self, Domain};
use crate::config::Config;
use cfui::Ui;

/// `domains`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainsCommand;

fn domain_row(domain: &Domain) -> Vec<String> {
    let status = if domain.is_shared() { "shared" } else { "owned" };
    let kind = if domain.is_tcp() { "tcp" } else { "" };
    let details = if domain.internal { "internal" } else { "" };
    vec![
        domain.name.clone(),
        status.to_string(),
        kind.to_string(),
        details.to_string(),
    ]
}

impl Command for DomainsCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, clients: &C) -> Result {
        check_target(config, true, false)?;

        let user = current_user(config);
        ui.display_text_with_flavor(
            "Getting domains in org {{ org }} as {{ username }}...",
            &[
                ("org", config.target_organization().name.as_str()),
                ("username", user.as_str()),
            ],
        )?;

        let actor = v2action::Actor::new(clients.cloud_controller_v2(config.target(), config)?);
        let domains = settle(
            ui,
            actor.get_organization_domains(&config.target_organization().guid),
        )?;

        if domains.is_empty() {
            ui.display_text("No domains found", &[])?;
            return Ok(());
        }

        let mut rows = vec![vec![
            "name".to_string(),
            "status".to_string(),
            "type".to_string(),
            "details".to_string(),
        ]];
        rows.extend(domains.iter().map(domain_row));
        ui.display_table_with_header("", &rows, 3)?;
        Ok(())
    }
}
