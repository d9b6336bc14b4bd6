use super::registry::{self, CommandGroup, CommandInfo};
use super::{version_string, Clients, Command, Result, TranslatableError};
use crate::config::Config;
use cfui::Ui;

/// `help [COMMAND]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpCommand {
    pub command: Option<String>,
}

fn display_all(ui: &mut Ui, binary: &str) -> Result {
    ui.display_text(
        "{{ binary }} version {{ version }}, Cloud Foundry command line tool",
        &[("binary", binary), ("version", version_string())],
    )?;
    let usage = format!("{binary} [global options] command [arguments...] [command options]");
    ui.display_text("Usage: {{ usage }}", &[("usage", usage.as_str())])?;

    for group in CommandGroup::all() {
        let rows: Vec<(String, String)> = registry::in_group(*group)
            .map(|info| (info.name.to_string(), ui.translate_text(info.description, &[])))
            .collect();
        if rows.is_empty() {
            continue;
        }
        ui.display_new_line()?;
        ui.display_header(group.heading())?;
        ui.display_key_value_table("   ", &rows, 3)?;
    }

    ui.display_new_line()?;
    let command = format!("{binary} help COMMAND");
    ui.display_text(
        "Use '{{ command }}' for more information about a command.",
        &[("command", command.as_str())],
    )?;
    Ok(())
}

fn display_command(ui: &mut Ui, binary: &str, info: &CommandInfo) -> Result {
    let description = ui.translate_text(info.description, &[]);
    ui.display_header("NAME:")?;
    ui.display_text(
        "   {{ name }} - {{ description }}",
        &[("name", info.name), ("description", description.as_str())],
    )?;
    ui.display_new_line()?;

    ui.display_header("USAGE:")?;
    let usage = info.usage.replace("CF_NAME", binary);
    ui.display_text("   {{ usage }}", &[("usage", usage.as_str())])?;

    if let Some(alias) = info.alias {
        ui.display_new_line()?;
        ui.display_header("ALIAS:")?;
        ui.display_text("   {{ alias }}", &[("alias", alias)])?;
    }

    if !info.options.is_empty() {
        ui.display_new_line()?;
        ui.display_header("OPTIONS:")?;
        let rows: Vec<(String, String)> = info
            .options
            .iter()
            .map(|o| (o.flag.to_string(), ui.translate_text(o.description, &[])))
            .collect();
        ui.display_key_value_table("   ", &rows, 6)?;
    }
    Ok(())
}

impl Command for HelpCommand {
    fn execute<C: Clients>(&self, ui: &mut Ui, config: &mut Config, _clients: &C) -> Result {
        let binary = config.binary_name().to_string();
        match self.command.as_deref() {
            None => display_all(ui, &binary),
            Some(name) => match registry::find(name) {
                Some(info) => display_command(ui, &binary, info),
                None => Err(TranslatableError::UnknownCommand {
                    name: name.to_string(),
                }),
            },
        }
    }
}
