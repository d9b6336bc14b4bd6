//! # CLI Layer
//!
//! The only place that knows about process arguments, the real terminal and exit codes.
//! It loads the config, installs tracing, builds the [`Ui`] for the configured locale,
//! parses the command line, and hands the parsed command the HTTP-backed clients.
//!
//! Every failure, including argument errors, is rendered the same way: the translated
//! message on stderr followed by `FAILED` on stdout, and exit status 1.

use super::setup::{parse_args, Invocation};
use cf::command::shared::HttpClients;
use cf::command::{Clients, Command, TranslatableError};
use cf::config::{Config, EnvOverride};
use cf::trace;
use cfui::{Translator, Ui};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use tracing::debug;

/// Maps a clap failure onto the CLI's own usage errors.
pub fn usage_error(err: &clap::Error) -> TranslatableError {
    if err.kind() == ErrorKind::InvalidSubcommand {
        if let Some(ContextValue::String(name)) = err.get(ContextKind::InvalidSubcommand) {
            return TranslatableError::UnknownCommand { name: name.clone() };
        }
    }
    let rendered = err.render().to_string();
    let message = rendered
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
        .trim_start_matches("error: ")
        .to_string();
    TranslatableError::IncorrectUsage { message }
}

/// An unreadable config file is reported and replaced with defaults, never fatal.
fn load_config() -> Config {
    let env = EnvOverride::from_env();
    let home = Config::home_dir(&env);
    match Config::load_from(&home, env.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            Config::defaults(&home, env)
        }
    }
}

pub fn dispatch<C: Clients>(
    invocation: &Invocation,
    ui: &mut Ui,
    config: &mut Config,
    clients: &C,
) -> Result<(), TranslatableError> {
    match invocation {
        Invocation::Help(cmd) => cmd.execute(ui, config, clients),
        Invocation::Version(cmd) => cmd.execute(ui, config, clients),
        Invocation::Api(cmd) => cmd.execute(ui, config, clients),
        Invocation::Auth(cmd) => cmd.execute(ui, config, clients),
        Invocation::Target(cmd) => cmd.execute(ui, config, clients),
        Invocation::App(cmd) => cmd.execute(ui, config, clients),
        Invocation::Start(cmd) => cmd.execute(ui, config, clients),
        Invocation::RunTask(cmd) => cmd.execute(ui, config, clients),
        Invocation::ShareService(cmd) => cmd.execute(ui, config, clients),
        Invocation::Domains(cmd) => cmd.execute(ui, config, clients),
        Invocation::DeleteOrphanedRoutes(cmd) => cmd.execute(ui, config, clients),
        Invocation::BindSecurityGroup(cmd) => cmd.execute(ui, config, clients),
        Invocation::Config(cmd) => cmd.execute(ui, config, clients),
    }
}

/// Runs the CLI and returns the process exit status.
pub fn run() -> i32 {
    let mut config = load_config();
    trace::init(config.trace(), config.env().cf_log_level.as_deref());

    let translator = Translator::for_locale(config.locale());
    let mut ui = Ui::new(translator, config.color_enabled());

    let result = parse_args(std::env::args())
        .map_err(|err| usage_error(&err))
        .and_then(|invocation| {
            debug!(?invocation, "dispatching");
            dispatch(&invocation, &mut ui, &mut config, &HttpClients)
        });

    match result {
        Ok(()) => 0,
        Err(err) => {
            debug!(error = ?err, "command failed");
            // Nothing more can be reported if the terminal itself is gone.
            let _ = ui.display_error(&err);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::setup::Cli;
    use super::*;
    use clap::Parser;

    #[test]
    fn unknown_subcommands_name_the_command() {
        let err = Cli::try_parse_from(["cf", "push", "my-app"]).unwrap_err();
        assert!(matches!(
            usage_error(&err),
            TranslatableError::UnknownCommand { ref name } if name == "push"
        ));
    }

    #[test]
    fn missing_arguments_are_incorrect_usage() {
        let err = Cli::try_parse_from(["cf", "auth", "only-user"]).unwrap_err();
        let TranslatableError::IncorrectUsage { message } = usage_error(&err) else {
            panic!("expected incorrect usage");
        };
        assert!(!message.starts_with("error:"));
        assert!(message.contains("PASSWORD") || message.contains("password"));
    }
}
