use cf::actor::v2action::SecurityGroupLifecycle;
use cf::command::{
    ApiCommand, AppCommand, AuthCommand, BindSecurityGroupCommand, ConfigCommand,
    DeleteOrphanedRoutesCommand, DomainsCommand, HelpCommand, RunTaskCommand,
    ShareServiceCommand, StartCommand, TargetCommand, VersionCommand,
};
use clap::{Parser, Subcommand};

/// Help and version are rendered by the commands themselves, so clap's own are disabled.
/// `-h` is handled by [`parse_args`] before clap sees the line.
#[derive(Parser, Debug)]
#[command(
    name = "cf",
    bin_name = "cf",
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print the version
    #[arg(short = 'v', long)]
    pub version: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    #[command(alias = "h")]
    Help { command: Option<String> },

    #[command(alias = "v")]
    Version,

    Api {
        url: Option<String>,
        #[arg(long)]
        unset: bool,
        #[arg(long)]
        skip_ssl_validation: bool,
    },

    Auth { username: String, password: String },

    #[command(alias = "t")]
    Target {
        #[arg(short = 'o')]
        organization: Option<String>,
        #[arg(short = 's')]
        space: Option<String>,
    },

    App {
        app_name: String,
        #[arg(long)]
        guid: bool,
    },

    #[command(alias = "st")]
    Start { app_name: String },

    #[command(alias = "rt")]
    RunTask {
        app_name: String,
        command: String,
        #[arg(long)]
        name: Option<String>,
    },

    ShareService {
        service_instance: String,
        #[arg(short = 's')]
        space: String,
        #[arg(short = 'o')]
        organization: Option<String>,
    },

    Domains,

    DeleteOrphanedRoutes {
        #[arg(short = 'f')]
        force: bool,
    },

    BindSecurityGroup {
        security_group: String,
        organization: String,
        space: Option<String>,
        #[arg(long, default_value = "running")]
        lifecycle: SecurityGroupLifecycle,
    },

    Config {
        #[arg(long)]
        async_timeout: Option<u32>,
        #[arg(long)]
        trace: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        locale: Option<String>,
    },
}

/// A parsed command line, ready to execute.
#[derive(Debug, PartialEq)]
pub enum Invocation {
    Help(HelpCommand),
    Version(VersionCommand),
    Api(ApiCommand),
    Auth(AuthCommand),
    Target(TargetCommand),
    App(AppCommand),
    Start(StartCommand),
    RunTask(RunTaskCommand),
    ShareService(ShareServiceCommand),
    Domains(DomainsCommand),
    DeleteOrphanedRoutes(DeleteOrphanedRoutesCommand),
    BindSecurityGroup(BindSecurityGroupCommand),
    Config(ConfigCommand),
}

/// Parses a full argv. `-h`/`--help` anywhere wins, so `cf app -h` works without an app
/// name; the first positional argument names the command to describe.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Invocation, clap::Error> {
    let args: Vec<String> = args.into_iter().collect();
    let rest = args.get(1..).unwrap_or_default();
    if rest.iter().any(|a| a == "-h" || a == "--help") {
        let command = rest.iter().find(|a| !a.starts_with('-')).cloned();
        return Ok(Invocation::Help(HelpCommand { command }));
    }
    Cli::try_parse_from(args).map(Cli::into_invocation)
}

impl Cli {
    /// A bare `cf` is help; `cf -v` is version.
    pub fn into_invocation(self) -> Invocation {
        let Some(command) = self.command else {
            if self.version {
                return Invocation::Version(VersionCommand);
            }
            return Invocation::Help(HelpCommand::default());
        };

        match command {
            Commands::Help { command } => Invocation::Help(HelpCommand { command }),
            Commands::Version => Invocation::Version(VersionCommand),
            Commands::Api {
                url,
                unset,
                skip_ssl_validation,
            } => Invocation::Api(ApiCommand {
                url,
                unset,
                skip_ssl_validation,
            }),
            Commands::Auth { username, password } => {
                Invocation::Auth(AuthCommand { username, password })
            }
            Commands::Target {
                organization,
                space,
            } => Invocation::Target(TargetCommand {
                organization,
                space,
            }),
            Commands::App { app_name, guid } => Invocation::App(AppCommand { app_name, guid }),
            Commands::Start { app_name } => Invocation::Start(StartCommand { app_name }),
            Commands::RunTask {
                app_name,
                command,
                name,
            } => Invocation::RunTask(RunTaskCommand {
                app_name,
                command,
                name,
            }),
            Commands::ShareService {
                service_instance,
                space,
                organization,
            } => Invocation::ShareService(ShareServiceCommand {
                service_instance,
                space,
                organization,
            }),
            Commands::Domains => Invocation::Domains(DomainsCommand),
            Commands::DeleteOrphanedRoutes { force } => {
                Invocation::DeleteOrphanedRoutes(DeleteOrphanedRoutesCommand { force })
            }
            Commands::BindSecurityGroup {
                security_group,
                organization,
                space,
                lifecycle,
            } => Invocation::BindSecurityGroup(BindSecurityGroupCommand {
                security_group,
                organization,
                space,
                lifecycle,
            }),
            Commands::Config {
                async_timeout,
                trace,
                color,
                locale,
            } => Invocation::Config(ConfigCommand {
                async_timeout,
                trace,
                color,
                locale,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Invocation {
        let argv = std::iter::once("cf").chain(args.iter().copied()).map(String::from);
        parse_args(argv).unwrap()
    }

    #[test]
    fn bare_invocation_is_help() {
        assert_eq!(parse(&[]), Invocation::Help(HelpCommand::default()));
        assert_eq!(parse(&["-h"]), Invocation::Help(HelpCommand::default()));
    }

    #[test]
    fn help_flag_on_a_command_shows_its_help() {
        assert_eq!(
            parse(&["app", "-h"]),
            Invocation::Help(HelpCommand {
                command: Some("app".into())
            })
        );
        assert_eq!(
            parse(&["--help", "t"]),
            Invocation::Help(HelpCommand {
                command: Some("t".into())
            })
        );
    }

    #[test]
    fn version_flag_and_alias() {
        assert_eq!(parse(&["-v"]), Invocation::Version(VersionCommand));
        assert_eq!(parse(&["v"]), Invocation::Version(VersionCommand));
    }

    #[test]
    fn aliases_reach_their_command() {
        assert_eq!(
            parse(&["t", "-o", "my-org"]),
            Invocation::Target(TargetCommand {
                organization: Some("my-org".into()),
                space: None,
            })
        );
        assert_eq!(
            parse(&["rt", "my-app", "echo hi", "--name", "greet"]),
            Invocation::RunTask(RunTaskCommand {
                app_name: "my-app".into(),
                command: "echo hi".into(),
                name: Some("greet".into()),
            })
        );
    }

    #[test]
    fn lifecycle_defaults_to_running() {
        let Invocation::BindSecurityGroup(cmd) = parse(&["bind-security-group", "sg", "org"])
        else {
            panic!("expected bind-security-group");
        };
        assert_eq!(cmd.lifecycle, SecurityGroupLifecycle::Running);

        let Invocation::BindSecurityGroup(cmd) =
            parse(&["bind-security-group", "sg", "org", "space", "--lifecycle", "staging"])
        else {
            panic!("expected bind-security-group");
        };
        assert_eq!(cmd.lifecycle, SecurityGroupLifecycle::Staging);
        assert_eq!(cmd.space.as_deref(), Some("space"));
    }

    #[test]
    fn bad_lifecycle_is_a_usage_error() {
        let argv = ["cf", "bind-security-group", "sg", "org", "--lifecycle", "launch"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
