//! Static command metadata: what `cf help` lists and how each command is used.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    GettingStarted,
    Apps,
    Services,
    Routes,
    SpaceAndOrg,
    SecurityGroups,
    Advanced,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::GettingStarted => "GETTING STARTED:",
            CommandGroup::Apps => "APPS:",
            CommandGroup::Services => "SERVICES:",
            CommandGroup::Routes => "ROUTES:",
            CommandGroup::SpaceAndOrg => "ORGS AND SPACES:",
            CommandGroup::SecurityGroups => "SECURITY GROUP:",
            CommandGroup::Advanced => "ADVANCED:",
        }
    }

    /// Display order.
    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::GettingStarted,
            CommandGroup::Apps,
            CommandGroup::Services,
            CommandGroup::SpaceAndOrg,
            CommandGroup::Routes,
            CommandGroup::SecurityGroups,
            CommandGroup::Advanced,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagInfo {
    pub flag: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub description: &'static str,
    pub usage: &'static str,
    pub options: &'static [FlagInfo],
    pub group: CommandGroup,
}

const fn flag(flag: &'static str, description: &'static str) -> FlagInfo {
    FlagInfo { flag, description }
}

pub static COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "help",
        alias: Some("h"),
        description: "Show help",
        usage: "CF_NAME help [COMMAND]",
        options: &[],
        group: CommandGroup::GettingStarted,
    },
    CommandInfo {
        name: "version",
        alias: Some("v"),
        description: "Print the version",
        usage: "CF_NAME version\n\n   CF_NAME -v\n\n   CF_NAME --version",
        options: &[],
        group: CommandGroup::GettingStarted,
    },
    CommandInfo {
        name: "api",
        alias: None,
        description: "Set or view target api url",
        usage: "CF_NAME api [URL]",
        options: &[
            flag("--skip-ssl-validation", "Skip verification of the API endpoint. Not recommended!"),
            flag("--unset", "Remove all api endpoint targeting"),
        ],
        group: CommandGroup::GettingStarted,
    },
    CommandInfo {
        name: "auth",
        alias: None,
        description: "Authenticate user non-interactively",
        usage: "CF_NAME auth USERNAME PASSWORD\n\nWARNING:\n   Providing your password as a command line option is highly discouraged\n   Your password may be visible to others and may be recorded in your shell history",
        options: &[],
        group: CommandGroup::GettingStarted,
    },
    CommandInfo {
        name: "target",
        alias: Some("t"),
        description: "Set or view the targeted org or space",
        usage: "CF_NAME target [-o ORG] [-s SPACE]",
        options: &[
            flag("-o", "Organization"),
            flag("-s", "Space"),
        ],
        group: CommandGroup::GettingStarted,
    },
    CommandInfo {
        name: "app",
        alias: None,
        description: "Display health and status for an app",
        usage: "CF_NAME app APP_NAME",
        options: &[flag("--guid", "Retrieve and display the given app's guid.  All other health and status output for the app is suppressed.")],
        group: CommandGroup::Apps,
    },
    CommandInfo {
        name: "start",
        alias: Some("st"),
        description: "Start an app",
        usage: "CF_NAME start APP_NAME",
        options: &[],
        group: CommandGroup::Apps,
    },
    CommandInfo {
        name: "run-task",
        alias: Some("rt"),
        description: "Run a one-off task on an app",
        usage: "CF_NAME run-task APP_NAME COMMAND [--name TASK_NAME]",
        options: &[flag("--name", "Name to give the task (generated if omitted)")],
        group: CommandGroup::Apps,
    },
    CommandInfo {
        name: "share-service",
        alias: None,
        description: "Share a service instance with another space",
        usage: "CF_NAME share-service SERVICE_INSTANCE -s OTHER_SPACE [-o OTHER_ORG]",
        options: &[
            flag("-o", "Org of the other space (Default: targeted org)"),
            flag("-s", "Space to share the service instance into"),
        ],
        group: CommandGroup::Services,
    },
    CommandInfo {
        name: "domains",
        alias: None,
        description: "List domains in the target org",
        usage: "CF_NAME domains",
        options: &[],
        group: CommandGroup::Routes,
    },
    CommandInfo {
        name: "delete-orphaned-routes",
        alias: None,
        description: "Delete all orphaned routes in the currently targeted space (i.e. those that are not mapped to an app)",
        usage: "CF_NAME delete-orphaned-routes [-f]",
        options: &[flag("-f", "Force deletion without confirmation")],
        group: CommandGroup::Routes,
    },
    CommandInfo {
        name: "bind-security-group",
        alias: None,
        description: "Bind a security group to a particular space, or all existing spaces of an org",
        usage: "CF_NAME bind-security-group SECURITY_GROUP ORG [SPACE] [--lifecycle (running | staging)]\n\nTIP: Changes require an app restart (for running) or restage (for staging) to apply to existing applications.",
        options: &[flag("--lifecycle", "Lifecycle phase the group applies to (Default: running)")],
        group: CommandGroup::SecurityGroups,
    },
    CommandInfo {
        name: "config",
        alias: None,
        description: "Write default values to the config",
        usage: "CF_NAME config [--async-timeout TIMEOUT_IN_MINUTES] [--trace (true | false | path/to/file)] [--color (true | false)] [--locale (LOCALE | CLEAR)]",
        options: &[
            flag("--async-timeout", "Timeout in minutes for async HTTP requests"),
            flag("--color", "Enable or disable color in CLI output"),
            flag("--locale", "Set default locale. If LOCALE is 'CLEAR', previous locale is deleted."),
            flag("--trace", "Trace HTTP requests by default"),
        ],
        group: CommandGroup::Advanced,
    },
];

static BY_NAME: Lazy<BTreeMap<&'static str, &'static CommandInfo>> = Lazy::new(|| {
    let mut index = BTreeMap::new();
    for info in COMMANDS {
        index.insert(info.name, info);
        if let Some(alias) = info.alias {
            index.insert(alias, info);
        }
    }
    index
});

/// Finds a command by name or alias.
pub fn find(name: &str) -> Option<&'static CommandInfo> {
    BY_NAME.get(name).copied()
}

pub fn in_group(group: CommandGroup) -> impl Iterator<Item = &'static CommandInfo> {
    COMMANDS.iter().filter(move |info| info.group == group)
}
