use std::collections::HashMap;

use crate::settings::SettingsError;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("command {0} has already been defined")]
    AlreadyDefined(String),
    #[error("unknown command '{0}', try :help")]
    Unknown(String),
    #[error("command {0} expects an input")]
    MissingInput(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// What a command does once it is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Help,
    Quit,
    List,
    Clear,
    ClearScreen,
    Paste,
    Expression,
    Statement,
    Program,
    Parse,
    ParseTree,
    Eval,
    Type,
    Trace,
    EvalTree,
    Settings,
    Set,
    Unset,
    Reset,
}

#[derive(Debug)]
pub struct Command {
    pub name: &'static str,
    pub action: Action,
    pub usage: &'static [(&'static str, &'static str)],
}

/// Commands by name and alias, remembering registration order for the menu.
#[derive(Debug, Default)]
pub struct CommandSet {
    by_name: HashMap<&'static str, usize>,
    commands: Vec<Command>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` for `command`. Registering an alias for an already listed command
    /// (same action) does not list it twice.
    pub fn register(&mut self, name: &'static str, command: Command) -> Result<(), CommandError> {
        if self.by_name.contains_key(name) {
            return Err(CommandError::AlreadyDefined(name.to_string()));
        }
        let index = match self.commands.iter().position(|c| c.action == command.action) {
            Some(index) => index,
            None => {
                self.commands.push(command);
                self.commands.len() - 1
            }
        };
        self.by_name.insert(name, index);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.by_name.get(name).map(|&index| &self.commands[index])
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_name.keys().copied()
    }

    /// Usage table of a single command.
    pub fn usage(&self, name: &str) -> Option<String> {
        let command = self.get(name)?;
        Some(table(None, &usage_rows(command)))
    }

    /// Usage table of every command, in registration order.
    pub fn menu(&self) -> String {
        let rows: Vec<_> = self.commands.iter().flat_map(usage_rows).collect();
        table(Some(["Name", "", "Usage"]), &rows)
    }

    /// The command set of an interactive session.
    pub fn standard() -> Result<Self, CommandError> {
        let mut set = CommandSet::new();
        let commands: &[(&[&'static str], Action, &'static [(&'static str, &'static str)])] = &[
            (
                &["help", "h"],
                Action::Help,
                &[
                    ("~", "list all commands with usage"),
                    ("~ <cmd>", "print usage of command <cmd>"),
                ],
            ),
            (&["quit", "q"], Action::Quit, &[("~", "quit the session")]),
            (
                &["list", "l"],
                Action::List,
                &[("~", "list all identifiers in the environment with types and values")],
            ),
            (&["clear", "c"], Action::Clear, &[("~", "clear the environment")]),
            (
                &["clearscreen", "cl"],
                Action::ClearScreen,
                &[("~", "clear the terminal screen")],
            ),
            (
                &["paste"],
                Action::Paste,
                &[
                    ("~", "read multiline input until a blank line"),
                    ("~ <input>", "start multiline input with <input>"),
                ],
            ),
            (
                &["expression", "expr"],
                Action::Expression,
                &[("~ <input>", "expect <input> to be an expression")],
            ),
            (
                &["statement", "stmt"],
                Action::Statement,
                &[("~ <input>", "expect <input> to be a statement")],
            ),
            (
                &["program", "prog"],
                Action::Program,
                &[("~ <input>", "expect <input> to be a program")],
            ),
            (
                &["parse", "p"],
                Action::Parse,
                &[("~ <input>", "print the string form of the ast <input> parses to")],
            ),
            (
                &["parsetree", "ptree"],
                Action::ParseTree,
                &[("~ <input>", "print the tree of <input>'s ast to all set displays")],
            ),
            (
                &["eval", "e"],
                Action::Eval,
                &[("~ <input>", "print the value <input> evaluates to")],
            ),
            (
                &["type", "t"],
                Action::Type,
                &[("~ <input>", "show the type of the value <input> evaluates to")],
            ),
            (
                &["trace", "tr"],
                Action::Trace,
                &[("~ <input>", "show the evaluation trace of <input> step by step")],
            ),
            (
                &["evaltree", "etree"],
                Action::EvalTree,
                &[(
                    "~ <input>",
                    "print the annotated tree of <input>'s ast to all set displays",
                )],
            ),
            (
                &["settings"],
                Action::Settings,
                &[("~", "list all settings with their current and default values")],
            ),
            (
                &["set"],
                Action::Set,
                &[
                    ("~ prompt <prompt>", "set prompt string to <prompt>"),
                    ("~ level <l>", "<l> must be: p[rogram], s[tatement], e[xpression]"),
                    (
                        "~ process <p>",
                        "<p> must be: p[arse], p[arse]tree, e[val], e[val]tree, [t]ype, [tr]ace",
                    ),
                    ("~ displays <+|-d_0...+|-d_n>", "<d_i> must be: c[ons[ole]], p[df]"),
                    ("~ verbosity <v>", "<v> must be 0, 1, 2"),
                    ("~ pfile <f>", "set file for parsetree to <f>"),
                    ("~ efile <f>", "set file for evaltree to <f>"),
                ],
            ),
            (
                &["unset"],
                Action::Unset,
                &[("~ <display>", "switch <display> off")],
            ),
            (
                &["reset"],
                Action::Reset,
                &[
                    ("~", "reset all settings"),
                    ("~ <setting>", "set <setting> to its default value"),
                ],
            ),
        ];
        for &(names, action, usage) in commands {
            for &name in names {
                set.register(
                    name,
                    Command {
                        name: names[0],
                        action,
                        usage,
                    },
                )?;
            }
        }
        Ok(set)
    }
}

fn usage_rows(command: &Command) -> Vec<[String; 3]> {
    if command.usage.is_empty() {
        return vec![[
            command.name.to_string(),
            String::new(),
            "no usage message provided".to_string(),
        ]];
    }
    command
        .usage
        .iter()
        .enumerate()
        .map(|(i, (args, message))| {
            let name = if i == 0 { command.name } else { "" };
            [name.to_string(), args.to_string(), message.to_string()]
        })
        .collect()
}

/// Left-aligned text table with a separator line under the optional header.
pub fn table(header: Option<[&str; 3]>, rows: &[[String; 3]]) -> String {
    let mut widths = [0usize; 3];
    let all = header
        .iter()
        .map(|h| h.map(str::len))
        .chain(rows.iter().map(|row| [row[0].len(), row[1].len(), row[2].len()]));
    for lengths in all {
        for (width, len) in widths.iter_mut().zip(lengths) {
            *width = (*width).max(len);
        }
    }

    let line = |cells: [&str; 3]| {
        let text = format!(
            "{:w0$}  {:w1$}  {}",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1],
        );
        format!("{}\n", text.trim_end())
    };

    let mut out = String::new();
    if let Some(header) = header {
        out.push_str(&line(header));
        out.push_str(&"-".repeat(widths[0] + widths[1] + widths[2] + 4));
        out.push('\n');
    }
    for row in rows {
        out.push_str(&line([&row[0], &row[1], &row[2]]));
    }
    out
}
