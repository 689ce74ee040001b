use std::io::Write;
use std::path::Path;

use bumpalo::Bump;
use evaltree::{
    Error, Level, Plain, Qtree, RenderOptions, Scope, eval_tree, parse_tree, parser,
    render_error_to, render_error_to_string_no_color,
};
use tracing::debug;

use crate::commands::{Action, CommandError, CommandSet, table};
use crate::settings::{Process, Settings};

/// Whether the session keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An interactive session: settings, commands and a global scope that persists across
/// inputs until `clear`.
pub struct Session<'a, W: Write> {
    arena: &'a Bump,
    globals: &'a Scope<'a>,
    pub settings: Settings,
    pub commands: CommandSet,
    out: W,
    color: bool,
    // Lines collected by `paste`, run once a blank line arrives.
    paste: Option<String>,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(arena: &'a Bump, settings: Settings, out: W) -> Result<Self, CommandError> {
        Ok(Self {
            arena,
            globals: Scope::new(arena),
            settings,
            commands: CommandSet::standard()?,
            out,
            color: false,
            paste: None,
        })
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Handle one line of input. Lines starting with `:` are commands; anything else runs
    /// through the configured process.
    pub fn handle(&mut self, line: &str) -> Result<Flow, CommandError> {
        if let Some(buffer) = &mut self.paste {
            if !line.trim().is_empty() {
                buffer.push_str(line);
                buffer.push('\n');
                return Ok(Flow::Continue);
            }
            let buffer = self.paste.take().unwrap_or_default();
            if !buffer.trim().is_empty() {
                self.process(self.settings.process, self.settings.level, &buffer)?;
            }
            return Ok(Flow::Continue);
        }

        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let Some(command_line) = line.strip_prefix(':') else {
            self.process(self.settings.process, self.settings.level, line)?;
            return Ok(Flow::Continue);
        };

        let (name, rest) = match command_line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command_line, ""),
        };
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| CommandError::Unknown(name.to_string()))?;
        let (action, command_name) = (command.action, command.name);
        debug!(command = command_name, "Running command");

        let input = || {
            if rest.is_empty() {
                Err(CommandError::MissingInput(command_name.to_string()))
            } else {
                Ok(rest)
            }
        };

        match action {
            Action::Help if rest.is_empty() => write!(self.out, "{}", self.commands.menu())?,
            Action::Help => {
                let name = rest.trim_start_matches(':');
                let usage = self
                    .commands
                    .usage(name)
                    .ok_or_else(|| CommandError::Unknown(name.to_string()))?;
                write!(self.out, "{}", usage)?;
            }
            Action::Quit => return Ok(Flow::Quit),
            Action::List => self.list()?,
            Action::Clear => self.globals = Scope::new(self.arena),
            Action::ClearScreen => write!(self.out, "\x1b[2J\x1b[H")?,
            Action::Paste if rest.is_empty() => self.paste = Some(String::new()),
            Action::Paste => self.paste = Some(format!("{}\n", rest)),
            Action::Expression => self.at_level(Level::Expression, input()?)?,
            Action::Statement => self.at_level(Level::Statement, input()?)?,
            Action::Program => self.at_level(Level::Program, input()?)?,
            Action::Parse => self.run(Process::Parse, input()?)?,
            Action::ParseTree => self.run(Process::ParseTree, input()?)?,
            Action::Eval => self.run(Process::Eval, input()?)?,
            Action::Type => self.run(Process::Type, input()?)?,
            Action::Trace => self.run(Process::Trace, input()?)?,
            Action::EvalTree => self.run(Process::EvalTree, input()?)?,
            Action::Settings => {
                let rows = self.settings.rows();
                write!(
                    self.out,
                    "{}",
                    table(Some(["Setting", "Current", "Default"]), &rows)
                )?;
            }
            Action::Set => {
                let mut words = input()?.split_whitespace();
                let name = words.next().unwrap_or_default();
                let args: Vec<&str> = words.collect();
                self.settings.set(name, &args)?;
            }
            Action::Unset => self.settings.unset(input()?)?,
            Action::Reset => self.settings.reset((!rest.is_empty()).then_some(rest))?,
        }
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> Result<(), CommandError> {
        for (name, value) in self.globals.bindings() {
            let inspect = value.to_string().replace('\n', " ");
            writeln!(self.out, "{}: {} = {}", name, value.type_name(), inspect)?;
        }
        Ok(())
    }

    /// Whether a `paste` is collecting lines.
    pub fn is_pasting(&self) -> bool {
        self.paste.is_some()
    }

    fn run(&mut self, process: Process, input: &str) -> Result<(), CommandError> {
        self.process(process, self.settings.level, input)
    }

    /// Run the configured process with `level` in place of the configured level.
    fn at_level(&mut self, level: Level, input: &str) -> Result<(), CommandError> {
        self.process(self.settings.process, level, input)
    }

    fn process(&mut self, process: Process, level: Level, input: &str) -> Result<(), CommandError> {
        let source = self.arena.alloc_str(input);

        match process {
            Process::Parse | Process::ParseTree => {
                let parsed = match parser::parse_at(self.arena, source, level) {
                    Ok(parsed) => parsed,
                    Err(e) => return self.report(&Error::from(e)),
                };
                if process == Process::Parse {
                    writeln!(self.out, "{}", parsed.node)?;
                    return Ok(());
                }
                let pfile = self.settings.pfile.clone();
                self.display(&pfile, |options| parse_tree(parsed.node, options))
            }
            Process::Eval | Process::Type | Process::Trace | Process::EvalTree => {
                let run = match evaltree::run(self.arena, source, level, self.globals) {
                    Ok(run) => run,
                    Err(e) => return self.report(&e),
                };
                match process {
                    Process::Eval => {
                        if let Some(value) = run.value() {
                            writeln!(self.out, "{}", value)?;
                        }
                    }
                    Process::Type => {
                        let name = run.value().map_or("NONE", |value| value.type_name());
                        writeln!(self.out, "{}", name)?;
                    }
                    Process::Trace => write!(self.out, "{}", run.traced.trace)?,
                    _ => {
                        let efile = self.settings.efile.clone();
                        let trace = &run.traced.trace;
                        self.display(&efile, |options| eval_tree(trace, options))?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Send a rendered tree to every enabled display.
    fn display(
        &mut self,
        file: &Path,
        render: impl Fn(&RenderOptions<'_>) -> String,
    ) -> Result<(), CommandError> {
        let verbosity = self.settings.verbosity;
        if self.settings.displays.console {
            let tree = render(&RenderOptions {
                verbosity,
                notation: &Plain,
            });
            write!(self.out, "{}", tree)?;
        }
        if self.settings.displays.pdf {
            let tree = render(&RenderOptions {
                verbosity,
                notation: &Qtree,
            });
            std::fs::write(file, Qtree::document(&tree))?;
            debug!(file = %file.display(), "Wrote LaTeX tree");
            writeln!(self.out, "wrote {}", file.display())?;
        }
        Ok(())
    }

    fn report(&mut self, error: &Error) -> Result<(), CommandError> {
        if self.color {
            render_error_to(error, &mut self.out)?;
        } else {
            write!(self.out, "{}", render_error_to_string_no_color(error))?;
        }
        Ok(())
    }
}
