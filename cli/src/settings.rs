use std::fmt;
use std::path::PathBuf;

use evaltree::{Level, Verbosity};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown setting '{0}'")]
    Unknown(String),
    #[error("setting '{0}' needs a value")]
    MissingValue(&'static str),
    #[error("invalid level '{0}': must be p[rogram], s[tatement], e[xpression]")]
    InvalidLevel(String),
    #[error("invalid process '{0}': must be p[arse], p[arse]tree, e[val], e[val]tree, [t]ype, [tr]ace")]
    InvalidProcess(String),
    #[error("invalid verbosity '{0}': must be 0, 1, 2")]
    InvalidVerbosity(String),
    #[error("invalid display '{0}': must be +|-c[ons[ole]] or +|-p[df]")]
    InvalidDisplay(String),
    #[error("setting '{0}' cannot be unset")]
    NotUnsettable(String),
}

/// What plain input (without a leading command) is run through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Process {
    Parse,
    ParseTree,
    Eval,
    EvalTree,
    Type,
    Trace,
}

impl Process {
    pub fn as_str(self) -> &'static str {
        match self {
            Process::Parse => "parse",
            Process::ParseTree => "parsetree",
            Process::Eval => "eval",
            Process::EvalTree => "evaltree",
            Process::Type => "type",
            Process::Trace => "trace",
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn parse_level(text: &str) -> Result<Level, SettingsError> {
    match text.to_ascii_lowercase().as_str() {
        "p" | "program" => Ok(Level::Program),
        "s" | "statement" => Ok(Level::Statement),
        "e" | "expression" => Ok(Level::Expression),
        _ => Err(SettingsError::InvalidLevel(text.to_string())),
    }
}

pub fn parse_process(text: &str) -> Result<Process, SettingsError> {
    match text.to_ascii_lowercase().as_str() {
        "p" | "parse" => Ok(Process::Parse),
        "ptree" | "parsetree" => Ok(Process::ParseTree),
        "e" | "eval" => Ok(Process::Eval),
        "etree" | "evaltree" => Ok(Process::EvalTree),
        "t" | "type" => Ok(Process::Type),
        "tr" | "trace" => Ok(Process::Trace),
        _ => Err(SettingsError::InvalidProcess(text.to_string())),
    }
}

pub fn parse_verbosity(text: &str) -> Result<Verbosity, SettingsError> {
    match text.parse::<u8>() {
        Ok(level @ 0..=2) => Ok(Verbosity(level)),
        _ => Err(SettingsError::InvalidVerbosity(text.to_string())),
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Program => "program",
        Level::Statement => "statement",
        Level::Expression => "expression",
    }
}

/// Where rendered trees are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Displays {
    pub console: bool,
    pub pdf: bool,
}

impl fmt::Display for Displays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.console, self.pdf) {
            (true, true) => f.write_str("console, pdf"),
            (true, false) => f.write_str("console"),
            (false, true) => f.write_str("pdf"),
            (false, false) => f.write_str("none"),
        }
    }
}

/// Session configuration edited with `set`, `unset` and `reset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub prompt: String,
    pub level: Level,
    pub process: Process,
    pub verbosity: Verbosity,
    pub displays: Displays,
    pub pfile: PathBuf,
    pub efile: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: ">> ".to_string(),
            level: Level::Program,
            process: Process::Eval,
            verbosity: Verbosity::FULL,
            displays: Displays {
                console: true,
                pdf: false,
            },
            pfile: PathBuf::from("parsetree.tex"),
            efile: PathBuf::from("evaltree.tex"),
        }
    }
}

const NAMES: &[&str] = &[
    "prompt",
    "level",
    "process",
    "verbosity",
    "displays",
    "pfile",
    "efile",
];

impl Settings {
    /// Apply `set <name> <value...>`.
    pub fn set(&mut self, name: &str, args: &[&str]) -> Result<(), SettingsError> {
        let name = canonical(name)?;
        if name == "displays" {
            if args.is_empty() {
                return Err(SettingsError::MissingValue(name));
            }
            return args.iter().try_for_each(|arg| self.toggle_display(arg));
        }
        let value = match args {
            [] => return Err(SettingsError::MissingValue(name)),
            _ => args.join(" "),
        };
        match name {
            // The prompt keeps a trailing space so input does not touch it.
            "prompt" => self.prompt = format!("{} ", value.trim_end()),
            "level" => self.level = parse_level(&value)?,
            "process" => self.process = parse_process(&value)?,
            "verbosity" => self.verbosity = parse_verbosity(&value)?,
            "pfile" => self.pfile = PathBuf::from(value),
            "efile" => self.efile = PathBuf::from(value),
            _ => return Err(SettingsError::Unknown(name.to_string())),
        }
        Ok(())
    }

    /// Apply `unset <name>`: switches a display off.
    pub fn unset(&mut self, name: &str) -> Result<(), SettingsError> {
        match display_name(name) {
            Some("console") => self.displays.console = false,
            Some(_) => self.displays.pdf = false,
            None if NAMES.contains(&name) => {
                return Err(SettingsError::NotUnsettable(name.to_string()));
            }
            None => return Err(SettingsError::Unknown(name.to_string())),
        }
        Ok(())
    }

    /// Apply `reset [name]`: restores one setting, or all when `name` is absent.
    pub fn reset(&mut self, name: Option<&str>) -> Result<(), SettingsError> {
        let defaults = Settings::default();
        let Some(name) = name else {
            *self = defaults;
            return Ok(());
        };
        match canonical(name)? {
            "prompt" => self.prompt = defaults.prompt,
            "level" => self.level = defaults.level,
            "process" => self.process = defaults.process,
            "verbosity" => self.verbosity = defaults.verbosity,
            "displays" => self.displays = defaults.displays,
            "pfile" => self.pfile = defaults.pfile,
            _ => self.efile = defaults.efile,
        }
        Ok(())
    }

    fn toggle_display(&mut self, arg: &str) -> Result<(), SettingsError> {
        let (on, rest) = match arg.split_at_checked(1) {
            Some(("+", rest)) => (true, rest),
            Some(("-", rest)) => (false, rest),
            _ => (true, arg),
        };
        match display_name(rest) {
            Some("console") => self.displays.console = on,
            Some(_) => self.displays.pdf = on,
            None => return Err(SettingsError::InvalidDisplay(arg.to_string())),
        }
        Ok(())
    }

    /// Current and default value of every setting, one row each.
    pub fn rows(&self) -> Vec<[String; 3]> {
        let defaults = Settings::default();
        let row = |name: &str, current: String, default: String| {
            [name.to_string(), current, default]
        };
        vec![
            row("prompt", format!("{:?}", self.prompt), format!("{:?}", defaults.prompt)),
            row(
                "level",
                level_name(self.level).to_string(),
                level_name(defaults.level).to_string(),
            ),
            row("process", self.process.to_string(), defaults.process.to_string()),
            row(
                "verbosity",
                self.verbosity.to_string(),
                defaults.verbosity.to_string(),
            ),
            row("displays", self.displays.to_string(), defaults.displays.to_string()),
            row(
                "pfile",
                self.pfile.display().to_string(),
                defaults.pfile.display().to_string(),
            ),
            row(
                "efile",
                self.efile.display().to_string(),
                defaults.efile.display().to_string(),
            ),
        ]
    }
}

fn canonical(name: &str) -> Result<&'static str, SettingsError> {
    NAMES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| SettingsError::Unknown(name.to_string()))
}

fn display_name(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "c" | "cons" | "console" => Some("console"),
        "p" | "pdf" => Some("pdf"),
        _ => None,
    }
}
