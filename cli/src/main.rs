mod commands;
mod highlighter;
mod session;
mod settings;
mod validator;

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use bumpalo::Bump;
use clap::Parser;
use evaltree::{Level, Verbosity};
use miette::{IntoDiagnostic, Result};
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, DescriptionMode, EditCommand, Emacs,
    IdeMenu, KeyCode, KeyModifiers, Keybindings, MenuBuilder, Reedline, ReedlineEvent,
    ReedlineMenu, Signal, default_emacs_keybindings,
};

use crate::session::{Flow, Session};
use crate::settings::{Process, Settings};

/// evaltree - draw annotated evaluation trees of Monkey programs
#[derive(Parser, Debug)]
#[command(name = "evaltree")]
#[command(about = "Evaluate Monkey programs and draw their evaluation trees", long_about = None)]
struct Args {
    /// Tree verbosity: 0 expands every value, 1 collapses leaves, 2 also shares values
    #[arg(long, value_parser = settings::parse_verbosity)]
    verbosity: Option<Verbosity>,

    /// Grammar level of the input: program, statement or expression
    #[arg(long, value_parser = settings::parse_level)]
    level: Option<Level>,

    /// What plain input is run through: parse, parsetree, eval, evaltree, type, trace
    #[arg(long, value_parser = settings::parse_process)]
    process: Option<Process>,

    /// Also write LaTeX trees to this file
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Input to run (if not provided, starts a session on stdin)
    expression: Option<String>,
}

impl Args {
    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(verbosity) = self.verbosity {
            settings.verbosity = verbosity;
        }
        if let Some(level) = self.level {
            settings.level = level;
        }
        if let Some(process) = self.process {
            settings.process = process;
        }
        if let Some(file) = &self.pdf {
            settings.displays.pdf = true;
            settings.pfile = file.clone();
            settings.efile = file.clone();
        }
        settings
    }
}

fn add_menu_keybindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn setup_reedline(commands: Vec<String>) -> Reedline {
    let completer = Box::new({
        let mut completions = DefaultCompleter::with_inclusions(&[':']);
        completions.insert(commands);
        completions
    });

    let ide_menu = IdeMenu::default()
        .with_name("completion_menu")
        .with_min_completion_width(0)
        .with_max_completion_width(50)
        .with_max_completion_height(u16::MAX)
        .with_padding(0)
        .with_cursor_offset(0)
        .with_description_mode(DescriptionMode::PreferRight)
        .with_min_description_width(0)
        .with_max_description_width(50)
        .with_description_offset(1)
        .with_correct_cursor_pos(false);

    let mut keybindings = default_emacs_keybindings();
    add_menu_keybindings(&mut keybindings);

    Reedline::create()
        .with_highlighter(Box::new(highlighter::Highlighter))
        .with_validator(Box::new(validator::BracketValidator))
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(Box::new(ide_menu)))
        .with_edit_mode(Box::new(Emacs::new(keybindings)))
}

fn main() -> Result<()> {
    let args = Args::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the log level, WARN by default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let arena = Bump::new();
    let is_interactive = atty::is(atty::Stream::Stdout);
    let mut session = Session::new(&arena, args.settings(), std::io::stdout())
        .into_diagnostic()?
        .with_color(is_interactive);

    if let Some(expression) = &args.expression {
        session.handle(expression).into_diagnostic()?;
        return Ok(());
    }

    if atty::is(atty::Stream::Stdin) {
        let mut names: Vec<String> = session
            .commands
            .names()
            .map(|name| format!(":{}", name))
            .collect();
        names.sort();
        let mut line_editor = setup_reedline(names);

        println!("evaltree session - type :help for commands (Ctrl+D or Ctrl+C to exit)");

        loop {
            let left = if session.is_pasting() {
                "...".to_string()
            } else {
                session.settings.prompt.clone()
            };
            let prompt = DefaultPrompt::new(
                DefaultPromptSegment::Basic(left),
                DefaultPromptSegment::Empty,
            );
            let signal = match line_editor.read_line(&prompt) {
                Ok(signal) => signal,
                Err(e) => {
                    eprintln!("Reedline error: {e}");
                    return Ok(());
                }
            };

            match signal {
                Signal::Success(buffer) => match session.handle(&buffer) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("{e}"),
                },
                Signal::CtrlD | Signal::CtrlC => break,
            }
        }
        println!("\nGoodbye!");
    } else {
        // Pipe/stdin mode
        let reader = BufReader::new(std::io::stdin().lock());
        for line in reader.lines() {
            let line = line.into_diagnostic()?;
            match session.handle(&line) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => eprintln!("{e}"),
            }
        }
    }

    std::io::stdout().flush().into_diagnostic()?;
    Ok(())
}
