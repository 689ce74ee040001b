//! Error rendering using ariadne
//!
//! Parse errors are shown as a report over the offending source, with the failing span
//! labeled. Evaluation errors carry no source location and are printed as one line.

use crate::{Error, ParseError, ParseErrorKind};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

const SOURCE_ID: &str = "<input>";

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use evaltree::{Level, Scope, render_error};
/// use bumpalo::Bump;
///
/// let arena = Bump::new();
/// if let Err(e) = evaltree::run(&arena, "let = 5;", Level::Program, Scope::new(&arena)) {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for UIs and logs)
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Parse(parse_error) => render_parse_error(parse_error, writer, use_color),
        Error::Eval(eval_error) => writeln!(writer, "Evaluation aborted: {}", eval_error),
    }
}

fn render_parse_error(
    error: &ParseError,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let title = match &error.kind {
        ParseErrorKind::Syntax { .. } => "Syntax error",
        ParseErrorKind::InvalidInteger { .. } => "Invalid integer literal",
    };

    // Widen empty spans to one character so the label has something to point at.
    let len = error.src.len();
    let start = error.span.0.start.min(len);
    let end = error.span.0.end.clamp(start, len).max((start + 1).min(len));
    let span = start..end;

    Report::build(ReportKind::Error, (SOURCE_ID, span.clone()))
        .with_message(title)
        .with_config(ariadne::Config::default().with_color(use_color))
        .with_label(
            Label::new((SOURCE_ID, span))
                .with_message(error.kind.to_string())
                .with_color(colors.next()),
        )
        .finish()
        .write((SOURCE_ID, Source::from(error.src.as_str())), &mut *writer)
}
