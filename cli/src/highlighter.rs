use nu_ansi_term::{Color, Style};
use reedline::StyledText;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Plain,
    Command,
    Keyword,
    Constant,
    Number,
    Operator,
}

impl Class {
    fn style(self) -> Style {
        match self {
            Class::Plain => Style::new().fg(Color::White),
            Class::Command => Style::new().fg(Color::Blue).bold(),
            Class::Keyword => Style::new().fg(Color::Magenta),
            Class::Constant | Class::Number => Style::new().fg(Color::Cyan),
            Class::Operator => Style::new().fg(Color::Yellow),
        }
    }
}

const KEYWORDS: &[&str] = &["fn", "let", "if", "else", "return"];

/// Split a line into classified runs. Concatenating the runs gives back the line.
fn classify(line: &str) -> Vec<(Class, &str)> {
    let mut runs = Vec::new();
    let mut rest = line;

    if let Some(command) = line.strip_prefix(':') {
        let end = command.find(char::is_whitespace).unwrap_or(command.len()) + 1;
        runs.push((Class::Command, &line[..end]));
        rest = &line[end..];
    }

    while let Some(c) = rest.chars().next() {
        let len = if c.is_ascii_alphabetic() || c == '_' {
            rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len())
        } else if c.is_ascii_digit() {
            rest.find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len())
        } else {
            c.len_utf8()
        };
        let (word, tail) = rest.split_at(len);
        let class = match word {
            w if KEYWORDS.contains(&w) => Class::Keyword,
            "true" | "false" => Class::Constant,
            w if w.starts_with(|c: char| c.is_ascii_digit()) => Class::Number,
            "+" | "-" | "*" | "/" | "!" | "<" | ">" | "=" => Class::Operator,
            _ => Class::Plain,
        };
        match runs.last_mut() {
            Some((last, text)) if *last == class && class == Class::Plain => {
                *text = &line[line.len() - rest.len() - text.len()..line.len() - tail.len()];
            }
            _ => runs.push((class, word)),
        }
        rest = tail;
    }
    runs
}

/// Colors commands, keywords and literals as they are typed.
pub struct Highlighter;

impl reedline::Highlighter for Highlighter {
    fn highlight(&self, line: &str, _: usize) -> StyledText {
        let mut output = StyledText::new();
        for (class, text) in classify(line) {
            output.push((class.style(), text.to_string()));
        }
        output
    }
}
