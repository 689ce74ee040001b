//! Target notations for rendered trees.
//!
//! Both backends share the bracketed layout `[.{label} <children> ]`; a [`Notation`]
//! decides how annotations, labels and leaf text are spelled inside it.

use crate::evaluator::ScopeId;

pub trait Notation {
    /// Wrap a finished tree.
    fn tree(&self, body: &str) -> String;

    /// Annotation for a node entered at `step`, placed left of the node label.
    fn entry(&self, step: usize, scope: ScopeId) -> String;

    /// Annotation for a node exited at `step`, placed right of the node label.
    fn exit(&self, step: usize, scope: ScopeId) -> String;

    /// Label of a structural field (`Value`, `Statements`, ...).
    fn field(&self, name: &str) -> String;

    /// Emphasized label, used for runtime values.
    fn strong(&self, text: &str) -> String;

    /// Arbitrary source or message text made safe for the notation.
    fn text(&self, raw: &str) -> String;

    /// Operator token made safe for the notation.
    fn operator(&self, op: &str) -> String;

    /// Id of a shared value, appended to its label.
    fn subscript(&self, id: usize) -> String;

    /// Labeled edge introducing the following subtree.
    fn edge(&self, label: &str) -> String;

    /// Compact annotation hanging under a label.
    fn roof(&self, text: &str) -> String;

    fn line_break(&self) -> &'static str;

    /// Marker for a missing node or value.
    fn empty(&self) -> &'static str;

    /// Marker for a value already being expanded further up the tree.
    fn cycle(&self) -> &'static str;
}

/// LaTeX `tikz-qtree` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Qtree;

impl Qtree {
    /// Wrap a rendered tree into a standalone LaTeX document.
    pub fn document(tree: &str) -> String {
        format!(
            "\\documentclass[tikz,border=10pt]{{standalone}}\n\
             \\usepackage{{tikz-qtree}}\n\
             \\begin{{document}}\n\
             \\begin{{tikzpicture}}[level distance=40pt]\n\
             {}\
             \\end{{tikzpicture}}\n\
             \\end{{document}}\n",
            tree
        )
    }
}

impl Notation for Qtree {
    fn tree(&self, body: &str) -> String {
        format!("\\Tree{}\n", body)
    }

    fn entry(&self, step: usize, scope: ScopeId) -> String {
        format!("{},e$_{{{}}}\\downarrow$ ", step, scope)
    }

    fn exit(&self, step: usize, scope: ScopeId) -> String {
        format!(" $\\uparrow${},e$_{{{}}}$", step, scope)
    }

    fn field(&self, name: &str) -> String {
        format!("\\textit{{{}}}", self.text(name))
    }

    fn strong(&self, text: &str) -> String {
        format!("\\textbf{{{}}}", text)
    }

    fn text(&self, raw: &str) -> String {
        let mut escaped = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                '\\' => escaped.push_str("\\textbackslash{}"),
                '{' | '}' | '$' | '&' | '#' | '_' | '%' => {
                    escaped.push('\\');
                    escaped.push(c);
                }
                '^' => escaped.push_str("\\^{}"),
                '~' => escaped.push_str("\\~{}"),
                '<' => escaped.push_str("$<$"),
                '>' => escaped.push_str("$>$"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    fn operator(&self, op: &str) -> String {
        match op {
            "<" => "$<$".to_string(),
            ">" => "$>$".to_string(),
            "!=" => "$\\neq$".to_string(),
            "-" => "$-$".to_string(),
            "+" => "$+$".to_string(),
            "*" => "$\\ast$".to_string(),
            other => self.text(other),
        }
    }

    fn subscript(&self, id: usize) -> String {
        format!("$_{{{}}}$", id)
    }

    fn edge(&self, label: &str) -> String {
        format!("\\edge node[auto=left]{{\\tiny {}}};", label)
    }

    fn roof(&self, text: &str) -> String {
        format!("\\edge[roof]; {{\\small {}}}", text)
    }

    fn line_break(&self) -> &'static str {
        "\\\\"
    }

    fn empty(&self) -> &'static str {
        "$\\emptyset$"
    }

    fn cycle(&self) -> &'static str {
        "\\ldots"
    }
}

/// Unicode text output for terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Notation for Plain {
    fn tree(&self, body: &str) -> String {
        format!("{}\n", body)
    }

    fn entry(&self, step: usize, scope: ScopeId) -> String {
        format!("{},e{}\u{2193} ", step, subscript_digits(scope.as_i64()))
    }

    fn exit(&self, step: usize, scope: ScopeId) -> String {
        format!(" \u{2191}{},e{}", step, subscript_digits(scope.as_i64()))
    }

    fn field(&self, name: &str) -> String {
        format!("{}:", name)
    }

    fn strong(&self, text: &str) -> String {
        text.to_string()
    }

    fn text(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn operator(&self, op: &str) -> String {
        op.to_string()
    }

    fn subscript(&self, id: usize) -> String {
        subscript_digits(id as i64)
    }

    fn edge(&self, label: &str) -> String {
        format!("<{}>", label)
    }

    fn roof(&self, text: &str) -> String {
        format!("{{{}}}", text)
    }

    fn line_break(&self) -> &'static str {
        " / "
    }

    fn empty(&self) -> &'static str {
        "\u{2205}"
    }

    fn cycle(&self) -> &'static str {
        "\u{2026}"
    }
}

fn subscript_digits(n: i64) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '\u{208b}',
            digit => char::from_u32(0x2080 + digit.to_digit(10).unwrap_or(0)).unwrap_or(digit),
        })
        .collect()
}

/// Shorten primitive type names inside runtime error messages.
pub(crate) fn abbreviate_types(message: &str) -> String {
    message.replace("INTEGER", "INT").replace("BOOLEAN", "BOOL")
}

/// Error message as one leaf: each `:` becomes a line break.
pub(crate) fn error_message(notation: &dyn Notation, message: &str) -> String {
    abbreviate_types(message)
        .split(':')
        .map(|part| notation.text(part.trim()))
        .collect::<Vec<_>>()
        .join(notation.line_break())
}
