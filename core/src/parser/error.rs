use pest::error::InputLocation;

use crate::parser::{Rule, Span};

/// Parser error with the offending source location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub src: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Input does not match the grammar.
    #[error("{message}")]
    Syntax { message: String },
    /// Integer literal does not fit in an i64.
    #[error("invalid integer literal '{text}'")]
    InvalidInteger { text: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, src: &str, span: Span) -> Self {
        Self {
            kind,
            src: src.to_string(),
            span,
        }
    }

    pub(crate) fn from_pest(err: pest::error::Error<Rule>, src: &str) -> Self {
        let span = match err.location {
            InputLocation::Pos(pos) => Span::new(pos, pos),
            InputLocation::Span((start, end)) => Span::new(start, end),
        };
        let err = err.renamed_rules(|rule| rule_label(*rule).to_string());
        let message = err.variant.message().into_owned();
        Self::new(ParseErrorKind::Syntax { message }, src, span)
    }
}

fn rule_label(rule: Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::expression => "expression",
        Rule::let_statement | Rule::return_statement | Rule::expression_statement => {
            "statement"
        }
        Rule::block => "block",
        Rule::identifier => "identifier",
        Rule::integer => "integer",
        Rule::boolean => "boolean",
        Rule::call_args => "argument list",
        Rule::parameters => "parameter list",
        Rule::if_expression => "if expression",
        Rule::function_literal => "function literal",
        Rule::bang | Rule::neg => "prefix operator",
        Rule::eq
        | Rule::not_eq
        | Rule::lt
        | Rule::gt
        | Rule::add
        | Rule::sub
        | Rule::mul
        | Rule::div => "infix operator",
        Rule::kw_let => "`let`",
        Rule::kw_return => "`return`",
        Rule::kw_fn => "`fn`",
        Rule::kw_if => "`if`",
        Rule::kw_else => "`else`",
        Rule::keyword => "keyword",
        _ => "input",
    }
}
