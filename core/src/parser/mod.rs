mod ast;
pub mod error;
#[allow(clippy::module_inception)]
pub mod parser;
mod syntax;

// Re-export the parser and rule enum for external use
pub use parser::{Level, MonkeyParser, Rule, parse, parse_at};

pub use ast::{Node, ParsedProgram};
pub use error::{ParseError, ParseErrorKind};
pub use syntax::{AnnotatedSource, InfixOp, PrefixOp, Span};


#[cfg(test)]
mod precedence_test;
