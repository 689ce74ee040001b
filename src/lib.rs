//! evaltree - annotated evaluation trees for a small interpreted language
//!
//! # Overview
//!
//! A program is parsed, evaluated by a tracing tree-walking interpreter, and the
//! recorded trace is drawn as a bracketed tree: every AST node carries the steps at
//! which it was entered and exited, the scope it ran in, and the values it produced.
//! The default notation is LaTeX `tikz-qtree`; a plain Unicode notation is available
//! for terminals.
//!
//! # Quick Start
//!
//! ```ignore
//! use evaltree::{Level, RenderOptions, Scope};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let globals = Scope::new(&arena);
//!
//! let run = evaltree::run(&arena, "let x = 2; x * 3", Level::Program, globals).unwrap();
//! assert_eq!(run.value().unwrap().to_string(), "6");
//!
//! let latex = evaltree::eval_tree(&run.traced.trace, &RenderOptions::default());
//! assert!(latex.starts_with("\\Tree"));
//! ```

use bumpalo::Bump;

pub use evaltree_core::{
    evaluator::{self, EvalError, Evaluator, EvaluatorOptions, ScopeId, Trace, Traced},
    parser::{self, Level, Node, ParseError, ParseErrorKind, ParsedProgram, Span},
    scope::{self, Scope},
    values::{self, Function, Value},
    visualizer::{self, Notation, Plain, Qtree, RenderOptions, Verbosity, eval_tree, parse_tree},
};

pub mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

/// Anything that can go wrong between source text and a finished evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// A parsed program together with its traced evaluation.
#[derive(Debug)]
pub struct Run<'a> {
    pub parsed: ParsedProgram<'a>,
    pub traced: Traced<'a>,
}

impl<'a> Run<'a> {
    /// The value the program evaluated to, if any.
    pub fn value(&self) -> Option<&'a Value<'a>> {
        self.traced.value
    }
}

/// Parse `source` at `level` and evaluate it in `scope` with tracing enabled.
///
/// Bindings made by the program stay in `scope`, so a session can keep one global scope
/// across several runs.
pub fn run<'a>(
    arena: &'a Bump,
    source: &str,
    level: Level,
    scope: &'a Scope<'a>,
) -> Result<Run<'a>, Error> {
    let source = arena.alloc_str(source);
    let parsed = parser::parse_at(arena, source, level)?;
    let traced = evaluator::eval_traced(arena, parsed.node, scope)?;
    Ok(Run { parsed, traced })
}
