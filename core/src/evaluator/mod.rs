//! Tree-walking evaluator with optional tracing.
//!
//! The evaluator interprets parsed programs (`Node`) and produces runtime values (`Value`)
//! allocated in the caller's arena. When tracing is enabled every node evaluation is
//! recorded in a [`Trace`], which the visualizer turns into an annotated tree.
//!
//! ## Design Principles
//!
//! - **Never panic**: runtime errors of the evaluated program are error values
//! - **Stack-safe**: depth tracking prevents stack overflow from deep recursion
//!
//! ## Example
//!
//! ```ignore
//! use evaltree_core::{evaluator, parser, scope::Scope};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let parsed = parser::parse(&arena, "let x = 2; x * 3").unwrap();
//! let traced = evaluator::eval_traced(&arena, parsed.node, Scope::new(&arena)).unwrap();
//! assert_eq!(traced.value.and_then(|v| v.as_int()), Some(6));
//! assert_eq!(traced.trace.root(), Some(parsed.node));
//! ```

mod error;
mod eval;
mod operators;
mod trace;

#[cfg(test)]
mod trace_test;

pub use error::EvalError;
pub use eval::Evaluator;
pub use trace::{Entry, Event, Exit, ScopeId, Trace};

use bumpalo::Bump;

use crate::{parser::Node, scope::Scope, values::Value};

/// Limits and switches for one evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Maximum evaluation stack depth (for recursion protection).
    pub max_depth: usize,
    /// Record a trace of every node evaluation.
    pub trace: bool,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            trace: false,
        }
    }
}

/// Result of a traced evaluation.
#[derive(Debug)]
pub struct Traced<'a> {
    pub value: Option<&'a Value<'a>>,
    pub trace: Trace<'a>,
}

/// Evaluate `node` in `scope` with default limits and no tracing.
pub fn eval<'a>(
    arena: &'a Bump,
    node: &'a Node<'a>,
    scope: &'a Scope<'a>,
) -> Result<Option<&'a Value<'a>>, EvalError> {
    Evaluator::new(arena, EvaluatorOptions::default()).eval(node, scope)
}

/// Evaluate `node` in `scope` with default limits, recording a trace.
pub fn eval_traced<'a>(
    arena: &'a Bump,
    node: &'a Node<'a>,
    scope: &'a Scope<'a>,
) -> Result<Traced<'a>, EvalError> {
    let options = EvaluatorOptions {
        trace: true,
        ..Default::default()
    };
    let mut evaluator = Evaluator::new(arena, options);
    let value = evaluator.eval(node, scope)?;
    Ok(Traced {
        value,
        trace: evaluator.into_trace(),
    })
}
