//! Evaluation errors.
//!
//! Errors of the evaluated program itself (`type mismatch`, `identifier not found`, ...)
//! are ordinary `Value::Error` values and flow through evaluation like any other value.
//! `EvalError` is reserved for the evaluator giving up, which aborts the whole run.

/// Fatal evaluation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// Evaluation recursion depth exceeded.
    #[error("evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },
}
