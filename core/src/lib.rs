pub mod evaluator;
pub mod parser;
pub mod scope;
pub mod values;
pub mod visualizer;

pub use evaluator::{EvalError, Evaluator, EvaluatorOptions, Trace, Traced};
pub use parser::{Level, Node, ParseError, ParsedProgram};
pub use scope::Scope;
pub use values::Value;
pub use visualizer::{Notation, Plain, Qtree, RenderOptions, Verbosity, eval_tree, parse_tree};

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_render() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
