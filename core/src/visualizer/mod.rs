//! Renders parsed programs and evaluation traces as bracketed trees.
//!
//! [`eval_tree`] walks the AST from the trace's root node. Each node is labeled with the
//! steps at which it was entered (left) and exited (right) together with the id of the
//! scope it was evaluated in, and every exit hangs the produced value off the node through
//! an edge labeled `Val <step>`. Nodes are correlated with trace events by identity, so a
//! node evaluated several times appears once with several annotations.
//!
//! The amount of detail is controlled by [`Verbosity`]:
//!
//! - `0`: every value is expanded in full.
//! - `1`: booleans, null and errors collapse into single leaves.
//! - `2`: values reachable from more than one place get an id on first sight and are
//!   abbreviated to a back-reference afterwards.
//!
//! ## Example
//!
//! ```ignore
//! let parsed = parser::parse(&arena, "let x = 5; x")?;
//! let traced = evaluator::eval_traced(&arena, parsed.node, Scope::new(&arena))?;
//! let latex = visualizer::eval_tree(&traced.trace, &RenderOptions::default());
//! ```

mod markup;
mod node;
mod registry;
mod value;

#[cfg(test)]
mod visualizer_test;

pub use markup::{Notation, Plain, Qtree};
pub use registry::ScopeRegistry;

use core::fmt;

use tracing::debug;

use crate::{
    evaluator::{Event, Trace},
    parser::Node,
    values::Value,
};

const INDENT: &str = "  ";

/// How much detail rendered values carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Verbosity(pub u8);

impl Verbosity {
    pub const FULL: Verbosity = Verbosity(0);
    pub const COLLAPSED: Verbosity = Verbosity(1);
    pub const SHARED: Verbosity = Verbosity(2);

    /// Booleans, null and errors render as single leaves.
    pub fn collapses_leaves(self) -> bool {
        self.0 >= 1
    }

    /// Values reachable from several places are rendered once and referenced afterwards.
    pub fn shares_values(self) -> bool {
        self.0 >= 2
    }
}

impl From<u8> for Verbosity {
    fn from(level: u8) -> Self {
        Verbosity(level)
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy)]
pub struct RenderOptions<'n> {
    pub verbosity: Verbosity,
    pub notation: &'n dyn Notation,
}

impl Default for RenderOptions<'static> {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            notation: &Qtree,
        }
    }
}

impl fmt::Debug for RenderOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

/// Render the evaluation recorded in `trace`, starting from the node entered first.
pub fn eval_tree(trace: &Trace<'_>, options: &RenderOptions<'_>) -> String {
    debug!(
        steps = trace.steps(),
        scopes = trace.scopes().len(),
        verbosity = options.verbosity.0,
        "Rendering evaluation tree"
    );
    match trace.root() {
        Some(root) => Renderer::new(trace.events(), ScopeRegistry::new(trace.scopes()), options)
            .render(root),
        None => options.notation.tree(options.notation.empty()),
    }
}

/// Render the syntax tree under `node` without any evaluation annotations.
pub fn parse_tree<'a>(node: &'a Node<'a>, options: &RenderOptions<'_>) -> String {
    debug!(node = node.type_name(), "Rendering parse tree");
    Renderer::new(&[], ScopeRegistry::empty(), options).render(node)
}

/// State of one render call.
///
/// `shared` is the dedup table: values that received an id, in id order. It lives only as
/// long as the renderer, so separate calls never see each other's ids.
struct Renderer<'r, 'a> {
    events: &'r [Event<'a>],
    registry: ScopeRegistry<'r, 'a>,
    notation: &'r dyn Notation,
    verbosity: Verbosity,
    shared: Vec<&'a Value<'a>>,
    // Bodies of the function values currently being expanded, innermost last.
    expanding: Vec<&'a Node<'a>>,
    out: String,
}

impl<'r, 'a> Renderer<'r, 'a> {
    fn new(
        events: &'r [Event<'a>],
        registry: ScopeRegistry<'r, 'a>,
        options: &RenderOptions<'r>,
    ) -> Self {
        Self {
            events,
            registry,
            notation: options.notation,
            verbosity: options.verbosity,
            shared: Vec::new(),
            expanding: Vec::new(),
            out: String::new(),
        }
    }

    fn render(mut self, root: &'a Node<'a>) -> String {
        self.node(root, 0);
        self.notation.tree(&self.out)
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }

    /// Start a new line at `depth` holding `text`.
    fn line(&mut self, depth: usize, text: &str) {
        self.out.push('\n');
        self.indent(depth);
        self.out.push_str(text);
    }

    fn open_field(&mut self, name: &str, depth: usize) {
        let label = open(&self.notation.field(name));
        self.line(depth, &label);
    }

    fn close(&mut self, depth: usize) {
        self.line(depth, "]");
    }

    /// A field whose only child is a leaf.
    fn leaf_field(&mut self, name: &str, text: &str, depth: usize) {
        self.open_field(name, depth);
        self.line(depth + 1, text);
        self.close(depth);
    }
}

fn open(label: &str) -> String {
    format!("[.{{{}}}", label)
}
