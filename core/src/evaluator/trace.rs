//! Step-numbered record of an evaluation.
//!
//! Every evaluated node produces an entry event before its evaluation starts and an exit
//! event once it has produced its value. Entries and exits share one step counter, so a
//! literal evaluated at step 3 exits at step 4, and a node whose evaluation spans a whole
//! subtree exits after all of its descendants.

use core::fmt;

use crate::parser::Node;
use crate::scope::Scope;
use crate::values::Value;

/// A node evaluation starting.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub step: usize,
    pub node: &'a Node<'a>,
    pub scope: &'a Scope<'a>,
}

/// A node evaluation finishing. `value` is `None` for nodes that produce nothing (`let`).
#[derive(Debug, Clone, Copy)]
pub struct Exit<'a> {
    pub step: usize,
    pub node: &'a Node<'a>,
    pub scope: &'a Scope<'a>,
    pub value: Option<&'a Value<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Entry(Entry<'a>),
    Exit(Exit<'a>),
}

impl<'a> Event<'a> {
    pub fn step(&self) -> usize {
        match self {
            Event::Entry(entry) => entry.step,
            Event::Exit(exit) => exit.step,
        }
    }

    pub fn node(&self) -> &'a Node<'a> {
        match self {
            Event::Entry(entry) => entry.node,
            Event::Exit(exit) => exit.node,
        }
    }

    pub fn scope(&self) -> &'a Scope<'a> {
        match self {
            Event::Entry(entry) => entry.scope,
            Event::Exit(exit) => exit.scope,
        }
    }
}

/// Position of a scope in first-seen order, or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(pub Option<usize>);

impl ScopeId {
    pub const UNKNOWN: ScopeId = ScopeId(None);

    /// The numeric form, with `-1` for a scope the trace never saw.
    pub fn as_i64(self) -> i64 {
        self.0.map_or(-1, |id| id as i64)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// The events of one evaluation, indexed by step, plus the distinct scopes it touched.
#[derive(Debug, Clone, Default)]
pub struct Trace<'a> {
    events: Vec<Event<'a>>,
    scopes: Vec<&'a Scope<'a>>,
    // Step at which each entry of `scopes` was first seen.
    first_seen: Vec<usize>,
}

impl<'a> Trace<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of `node`'s evaluation and return its step.
    pub fn enter(&mut self, node: &'a Node<'a>, scope: &'a Scope<'a>) -> usize {
        let step = self.events.len();
        self.observe(scope, step);
        self.events.push(Event::Entry(Entry { step, node, scope }));
        step
    }

    /// Record the end of `node`'s evaluation and return its step.
    pub fn exit(
        &mut self,
        node: &'a Node<'a>,
        scope: &'a Scope<'a>,
        value: Option<&'a Value<'a>>,
    ) -> usize {
        let step = self.events.len();
        self.observe(scope, step);
        self.events.push(Event::Exit(Exit {
            step,
            node,
            scope,
            value,
        }));
        step
    }

    fn observe(&mut self, scope: &'a Scope<'a>, step: usize) {
        if !self.scopes.iter().any(|seen| seen.is(scope)) {
            self.scopes.push(scope);
            self.first_seen.push(step);
        }
    }

    /// Number of recorded steps (entries and exits together).
    pub fn steps(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event<'a>] {
        &self.events
    }

    pub fn entry(&self, step: usize) -> Option<&Entry<'a>> {
        match self.events.get(step)? {
            Event::Entry(entry) => Some(entry),
            Event::Exit(_) => None,
        }
    }

    pub fn exit_at(&self, step: usize) -> Option<&Exit<'a>> {
        match self.events.get(step)? {
            Event::Exit(exit) => Some(exit),
            Event::Entry(_) => None,
        }
    }

    /// All entries in step order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<'a>> {
        self.events.iter().filter_map(|event| match event {
            Event::Entry(entry) => Some(entry),
            Event::Exit(_) => None,
        })
    }

    /// All exits in step order.
    pub fn exits(&self) -> impl Iterator<Item = &Exit<'a>> {
        self.events.iter().filter_map(|event| match event {
            Event::Exit(exit) => Some(exit),
            Event::Entry(_) => None,
        })
    }

    /// Distinct scopes in the order they were first seen.
    pub fn scopes(&self) -> &[&'a Scope<'a>] {
        &self.scopes
    }

    pub fn scope_id(&self, scope: &Scope<'a>) -> ScopeId {
        ScopeId(self.scopes.iter().position(|seen| seen.is(scope)))
    }

    /// The node entered at step 0.
    pub fn root(&self) -> Option<&'a Node<'a>> {
        self.entry(0).map(|entry| entry.node)
    }

    /// The trace as it stood right after `step`.
    ///
    /// Scopes first seen later than `step` are dropped from the scope list.
    pub fn until(&self, step: usize) -> Trace<'a> {
        let end = step.saturating_add(1).min(self.events.len());
        let kept = self.first_seen.iter().take_while(|seen| **seen < end).count();
        Trace {
            events: self.events[..end].to_vec(),
            scopes: self.scopes[..kept].to_vec(),
            first_seen: self.first_seen[..kept].to_vec(),
        }
    }
}

impl fmt::Display for Trace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.events.len().saturating_sub(1).to_string().len();
        for event in &self.events {
            let scope = self.scope_id(event.scope());
            let node = event.node();
            match event {
                Event::Entry(entry) => writeln!(
                    f,
                    "{:>width$} \u{2193} e{} {}: {}",
                    entry.step,
                    scope,
                    node.type_name(),
                    OneLine(node),
                )?,
                Event::Exit(exit) => {
                    write!(
                        f,
                        "{:>width$} \u{2191} e{} {}",
                        exit.step,
                        scope,
                        node.type_name(),
                    )?;
                    match exit.value {
                        Some(value) => writeln!(f, " => {}", OneLine(value))?,
                        None => writeln!(f)?,
                    }
                }
            }
        }
        Ok(())
    }
}

/// Display adapter that folds line breaks into spaces.
struct OneLine<'t, T>(&'t T);

impl<T: fmt::Display> fmt::Display for OneLine<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.to_string();
        let mut words = text.split('\n').map(str::trim).filter(|w| !w.is_empty());
        if let Some(first) = words.next() {
            f.write_str(first)?;
            for word in words {
                write!(f, " {}", word)?;
            }
        }
        Ok(())
    }
}
