use tracing::trace;

use crate::evaluator::Event;
use crate::values::Value;
use crate::visualizer::{Renderer, markup, open};

impl<'r, 'a> Renderer<'r, 'a> {
    /// Render a produced value at `depth`. `None` renders as the empty marker.
    pub(super) fn value(&mut self, value: Option<&'a Value<'a>>, depth: usize) {
        let Some(value) = value else {
            self.indent(depth);
            self.out.push_str(self.notation.empty());
            return;
        };

        let mut label = self.notation.strong(&self.notation.text(value.type_name()));

        if self.verbosity.shares_values()
            && !matches!(value, Value::Boolean(_) | Value::Null)
            && self.uses(value) > 1
        {
            if let Some(id) = self.shared.iter().position(|seen| seen.is(value)) {
                label.push_str(&self.notation.subscript(id));
                self.back_reference(value, &label, depth);
                return;
            }
            let id = self.shared.len();
            trace!(id, kind = value.type_name(), "Assigned shared value id");
            self.shared.push(value);
            label.push_str(&self.notation.subscript(id));
        }

        if self.verbosity.collapses_leaves() {
            match value {
                Value::Boolean(b) => {
                    let token = self.notation.strong(if *b { "TRUE" } else { "FALSE" });
                    self.indent(depth);
                    self.out.push_str(&token);
                    return;
                }
                Value::Null => {
                    let token = self.notation.strong("NULL");
                    self.indent(depth);
                    self.out.push_str(&token);
                    return;
                }
                Value::Error(message) => {
                    let message = markup::error_message(self.notation, message);
                    let roof = self.notation.roof(&message);
                    self.indent(depth);
                    self.out.push_str(&format!("{} {} ]", open(&label), roof));
                    return;
                }
                _ => {}
            }
        }

        // A function literal met again inside its own expansion stops here, whichever
        // closure it was instantiated as.
        let reentered = match value {
            Value::Function(function) => self.expanding.iter().any(|body| body.is(function.body)),
            _ => false,
        };
        if reentered {
            self.indent(depth);
            self.out
                .push_str(&format!("{} {} ]", open(&label), self.notation.cycle()));
            return;
        }

        self.indent(depth);
        self.out.push_str(&open(&label));
        let depth = depth + 1;
        match value {
            Value::Integer(_) | Value::Boolean(_) | Value::Null => {
                let text = self.notation.text(&value.to_string());
                self.leaf_field("Value", &text, depth);
            }
            Value::Return(inner) => {
                self.open_field("ReturnValue", depth);
                self.out.push('\n');
                self.value(Some(*inner), depth + 1);
                self.close(depth);
            }
            Value::Error(message) => {
                // Emitted as is; only the collapsed leaf is made markup-safe.
                let text = format!("{{{}}}", message);
                self.leaf_field("Message", &text, depth);
            }
            Value::Function(function) => {
                // The defining scope is never expanded: it may bind this very function.
                self.expanding.push(function.body);
                self.children("Parameters", function.parameters, depth);
                self.open_field("Body", depth);
                self.out.push('\n');
                self.node(function.body, depth + 1);
                self.close(depth);
                self.expanding.pop();
            }
        }
        self.close(depth - 1);
    }

    /// Exits producing `value` plus trace scopes from which `value` is reachable.
    fn uses(&self, value: &Value<'a>) -> usize {
        let exits = self
            .events
            .iter()
            .filter(|event| match event {
                Event::Exit(exit) => exit.value.is_some_and(|produced| produced.is(value)),
                Event::Entry(_) => false,
            })
            .count();
        exits + self.registry.holding(value)
    }

    fn back_reference(&mut self, value: &Value<'a>, label: &str, depth: usize) {
        self.indent(depth);
        match value {
            Value::Integer(n) => {
                let roof = self.notation.roof(&n.to_string());
                self.out.push_str(&format!("{} {} ]", open(label), roof));
            }
            _ => self.out.push_str(label),
        }
    }
}
