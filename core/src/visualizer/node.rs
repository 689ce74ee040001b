use crate::evaluator::{Event, Exit};
use crate::parser::Node;
use crate::visualizer::{Renderer, open};

impl<'r, 'a> Renderer<'r, 'a> {
    /// Render `node` at `depth`, with its trace annotations and produced values.
    pub(super) fn node(&mut self, node: &'a Node<'a>, depth: usize) {
        let events = self.events;
        let mut left = String::new();
        let mut right = String::new();
        let mut exits: Vec<Exit<'a>> = Vec::new();
        for event in events.iter().filter(|event| event.node().is(node)) {
            let scope = self.registry.id_of(event.scope());
            match event {
                Event::Entry(entry) => left.push_str(&self.notation.entry(entry.step, scope)),
                Event::Exit(exit) => {
                    right.push_str(&self.notation.exit(exit.step, scope));
                    exits.push(*exit);
                }
            }
        }

        let label = format!("{}{}{}", left, self.notation.text(node.type_name()), right);
        self.indent(depth);
        self.out.push_str(&open(&label));

        self.fields(node, depth + 1);

        for exit in exits {
            let edge = self.notation.edge(&format!("Val {}", exit.step));
            self.line(depth + 1, &edge);
            self.out.push('\n');
            self.value(exit.value, depth + 1);
        }

        self.close(depth);
    }

    /// One labeled field per structural child of `node`.
    fn fields(&mut self, node: &'a Node<'a>, depth: usize) {
        match node {
            Node::Program { statements } | Node::Block { statements } => {
                self.children("Statements", statements, depth)
            }
            Node::Let { name, value } => {
                self.child("Name", name, depth);
                self.child("Value", value, depth);
            }
            Node::Return { value } => self.child("ReturnValue", value, depth),
            Node::ExpressionStatement { expression } => {
                self.child("Expression", expression, depth)
            }
            Node::Identifier(name) => {
                let text = self.notation.text(name);
                self.leaf_field("Value", &text, depth);
            }
            Node::Boolean(value) => self.leaf_field("Value", &value.to_string(), depth),
            Node::Integer(value) => self.leaf_field("Value", &value.to_string(), depth),
            Node::Prefix { op, right } => {
                let op = self.notation.operator(op.as_str());
                self.leaf_field("Operator", &op, depth);
                self.child("Right", right, depth);
            }
            Node::Infix { op, left, right } => {
                self.child("Left", left, depth);
                let op = self.notation.operator(op.as_str());
                self.leaf_field("Operator", &op, depth);
                self.child("Right", right, depth);
            }
            Node::If {
                condition,
                consequence,
                alternative,
            } => {
                self.child("Condition", condition, depth);
                self.child("Consequence", consequence, depth);
                match alternative {
                    Some(alternative) => self.child("Alternative", alternative, depth),
                    None => self.leaf_field("Alternative", self.notation.empty(), depth),
                }
            }
            Node::Function { parameters, body } => {
                self.children("Parameters", parameters, depth);
                self.child("Body", body, depth);
            }
            Node::Call {
                function,
                arguments,
            } => {
                self.child("Function", function, depth);
                self.children("Arguments", arguments, depth);
            }
        }
    }

    fn child(&mut self, field: &str, node: &'a Node<'a>, depth: usize) {
        self.open_field(field, depth);
        self.out.push('\n');
        self.node(node, depth + 1);
        self.close(depth);
    }

    pub(super) fn children(&mut self, field: &str, nodes: &'a [&'a Node<'a>], depth: usize) {
        self.open_field(field, depth);
        for &node in nodes {
            self.out.push('\n');
            self.node(node, depth + 1);
        }
        self.close(depth);
    }
}
