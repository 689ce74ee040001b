//! Core evaluation logic.

use bumpalo::Bump;
use tracing::{debug, trace};

use crate::{
    evaluator::{
        EvalError, EvaluatorOptions,
        operators::{self, Outcome},
        trace::Trace,
    },
    parser::Node,
    scope::Scope,
    values::{Function, Value},
};

type Evaluated<'a> = Result<Option<&'a Value<'a>>, EvalError>;

/// Tree-walking evaluator that optionally records a [`Trace`].
pub struct Evaluator<'a> {
    options: EvaluatorOptions,
    arena: &'a Bump,
    trace: Trace<'a>,
    depth: usize,
    true_value: &'a Value<'a>,
    false_value: &'a Value<'a>,
    null_value: &'a Value<'a>,
}

impl<'a> Evaluator<'a> {
    /// Create a new evaluator with the given options.
    pub fn new(arena: &'a Bump, options: EvaluatorOptions) -> Self {
        Self {
            options,
            arena,
            trace: Trace::new(),
            depth: 0,
            true_value: arena.alloc(Value::Boolean(true)),
            false_value: arena.alloc(Value::Boolean(false)),
            null_value: arena.alloc(Value::Null),
        }
    }

    pub fn trace(&self) -> &Trace<'a> {
        &self.trace
    }

    pub fn into_trace(self) -> Trace<'a> {
        self.trace
    }

    pub fn boolean(&self, value: bool) -> &'a Value<'a> {
        if value {
            self.true_value
        } else {
            self.false_value
        }
    }

    pub fn null(&self) -> &'a Value<'a> {
        self.null_value
    }

    /// Evaluate `node` in `scope`.
    ///
    /// Returns `None` for nodes that produce no value, such as `let` statements.
    pub fn eval(&mut self, node: &'a Node<'a>, scope: &'a Scope<'a>) -> Evaluated<'a> {
        if self.depth >= self.options.max_depth {
            debug!(
                depth = self.depth,
                max_depth = self.options.max_depth,
                "Evaluation depth limit reached"
            );
            return Err(EvalError::StackOverflow {
                depth: self.depth,
                max_depth: self.options.max_depth,
            });
        }

        if self.options.trace {
            self.trace.enter(node, scope);
        }

        self.depth += 1;
        let result = self.eval_inner(node, scope);
        self.depth -= 1;

        let value = result?;
        if self.options.trace {
            self.trace.exit(node, scope, value);
        }
        Ok(value)
    }

    /// Evaluate an expression, treating "no value" as `null`.
    fn value(
        &mut self,
        node: &'a Node<'a>,
        scope: &'a Scope<'a>,
    ) -> Result<&'a Value<'a>, EvalError> {
        Ok(self.eval(node, scope)?.unwrap_or(self.null_value))
    }

    fn error(&self, message: String) -> &'a Value<'a> {
        self.arena
            .alloc(Value::Error(self.arena.alloc_str(&message)))
    }

    fn outcome(&self, outcome: Outcome) -> &'a Value<'a> {
        match outcome {
            Outcome::Integer(value) => self.arena.alloc(Value::Integer(value)),
            Outcome::Boolean(value) => self.boolean(value),
            Outcome::Error(message) => self.error(message),
        }
    }

    fn eval_inner(&mut self, node: &'a Node<'a>, scope: &'a Scope<'a>) -> Evaluated<'a> {
        match node {
            Node::Program { statements } => {
                let mut result = None;
                for &statement in statements.iter() {
                    result = self.eval(statement, scope)?;
                    match result {
                        Some(Value::Return(value)) => return Ok(Some(*value)),
                        Some(Value::Error(_)) => return Ok(result),
                        _ => {}
                    }
                }
                Ok(result)
            }

            Node::Block { statements } => {
                let mut result = None;
                for &statement in statements.iter() {
                    result = self.eval(statement, scope)?;
                    if let Some(Value::Return(_) | Value::Error(_)) = result {
                        return Ok(result);
                    }
                }
                Ok(result)
            }

            Node::ExpressionStatement { expression } => self.eval(expression, scope),

            Node::Return { value } => {
                let value = self.value(value, scope)?;
                if value.is_error() {
                    return Ok(Some(value));
                }
                Ok(Some(self.arena.alloc(Value::Return(value))))
            }

            Node::Let { name, value } => {
                let value = self.value(value, scope)?;
                if value.is_error() {
                    return Ok(Some(value));
                }
                if let Some(name) = name.identifier() {
                    scope.set(name, value);
                }
                Ok(None)
            }

            Node::Integer(value) => Ok(Some(self.arena.alloc(Value::Integer(*value)))),

            Node::Boolean(value) => Ok(Some(self.boolean(*value))),

            Node::Identifier(name) => Ok(Some(match scope.get(name) {
                Some(value) => value,
                None => self.error(format!("identifier not found: {}", name)),
            })),

            Node::Prefix { op, right } => {
                let right = self.value(right, scope)?;
                if right.is_error() {
                    return Ok(Some(right));
                }
                Ok(Some(self.outcome(operators::eval_prefix(*op, right))))
            }

            Node::Infix { op, left, right } => {
                let left = self.value(left, scope)?;
                if left.is_error() {
                    return Ok(Some(left));
                }
                let right = self.value(right, scope)?;
                if right.is_error() {
                    return Ok(Some(right));
                }
                Ok(Some(self.outcome(operators::eval_infix(*op, left, right))))
            }

            Node::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.value(condition, scope)?;
                if condition.is_error() {
                    return Ok(Some(condition));
                }
                if condition.is_truthy() {
                    self.eval(consequence, scope)
                } else if let Some(alternative) = alternative {
                    self.eval(alternative, scope)
                } else {
                    Ok(Some(self.null_value))
                }
            }

            Node::Function { parameters, body } => {
                Ok(Some(self.arena.alloc(Value::Function(Function {
                    parameters: *parameters,
                    body: *body,
                    scope,
                }))))
            }

            Node::Call {
                function,
                arguments,
            } => {
                let function = self.value(function, scope)?;
                if function.is_error() {
                    return Ok(Some(function));
                }
                let mut values = Vec::with_capacity(arguments.len());
                for &argument in arguments.iter() {
                    let value = self.value(argument, scope)?;
                    if value.is_error() {
                        return Ok(Some(value));
                    }
                    values.push(value);
                }
                self.apply(function, &values)
            }
        }
    }

    fn apply(&mut self, function: &'a Value<'a>, arguments: &[&'a Value<'a>]) -> Evaluated<'a> {
        let Value::Function(closure) = function else {
            return Ok(Some(
                self.error(format!("not a function: {}", function.type_name())),
            ));
        };
        if closure.parameters.len() != arguments.len() {
            return Ok(Some(self.error(format!(
                "wrong number of arguments: want={}, got={}",
                closure.parameters.len(),
                arguments.len()
            ))));
        }

        trace!(arity = arguments.len(), depth = self.depth, "Calling function");
        let call_scope = Scope::enclosed(self.arena, closure.scope);
        for (parameter, argument) in closure.parameters.iter().zip(arguments) {
            if let Some(name) = parameter.identifier() {
                call_scope.set(name, *argument);
            }
        }

        let result = self.eval(closure.body, call_scope)?;
        Ok(Some(match result {
            Some(Value::Return(value)) => *value,
            Some(value) => value,
            None => self.null_value,
        }))
    }
}
