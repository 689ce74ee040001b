use core::fmt;

use crate::parser::Node;
use crate::scope::Scope;

/// A runtime value produced by the evaluator.
///
/// Values live in the evaluator's arena and are handed around as `&'a Value<'a>`.
/// Two values are "the same value" only when they are the same allocation, see [`Value::is`].
#[derive(Debug)]
pub enum Value<'a> {
    Integer(i64),
    Boolean(bool),
    Null,
    /// Wraps the value of a `return` statement while it propagates out of blocks.
    Return(&'a Value<'a>),
    Error(&'a str),
    Function(Function<'a>),
}

/// A closure: parameter list and body from the AST plus the scope it was defined in.
#[derive(Debug)]
pub struct Function<'a> {
    pub parameters: &'a [&'a Node<'a>],
    pub body: &'a Node<'a>,
    pub scope: &'a Scope<'a>,
}

impl<'a> Value<'a> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::Return(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Function(_) => "FUNCTION",
        }
    }

    /// Identity comparison.
    pub fn is(&self, other: &Value<'a>) -> bool {
        core::ptr::eq(self, other)
    }

    /// `null` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Null => write!(f, "null"),
            Value::Return(value) => write!(f, "{}", value),
            Value::Error(message) => write!(f, "ERROR: {}", message),
            Value::Function(function) => write!(f, "{}", function),
        }
    }
}

impl fmt::Display for Function<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", parameter)?;
        }
        write!(f, ") {{\n{}\n}}", BlockBody(self.body))
    }
}

/// The statements of a block without the surrounding braces.
struct BlockBody<'a>(&'a Node<'a>);

impl fmt::Display for BlockBody<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Node::Block { statements } => {
                for (i, statement) in statements.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", Unterminated(statement))?;
                }
                Ok(())
            }
            other => write!(f, "{}", other),
        }
    }
}

/// Expression statements print without their trailing `;` inside a function body.
struct Unterminated<'a>(&'a Node<'a>);

impl fmt::Display for Unterminated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Node::ExpressionStatement { expression } => write!(f, "{}", expression),
            other => write!(f, "{}", other),
        }
    }
}
