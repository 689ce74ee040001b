use core::fmt;

use crate::parser::{AnnotatedSource, InfixOp, PrefixOp};

/// A parsed program: the root node plus the spans of every node in it.
#[derive(Debug)]
pub struct ParsedProgram<'a> {
    pub node: &'a Node<'a>,
    pub ann: &'a AnnotatedSource<'a, Node<'a>>,
}

/// AST node. Nodes live in an arena and are compared by address wherever a trace
/// refers to them; the derived `PartialEq` is structural and only meant for tests.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    Program {
        statements: &'a [&'a Node<'a>],
    },
    Let {
        name: &'a Node<'a>,
        value: &'a Node<'a>,
    },
    Return {
        value: &'a Node<'a>,
    },
    ExpressionStatement {
        expression: &'a Node<'a>,
    },
    Block {
        statements: &'a [&'a Node<'a>],
    },
    Identifier(&'a str),
    Boolean(bool),
    Integer(i64),
    Prefix {
        op: PrefixOp,
        right: &'a Node<'a>,
    },
    Infix {
        op: InfixOp,
        left: &'a Node<'a>,
        right: &'a Node<'a>,
    },
    If {
        condition: &'a Node<'a>,
        consequence: &'a Node<'a>,
        alternative: Option<&'a Node<'a>>,
    },
    Function {
        parameters: &'a [&'a Node<'a>],
        body: &'a Node<'a>,
    },
    Call {
        function: &'a Node<'a>,
        arguments: &'a [&'a Node<'a>],
    },
}

impl<'a> Node<'a> {
    pub fn as_ptr(&self) -> *const Self {
        self as *const _
    }

    /// Identity comparison. Two structurally equal nodes parsed from different
    /// positions are different nodes.
    pub fn is(&self, other: &Node<'a>) -> bool {
        core::ptr::eq(self, other)
    }

    /// The node's type name, used as its label in rendered trees.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Program { .. } => "Program",
            Node::Let { .. } => "LetStatement",
            Node::Return { .. } => "ReturnStatement",
            Node::ExpressionStatement { .. } => "ExpressionStatement",
            Node::Block { .. } => "BlockStatement",
            Node::Identifier(_) => "Identifier",
            Node::Boolean(_) => "Boolean",
            Node::Integer(_) => "IntegerLiteral",
            Node::Prefix { .. } => "PrefixExpression",
            Node::Infix { .. } => "InfixExpression",
            Node::If { .. } => "IfExpression",
            Node::Function { .. } => "FunctionLiteral",
            Node::Call { .. } => "CallExpression",
        }
    }

    pub fn identifier(&self) -> Option<&'a str> {
        match self {
            Node::Identifier(name) => Some(*name),
            _ => None,
        }
    }
}

fn write_separated(f: &mut fmt::Formatter<'_>, nodes: &[&Node<'_>], sep: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

/// Canonical source form: every prefix and infix expression is fully parenthesized
/// and every expression statement ends with `;`, so the output parses back to the
/// same tree.
impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Program { statements } => write_separated(f, statements, "\n"),
            Node::Let { name, value } => write!(f, "let {name} = {value};"),
            Node::Return { value } => write!(f, "return {value};"),
            Node::ExpressionStatement { expression } => write!(f, "{expression};"),
            Node::Block { statements } => {
                if statements.is_empty() {
                    return f.write_str("{ }");
                }
                f.write_str("{ ")?;
                write_separated(f, statements, " ")?;
                f.write_str(" }")
            }
            Node::Identifier(name) => f.write_str(name),
            Node::Boolean(value) => write!(f, "{value}"),
            Node::Integer(value) => write!(f, "{value}"),
            Node::Prefix { op, right } => write!(f, "({op}{right})"),
            Node::Infix { op, left, right } => write!(f, "({left} {op} {right})"),
            Node::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {condition} {consequence}")?;
                if let Some(alternative) = alternative {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            }
            Node::Function { parameters, body } => {
                f.write_str("fn(")?;
                write_separated(f, parameters, ", ")?;
                write!(f, ") {body}")
            }
            Node::Call {
                function,
                arguments,
            } => {
                write!(f, "{function}(")?;
                write_separated(f, arguments, ", ")?;
                f.write_str(")")
            }
        }
    }
}
