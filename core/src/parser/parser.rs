use bumpalo::Bump;
use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use crate::parser::{
    AnnotatedSource, InfixOp, Node, ParseError, ParseErrorKind, ParsedProgram, PrefixOp, Span,
};

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::eq, Assoc::Left) | Op::infix(Rule::not_eq, Assoc::Left)) // `==`, `!=`
        .op(Op::infix(Rule::lt, Assoc::Left) | Op::infix(Rule::gt, Assoc::Left))     // `<`, `>`
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))   // `+`, `-`
        .op(Op::infix(Rule::mul, Assoc::Left) | Op::infix(Rule::div, Assoc::Left))   // `*`, `/`
        .op(Op::prefix(Rule::bang) | Op::prefix(Rule::neg))                          // `!`, `-`
        .op(Op::postfix(Rule::call_args))                                            // `()`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/monkey.pest"]
pub struct MonkeyParser;

/// Granularity the input is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Program,
    Statement,
    Expression,
}

/// Parse a whole program.
pub fn parse<'a>(arena: &'a Bump, source: &'a str) -> Result<ParsedProgram<'a>, ParseError> {
    parse_at(arena, source, Level::Program)
}

/// Parse `source` at the given level.
///
/// The root of the result is always a `Program` node: a single statement becomes a
/// one-statement program, and a single expression is additionally wrapped in an
/// expression statement.
pub fn parse_at<'a>(
    arena: &'a Bump,
    source: &'a str,
    level: Level,
) -> Result<ParsedProgram<'a>, ParseError> {
    let rule = match level {
        Level::Program => Rule::program,
        Level::Statement => Rule::statement_input,
        Level::Expression => Rule::expression_input,
    };
    let mut pairs =
        MonkeyParser::parse(rule, source).map_err(|e| ParseError::from_pest(e, source))?;
    let root = pairs.next().ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::Syntax {
                message: "empty parse result".to_string(),
            },
            source,
            Span::new(0, 0),
        )
    })?;

    let ann = arena.alloc(AnnotatedSource::new(arena, source));
    let builder = Builder { arena, ann, source };
    let whole = Span::new(0, source.len());

    let node = match level {
        Level::Program => builder.statements_of(root, |statements| Node::Program { statements })?,
        Level::Statement => {
            let statement = builder.single(root, |pair| builder.statement(pair))?;
            builder.alloc(
                Node::Program {
                    statements: arena.alloc_slice_copy(&[statement]),
                },
                whole,
            )
        }
        Level::Expression => {
            let expression = builder.single(root, |pair| builder.expression(pair))?;
            let span = ann.span_of(expression).unwrap_or_else(|| whole.clone());
            let statement = builder.alloc(Node::ExpressionStatement { expression }, span);
            builder.alloc(
                Node::Program {
                    statements: arena.alloc_slice_copy(&[statement]),
                },
                whole,
            )
        }
    };

    Ok(ParsedProgram { node, ann })
}

struct Builder<'a> {
    arena: &'a Bump,
    ann: &'a AnnotatedSource<'a, Node<'a>>,
    source: &'a str,
}

type Parsed<'a> = Result<&'a Node<'a>, ParseError>;

impl<'a> Builder<'a> {
    fn alloc(&self, node: Node<'a>, span: Span) -> &'a Node<'a> {
        let node = self.arena.alloc(node);
        self.ann.add_span(node, span);
        node
    }

    fn span_of(&self, node: &'a Node<'a>) -> Span {
        self.ann.span_of(node).unwrap_or(Span::new(0, 0))
    }

    fn missing(&self, what: &str, span: pest::Span<'a>) -> ParseError {
        ParseError::new(
            ParseErrorKind::Syntax {
                message: format!("missing {what}"),
            },
            self.source,
            span.into(),
        )
    }

    /// Build the one significant child of an entry rule (skipping `EOI`).
    fn single(
        &self,
        pair: Pair<'a, Rule>,
        build: impl FnOnce(Pair<'a, Rule>) -> Parsed<'a>,
    ) -> Parsed<'a> {
        let span = pair.as_span();
        let inner = pair
            .into_inner()
            .find(|p| p.as_rule() != Rule::EOI)
            .ok_or_else(|| self.missing("input", span))?;
        build(inner)
    }

    /// Build a statement list (program or block) from the statements inside `pair`.
    fn statements_of(
        &self,
        pair: Pair<'a, Rule>,
        make: impl FnOnce(&'a [&'a Node<'a>]) -> Node<'a>,
    ) -> Parsed<'a> {
        let span = pair.as_span();
        let statements = pair
            .into_inner()
            .filter(|p| p.as_rule() != Rule::EOI)
            .map(|p| self.statement(p))
            .collect::<Result<Vec<_>, _>>()?;
        let statements = self.arena.alloc_slice_copy(&statements);
        Ok(self.alloc(make(statements), span.into()))
    }

    fn statement(&self, pair: Pair<'a, Rule>) -> Parsed<'a> {
        let span = pair.as_span();
        match pair.as_rule() {
            Rule::let_statement => {
                let mut inner = pair.into_inner().filter(|p| p.as_rule() != Rule::kw_let);
                let name = inner.next().ok_or_else(|| self.missing("let name", span))?;
                let name = self.identifier(name);
                let value = inner.next().ok_or_else(|| self.missing("let value", span))?;
                let value = self.expression(value)?;
                Ok(self.alloc(Node::Let { name, value }, span.into()))
            }
            Rule::return_statement => {
                let value = pair
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::expression)
                    .ok_or_else(|| self.missing("return value", span))?;
                let value = self.expression(value)?;
                Ok(self.alloc(Node::Return { value }, span.into()))
            }
            Rule::expression_statement => {
                let expression = pair
                    .into_inner()
                    .next()
                    .ok_or_else(|| self.missing("expression", span))?;
                let expression = self.expression(expression)?;
                Ok(self.alloc(Node::ExpressionStatement { expression }, span.into()))
            }
            rule => unreachable!("Unknown statement rule: {:?}", rule),
        }
    }

    fn block(&self, pair: Pair<'a, Rule>) -> Parsed<'a> {
        self.statements_of(pair, |statements| Node::Block { statements })
    }

    fn identifier(&self, pair: Pair<'a, Rule>) -> &'a Node<'a> {
        self.alloc(Node::Identifier(pair.as_str()), pair.as_span().into())
    }

    fn expression(&self, pair: Pair<'a, Rule>) -> Parsed<'a> {
        PRATT_PARSER
            .map_primary(|primary| self.primary(primary))
            .map_prefix(|op, rhs| {
                let right = rhs?;
                let op_kind = match op.as_rule() {
                    Rule::bang => PrefixOp::Not,
                    Rule::neg => PrefixOp::Neg,
                    rule => unreachable!("Unknown prefix operator: {:?}", rule),
                };
                let span = Span::new(op.as_span().start(), self.span_of(right).0.end);
                Ok(self.alloc(Node::Prefix { op: op_kind, right }, span))
            })
            .map_infix(|lhs, op, rhs| {
                let left = lhs?;
                let right = rhs?;
                let op = match op.as_rule() {
                    Rule::eq => InfixOp::Eq,
                    Rule::not_eq => InfixOp::NotEq,
                    Rule::lt => InfixOp::Lt,
                    Rule::gt => InfixOp::Gt,
                    Rule::add => InfixOp::Add,
                    Rule::sub => InfixOp::Sub,
                    Rule::mul => InfixOp::Mul,
                    Rule::div => InfixOp::Div,
                    rule => unreachable!("Unknown infix operator: {:?}", rule),
                };
                let span = Span::new(self.span_of(left).0.start, self.span_of(right).0.end);
                Ok(self.alloc(Node::Infix { op, left, right }, span))
            })
            .map_postfix(|lhs, op| {
                let function = lhs?;
                let span = Span::new(self.span_of(function).0.start, op.as_span().end());
                let arguments = op
                    .into_inner()
                    .map(|arg| self.expression(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let arguments = self.arena.alloc_slice_copy(&arguments);
                Ok(self.alloc(
                    Node::Call {
                        function,
                        arguments,
                    },
                    span,
                ))
            })
            .parse(pair.into_inner())
    }

    fn primary(&self, pair: Pair<'a, Rule>) -> Parsed<'a> {
        let span = pair.as_span();
        match pair.as_rule() {
            Rule::expression => self.expression(pair),
            Rule::integer => {
                let text = pair.as_str();
                let value = text.parse::<i64>().map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::InvalidInteger {
                            text: text.to_string(),
                        },
                        self.source,
                        span.into(),
                    )
                })?;
                Ok(self.alloc(Node::Integer(value), span.into()))
            }
            Rule::boolean => Ok(self.alloc(Node::Boolean(pair.as_str() == "true"), span.into())),
            Rule::identifier => Ok(self.identifier(pair)),
            Rule::if_expression => {
                let mut inner = pair
                    .into_inner()
                    .filter(|p| !matches!(p.as_rule(), Rule::kw_if | Rule::kw_else));
                let condition = inner.next().ok_or_else(|| self.missing("condition", span))?;
                let condition = self.expression(condition)?;
                let consequence = inner
                    .next()
                    .ok_or_else(|| self.missing("consequence", span))?;
                let consequence = self.block(consequence)?;
                let alternative = inner.next().map(|p| self.block(p)).transpose()?;
                Ok(self.alloc(
                    Node::If {
                        condition,
                        consequence,
                        alternative,
                    },
                    span.into(),
                ))
            }
            Rule::function_literal => {
                let mut inner = pair.into_inner().filter(|p| p.as_rule() != Rule::kw_fn);
                let params = inner
                    .next()
                    .ok_or_else(|| self.missing("parameter list", span))?;
                let parameters = params
                    .into_inner()
                    .map(|p| self.identifier(p))
                    .collect::<Vec<_>>();
                let parameters = self.arena.alloc_slice_copy(&parameters);
                let body = inner.next().ok_or_else(|| self.missing("body", span))?;
                let body = self.block(body)?;
                Ok(self.alloc(Node::Function { parameters, body }, span.into()))
            }
            rule => unreachable!("Unknown primary rule: {:?}", rule),
        }
    }
}
