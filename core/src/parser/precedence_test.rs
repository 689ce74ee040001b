use crate::parser::Node;
use bumpalo::Bump;

use super::parser::{Level, parse_at};

// Helper function to parse an expression and return the AST.
//
// We test precedence by comparing whether two expressions parenthesized in
// different ways yield the same AST.
fn ast<'a>(arena: &'a Bump, source: &'a str) -> &'a Node<'a> {
    let parsed = parse_at(arena, source, Level::Expression)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e));
    parsed.node
}

// Canonical (fully parenthesized) form of a single expression.
fn canonical(source: &str) -> String {
    let arena = Bump::new();
    let source = arena.alloc_str(source);
    ast(&arena, source).to_string()
}

#[test]
fn test_addition_vs_subtraction() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a + b - c"), ast(&arena, "(a + b) - c"));
    assert_eq!(ast(&arena, "a - b + c"), ast(&arena, "(a - b) + c"));
    assert_eq!(
        ast(&arena, "a + b - c + d - e + f"),
        ast(&arena, "((((a + b) - c) + d) - e) + f")
    );
}

#[test]
fn test_multiplication_vs_division() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a * b / c"), ast(&arena, "(a * b) / c"));
    assert_eq!(ast(&arena, "a / b * c"), ast(&arena, "(a / b) * c"));
}

#[test]
fn test_addition_vs_multiplication() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a + b * c"), ast(&arena, "a + (b * c)"));
    assert_eq!(ast(&arena, "a * b + c"), ast(&arena, "(a * b) + c"));
}

#[test]
fn test_comparison_vs_arithmetic() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a + b < c * d"), ast(&arena, "(a + b) < (c * d)"));
    assert_eq!(ast(&arena, "a < b == c > d"), ast(&arena, "(a < b) == (c > d)"));
    assert_eq!(ast(&arena, "a == b != c"), ast(&arena, "(a == b) != c"));
}

#[test]
fn test_unary_vs_binary() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "--a"), ast(&arena, "-(-a)"));
    assert_eq!(ast(&arena, "-a + b"), ast(&arena, "(-a) + b"));
    assert_eq!(ast(&arena, "a + -b"), ast(&arena, "a + (-b)"));
    assert_eq!(ast(&arena, "!-a"), ast(&arena, "!(-a)"));
}

#[test]
fn test_call_binds_tightest() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "-f(x)"), ast(&arena, "-(f(x))"));
    assert_eq!(ast(&arena, "a + f(b) * c"), ast(&arena, "a + (f(b) * c)"));
    assert_eq!(ast(&arena, "f(a)(b)"), ast(&arena, "(f(a))(b)"));
}

#[test]
fn test_canonical_forms() {
    assert_eq!(canonical("-a * b"), "((-a) * b);");
    assert_eq!(canonical("!-a"), "(!(-a));");
    assert_eq!(canonical("a + b + c"), "((a + b) + c);");
    assert_eq!(canonical("a * b / c"), "((a * b) / c);");
    assert_eq!(canonical("a + b * c + d / e - f"), "(((a + (b * c)) + (d / e)) - f);");
    assert_eq!(canonical("5 > 4 == 3 < 4"), "((5 > 4) == (3 < 4));");
    assert_eq!(canonical("3 + 4 * 5 == 3 * 1 + 4 * 5"), "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)));");
    assert_eq!(canonical("true != false"), "(true != false);");
    assert_eq!(canonical("(5 + 5) * 2"), "((5 + 5) * 2);");
    assert_eq!(canonical("-(5 + 5)"), "(-(5 + 5));");
    assert_eq!(canonical("a + add(b * c) + d"), "((a + add((b * c))) + d);");
    assert_eq!(
        canonical("add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))"),
        "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)));"
    );
}
