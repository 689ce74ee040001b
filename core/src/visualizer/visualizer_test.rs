use bumpalo::Bump;
use indoc::indoc;
use pretty_assertions::assert_eq;

use super::*;
use crate::evaluator::{self, Trace};
use crate::parser;
use crate::scope::Scope;

fn traced<'a>(arena: &'a Bump, input: &str) -> Trace<'a> {
    let input = arena.alloc_str(input);
    let parsed = parser::parse(arena, input).expect("parsing failed");
    evaluator::eval_traced(arena, parsed.node, Scope::new(arena))
        .expect("evaluation failed")
        .trace
}

fn plain(input: &str, verbosity: u8) -> String {
    let arena = Bump::new();
    let trace = traced(&arena, input);
    eval_tree(
        &trace,
        &RenderOptions {
            verbosity: Verbosity(verbosity),
            notation: &Plain,
        },
    )
}

fn qtree(input: &str, verbosity: u8) -> String {
    let arena = Bump::new();
    let trace = traced(&arena, input);
    eval_tree(
        &trace,
        &RenderOptions {
            verbosity: Verbosity(verbosity),
            notation: &Qtree,
        },
    )
}

fn plain_parse_tree(input: &str) -> String {
    let arena = Bump::new();
    let input = arena.alloc_str(input);
    let parsed = parser::parse(&arena, input).expect("parsing failed");
    parse_tree(
        parsed.node,
        &RenderOptions {
            verbosity: Verbosity::FULL,
            notation: &Plain,
        },
    )
}

/// Shift every line of `text` right by `depth` indentation steps.
fn indented(text: &str, depth: usize) -> String {
    text.lines()
        .map(|line| format!("{}{}\n", "  ".repeat(depth), line))
        .collect()
}

#[test]
fn test_literal_full_expansion() {
    assert_eq!(
        plain("5", 0),
        indoc! {"
            [.{0,e₀↓ Program ↑5,e₀}
              [.{Statements:}
                [.{1,e₀↓ ExpressionStatement ↑4,e₀}
                  [.{Expression:}
                    [.{2,e₀↓ IntegerLiteral ↑3,e₀}
                      [.{Value:}
                        5
                      ]
                      <Val 3>
                      [.{INTEGER}
                        [.{Value:}
                          5
                        ]
                      ]
                    ]
                  ]
                  <Val 4>
                  [.{INTEGER}
                    [.{Value:}
                      5
                    ]
                  ]
                ]
              ]
              <Val 5>
              [.{INTEGER}
                [.{Value:}
                  5
                ]
              ]
            ]
        "}
    );
}

#[test]
fn test_shared_value_expands_once() {
    assert_eq!(
        plain("5", 2),
        indoc! {"
            [.{0,e₀↓ Program ↑5,e₀}
              [.{Statements:}
                [.{1,e₀↓ ExpressionStatement ↑4,e₀}
                  [.{Expression:}
                    [.{2,e₀↓ IntegerLiteral ↑3,e₀}
                      [.{Value:}
                        5
                      ]
                      <Val 3>
                      [.{INTEGER₀}
                        [.{Value:}
                          5
                        ]
                      ]
                    ]
                  ]
                  <Val 4>
                  [.{INTEGER₀} {5} ]
                ]
              ]
              <Val 5>
              [.{INTEGER₀} {5} ]
            ]
        "}
    );
}

#[test]
fn test_literal_annotations_in_infix() {
    let out = plain("5 + 1", 0);
    assert!(out.contains("[.{3,e₀↓ IntegerLiteral ↑4,e₀}"), "{}", out);
    assert!(out.contains("<Val 4>"), "{}", out);
}

#[test]
fn test_qtree_collapsed_booleans() {
    assert_eq!(
        qtree("true", 1),
        indoc! {r"
            \Tree[.{0,e$_{0}\downarrow$ Program $\uparrow$5,e$_{0}$}
              [.{\textit{Statements}}
                [.{1,e$_{0}\downarrow$ ExpressionStatement $\uparrow$4,e$_{0}$}
                  [.{\textit{Expression}}
                    [.{2,e$_{0}\downarrow$ Boolean $\uparrow$3,e$_{0}$}
                      [.{\textit{Value}}
                        true
                      ]
                      \edge node[auto=left]{\tiny Val 3};
                      \textbf{TRUE}
                    ]
                  ]
                  \edge node[auto=left]{\tiny Val 4};
                  \textbf{TRUE}
                ]
              ]
              \edge node[auto=left]{\tiny Val 5};
              \textbf{TRUE}
            ]
        "}
    );
}

#[test]
fn test_booleans_are_never_shared() {
    let out = plain("true", 2);
    assert!(!out.contains("TRUE₀"), "{}", out);
    assert_eq!(out.matches("TRUE").count(), 3);
}

#[test]
fn test_repeated_node_gets_repeated_annotations() {
    let arena = Bump::new();
    let trace = traced(&arena, "let f = fn(x) { x }; f(1); f(2);");

    // The parameter reference inside the body, evaluated once per call.
    let visits: Vec<_> = trace
        .entries()
        .filter(|entry| entry.node.identifier() == Some("x"))
        .map(|entry| entry.step)
        .collect();
    assert_eq!(visits.len(), 2);
    let exits: Vec<_> = trace
        .exits()
        .filter(|exit| exit.node.identifier() == Some("x"))
        .map(|exit| exit.step)
        .collect();

    let out = eval_tree(
        &trace,
        &RenderOptions {
            verbosity: Verbosity::FULL,
            notation: &Plain,
        },
    );
    let both = format!(
        "[.{{{},e₁↓ {},e₂↓ Identifier ↑{},e₁ ↑{},e₂}}",
        visits[0], visits[1], exits[0], exits[1]
    );
    let first_only = format!("[.{{{},e₁↓ Identifier", visits[0]);
    assert!(out.contains(&both), "{}", out);
    assert!(!out.contains(&first_only), "{}", out);

    // One value edge per exit, in step order.
    let first_edge = out.find(&format!("<Val {}>", exits[0])).unwrap();
    let second_edge = out.find(&format!("<Val {}>", exits[1])).unwrap();
    assert!(first_edge < second_edge);
}

#[test]
fn test_unreached_branch_keeps_its_shape() {
    let alternative = indented(
        indoc! {"
            [.{BlockStatement}
              [.{Statements:}
                [.{ExpressionStatement}
                  [.{Expression:}
                    [.{IntegerLiteral}
                      [.{Value:}
                        2
                      ]
                    ]
                  ]
                ]
              ]
            ]
        "},
        6,
    );
    let evaluated = plain("if (true) { 1 } else { 2 }", 0);
    let parsed = plain_parse_tree("if (true) { 1 } else { 2 }");
    assert!(evaluated.contains(&alternative), "{}", evaluated);
    assert!(parsed.contains(&alternative), "{}", parsed);
}

#[test]
fn test_missing_alternative_is_empty_leaf() {
    let out = plain_parse_tree("if (false) { 1 }");
    assert!(
        out.contains("[.{Alternative:}\n            ∅\n          ]"),
        "{}",
        out
    );
}

#[test]
fn test_parse_tree_has_no_annotations() {
    assert_eq!(
        plain_parse_tree("-a"),
        indoc! {"
            [.{Program}
              [.{Statements:}
                [.{ExpressionStatement}
                  [.{Expression:}
                    [.{PrefixExpression}
                      [.{Operator:}
                        -
                      ]
                      [.{Right:}
                        [.{Identifier}
                          [.{Value:}
                            a
                          ]
                        ]
                      ]
                    ]
                  ]
                ]
              ]
            ]
        "}
    );
}

#[test]
fn test_statement_without_value() {
    let out = plain("let x = 1;", 0);
    // The `let` exit and the program exit both carry no value.
    assert!(out.contains("      <Val 4>\n      ∅"), "{}", out);
    assert!(out.contains("  <Val 5>\n  ∅\n]"), "{}", out);
}

#[test]
fn test_collapsed_error() {
    let out = qtree("1 + true", 1);
    assert!(
        out.contains(r"[.{\textbf{ERROR}} \edge[roof]; {\small type mismatch\\INT + BOOL} ]"),
        "{}",
        out
    );
}

#[test]
fn test_full_error_message() {
    let out = plain("1 + true", 0);
    assert!(
        out.contains("[.{Message:}\n"),
        "{}",
        out
    );
    assert!(out.contains("{type mismatch: INTEGER + BOOLEAN}"), "{}", out);
}

#[test]
fn test_recursive_function_gets_one_id() {
    crate::test_utils::init_test_logging();
    let input = "let f = fn(n) { if (n < 1) { 0 } else { f(n - 1) } }; f(2);";
    let out = qtree(input, 2);

    // Integers in the body are met first, so the function's id is not necessarily 0.
    let marker = r"\textbf{FUNCTION}$_{";
    let ids: Vec<&str> = out
        .match_indices(marker)
        .map(|(at, _)| {
            let rest = &out[at + marker.len()..];
            &rest[..rest.find('}').unwrap()]
        })
        .collect();
    assert!(ids.len() > 1, "{}", out);
    assert!(ids.iter().all(|id| *id == ids[0]), "{:?}", ids);

    let expanded = format!("[.{{{}{}}}$}}", marker, ids[0]);
    assert_eq!(out.matches(&expanded).count(), 1, "{}", out);
}

#[test]
fn test_recursive_function_terminates_without_sharing() {
    let input = "let f = fn(n) { if (n < 1) { 0 } else { f(n - 1) } }; f(2);";
    let out = plain(input, 0);
    assert!(out.contains("[.{FUNCTION} … ]"), "{}", out);
}

#[test]
fn test_rendering_is_repeatable() {
    let arena = Bump::new();
    let trace = traced(&arena, "let a = 2; let b = fn(x) { x * a }; b(a) + b(3)");
    for verbosity in 0..=2 {
        let options = RenderOptions {
            verbosity: Verbosity(verbosity),
            notation: &Qtree,
        };
        assert_eq!(eval_tree(&trace, &options), eval_tree(&trace, &options));
    }
}

#[test]
fn test_shared_ids_restart_per_call() {
    let arena = Bump::new();
    let trace = traced(&arena, "let a = 7; a; a;");
    let options = RenderOptions {
        verbosity: Verbosity::SHARED,
        notation: &Plain,
    };
    let first = eval_tree(&trace, &options);
    let second = eval_tree(&trace, &options);
    assert!(first.contains("INTEGER₀"));
    assert!(!first.contains("INTEGER₁"));
    assert_eq!(first, second);
}

#[test]
fn test_empty_trace() {
    let options = RenderOptions {
        verbosity: Verbosity::FULL,
        notation: &Plain,
    };
    assert_eq!(eval_tree(&Trace::new(), &options), "∅\n");
}

#[test]
fn test_call_scopes_are_numbered() {
    let out = plain("fn(x) { x }(1)", 0);
    assert!(out.contains(",e₁↓ BlockStatement ↑"), "{}", out);
}

#[test]
fn test_closures_of_one_literal_expand_once_per_path() {
    let mut input = String::from("let wrap = fn(k) { fn() { k() } }; let a0 = fn() { 1 };");
    for i in 1..=6 {
        input.push_str(&format!(" let a{} = wrap(a{});", i, i - 1));
    }
    input.push_str(" a6()");

    let arena = Bump::new();
    let trace = traced(&arena, &input);
    assert_eq!(trace.root().map(|root| root.type_name()), Some("Program"));
    for verbosity in 0..=1 {
        let out = plain(&input, verbosity);
        assert!(out.contains("[.{FUNCTION} … ]"), "{}", out);
        // Re-expanding the inner literal per closure grows factorially (hundreds of MB here).
        assert!(out.len() < 20_000_000, "verbosity {}: {} bytes", verbosity, out.len());
    }
}

#[test]
fn test_full_error_message_is_raw() {
    let out = qtree("my_var", 0);
    assert!(out.contains("{identifier not found: my_var}"), "{}", out);
    assert!(!out.contains(r"identifier not found: my\_var"), "{}", out);
}
