use bumpalo::Bump;
use indoc::indoc;
use pretty_assertions::assert_eq;

use super::*;
use crate::parser;

fn traced<'a>(arena: &'a Bump, input: &str) -> (&'a Node<'a>, Traced<'a>) {
    let input = arena.alloc_str(input);
    let parsed = parser::parse(arena, input).expect("parsing failed");
    let traced = eval_traced(arena, parsed.node, Scope::new(arena)).expect("evaluation failed");
    (parsed.node, traced)
}

#[test]
fn test_entries_and_exits_share_one_counter() {
    let arena = Bump::new();
    let (root, Traced { value, trace }) = traced(&arena, "5");

    assert_eq!(value.and_then(|v| v.as_int()), Some(5));
    assert_eq!(trace.steps(), 6);
    assert_eq!(trace.root().map(|n| n.type_name()), Some("Program"));
    assert!(trace.root().unwrap().is(root));

    let entry_steps: Vec<_> = trace.entries().map(|e| e.step).collect();
    let exit_steps: Vec<_> = trace.exits().map(|e| e.step).collect();
    assert_eq!(entry_steps, [0, 1, 2]);
    assert_eq!(exit_steps, [3, 4, 5]);

    let literal = trace.entry(2).unwrap().node;
    let exit = trace.exit_at(3).unwrap();
    assert!(exit.node.is(literal));
    assert_eq!(exit.value.and_then(|v| v.as_int()), Some(5));

    assert!(trace.entry(3).is_none());
    assert!(trace.exit_at(2).is_none());
    assert!(trace.entry(99).is_none());
}

#[test]
fn test_let_exits_without_value() {
    let arena = Bump::new();
    let (_, Traced { trace, .. }) = traced(&arena, "let x = 1;");
    let let_exit = trace
        .exits()
        .find(|exit| exit.node.type_name() == "LetStatement")
        .unwrap();
    assert!(let_exit.value.is_none());
}

#[test]
fn test_scopes_in_first_seen_order() {
    let arena = Bump::new();
    let (_, Traced { trace, .. }) = traced(&arena, "let f = fn(x) { x }; f(1); f(2);");

    // Global scope plus one scope per call.
    assert_eq!(trace.scopes().len(), 3);
    let global = trace.entry(0).unwrap().scope;
    assert_eq!(trace.scope_id(global), ScopeId(Some(0)));

    let call_scopes: Vec<_> = trace
        .entries()
        .filter(|entry| entry.node.type_name() == "BlockStatement")
        .map(|entry| trace.scope_id(entry.scope))
        .collect();
    assert_eq!(call_scopes, [ScopeId(Some(1)), ScopeId(Some(2))]);

    let stranger = Scope::new(&arena);
    assert_eq!(trace.scope_id(stranger), ScopeId::UNKNOWN);
    assert_eq!(ScopeId::UNKNOWN.to_string(), "-1");
}

#[test]
fn test_until_keeps_prefix() {
    let arena = Bump::new();
    let (_, Traced { trace, .. }) = traced(&arena, "let f = fn(x) { x }; f(1);");

    let first_call_step = trace
        .entries()
        .find(|entry| !entry.scope.is(trace.scopes()[0]))
        .map(|entry| entry.step)
        .unwrap();

    let before = trace.until(first_call_step - 1);
    assert_eq!(before.steps(), first_call_step);
    assert_eq!(before.scopes().len(), 1);

    let at = trace.until(first_call_step);
    assert_eq!(at.steps(), first_call_step + 1);
    assert_eq!(at.scopes().len(), 2);

    let everything = trace.until(usize::MAX);
    assert_eq!(everything.steps(), trace.steps());
}

#[test]
fn test_display_lists_events() {
    let arena = Bump::new();
    let (_, Traced { trace, .. }) = traced(&arena, "5");
    assert_eq!(
        trace.to_string(),
        indoc! {"
            0 \u{2193} e0 Program: 5;
            1 \u{2193} e0 ExpressionStatement: 5;
            2 \u{2193} e0 IntegerLiteral: 5
            3 \u{2191} e0 IntegerLiteral => 5
            4 \u{2191} e0 ExpressionStatement => 5
            5 \u{2191} e0 Program => 5
        "}
    );
}

#[test]
fn test_display_pads_step_numbers() {
    let arena = Bump::new();
    let (_, Traced { trace, .. }) = traced(&arena, "1 + 2 + 3");
    let listing = trace.to_string();
    let first = listing.lines().next().unwrap();
    assert_eq!(first, " 0 \u{2193} e0 Program: ((1 + 2) + 3);");
}
