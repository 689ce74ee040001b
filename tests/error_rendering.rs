use bumpalo::Bump;
use evaltree::{Level, Scope, render_error_to_string_no_color};

fn rendered_failure(input: &str, level: Level) -> String {
    let arena = Bump::new();
    match evaltree::run(&arena, input, level, Scope::new(&arena)) {
        Err(e) => render_error_to_string_no_color(&e),
        Ok(_) => panic!("Expected '{}' to fail", input),
    }
}

#[test]
fn test_unclosed_block() {
    let output = rendered_failure("if (x) { 1", Level::Program);
    assert!(output.contains("Syntax error"), "{}", output);
    assert!(output.contains("<input>"), "{}", output);
}

#[test]
fn test_statement_at_expression_level() {
    let output = rendered_failure("let y = 2;", Level::Expression);
    assert!(output.contains("Syntax error"), "{}", output);
    assert!(output.contains("let y = 2;"), "{}", output);
}

#[test]
fn test_error_values_are_not_failures() {
    let arena = Bump::new();
    let run = evaltree::run(&arena, "-true", Level::Program, Scope::new(&arena)).unwrap();
    assert_eq!(
        run.value().map(|value| value.to_string()).as_deref(),
        Some("ERROR: unknown operator: -BOOLEAN")
    );
}
