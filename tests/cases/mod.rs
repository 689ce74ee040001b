#![allow(dead_code)]

use once_cell::sync::Lazy;

pub struct TestCase {
    pub name: &'static str,
    pub input: &'static str,
    /// Inspect form of the program's value, `None` when the last statement yields nothing.
    pub value: Option<&'static str>,
}

pub static TEST_CASES: Lazy<Vec<TestCase>> = Lazy::new(|| {
    vec![
        TestCase {
            name: "integer",
            input: "5",
            value: Some("5"),
        },
        TestCase {
            name: "arithmetic",
            input: "(5 + 10 * 2 + 15 / 3) * 2 + -10",
            value: Some("50"),
        },
        TestCase {
            name: "comparison",
            input: "(1 < 2) == true",
            value: Some("true"),
        },
        TestCase {
            name: "bang",
            input: "!!5",
            value: Some("true"),
        },
        TestCase {
            name: "if_else",
            input: "if (1 > 2) { 10 } else { 20 }",
            value: Some("20"),
        },
        TestCase {
            name: "if_without_else",
            input: "if (false) { 10 }",
            value: Some("null"),
        },
        TestCase {
            name: "let_only",
            input: "let a = 5;",
            value: None,
        },
        TestCase {
            name: "nested_return",
            input: "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
            value: Some("10"),
        },
        TestCase {
            name: "type_mismatch",
            input: "5 + true; 5;",
            value: Some("ERROR: type mismatch: INTEGER + BOOLEAN"),
        },
        TestCase {
            name: "unknown_identifier",
            input: "foobar",
            value: Some("ERROR: identifier not found: foobar"),
        },
        TestCase {
            name: "closure",
            input: "let adder = fn(x) { fn(y) { x + y } }; let add2 = adder(2); add2(3)",
            value: Some("5"),
        },
        TestCase {
            name: "shared_binding",
            input: "let a = 7; let b = a; a + b",
            value: Some("14"),
        },
        TestCase {
            name: "recursion",
            input: "let f = fn(n) { if (n < 1) { 0 } else { n + f(n - 1) } }; f(3)",
            value: Some("6"),
        },
        TestCase {
            name: "function_value",
            input: "fn(x) { x * 2; }",
            value: Some("fn(x) {\n(x * 2)\n}"),
        },
    ]
});

#[macro_export]
macro_rules! test_case {
    ($name:ident, input: $input:expr, value: $value:expr $(,)?) => {
        #[test]
        fn $name() {
            let arena = bumpalo::Bump::new();
            let run = evaltree::run(
                &arena,
                $input,
                evaltree::Level::Program,
                evaltree::Scope::new(&arena),
            )
            .expect("run failed");
            let value = run.value().map(|value| value.to_string());
            pretty_assertions::assert_eq!(value.as_deref(), $value);
        }
    };
    ($name:ident, input: $input:expr, error: $error:pat $(,)?) => {
        #[test]
        fn $name() {
            let arena = bumpalo::Bump::new();
            let result = evaltree::run(
                &arena,
                $input,
                evaltree::Level::Program,
                evaltree::Scope::new(&arena),
            );
            assert!(matches!(result, Err($error)), "{:?}", result.map(|_| ()));
        }
    };
}
