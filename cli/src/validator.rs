use reedline::{ValidationResult, Validator};

/// Nesting depth of `{`/`(` left open at the end of `buffer`. Closers without a matching
/// opener count as zero.
pub fn open_depth(buffer: &str) -> usize {
    let mut depth: isize = 0;
    for c in buffer.chars() {
        match c {
            '{' | '(' => depth += 1,
            '}' | ')' => depth -= 1,
            _ => {}
        }
    }
    depth.max(0) as usize
}

/// Keeps reading lines while a block or call is still open.
pub struct BracketValidator;

impl Validator for BracketValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        if open_depth(line) > 0 {
            ValidationResult::Incomplete
        } else {
            ValidationResult::Complete
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_depth() {
        assert_eq!(open_depth("let f = fn(x) {"), 1);
        assert_eq!(open_depth("let f = fn(x) { x };"), 0);
        assert_eq!(open_depth("f(g(1"), 2);
        assert_eq!(open_depth("}}"), 0);
    }

    #[test]
    fn test_incomplete_block() {
        assert!(matches!(
            BracketValidator.validate("if (x) {"),
            ValidationResult::Incomplete
        ));
        assert!(matches!(
            BracketValidator.validate(":eval 1 + 2"),
            ValidationResult::Complete
        ));
    }
}
