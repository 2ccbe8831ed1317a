// ABOUTME: Property-based tests for lifecycle command building.
// ABOUTME: Checks token order and emptiness rules for string and list inputs.

use devconf::config::{CommandSpec, Shape, Strictness};
use devconf::error::Error;
use proptest::prelude::*;
use serde_json::{Value, json};

/// Strategy for shell-ish tokens without whitespace.
fn token_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./=:-]{1,12}".prop_map(String::from)
}

/// Strategy for whitespace runs used between tokens.
fn separator_strategy() -> impl Strategy<Value = String> {
    "[ \t\n]{1,4}".prop_map(String::from)
}

/// Strategy for a command line with irregular spacing, paired with its tokens.
fn command_line_strategy() -> impl Strategy<Value = (String, Vec<String>)> {
    prop::collection::vec((token_strategy(), separator_strategy()), 1..8).prop_flat_map(|parts| {
        ("[ \t]{0,3}", "[ \t\n]{0,3}").prop_map(move |(lead, trail)| {
            let mut line = lead;
            let mut tokens = Vec::new();
            for (i, (token, sep)) in parts.iter().enumerate() {
                if i > 0 {
                    line.push_str(sep);
                }
                line.push_str(token);
                tokens.push(token.clone());
            }
            line.push_str(&trail);
            (line, tokens)
        })
    })
}

fn build(value: &Value) -> Result<CommandSpec, Error> {
    CommandSpec::from_value("postCreateCommand", value, Strictness::Strict)
}

proptest! {
    /// Invariant: the first token is the program and the rest are arguments, in order.
    #[test]
    fn string_splits_in_order((line, tokens) in command_line_strategy()) {
        let cmd = build(&Value::String(line)).unwrap();
        prop_assert_eq!(cmd.program(), tokens[0].as_str());
        prop_assert_eq!(cmd.arguments(), &tokens[1..]);
    }

    /// Invariant: rejoining with single spaces gives the whitespace-normalized input.
    #[test]
    fn display_is_whitespace_normalized((line, tokens) in command_line_strategy()) {
        let cmd = build(&Value::String(line)).unwrap();
        prop_assert_eq!(cmd.to_string(), tokens.join(" "));
    }

    /// Invariant: list elements are taken verbatim, even with embedded spaces.
    #[test]
    fn list_is_taken_verbatim(items in prop::collection::vec(".{0,16}", 1..8)) {
        let cmd = build(&json!(items)).unwrap();
        prop_assert_eq!(cmd.program(), items[0].as_str());
        prop_assert_eq!(cmd.arguments(), &items[1..]);
        prop_assert_eq!(cmd.argv().count(), items.len());
    }

    /// Invariant: whitespace-only strings never yield a command when strict.
    #[test]
    fn blank_strings_are_empty_commands(ws in "[ \t\n]{0,8}") {
        let result = build(&Value::String(ws));
        prop_assert!(matches!(result, Err(Error::EmptyCommand { .. })), "expected EmptyCommand, got {:?}", result);
    }

    /// Invariant: numbers are never commands.
    #[test]
    fn numbers_are_unsupported(n in any::<i64>()) {
        match build(&json!(n)) {
            Err(Error::UnsupportedCommandShape { shape, .. }) => prop_assert_eq!(shape, Shape::Number),
            other => prop_assert!(false, "unexpected result: {:?}", other),
        }
    }
}
