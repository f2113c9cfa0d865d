//! Property-based tests for dot-env parsing and interpolation.
//!
//! Test coverage:
//! - Text without `$` is returned unchanged by the interpolator
//! - Escaped dollars always produce a literal `$`
//! - Simple KEY=value lines decode to exactly their key and value
//! - References to keys of the same contents resolve to their values

use proptest::prelude::*;

use envlayer_config::parser::decode;
use envlayer_config::{EnvMap, EnvParser, Interpolator, MemoryEnvironment};

/// Strategy for generating variable names.
fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,15}".prop_map(String::from)
}

/// Strategy for generating values that need no quoting or escaping.
fn plain_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./:@-]{0,32}".prop_map(String::from)
}

proptest! {
    #[test]
    fn test_text_without_dollar_is_unchanged(value in "[^$]{0,64}") {
        let env = MemoryEnvironment::new();
        let interpolated = Interpolator::new().interpolate(&value, &EnvMap::new(), &env);
        prop_assert_eq!(interpolated, value);
    }

    #[test]
    fn test_escaped_dollar_is_literal(prefix in "[a-z0-9.]{0,8}", suffix in "[A-Za-z0-9_.]{0,8}") {
        let env = MemoryEnvironment::new();
        let raw = format!("{prefix}\\${suffix}");

        let interpolated = Interpolator::new().interpolate(&raw, &EnvMap::new(), &env);

        prop_assert_eq!(interpolated, format!("{prefix}${suffix}"));
    }

    #[test]
    fn test_plain_lines_decode_exactly(key in key_strategy(), value in plain_value_strategy()) {
        let decoded = decode(&format!("{key}={value}"));

        prop_assert_eq!(decoded.len(), 1);
        prop_assert_eq!(decoded.get(&key), Some(&value));
    }

    #[test]
    fn test_same_file_references_resolve(key in key_strategy(), value in "[a-zA-Z0-9_./:@-]{1,32}") {
        prop_assume!(key != "COPY");
        let env = MemoryEnvironment::new();

        let parsed = EnvParser::new()
            .parse(&format!("{key}={value}\nCOPY=${{{key}}}"), &env)
            .unwrap();

        prop_assert_eq!(&parsed["COPY"], &value);
    }
}
