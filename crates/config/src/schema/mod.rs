//! Typed schema rules for environment variables.
//!
//! Responsibilities:
//! - Build rules: `number`, `string` (optionally formatted), `boolean`,
//!   `one_of`, and caller-supplied custom rules.
//! - Validate and cast one raw value per call.
//!
//! Does NOT handle:
//! - Choosing which value a key is validated against (see `validator.rs`).
//!
//! Invariants:
//! - A required rule treats an empty string like an absent value.
//! - An optional rule yields `None` for absent or empty values; every other
//!   failure still stands.
//! - `Rule::message` replaces every failure message of its rule.

mod formats;
mod rules;
mod value;

pub use formats::{StringFormat, UrlOptions};
pub use rules::{CustomRuleFn, ParseRuleError, Rule, RuleError};
pub use value::EnvValue;

/// A value that must parse as a finite number.
pub fn number() -> Rule {
    Rule::number()
}

/// Any non-empty string. Narrow it with [`Rule::format`].
pub fn string() -> Rule {
    Rule::string()
}

/// `1`/`true` or `0`/`false`.
pub fn boolean() -> Rule {
    Rule::boolean()
}

/// One of `choices`, compared after casting the raw value to a boolean,
/// then a number, then a string.
pub fn one_of<I, V>(choices: I) -> Rule
where
    I: IntoIterator<Item = V>,
    V: Into<EnvValue>,
{
    Rule::one_of(choices.into_iter().map(Into::into).collect())
}
