//! Variable interpolation for raw dot-env values.
//!
//! Responsibilities:
//! - Resolve `$NAME` and `${NAME}` references inside a raw value.
//! - Unwrap `\$` escapes into literal `$` signs.
//! - Apply the ambient-vs-parsed precedence when a name exists in both places.
//!
//! Does NOT handle:
//! - Decoding dot-env text (see `decoder.rs`).
//! - Identifier transforms such as `file:path` (see `identifiers.rs`).
//!
//! Invariants:
//! - References resolve against the raw table of the same file only; values
//!   from other files are only visible through the ambient table.
//! - A backslash right before `$` always yields a literal `$` and the text
//!   after that `$` is never treated as a reference.
//! - Values without `$` are returned unchanged.
//! - Interpolation never fails; unknown names resolve to the empty string.

use crate::EnvMap;
use crate::ambient::Environment;

/// Resolves variable references against a raw table and the ambient table.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator {
    prefer_ambient: bool,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lookup state for one top-level resolution.
struct Scope<'a> {
    raw: &'a EnvMap,
    env: &'a dyn Environment,
    /// Names whose raw values are currently being expanded.
    expanding: Vec<String>,
}

impl Interpolator {
    /// Create an interpolator preferring non-empty ambient values.
    pub fn new() -> Self {
        Self {
            prefer_ambient: true,
        }
    }

    /// Prefer values from the raw table over ambient values.
    pub fn prefer_parsed(mut self) -> Self {
        self.prefer_ambient = false;
        self
    }

    /// Whether non-empty ambient values win over raw table entries.
    pub fn prefers_ambient(&self) -> bool {
        self.prefer_ambient
    }

    /// Interpolate every reference inside `value`.
    pub fn interpolate(&self, value: &str, raw: &EnvMap, env: &dyn Environment) -> String {
        let mut scope = Scope {
            raw,
            env,
            expanding: Vec::new(),
        };
        self.interpolate_in(value, &mut scope)
    }

    /// Resolve the value a reference to `name` expands to.
    pub fn resolve(&self, name: &str, raw: &EnvMap, env: &dyn Environment) -> String {
        let mut scope = Scope {
            raw,
            env,
            expanding: Vec::new(),
        };
        self.resolve_in(name, &mut scope)
    }

    /// Interpolate the raw value of `name` itself, ignoring any ambient value
    /// for `name`. A self-reference such as `PATH=$PATH:/opt/bin` still
    /// reads the ambient value.
    pub fn expand(&self, name: &str, raw: &EnvMap, env: &dyn Environment) -> String {
        let Some(raw_value) = raw.get(name) else {
            return String::new();
        };
        let mut scope = Scope {
            raw,
            env,
            expanding: vec![name.to_string()],
        };
        self.interpolate_in(raw_value, &mut scope)
    }

    fn resolve_in(&self, name: &str, scope: &mut Scope<'_>) -> String {
        if self.prefer_ambient
            && let Some(value) = scope.env.get_non_empty(name)
        {
            return value;
        }

        let raw = scope.raw;
        if let Some(raw_value) = raw.get(name).filter(|value| !value.is_empty()) {
            if scope.expanding.iter().any(|expanding| expanding == name) {
                tracing::warn!(
                    name = %name,
                    "Cyclic variable reference, falling back to the ambient value"
                );
            } else {
                scope.expanding.push(name.to_string());
                let resolved = self.interpolate_in(raw_value, scope);
                scope.expanding.pop();
                return resolved;
            }
        }

        scope.env.get(name).unwrap_or_default()
    }

    fn interpolate_in(&self, value: &str, scope: &mut Scope<'_>) -> String {
        if !value.contains('$') {
            return value.to_string();
        }

        let mut output = String::with_capacity(value.len());
        // Text before the first `$` is never a reference.
        let mut skip_next = true;

        let tokens: Vec<&str> = value.split('$').collect();
        let last = tokens.len() - 1;

        for (index, token) in tokens.into_iter().enumerate() {
            // A trailing backslash only escapes when a `$` follows it.
            let followed_by_dollar = index < last;

            // `\$` with nothing between it and the next `$`.
            if token == "\\" && followed_by_dollar {
                output.push('$');
                skip_next = true;
                continue;
            }

            if skip_next {
                if let Some(literal) = token.strip_suffix('\\').filter(|_| followed_by_dollar) {
                    output.push_str(literal);
                    output.push('$');
                    continue;
                }
                output.push_str(token);
                skip_next = false;
                continue;
            }

            let (reference, escaped) = match token.strip_suffix('\\') {
                Some(reference) if followed_by_dollar => (reference, true),
                _ => (token, false),
            };

            if reference.starts_with('{') {
                self.push_mustache(reference, scope, &mut output);
            } else {
                self.push_variable(reference, scope, &mut output);
            }

            if escaped {
                output.push('$');
                skip_next = true;
            }
        }

        output
    }

    /// `{NAME}rest`: everything up to the first closing brace is the name.
    fn push_mustache(&self, token: &str, scope: &mut Scope<'_>, output: &mut String) {
        let Some(closing) = token.find('}') else {
            output.push_str(token);
            return;
        };

        let name = token[1..closing].trim();
        output.push_str(&self.resolve_in(name, scope));
        output.push_str(&token[closing + 1..]);
    }

    /// `NAMErest`: the leading run of letters, digits and underscores is the name.
    fn push_variable(&self, token: &str, scope: &mut Scope<'_>, output: &mut String) {
        let end = token
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(token.len());

        if end == 0 {
            output.push_str(token);
            return;
        }

        output.push_str(&self.resolve_in(&token[..end], scope));
        output.push_str(&token[end..]);
    }
}
