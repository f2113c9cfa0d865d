//! Validation rules for single environment variables.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use super::formats::StringFormat;
use super::value::EnvValue;
use crate::constants::{E_INVALID_ENV_VALUE, E_MISSING_ENV_VALUE};

/// A caller-supplied rule body, called with the key and the raw value.
pub type CustomRuleFn =
    dyn Fn(&str, Option<&str>) -> Result<Option<EnvValue>, RuleError> + Send + Sync;

/// Failure of a single rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("{message}")]
    MissingValue { key: String, message: String },

    #[error("{message}")]
    InvalidValue { key: String, message: String },
}

impl RuleError {
    /// A missing-value failure with the default message.
    pub fn missing(key: &str) -> Self {
        Self::MissingValue {
            key: key.to_string(),
            message: format!("Missing environment variable \"{key}\""),
        }
    }

    /// An invalid-value failure with a custom message.
    pub fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::MissingValue { key, .. } | Self::InvalidValue { key, .. } => key,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingValue { .. } => E_MISSING_ENV_VALUE,
            Self::InvalidValue { .. } => E_INVALID_ENV_VALUE,
        }
    }

    fn with_message(self, message: Option<&str>) -> Self {
        let Some(message) = message else {
            return self;
        };
        match self {
            Self::MissingValue { key, .. } => Self::MissingValue {
                key,
                message: message.to_string(),
            },
            Self::InvalidValue { key, .. } => Self::InvalidValue {
                key,
                message: message.to_string(),
            },
        }
    }
}

#[derive(Clone)]
enum RuleKind {
    Number,
    String(Option<StringFormat>),
    Boolean,
    OneOf(Vec<EnvValue>),
    Custom(Arc<CustomRuleFn>),
}

impl fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => f.write_str("Number"),
            Self::String(format) => f.debug_tuple("String").field(format).finish(),
            Self::Boolean => f.write_str("Boolean"),
            Self::OneOf(choices) => f.debug_tuple("OneOf").field(choices).finish(),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// A rule validating and casting one environment variable.
///
/// Rules are built with the functions in [`crate::schema`] and refined with
/// [`Rule::optional`], [`Rule::message`] and, for strings, [`Rule::format`].
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    optional: bool,
    message: Option<String>,
}

impl Rule {
    fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            optional: false,
            message: None,
        }
    }

    pub(crate) fn number() -> Self {
        Self::new(RuleKind::Number)
    }

    pub(crate) fn string() -> Self {
        Self::new(RuleKind::String(None))
    }

    pub(crate) fn boolean() -> Self {
        Self::new(RuleKind::Boolean)
    }

    pub(crate) fn one_of(choices: Vec<EnvValue>) -> Self {
        Self::new(RuleKind::OneOf(choices))
    }

    /// Wrap a caller-supplied validation function.
    pub fn custom<F>(validate: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> Result<Option<EnvValue>, RuleError> + Send + Sync + 'static,
    {
        Self::new(RuleKind::Custom(Arc::new(validate)))
    }

    /// Accept a missing or empty value, yielding `None`.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Replace the failure message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Require the value to match `format`. No effect on non-string rules.
    pub fn format(mut self, format: StringFormat) -> Self {
        if let RuleKind::String(current) = &mut self.kind {
            *current = Some(format);
        }
        self
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Validate and cast `value` for `key`.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::MissingValue` for an absent or empty value on a
    /// required rule, `RuleError::InvalidValue` when the value does not
    /// satisfy the rule.
    pub fn validate(&self, key: &str, value: Option<&str>) -> Result<Option<EnvValue>, RuleError> {
        let present = value.filter(|value| !value.is_empty());
        if present.is_none() && self.optional {
            return Ok(None);
        }

        self.cast(key, value, present)
            .map_err(|err| err.with_message(self.message.as_deref()))
    }

    /// Custom rules see the raw value; built-in rules only cast present values.
    fn cast(
        &self,
        key: &str,
        raw: Option<&str>,
        present: Option<&str>,
    ) -> Result<Option<EnvValue>, RuleError> {
        let cast = match (&self.kind, present) {
            (RuleKind::Custom(validate), _) => return validate(key, raw),
            (_, None) => return Err(RuleError::missing(key)),
            (RuleKind::Number, Some(value)) => cast_number(value).map(EnvValue::Number).ok_or_else(|| {
                RuleError::invalid(
                    key,
                    format!(
                        "Value for environment variable \"{key}\" must be numeric, instead received \"{value}\""
                    ),
                )
            }),
            (RuleKind::String(format), Some(value)) => match format {
                Some(format) if !format.matches(value) => Err(RuleError::invalid(
                    key,
                    format!(
                        "Value for environment variable \"{key}\" must be {}",
                        format.describe()
                    ),
                )),
                _ => Ok(EnvValue::String(value.to_string())),
            },
            (RuleKind::Boolean, Some(value)) => cast_bool(value).map(EnvValue::Bool).ok_or_else(|| {
                RuleError::invalid(
                    key,
                    format!("Value for environment variable \"{key}\" must be a boolean"),
                )
            }),
            (RuleKind::OneOf(choices), Some(value)) => cast_choice(value, choices).ok_or_else(|| {
                let choices = choices
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                RuleError::invalid(
                    key,
                    format!("Value for environment variable \"{key}\" must be one of \"{choices}\""),
                )
            }),
        };
        cast.map(Some)
    }
}

/// Parse a finite decimal number, allowing surrounding whitespace.
fn cast_number(value: &str) -> Option<f64> {
    // `f64::from_str` also accepts `inf` and `NaN`.
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn cast_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Try each cast in order; the first result equal to a choice wins.
fn cast_choice(value: &str, choices: &[EnvValue]) -> Option<EnvValue> {
    let casts: [fn(&str) -> Option<EnvValue>; 3] = [
        |value| cast_bool(value).map(EnvValue::Bool),
        |value| cast_number(value).map(EnvValue::Number),
        |value| Some(EnvValue::String(value.to_string())),
    ];

    casts
        .iter()
        .filter_map(|cast| cast(value))
        .find(|candidate| choices.contains(candidate))
}

/// Error returned when a compact rule spec cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Invalid rule \"{0}\": expected number, string, string:email|host|url, boolean or enum:a,b,..."
)]
pub struct ParseRuleError(pub String);

/// Parses compact specs such as `number`, `string:email`, `enum:api,web` or
/// `boolean?` (a trailing `?` marks the rule optional).
impl FromStr for Rule {
    type Err = ParseRuleError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let trimmed = spec.trim();
        let (body, optional) = match trimmed.strip_suffix('?') {
            Some(body) => (body, true),
            None => (trimmed, false),
        };
        let (name, argument) = match body.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (body, None),
        };

        let rule = match (name, argument) {
            ("number", None) => Rule::number(),
            ("boolean" | "bool", None) => Rule::boolean(),
            ("string", None) => Rule::string(),
            ("string", Some("email")) => Rule::string().format(StringFormat::Email),
            ("string", Some("host")) => Rule::string().format(StringFormat::Host),
            ("string", Some("url")) => Rule::string().format(StringFormat::url()),
            ("enum", Some(choices)) if !choices.is_empty() => {
                Rule::one_of(choices.split(',').map(parse_choice).collect())
            }
            _ => return Err(ParseRuleError(spec.to_string())),
        };

        Ok(if optional { rule.optional() } else { rule })
    }
}

fn parse_choice(choice: &str) -> EnvValue {
    let choice = choice.trim();
    match choice {
        "true" => EnvValue::Bool(true),
        "false" => EnvValue::Bool(false),
        _ => cast_number(choice)
            .map(EnvValue::Number)
            .unwrap_or_else(|| EnvValue::String(choice.to_string())),
    }
}
