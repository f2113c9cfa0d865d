//! Typed values produced by schema rules.

use std::fmt;

use serde::Serialize;

/// A validated environment value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl EnvValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

/// Integral numbers print without a fractional part (`22`, not `22.0`), so
/// the string form of a cast value reads like the dot-env value it came from.
impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Self::Number(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for EnvValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnvValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for EnvValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for EnvValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for EnvValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for EnvValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_dotenv_form() {
        assert_eq!(EnvValue::from(22).to_string(), "22");
        assert_eq!(EnvValue::from(-22.198).to_string(), "-22.198");
        assert_eq!(EnvValue::from(true).to_string(), "true");
        assert_eq!(EnvValue::from("web").to_string(), "web");
    }

    #[test]
    fn test_serializes_untagged() {
        let values = vec![
            EnvValue::from("web"),
            EnvValue::from(3000),
            EnvValue::from(false),
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"["web",3000.0,false]"#
        );
    }

    #[test]
    fn test_accessors_are_type_strict() {
        let value = EnvValue::from(1);
        assert_eq!(value.as_number(), Some(1.0));
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_str(), None);
    }
}
