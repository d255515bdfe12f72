//! Declared storage types of entity fields.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::token::{self, OperatorSet};

/// The storage type a field is declared with in the metadata source.
///
/// Anything outside the built-in set is kept verbatim in `Custom` and has to
/// be resolved through a [`TypeResolver`](crate::extension::TypeResolver).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Integer,
    Decimal,
    Float,
    Text,
    String,
    Boolean,
    Date,
    DateTime,
    Custom(String),
}

impl DeclaredType {
    /// Parses a declared type name. Only the exact lowercase built-in names
    /// are recognized; `Integer` or `DATE` stay custom.
    pub fn parse(name: &str) -> Self {
        match name {
            "integer" => DeclaredType::Integer,
            "decimal" => DeclaredType::Decimal,
            "float" => DeclaredType::Float,
            "text" => DeclaredType::Text,
            "string" => DeclaredType::String,
            "boolean" => DeclaredType::Boolean,
            "date" => DeclaredType::Date,
            "datetime" => DeclaredType::DateTime,
            _ => DeclaredType::Custom(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DeclaredType::Integer => "integer",
            DeclaredType::Decimal => "decimal",
            DeclaredType::Float => "float",
            DeclaredType::Text => "text",
            DeclaredType::String => "string",
            DeclaredType::Boolean => "boolean",
            DeclaredType::Date => "date",
            DeclaredType::DateTime => "datetime",
            DeclaredType::Custom(name) => name,
        }
    }

    /// Operators for the built-in types, `None` for custom ones.
    pub fn builtin_operators(&self) -> Option<OperatorSet> {
        let table = match self {
            DeclaredType::Integer | DeclaredType::Decimal | DeclaredType::Float => {
                token::NUMERIC_OPERATORS
            }
            DeclaredType::Text | DeclaredType::String => token::TEXT_OPERATORS,
            DeclaredType::Boolean => token::BOOLEAN_OPERATORS,
            DeclaredType::Date | DeclaredType::DateTime => token::DATE_OPERATORS,
            DeclaredType::Custom(_) => return None,
        };
        Some(token::operator_set(table))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, DeclaredType::Custom(_))
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for DeclaredType {
    fn from(name: &str) -> Self {
        DeclaredType::parse(name)
    }
}

impl Serialize for DeclaredType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DeclaredType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(DeclaredType::parse(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtin_exact_names() {
        assert_eq!(DeclaredType::parse("integer"), DeclaredType::Integer);
        assert_eq!(DeclaredType::parse("datetime"), DeclaredType::DateTime);
        assert_eq!(DeclaredType::parse("string"), DeclaredType::String);
    }

    #[test]
    fn test_parse_other_case_is_custom() {
        assert_eq!(
            DeclaredType::parse("Integer"),
            DeclaredType::Custom("Integer".to_string())
        );
        assert_eq!(DeclaredType::parse("DATE").builtin_operators(), None);
    }

    #[test]
    fn test_parse_custom_keeps_spelling() {
        let ty = DeclaredType::parse("Currency");
        assert_eq!(ty, DeclaredType::Custom("Currency".to_string()));
        assert_eq!(ty.name(), "Currency");
        assert!(ty.is_custom());
        assert_eq!(ty.builtin_operators(), None);
    }

    #[test]
    fn test_builtin_operator_table() {
        let numeric = vec![">", ">=", "<", "<=", "=", "!=", "ISNULL"];
        let text = vec!["=", "~", "!~", "IN", "!=", "ISNULL"];
        let date = vec![">", ">=", "<", "<=", "=", "ISNULL"];

        for ty in ["integer", "decimal", "float"] {
            assert_eq!(DeclaredType::parse(ty).builtin_operators().unwrap(), numeric);
        }
        for ty in ["text", "string"] {
            assert_eq!(DeclaredType::parse(ty).builtin_operators().unwrap(), text);
        }
        for ty in ["date", "datetime"] {
            assert_eq!(DeclaredType::parse(ty).builtin_operators().unwrap(), date);
        }
        assert_eq!(
            DeclaredType::Boolean.builtin_operators().unwrap(),
            vec!["ISTRUE", "ISFALSE", "ISNULL"]
        );
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&DeclaredType::DateTime).unwrap();
        assert_eq!(json, r#""datetime""#);

        let ty: DeclaredType = serde_json::from_str(r#""currency""#).unwrap();
        assert_eq!(ty, DeclaredType::Custom("currency".to_string()));

        let custom = DeclaredType::parse("Integer");
        let json = serde_json::to_string(&custom).unwrap();
        let back: DeclaredType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, custom);
    }
}
