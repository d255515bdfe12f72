//! The token vocabulary of the filter language.
//!
//! These strings are the compatibility surface shared with the external
//! lexer. Renaming any of them breaks existing filter expressions.

/// An ordered list of operator tokens allowed for one attribute.
pub type OperatorSet = Vec<String>;

// Comparison operators
pub const GT: &str = ">";
pub const GTE: &str = ">=";
pub const LT: &str = "<";
pub const LTE: &str = "<=";
pub const EQ: &str = "=";
pub const NOT_EQ: &str = "!=";
pub const LIKE: &str = "~";
pub const NOT_LIKE: &str = "!~";
pub const IN: &str = "IN";

// Unary operators
pub const IS_TRUE: &str = "ISTRUE";
pub const IS_FALSE: &str = "ISFALSE";
pub const IS_NULL: &str = "ISNULL";

// Nullary operators
pub const HAS_IMAGE: &str = "HASIMAGE";
pub const HAS_NO_IMAGE: &str = "HASNOIMAGE";
pub const IS_MAIN: &str = "ISMAIN";
pub const HAS_PROPERTIES: &str = "HASPROPERTIES";
pub const HAS_CONFIGURATOR: &str = "HASCONFIGURATOR";
pub const HAS_BLOCK_PRICE: &str = "HASBLOCKPRICE";

// Punctuation
pub const LPAREN: &str = "(";
pub const RPAREN: &str = ")";

// Boolean connectives
pub const AND: &str = "AND";
pub const OR: &str = "OR";

/// Right-hand side of a binary comparison: an optionally signed number.
pub const NUMBER_OPERAND_PATTERN: &str = "/(^-{0,1}[0-9.]+$)/";
/// A double-quoted string literal.
pub const QUOTED_STRING_PATTERN: &str = r#"/"(.*?)"/"#;
/// Generic number literal, as listed under `values`.
pub const NUMBER_VALUE_PATTERN: &str = "/^-{0,1}[0-9.]+$/";

/// Numeric columns: integer, decimal, float.
pub const NUMERIC_OPERATORS: &[&str] = &[GT, GTE, LT, LTE, EQ, NOT_EQ, IS_NULL];
/// Text columns: text, string.
pub const TEXT_OPERATORS: &[&str] = &[EQ, LIKE, NOT_LIKE, IN, NOT_EQ, IS_NULL];
pub const BOOLEAN_OPERATORS: &[&str] = &[IS_TRUE, IS_FALSE, IS_NULL];
/// Date columns: date, datetime. No `!=`.
pub const DATE_OPERATORS: &[&str] = &[GT, GTE, LT, LTE, EQ, IS_NULL];

/// Copies a static operator table into an owned [`OperatorSet`].
pub fn operator_set(tokens: &[&str]) -> OperatorSet {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// Strips the `/.../` delimiters from a pattern string.
///
/// Patterns without delimiters, such as the bare `(` accepted after `IN`,
/// are returned unchanged.
pub fn pattern_body(pattern: &str) -> &str {
    pattern
        .strip_prefix('/')
        .and_then(|p| p.strip_suffix('/'))
        .unwrap_or(pattern)
}
