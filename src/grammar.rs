//! Assembles the grammar descriptor handed to the filter lexer.
//!
//! The descriptor combines a fixed table of structural rules (operators,
//! grouping tokens, boolean connectives, literal patterns) with the
//! attributes of the mapped entities. Registered grammar filters may
//! rewrite the result before it is returned.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attribute_mapper::{AttributeMap, AttributeMapper, CollisionPolicy};
use crate::error::{GrammarError, Result};
use crate::extension::ExtensionRegistry;
use crate::metadata::{EntitySource, FieldMetadataProvider};
use crate::token::{self, OperatorSet};

/// The complete set of legal tokens and attribute/operator pairings.
///
/// Serializes to the JSON layout the lexer reads; the key names are part of
/// that contract.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarDescriptor {
    /// Operators without operand. Values are empty placeholders.
    pub nullary_operators: IndexMap<String, String>,
    /// Operators applied to an attribute alone. Values are empty placeholders.
    pub unary_operators: IndexMap<String, String>,
    /// Operators with a right-hand literal, mapped to the accepted literal
    /// patterns.
    pub binary_operators: IndexMap<String, Vec<String>>,
    pub sub_operators: Vec<String>,
    pub bool_operators: Vec<String>,
    pub values: Vec<String>,
    pub attributes: AttributeMap,
}

fn placeholders(tokens: &[&str]) -> IndexMap<String, String> {
    tokens.iter().map(|t| (t.to_string(), String::new())).collect()
}

impl GrammarDescriptor {
    /// The fixed structural rules, with no attributes.
    pub fn structural() -> Self {
        let comparable = [token::NUMBER_OPERAND_PATTERN, token::QUOTED_STRING_PATTERN];
        let quoted = [token::QUOTED_STRING_PATTERN];

        let binary: [(&str, &[&str]); 9] = [
            (token::IN, &[token::LPAREN]),
            (token::GTE, &comparable),
            (token::EQ, &comparable),
            (token::NOT_EQ, &comparable),
            (token::NOT_LIKE, &quoted),
            (token::LIKE, &quoted),
            (token::GT, &comparable),
            (token::LTE, &comparable),
            (token::LT, &comparable),
        ];

        Self {
            nullary_operators: placeholders(&[
                token::HAS_IMAGE,
                token::HAS_NO_IMAGE,
                token::IS_MAIN,
                token::HAS_PROPERTIES,
                token::HAS_CONFIGURATOR,
                token::HAS_BLOCK_PRICE,
            ]),
            unary_operators: placeholders(&[token::IS_TRUE, token::IS_FALSE, token::IS_NULL]),
            binary_operators: binary
                .iter()
                .map(|(op, patterns)| (op.to_string(), token::operator_set(patterns)))
                .collect(),
            sub_operators: token::operator_set(&[token::LPAREN, token::RPAREN]),
            bool_operators: token::operator_set(&[token::AND, token::OR]),
            values: token::operator_set(&[
                token::QUOTED_STRING_PATTERN,
                token::NUMBER_VALUE_PATTERN,
            ]),
            attributes: AttributeMap::new(),
        }
    }

    pub fn operators_for(&self, attribute: &str) -> Option<&OperatorSet> {
        self.attributes.get(&attribute.to_ascii_uppercase())
    }

    /// Compiles every `/.../` delimited pattern. Undelimited entries, like
    /// the `(` accepted after `IN`, are plain tokens and are skipped.
    pub fn validate_patterns(&self) -> Result<()> {
        let patterns = self
            .binary_operators
            .values()
            .flatten()
            .chain(self.values.iter());

        for pattern in patterns {
            let body = token::pattern_body(pattern);
            if body.len() == pattern.len() {
                continue;
            }
            Regex::new(body).map_err(|source| GrammarError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds the grammar for a set of entities and requested attributes.
pub struct GrammarAssembler<'a, P: ?Sized> {
    mapper: AttributeMapper<'a, P>,
    extensions: &'a ExtensionRegistry,
    sources: Vec<EntitySource>,
    attributes: Vec<String>,
}

impl<'a, P> GrammarAssembler<'a, P>
where
    P: FieldMetadataProvider + ?Sized,
{
    pub fn new(
        provider: &'a P,
        extensions: &'a ExtensionRegistry,
        sources: Vec<EntitySource>,
        attributes: Vec<String>,
    ) -> Self {
        Self {
            mapper: AttributeMapper::new(provider, extensions),
            extensions,
            sources,
            attributes,
        }
    }

    pub fn with_collision_policy(mut self, collisions: CollisionPolicy) -> Self {
        self.mapper = self.mapper.with_collision_policy(collisions);
        self
    }

    /// Generates the attribute section alone.
    pub fn attributes(&self) -> Result<AttributeMap> {
        self.mapper.map_attributes(&self.sources, self.attributes.as_slice())
    }

    pub fn build(&self) -> Result<GrammarDescriptor> {
        let grammar = GrammarDescriptor {
            attributes: self.attributes()?,
            ..GrammarDescriptor::structural()
        };
        debug!(
            attributes = grammar.attributes.len(),
            filters = self.extensions.filter_count(),
            "grammar assembled"
        );

        self.extensions.filter_grammar(grammar)
    }
}
