//! Maps entity fields to grammar attributes and their operators.
//!
//! Fields of every mapped entity are exposed as `PREFIX.FIELD`, uppercased.
//! The operators of an attribute follow from its declared type; types
//! without a built-in rule are handed to the registered type resolvers.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{GrammarError, Result};
use crate::extension::{ExtensionRegistry, TypeRequest};
use crate::metadata::{ColumnInfo, EntitySource, FieldMetadataProvider};
use crate::token::OperatorSet;

/// Attribute name to operators, in request order.
pub type AttributeMap = IndexMap<String, OperatorSet>;

/// How prefixed names that occur in more than one entity are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// The entity listed later overwrites the earlier one.
    #[default]
    LastWins,
    /// Any collision fails with [`GrammarError::AttributeCollision`].
    Strict,
}

/// Resolves requested attributes against the mapped entities.
pub struct AttributeMapper<'a, P: ?Sized> {
    provider: &'a P,
    extensions: &'a ExtensionRegistry,
    collisions: CollisionPolicy,
}

impl<'a, P> AttributeMapper<'a, P>
where
    P: FieldMetadataProvider + ?Sized,
{
    pub fn new(provider: &'a P, extensions: &'a ExtensionRegistry) -> Self {
        Self {
            provider,
            extensions,
            collisions: CollisionPolicy::default(),
        }
    }

    pub fn with_collision_policy(mut self, collisions: CollisionPolicy) -> Self {
        self.collisions = collisions;
        self
    }

    /// Builds the combined lookup table of all entities, keyed by attribute
    /// name.
    pub fn column_info(&self, sources: &[EntitySource]) -> Result<IndexMap<String, ColumnInfo>> {
        let mut columns: IndexMap<String, ColumnInfo> = IndexMap::new();

        for source in sources {
            let mapping = self
                .provider
                .field_mapping(&source.entity)
                .map_err(|e| GrammarError::Metadata {
                    entity: source.entity.clone(),
                    source: e,
                })?;
            trace!(entity = %source.entity, prefix = %source.prefix, fields = mapping.len(), "merging entity fields");

            for (field, declared_type) in mapping {
                let name = source.attribute_name(&field);
                let info = ColumnInfo {
                    entity: source.entity.clone(),
                    prefix: source.prefix.clone(),
                    field,
                    declared_type,
                };

                if let Some(previous) = columns.get(&name) {
                    if self.collisions == CollisionPolicy::Strict {
                        return Err(GrammarError::AttributeCollision {
                            attribute: name,
                            first: previous.entity.clone(),
                            second: info.entity,
                        });
                    }
                    debug!(
                        attribute = %name,
                        replaced = %previous.entity,
                        by = %info.entity,
                        "attribute name collision, later entity wins"
                    );
                }
                columns.insert(name, info);
            }
        }

        Ok(columns)
    }

    /// Maps each requested attribute to its operators.
    ///
    /// Keys are ASCII-uppercased before lookup. A requested key repeated in
    /// `attributes` yields one entry.
    pub fn map_attributes<S: AsRef<str>>(
        &self,
        sources: &[EntitySource],
        attributes: &[S],
    ) -> Result<AttributeMap> {
        let columns = self.column_info(sources)?;
        let mut mapped = AttributeMap::with_capacity(attributes.len());

        for requested in attributes {
            let name = requested.as_ref().to_ascii_uppercase();
            let info = columns
                .get(&name)
                .ok_or_else(|| GrammarError::UnknownAttribute(name.clone()))?;
            let operators = self.operators_for(&name, info)?;
            mapped.insert(name, operators);
        }

        Ok(mapped)
    }

    fn operators_for(&self, name: &str, info: &ColumnInfo) -> Result<OperatorSet> {
        if let Some(operators) = info.declared_type.builtin_operators() {
            return Ok(operators);
        }

        let request = TypeRequest::new(name, info);
        self.extensions
            .resolve_type(&request)?
            .ok_or_else(|| GrammarError::UnconfiguredType(info.declared_type.name().to_string()))
    }
}
