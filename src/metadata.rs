//! Entity field metadata consumed by the attribute mapper.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::BoxError;
use crate::field_type::DeclaredType;

/// One mapped entity and the prefix its fields are exposed under,
/// e.g. `Product` under `article`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySource {
    pub entity: String,
    pub prefix: String,
}

impl EntitySource {
    pub fn new(entity: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            prefix: prefix.into(),
        }
    }

    /// Canonical attribute name of one of this entity's fields.
    pub fn attribute_name(&self, field: &str) -> String {
        format!("{}.{}", self.prefix, field).to_ascii_uppercase()
    }
}

/// Field name to declared type, in declaration order.
pub type FieldMapping = IndexMap<String, DeclaredType>;

/// A field resolved to its attribute name, remembering where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub entity: String,
    pub prefix: String,
    pub field: String,
    pub declared_type: DeclaredType,
}

/// Supplies field metadata for an entity.
pub trait FieldMetadataProvider {
    fn field_mapping(&self, entity: &str) -> Result<FieldMapping, BoxError>;
}

impl<P: FieldMetadataProvider + ?Sized> FieldMetadataProvider for &P {
    fn field_mapping(&self, entity: &str) -> Result<FieldMapping, BoxError> {
        (**self).field_mapping(entity)
    }
}

/// A provider backed by an in-memory table, typically loaded from the
/// `fields` section of the JSON config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticMetadataProvider {
    entities: BTreeMap<String, FieldMapping>,
}

impl StaticMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity<I, K, T>(mut self, entity: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<DeclaredType>,
    {
        self.insert_entity(entity, fields);
        self
    }

    pub fn insert_entity<I, K, T>(&mut self, entity: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<DeclaredType>,
    {
        let mapping = fields
            .into_iter()
            .map(|(name, ty)| (name.into(), ty.into()))
            .collect();
        self.entities.insert(entity.into(), mapping);
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, FieldMapping>> for StaticMetadataProvider {
    fn from(entities: BTreeMap<String, FieldMapping>) -> Self {
        Self { entities }
    }
}

impl FieldMetadataProvider for StaticMetadataProvider {
    fn field_mapping(&self, entity: &str) -> Result<FieldMapping, BoxError> {
        self.entities
            .get(entity)
            .cloned()
            .ok_or_else(|| format!("no field metadata for entity {entity}").into())
    }
}
