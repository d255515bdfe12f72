//! Grammar descriptor generator for the bulk-edit filter language.
//!
//! Maps fields of several entities to prefixed, uppercase attributes, derives
//! the operators each attribute supports from its declared type, and
//! combines them with the fixed structural rules into a [`GrammarDescriptor`]
//! that the filter lexer consumes.

pub mod attribute_mapper;
pub mod config;
pub mod error;
pub mod extension;
pub mod field_type;
pub mod grammar;
pub mod metadata;
pub mod token;

pub use attribute_mapper::{AttributeMap, AttributeMapper, CollisionPolicy};
pub use config::{ConfigError, GrammarConfig};
pub use error::{BoxError, GrammarError, Result};
pub use extension::{ExtensionRegistry, GrammarFilter, StaticTypeResolver, TypeRequest, TypeResolver};
pub use field_type::DeclaredType;
pub use grammar::{GrammarAssembler, GrammarDescriptor};
pub use metadata::{ColumnInfo, EntitySource, FieldMapping, FieldMetadataProvider, StaticMetadataProvider};
pub use token::OperatorSet;
