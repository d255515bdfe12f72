//! End-to-end grammar generation against a custom metadata source.

use filter_grammar::{
    BoxError, DeclaredType, EntitySource, ExtensionRegistry, FieldMapping, FieldMetadataProvider,
    GrammarAssembler, GrammarDescriptor, GrammarError, TypeRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Metadata source that counts lookups, standing in for a database.
struct CatalogMetadata {
    lookups: AtomicUsize,
}

impl CatalogMetadata {
    fn new() -> Self {
        Self {
            lookups: AtomicUsize::new(0),
        }
    }
}

impl FieldMetadataProvider for CatalogMetadata {
    fn field_mapping(&self, entity: &str) -> Result<FieldMapping, BoxError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let fields: &[(&str, &str)] = match entity {
            "Product" => &[("id", "integer"), ("name", "string"), ("price", "currency")],
            "Supplier" => &[("id", "integer"), ("name", "string")],
            other => return Err(format!("unknown entity {other}").into()),
        };
        Ok(fields
            .iter()
            .map(|(name, ty)| (name.to_string(), DeclaredType::parse(ty)))
            .collect())
    }
}

fn sources() -> Vec<EntitySource> {
    vec![
        EntitySource::new("Product", "P"),
        EntitySource::new("Supplier", "S"),
    ]
}

fn requested(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_full_grammar_with_extensions() {
    let metadata = CatalogMetadata::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let mut registry = ExtensionRegistry::new();
    let counter = Arc::clone(&calls);
    registry
        .on_type("currency", move |request: &TypeRequest<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert_eq!(request.subject, "P.PRICE");
            Ok(Some(vec!["=".to_string(), ">".to_string()]))
        })
        .on_grammar(|mut grammar: GrammarDescriptor| {
            grammar
                .nullary_operators
                .insert("ISDISCOUNTED".to_string(), String::new());
            Ok(grammar)
        });

    let assembler = GrammarAssembler::new(
        &metadata,
        &registry,
        sources(),
        requested(&["P.ID", "P.NAME", "S.NAME", "P.PRICE"]),
    );

    let first = assembler.build().unwrap();
    let second = assembler.build().unwrap();
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(metadata.lookups.load(Ordering::SeqCst), 4);

    assert_eq!(first.attributes["P.PRICE"], vec!["=", ">"]);
    assert_ne!(first.attributes["P.NAME"], first.attributes["P.ID"]);
    assert!(first.attributes.contains_key("S.NAME"));
    assert!(first.nullary_operators.contains_key("ISDISCOUNTED"));
    assert!(first.validate_patterns().is_ok());
}

#[test]
fn test_metadata_failure_propagates() {
    let metadata = CatalogMetadata::new();
    let registry = ExtensionRegistry::new();
    let sources = vec![EntitySource::new("Order", "O")];

    let err = GrammarAssembler::new(&metadata, &registry, sources, requested(&["O.ID"]))
        .build()
        .unwrap_err();
    assert!(matches!(err, GrammarError::Metadata { ref entity, .. } if entity == "Order"));
    assert!(!err.is_configuration_error());
}

#[test]
fn test_dyn_provider() {
    let metadata: Box<dyn FieldMetadataProvider> = Box::new(CatalogMetadata::new());
    let registry = ExtensionRegistry::new();

    let grammar = GrammarAssembler::new(metadata.as_ref(), &registry, sources(), requested(&["s.id"]))
        .build()
        .unwrap();
    assert_eq!(
        grammar.operators_for("S.ID").unwrap(),
        &vec![">", ">=", "<", "<=", "=", "!=", "ISNULL"]
    );
}
