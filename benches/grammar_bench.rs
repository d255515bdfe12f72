use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use filter_grammar::{
    AttributeMapper, EntitySource, ExtensionRegistry, GrammarAssembler, GrammarConfig,
    StaticMetadataProvider, StaticTypeResolver,
};
use std::hint::black_box;

// 构造一个包含n个实体、每个实体20个字段的元数据源
fn create_provider(entities: usize) -> (StaticMetadataProvider, Vec<EntitySource>, Vec<String>) {
    let types = ["integer", "string", "boolean", "datetime", "currency"];
    let mut provider = StaticMetadataProvider::new();
    let mut sources = Vec::new();
    let mut attributes = Vec::new();

    for e in 0..entities {
        let entity = format!("Entity{e}");
        let prefix = format!("e{e}");
        let fields: Vec<_> = (0..20)
            .map(|f| (format!("field{f}"), types[f % types.len()]))
            .collect();
        for (field, _) in &fields {
            attributes.push(format!("{prefix}.{field}").to_uppercase());
        }
        provider.insert_entity(entity.clone(), fields);
        sources.push(EntitySource::new(entity, prefix));
    }

    (provider, sources, attributes)
}

fn benchmark_attribute_mapper(c: &mut Criterion) {
    let mut registry = ExtensionRegistry::new();
    registry.add_type_resolver("currency", StaticTypeResolver::new(["=", ">"]));

    let mut group = c.benchmark_group("attribute_mapper");

    for entities in [1, 4, 16] {
        let (provider, sources, attributes) = create_provider(entities);
        group.bench_with_input(BenchmarkId::new("map", entities), &entities, |b, _| {
            b.iter(|| {
                let mapper = AttributeMapper::new(&provider, &registry);
                let attrs = mapper
                    .map_attributes(black_box(&sources), black_box(attributes.as_slice()))
                    .expect("mapping should succeed");
                black_box(attrs)
            })
        });
    }

    group.finish();
}

fn benchmark_grammar_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grammar_build");

    let config = GrammarConfig::default();
    group.bench_function("default_config", |b| {
        b.iter(|| black_box(config.build_grammar().expect("build should succeed")))
    });

    let (provider, sources, attributes) = create_provider(4);
    let mut registry = ExtensionRegistry::new();
    registry.add_type_resolver("currency", StaticTypeResolver::new(["=", ">"]));
    group.bench_function("build_and_serialize", |b| {
        b.iter(|| {
            let grammar = GrammarAssembler::new(&provider, &registry, sources.clone(), attributes.clone())
                .build()
                .expect("build should succeed");
            black_box(grammar.to_json().expect("serialize should succeed"))
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_attribute_mapper, benchmark_grammar_build);
criterion_main!(benches);
