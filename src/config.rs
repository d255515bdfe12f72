//! 配置模块，负责从JSON配置文件加载语法生成所需的实体、属性和字段元数据

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::attribute_mapper::CollisionPolicy;
use crate::error::GrammarError;
use crate::extension::{ExtensionRegistry, StaticTypeResolver};
use crate::grammar::{GrammarAssembler, GrammarDescriptor};
use crate::metadata::{EntitySource, StaticMetadataProvider};

/// 配置加载错误
#[derive(Debug, Error)]
#[error("config error: {message}")]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

/// 语法生成配置
///
/// ```json
/// {
///   "entities": [{ "entity": "Product", "prefix": "article" }],
///   "attributes": ["ARTICLE.ID"],
///   "strictCollisions": false,
///   "customTypes": { "currency": ["=", ">"] },
///   "fields": { "Product": { "id": "integer" } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarConfig {
    /// 参与合并的实体及其前缀，顺序决定同名属性的覆盖关系
    pub entities: Vec<EntitySource>,
    /// 暴露给语法的属性（带前缀，大写）
    pub attributes: Vec<String>,
    /// 为true时同名属性直接报错，而不是后者覆盖前者
    #[serde(default)]
    pub strict_collisions: bool,
    /// 自定义类型到操作符列表的映射
    #[serde(default)]
    pub custom_types: BTreeMap<String, Vec<String>>,
    /// 每个实体的字段元数据
    #[serde(default)]
    pub fields: StaticMetadataProvider,
}

impl GrammarConfig {
    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        // 检查文件是否存在
        if !path_ref.exists() {
            return Err(ConfigError::new(format!(
                "config file does not exist: {}",
                path_ref.display()
            )));
        }

        let content = fs::read_to_string(path_ref).map_err(|e| {
            ConfigError::new(format!(
                "cannot read config file {}: {}",
                path_ref.display(),
                e
            ))
        })?;

        Self::from_json_str(&content).map_err(|e| {
            ConfigError::new(format!("{}: {}", path_ref.display(), e.message))
        })
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::new(format!("cannot parse JSON config: {}", e)))
    }

    /// 字段元数据源（即配置中的`fields`）
    pub fn provider(&self) -> &StaticMetadataProvider {
        &self.fields
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        if self.strict_collisions {
            CollisionPolicy::Strict
        } else {
            CollisionPolicy::LastWins
        }
    }

    /// 为配置中的自定义类型注册解析器
    pub fn extensions(&self) -> ExtensionRegistry {
        let mut registry = ExtensionRegistry::new();
        for (type_name, operators) in &self.custom_types {
            registry.add_type_resolver(type_name, StaticTypeResolver::new(operators.iter().cloned()));
        }
        registry
    }

    /// 使用给定的扩展生成语法
    pub fn build_grammar_with(
        &self,
        extensions: &ExtensionRegistry,
    ) -> Result<GrammarDescriptor, GrammarError> {
        GrammarAssembler::new(
            self.provider(),
            extensions,
            self.entities.clone(),
            self.attributes.clone(),
        )
        .with_collision_policy(self.collision_policy())
        .build()
    }

    pub fn build_grammar(&self) -> Result<GrammarDescriptor, GrammarError> {
        self.build_grammar_with(&self.extensions())
    }
}

impl Default for GrammarConfig {
    /// 默认的商品批量编辑配置（用于演示或fallback）
    fn default() -> Self {
        let fields = StaticMetadataProvider::new()
            .with_entity(
                "Product",
                [
                    ("id", "integer"),
                    ("name", "string"),
                    ("description", "text"),
                    ("active", "boolean"),
                    ("added", "date"),
                    ("changed", "datetime"),
                ],
            )
            .with_entity(
                "Detail",
                [
                    ("number", "string"),
                    ("inStock", "integer"),
                    ("weight", "decimal"),
                    ("active", "boolean"),
                ],
            )
            .with_entity("Supplier", [("name", "string")])
            .with_entity("Price", [("price", "float")]);

        let entities = vec![
            EntitySource::new("Product", "article"),
            EntitySource::new("Detail", "detail"),
            EntitySource::new("Supplier", "supplier"),
            EntitySource::new("Price", "price"),
        ];

        let attributes = [
            "ARTICLE.ID",
            "ARTICLE.NAME",
            "ARTICLE.DESCRIPTION",
            "ARTICLE.ACTIVE",
            "ARTICLE.ADDED",
            "ARTICLE.CHANGED",
            "DETAIL.NUMBER",
            "DETAIL.INSTOCK",
            "DETAIL.WEIGHT",
            "DETAIL.ACTIVE",
            "SUPPLIER.NAME",
            "PRICE.PRICE",
        ]
        .iter()
        .map(|a| a.to_string())
        .collect();

        Self {
            entities,
            attributes,
            strict_collisions: false,
            custom_types: BTreeMap::new(),
            fields,
        }
    }
}
