//! MongoDB模式同步
//!
//! 根据模式定义创建索引，并把编译生成的 `$jsonSchema` 应用为集合验证器

use super::MongoEngine;
use crate::adapter::mongodb::utils::data_value_to_bson;
use crate::error::{QuickModelError, QuickModelResult};
use crate::model::compile::CompiledModel;
use crate::model::schema::{SchemaDefinition, SchemaOption};
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{CreateCollectionOptions, IndexOptions};
use mongodb::IndexModel;
use rat_logger::{debug, info};

/// 需要创建的单字段索引
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IndexSpec {
    pub field: String,
    pub unique: bool,
    pub sparse: bool,
}

impl IndexSpec {
    pub fn index_name(&self) -> String {
        format!("{}_1", self.field)
    }
}

/// 收集带有 index / unique / sparse 选项的字段
pub(crate) fn collect_index_specs(definition: &SchemaDefinition) -> Vec<IndexSpec> {
    definition
        .iter()
        .filter_map(|(field, property)| {
            let flag = |key: &str| {
                matches!(
                    property.get(key),
                    Some(SchemaOption::Index(true) | SchemaOption::Unique(true) | SchemaOption::Sparse(true))
                )
            };
            let unique = flag("unique");
            let sparse = flag("sparse");
            if flag("index") || unique || sparse {
                Some(IndexSpec {
                    field: field.to_string(),
                    unique,
                    sparse,
                })
            } else {
                None
            }
        })
        .collect()
}

/// 取出编译结果中的验证文档，原生表示不是文档时返回 None
pub(crate) fn validator_document(model: &CompiledModel) -> Option<Document> {
    match data_value_to_bson(&model.schema.native) {
        Bson::Document(doc) => Some(doc),
        _ => None,
    }
}

impl MongoEngine {
    /// 创建索引
    pub(crate) async fn create_indexes(&self, model: &CompiledModel) -> QuickModelResult<()> {
        let collection = self.collection(model);

        for spec in collect_index_specs(model.definition()) {
            let mut index_options = IndexOptions::default();
            index_options.name = Some(spec.index_name());
            index_options.unique = Some(spec.unique);
            if spec.sparse {
                index_options.sparse = Some(true);
            }

            let mut index_doc = Document::new();
            index_doc.insert(spec.field.as_str(), 1);

            let index_model = IndexModel::builder()
                .keys(index_doc)
                .options(index_options)
                .build();

            debug!("创建MongoDB索引: {} 在集合 {}", spec.index_name(), model.name);

            collection
                .create_index(index_model, None)
                .await
                .map_err(|e| QuickModelError::QueryError {
                    message: format!("创建MongoDB索引失败: {}", e),
                })?;
        }

        Ok(())
    }

    /// 将编译生成的验证文档应用到集合，集合不存在时先创建
    pub async fn apply_validator(&self, model: &CompiledModel) -> QuickModelResult<()> {
        let Some(validator) = validator_document(model) else {
            debug!("模型 {} 没有文档形式的验证器，跳过", model.name);
            return Ok(());
        };

        let existing = self
            .database()
            .list_collection_names(doc! { "name": model.name.as_str() })
            .await
            .map_err(|e| QuickModelError::QueryError {
                message: format!("查询MongoDB集合失败: {}", e),
            })?;

        if existing.is_empty() {
            let mut options = CreateCollectionOptions::default();
            options.validator = Some(validator);
            self.database()
                .create_collection(&model.name, options)
                .await
                .map_err(|e| QuickModelError::QueryError {
                    message: format!("创建MongoDB集合失败: {}", e),
                })?;
        } else {
            let command: Document = doc! { "collMod": model.name.as_str(), "validator": validator };
            self.database()
                .run_command(command, None)
                .await
                .map_err(|e| QuickModelError::QueryError {
                    message: format!("更新MongoDB集合验证器失败: {}", e),
                })?;
        }

        info!("应用MongoDB集合验证器: {}", model.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::compile::{CompiledSchema, compile_json_schema};
    use crate::model::field_builder::FieldDefinitionBuilder;
    use crate::model::schema::SchemaCollector;
    use crate::types::DataValue;

    #[test]
    fn test_collect_index_specs() {
        let mut collector = SchemaCollector::new();
        collector
            .add_batch(vec![
                FieldDefinitionBuilder::new("email").string().unwrap().unique(true).build(),
                FieldDefinitionBuilder::new("nickname").string().unwrap().index(true).sparse(true).build(),
                FieldDefinitionBuilder::new("bio").string().unwrap().index(false).build(),
            ])
            .unwrap();

        let specs = collect_index_specs(&collector.to_definition_mapping());
        assert_eq!(
            specs,
            vec![
                IndexSpec { field: "email".to_string(), unique: true, sparse: false },
                IndexSpec { field: "nickname".to_string(), unique: false, sparse: true },
            ]
        );
        assert_eq!(specs[0].index_name(), "email_1");
    }

    #[test]
    fn test_validator_document_from_compiled_schema() {
        let mut collector = SchemaCollector::new();
        collector
            .add_batch(vec![FieldDefinitionBuilder::new("name").string().unwrap().required().build()])
            .unwrap();
        let definition = collector.to_definition_mapping();
        let model = CompiledModel::new("User", compile_json_schema("User", &definition).unwrap());

        let validator = validator_document(&model).unwrap();
        let schema = validator.get_document("$jsonSchema").unwrap();
        assert_eq!(schema.get_str("bsonType").unwrap(), "object");
        assert_eq!(schema.get_array("required").unwrap(), &vec![Bson::String("name".to_string())]);
    }

    #[test]
    fn test_validator_document_skips_non_document() {
        let definition = SchemaCollector::new().to_definition_mapping();
        let model = CompiledModel::new("Raw", CompiledSchema::new(definition, DataValue::Null));

        assert!(validator_document(&model).is_none());
    }
}
