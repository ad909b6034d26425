//! 模式编译模块
//!
//! 编译后的模式与模型，以及默认的 `$jsonSchema` 编译器

use crate::error::QuickModelResult;
use crate::model::field_types::FieldType;
use crate::model::schema::{PropertyDefinition, SchemaDefinition, SchemaOption};
use crate::types::DataValue;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use rat_logger::debug;

/// 编译后的模式：展平定义加上引擎原生表示
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    /// 展平后的模式定义
    pub definition: SchemaDefinition,
    /// 引擎原生表示
    pub native: DataValue,
}

impl CompiledSchema {
    pub fn new(definition: SchemaDefinition, native: DataValue) -> Self {
        Self { definition, native }
    }
}

/// 已注册的编译模型，由模型注册表持有
#[derive(Debug, Clone)]
pub struct CompiledModel {
    /// 模型名称
    pub name: String,
    /// 编译后的模式
    pub schema: CompiledSchema,
    /// 编译时间
    pub compiled_at: DateTime<Utc>,
}

impl CompiledModel {
    pub fn new(name: impl Into<String>, schema: CompiledSchema) -> Self {
        Self {
            name: name.into(),
            schema,
            compiled_at: Utc::now(),
        }
    }

    /// 展平后的模式定义
    pub fn definition(&self) -> &SchemaDefinition {
        &self.schema.definition
    }
}

/// 字段类型对应的 BSON 类型，Mixed 不限制类型
///
/// Decimal128 字段按字符串写入，也接受整数和浮点数
fn bson_type(field_type: &FieldType) -> Option<Value> {
    let name = match field_type {
        FieldType::Number => "number",
        FieldType::String => "string",
        FieldType::Boolean => "bool",
        FieldType::Date => "date",
        FieldType::Binary => "binData",
        FieldType::ObjectId => "objectId",
        FieldType::Mixed => return None,
        FieldType::Decimal128 => return Some(json!(["decimal", "string", "double", "long"])),
        FieldType::Array | FieldType::ArrayOf(_) => "array",
        FieldType::Map | FieldType::MapOf(_) => "object",
    };
    Some(Value::String(name.to_string()))
}

fn type_schema(field_type: &FieldType) -> Map<String, Value> {
    let mut schema = Map::new();
    if let Some(bson) = bson_type(field_type) {
        schema.insert("bsonType".to_string(), bson);
    }
    match field_type {
        FieldType::ArrayOf(Some(item)) => {
            schema.insert("items".to_string(), Value::Object(type_schema(item)));
        }
        FieldType::MapOf(Some(value)) => {
            schema.insert("additionalProperties".to_string(), Value::Object(type_schema(value)));
        }
        _ => {}
    }
    schema
}

fn property_schema(property: &PropertyDefinition) -> Value {
    let mut schema = property.field_type().map(type_schema).unwrap_or_default();

    for option in property.options() {
        match option {
            SchemaOption::Min(v) => {
                if let Some(n) = v.as_f64() {
                    schema.insert("minimum".to_string(), json!(n));
                }
            }
            SchemaOption::Max(v) => {
                if let Some(n) = v.as_f64() {
                    schema.insert("maximum".to_string(), json!(n));
                }
            }
            SchemaOption::Enum(values) => {
                schema.insert(
                    "enum".to_string(),
                    Value::Array(values.iter().map(DataValue::to_json_value).collect()),
                );
            }
            SchemaOption::Match(regex) => {
                schema.insert("pattern".to_string(), Value::String(regex.as_str().to_string()));
            }
            SchemaOption::MaxLength(n) => {
                schema.insert("maxLength".to_string(), json!(n));
            }
            SchemaOption::MinLength(n) => {
                schema.insert("minLength".to_string(), json!(n));
            }
            _ => {}
        }
    }

    Value::Object(schema)
}

/// 默认编译器：将模式定义转换为 MongoDB `$jsonSchema` 验证文档
///
/// 函数类选项（get / set / validate）无法表达为验证文档，仅保留在展平定义中
pub fn compile_json_schema(name: &str, definition: &SchemaDefinition) -> QuickModelResult<CompiledSchema> {
    let properties: Map<String, Value> = definition
        .iter()
        .map(|(field, property)| (field.to_string(), property_schema(property)))
        .collect();

    let required: Vec<Value> = definition
        .required_fields()
        .into_iter()
        .map(|f| Value::String(f.to_string()))
        .collect();

    let mut schema = Map::new();
    schema.insert("bsonType".to_string(), Value::String("object".to_string()));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    schema.insert("properties".to_string(), Value::Object(properties));

    let native = json!({ "$jsonSchema": Value::Object(schema) });
    debug!("编译模型 {} 的验证文档: {}", name, native);

    Ok(CompiledSchema::new(definition.clone(), DataValue::from(native)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field_builder::FieldDefinitionBuilder;
    use crate::model::schema::SchemaCollector;

    fn sample_definition() -> SchemaDefinition {
        let mut collector = SchemaCollector::new();
        collector
            .add_batch(vec![
                FieldDefinitionBuilder::new("name").string().unwrap().required().max_length(32).build(),
                FieldDefinitionBuilder::new("age").number().unwrap().min(0).max(150).build(),
                FieldDefinitionBuilder::new("tags")
                    .array_of(FieldDefinitionBuilder::new("tag").string().unwrap())
                    .unwrap()
                    .build(),
                FieldDefinitionBuilder::new("extra").mixed().unwrap().build(),
            ])
            .unwrap();
        collector.to_definition_mapping()
    }

    #[test]
    fn test_json_schema_layout() {
        let compiled = compile_json_schema("User", &sample_definition()).unwrap();
        let native = compiled.native.to_json_value();
        let schema = &native["$jsonSchema"];

        assert_eq!(schema["bsonType"], "object");
        assert_eq!(schema["required"], json!(["name"]));
        assert_eq!(schema["properties"]["name"]["bsonType"], "string");
        assert_eq!(schema["properties"]["name"]["maxLength"], 32);
        assert_eq!(schema["properties"]["age"]["bsonType"], "number");
        assert_eq!(schema["properties"]["age"]["minimum"], 0.0);
        assert_eq!(schema["properties"]["age"]["maximum"], 150.0);
        assert_eq!(schema["properties"]["tags"]["bsonType"], "array");
        assert_eq!(schema["properties"]["tags"]["items"]["bsonType"], "string");
        assert_eq!(schema["properties"]["extra"], json!({}));
    }

    #[test]
    fn test_decimal128_accepts_stored_forms() {
        let mut collector = SchemaCollector::new();
        collector
            .add_batch(vec![FieldDefinitionBuilder::new("price").decimal128().unwrap().build()])
            .unwrap();
        let compiled = compile_json_schema("Product", &collector.to_definition_mapping()).unwrap();
        let native = compiled.native.to_json_value();

        assert_eq!(
            native["$jsonSchema"]["properties"]["price"]["bsonType"],
            json!(["decimal", "string", "double", "long"])
        );
    }

    #[test]
    fn test_compiled_model_keeps_definition() {
        let definition = sample_definition();
        let compiled = compile_json_schema("User", &definition).unwrap();
        let model = CompiledModel::new("User", compiled);

        assert_eq!(model.name, "User");
        assert_eq!(model.definition().field_names(), vec!["name", "age", "tags", "extra"]);
    }
}
