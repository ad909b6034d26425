//! MongoDB工具函数模块
//!
//! 包含DataValue与BSON之间的转换

use crate::error::QuickModelResult;
use crate::types::*;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use std::collections::HashMap;

/// 将DataValue转换为BSON值
pub(crate) fn data_value_to_bson(value: &DataValue) -> Bson {
    match value {
        DataValue::Null => Bson::Null,
        DataValue::Bool(b) => Bson::Boolean(*b),
        DataValue::Int(i) => Bson::Int64(*i),
        DataValue::Float(f) => Bson::Double(*f),
        DataValue::Decimal(d) => Bson::String(d.clone()),
        DataValue::String(s) => Bson::String(s.clone()),
        DataValue::Bytes(bytes) => Bson::Binary(mongodb::bson::Binary {
            subtype: mongodb::bson::spec::BinarySubtype::Generic,
            bytes: bytes.clone(),
        }),
        DataValue::DateTime(dt) => {
            let utc_dt = chrono::DateTime::<chrono::Utc>::from(*dt);
            Bson::DateTime(mongodb::bson::DateTime::from_system_time(utc_dt.into()))
        }
        DataValue::ObjectId(hex) => match ObjectId::parse_str(hex) {
            Ok(oid) => Bson::ObjectId(oid),
            Err(_) => Bson::String(hex.clone()),
        },
        DataValue::Uuid(uuid) => Bson::String(uuid.to_string()),
        DataValue::Json(json) => mongodb::bson::to_bson(json).unwrap_or_else(|_| Bson::String(json.to_string())),
        DataValue::Array(arr) => Bson::Array(arr.iter().map(data_value_to_bson).collect()),
        DataValue::Object(obj) => Bson::Document(data_map_to_document(obj)),
    }
}

/// 将BSON转换为DataValue
pub(crate) fn bson_to_data_value(bson: &Bson) -> DataValue {
    match bson {
        Bson::Null | Bson::Undefined => DataValue::Null,
        Bson::Boolean(b) => DataValue::Bool(*b),
        Bson::Int32(i) => DataValue::Int(*i as i64),
        Bson::Int64(i) => DataValue::Int(*i),
        Bson::Double(d) => DataValue::Float(*d),
        Bson::Decimal128(d) => DataValue::Decimal(d.to_string()),
        Bson::String(s) => DataValue::String(s.clone()),
        Bson::Binary(bin) => DataValue::Bytes(bin.bytes.clone()),
        Bson::DateTime(dt) => {
            let utc_dt = chrono::DateTime::<chrono::Utc>::from(dt.to_system_time());
            DataValue::DateTime(utc_dt.into())
        }
        Bson::ObjectId(oid) => DataValue::ObjectId(oid.to_hex()),
        Bson::Array(arr) => DataValue::Array(arr.iter().map(bson_to_data_value).collect()),
        Bson::Document(doc) => DataValue::Object(document_to_data_map(doc)),
        other => DataValue::Json(other.clone().into_relaxed_extjson()),
    }
}

/// 映射字段名（id -> _id）
pub(crate) fn map_field_name(field: &str) -> &str {
    if field == "id" { "_id" } else { field }
}

/// 将文档转换为BSON Document，`id` 字段写入 `_id`
pub(crate) fn data_map_to_document(data: &HashMap<String, DataValue>) -> Document {
    let mut document = Document::new();
    for (key, value) in data {
        document.insert(map_field_name(key), data_value_to_bson(value));
    }
    document
}

/// 将BSON Document转换为文档，`_id` 字段映射回 `id`
pub(crate) fn document_to_data_map(doc: &Document) -> HashMap<String, DataValue> {
    doc.iter()
        .map(|(key, value)| {
            let mapped_key = if key == "_id" { "id".to_string() } else { key.to_string() };
            (mapped_key, bson_to_data_value(value))
        })
        .collect()
}

pub(crate) fn document_to_data_value(doc: &Document) -> DataValue {
    DataValue::Object(document_to_data_map(doc))
}

/// 根据ID构建查询文档，合法的ObjectId同时匹配ObjectId和字符串形式
pub(crate) fn id_filter(id: &str) -> Document {
    match ObjectId::parse_str(id) {
        Ok(oid) => doc! { "_id": { "$in": [Bson::ObjectId(oid), Bson::String(id.to_string())] } },
        Err(_) => doc! { "_id": id },
    }
}

/// 将聚合管道阶段转换为BSON Document
pub(crate) fn pipeline_to_documents(pipeline: &[PipelineStage]) -> QuickModelResult<Vec<Document>> {
    pipeline
        .iter()
        .map(|stage| match data_value_to_bson(stage) {
            Bson::Document(doc) => Ok(doc),
            other => Err(crate::quick_error!(
                validation,
                "pipeline",
                format!("聚合管道阶段必须是对象，实际收到: {}", other)
            )),
        })
        .collect()
}
