//! MongoDB查询构建器模块
//!
//! 将过滤条件和更新补丁转换为MongoDB查询文档与更新文档

use crate::adapter::mongodb::utils::{data_value_to_bson, map_field_name};
use crate::error::QuickModelResult;
use crate::types::*;
use mongodb::bson::{Bson, Document, doc};
use rat_logger::debug;

/// 构建查询文档，空过滤条件匹配全部文档
pub(crate) fn build_query_document(filter: &[QueryCondition]) -> QuickModelResult<Document> {
    let mut condition_docs = Vec::with_capacity(filter.len());
    for condition in filter {
        condition_docs.push(build_condition_document(condition)?);
    }

    let query_doc = match condition_docs.len() {
        0 => Document::new(),
        1 => condition_docs.remove(0),
        _ => doc! { "$and": condition_docs },
    };

    debug!("[MongoDB] 完成查询文档构建: {:?}", query_doc);
    Ok(query_doc)
}

fn build_condition_document(condition: &QueryCondition) -> QuickModelResult<Document> {
    let field_name = map_field_name(&condition.field);
    let bson_value = data_value_to_bson(&condition.value);

    let condition_doc = match condition.operator {
        QueryOperator::Eq => doc! { field_name: bson_value },
        QueryOperator::Ne => doc! { field_name: { "$ne": bson_value } },
        QueryOperator::Gt => doc! { field_name: { "$gt": bson_value } },
        QueryOperator::Gte => doc! { field_name: { "$gte": bson_value } },
        QueryOperator::Lt => doc! { field_name: { "$lt": bson_value } },
        QueryOperator::Lte => doc! { field_name: { "$lte": bson_value } },
        QueryOperator::In => match bson_value {
            Bson::Array(arr) => doc! { field_name: { "$in": arr } },
            other => doc! { field_name: { "$in": [other] } },
        },
        QueryOperator::NotIn => match bson_value {
            Bson::Array(arr) => doc! { field_name: { "$nin": arr } },
            other => doc! { field_name: { "$nin": [other] } },
        },
        QueryOperator::Regex => match bson_value {
            Bson::String(s) => doc! { field_name: { "$regex": s } },
            _ => {
                return Err(crate::quick_error!(validation, condition.field, "Regex操作符只支持字符串类型"));
            }
        },
        QueryOperator::Exists => {
            let exists = !matches!(condition.value, DataValue::Bool(false));
            doc! { field_name: { "$exists": exists } }
        }
    };

    Ok(condition_doc)
}

/// 构建更新文档，同一操作符的字段合并到一个子文档中
pub(crate) fn build_update_document(patch: &[UpdateOperation]) -> QuickModelResult<Document> {
    let mut update_doc = Document::new();

    for operation in patch {
        let field_name = map_field_name(&operation.field);
        if field_name == "_id" {
            return Err(crate::quick_error!(validation, operation.field, "文档ID不能更新"));
        }

        let (operator_key, value) = match operation.operation {
            UpdateOperator::Set => ("$set", data_value_to_bson(&operation.value)),
            UpdateOperator::Unset => ("$unset", Bson::String(String::new())),
            UpdateOperator::Increment => ("$inc", numeric_bson(operation)?),
            UpdateOperator::Multiply => ("$mul", numeric_bson(operation)?),
            UpdateOperator::Push => ("$push", data_value_to_bson(&operation.value)),
            UpdateOperator::Pull => ("$pull", data_value_to_bson(&operation.value)),
        };

        match update_doc.get_mut(operator_key) {
            Some(Bson::Document(operator_doc)) => {
                operator_doc.insert(field_name, value);
            }
            _ => {
                let mut operator_doc = Document::new();
                operator_doc.insert(field_name, value);
                update_doc.insert(operator_key, operator_doc);
            }
        }
    }

    if update_doc.is_empty() {
        return Err(crate::quick_error!(validation, "operations", "更新操作不能为空"));
    }

    debug!("[MongoDB] 完成更新文档构建: {:?}", update_doc);
    Ok(update_doc)
}

fn numeric_bson(operation: &UpdateOperation) -> QuickModelResult<Bson> {
    match &operation.value {
        DataValue::Int(_) | DataValue::Float(_) => Ok(data_value_to_bson(&operation.value)),
        other => Err(crate::quick_error!(
            validation,
            operation.field,
            format!("{:?}操作只支持数值类型，实际收到: {}", operation.operation, other.type_name())
        )),
    }
}
