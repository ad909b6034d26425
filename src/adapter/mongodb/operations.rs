//! MongoDB文档操作实现

use super::MongoEngine;
use crate::adapter::mongodb::query_builder::{build_query_document, build_update_document};
use crate::adapter::mongodb::utils::{
    data_map_to_document, document_to_data_value, id_filter, pipeline_to_documents,
};
use crate::error::{QuickModelError, QuickModelResult};
use crate::model::compile::CompiledModel;
use crate::odm::traits::PersistenceEngine;
use crate::types::*;
use crate::types::Document as DataDocument;
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use mongodb::options::FindOneAndUpdateOptions;
use mongodb::Cursor;
use rat_logger::debug;

fn query_error(action: &str, e: mongodb::error::Error) -> QuickModelError {
    QuickModelError::QueryError {
        message: format!("MongoDB{}失败: {}", action, e),
    }
}

fn inserted_id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_find_one_and_update_options(options: Option<ModifyOptions>) -> FindOneAndUpdateOptions {
    let options = options.unwrap_or_default();
    let mut mongo_options = FindOneAndUpdateOptions::default();
    mongo_options.return_document = Some(match options.return_document {
        ReturnDocument::Before => mongodb::options::ReturnDocument::Before,
        ReturnDocument::After => mongodb::options::ReturnDocument::After,
    });
    mongo_options.upsert = Some(options.upsert);
    mongo_options
}

async fn collect_cursor(mut cursor: Cursor<Document>) -> QuickModelResult<Vec<DataValue>> {
    let mut results = Vec::new();
    while cursor.advance().await.map_err(|e| query_error("游标遍历", e))? {
        let doc = cursor
            .deserialize_current()
            .map_err(|e| query_error("文档反序列化", e))?;
        results.push(document_to_data_value(&doc));
    }
    Ok(results)
}

impl MongoEngine {
    async fn modify_one(
        &self,
        model: &CompiledModel,
        query: Document,
        patch: UpdatePatch,
        options: Option<ModifyOptions>,
    ) -> QuickModelResult<Option<DataValue>> {
        let update = build_update_document(&patch)?;
        debug!("执行MongoDB查找并更新: query={:?}, update={:?}", query, update);

        let result = self
            .collection(model)
            .find_one_and_update(query, update, to_find_one_and_update_options(options))
            .await
            .map_err(|e| query_error("查找并更新", e))?;

        Ok(result.as_ref().map(document_to_data_value))
    }

    async fn remove_one(&self, model: &CompiledModel, query: Document) -> QuickModelResult<Option<DataValue>> {
        debug!("执行MongoDB查找并删除: {:?}", query);

        let result = self
            .collection(model)
            .find_one_and_delete(query, None)
            .await
            .map_err(|e| query_error("查找并删除", e))?;

        Ok(result.as_ref().map(document_to_data_value))
    }
}

#[async_trait]
impl PersistenceEngine for MongoEngine {
    async fn sync_indexes(&self, model: &CompiledModel) -> QuickModelResult<()> {
        self.apply_validator(model).await?;
        self.create_indexes(model).await
    }

    async fn create(&self, model: &CompiledModel, document: DataDocument) -> QuickModelResult<DataValue> {
        let doc = data_map_to_document(&document);
        debug!("执行MongoDB插入: collection={}", model.name);

        let result = self
            .collection(model)
            .insert_one(doc, None)
            .await
            .map_err(|e| query_error("插入", e))?;

        let mut created = document;
        created.insert("id".to_string(), DataValue::String(inserted_id_string(&result.inserted_id)));
        Ok(DataValue::Object(created))
    }

    async fn create_many(&self, model: &CompiledModel, documents: Vec<DataDocument>) -> QuickModelResult<Vec<DataValue>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let docs: Vec<Document> = documents.iter().map(data_map_to_document).collect();
        debug!("执行MongoDB批量插入: collection={}, 数量={}", model.name, docs.len());

        let result = self
            .collection(model)
            .insert_many(docs, None)
            .await
            .map_err(|e| query_error("批量插入", e))?;

        let created = documents
            .into_iter()
            .enumerate()
            .map(|(index, mut document)| {
                if let Some(id) = result.inserted_ids.get(&index) {
                    document.insert("id".to_string(), DataValue::String(inserted_id_string(id)));
                }
                DataValue::Object(document)
            })
            .collect();
        Ok(created)
    }

    async fn find(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<Vec<DataValue>> {
        let query = build_query_document(&filter)?;
        debug!("执行MongoDB查询: {:?}", query);

        let cursor = self
            .collection(model)
            .find(query, None)
            .await
            .map_err(|e| query_error("查询", e))?;
        collect_cursor(cursor).await
    }

    async fn find_one(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<Option<DataValue>> {
        let query = build_query_document(&filter)?;
        debug!("执行MongoDB单条查询: {:?}", query);

        let result = self
            .collection(model)
            .find_one(query, None)
            .await
            .map_err(|e| query_error("查询", e))?;
        Ok(result.as_ref().map(document_to_data_value))
    }

    async fn find_by_id(&self, model: &CompiledModel, id: &str) -> QuickModelResult<Option<DataValue>> {
        let result = self
            .collection(model)
            .find_one(id_filter(id), None)
            .await
            .map_err(|e| query_error("根据ID查询", e))?;
        Ok(result.as_ref().map(document_to_data_value))
    }

    async fn update(&self, model: &CompiledModel, filter: Filter, patch: UpdatePatch) -> QuickModelResult<u64> {
        let query = build_query_document(&filter)?;
        let update = build_update_document(&patch)?;
        debug!("执行MongoDB批量更新: query={:?}, update={:?}", query, update);

        let result = self
            .collection(model)
            .update_many(query, update, None)
            .await
            .map_err(|e| query_error("更新", e))?;
        Ok(result.modified_count)
    }

    async fn update_one(&self, model: &CompiledModel, filter: Filter, patch: UpdatePatch) -> QuickModelResult<u64> {
        let query = build_query_document(&filter)?;
        let update = build_update_document(&patch)?;
        debug!("执行MongoDB单条更新: query={:?}, update={:?}", query, update);

        let result = self
            .collection(model)
            .update_one(query, update, None)
            .await
            .map_err(|e| query_error("更新", e))?;
        Ok(result.modified_count)
    }

    async fn find_one_and_update(
        &self,
        model: &CompiledModel,
        filter: Filter,
        patch: UpdatePatch,
        options: Option<ModifyOptions>,
    ) -> QuickModelResult<Option<DataValue>> {
        let query = build_query_document(&filter)?;
        self.modify_one(model, query, patch, options).await
    }

    async fn find_by_id_and_update(
        &self,
        model: &CompiledModel,
        id: &str,
        patch: UpdatePatch,
        options: Option<ModifyOptions>,
    ) -> QuickModelResult<Option<DataValue>> {
        self.modify_one(model, id_filter(id), patch, options).await
    }

    async fn delete(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<u64> {
        let query = build_query_document(&filter)?;
        debug!("执行MongoDB批量删除: {:?}", query);

        let result = self
            .collection(model)
            .delete_many(query, None)
            .await
            .map_err(|e| query_error("删除", e))?;
        Ok(result.deleted_count)
    }

    async fn delete_one(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<u64> {
        let query = build_query_document(&filter)?;
        debug!("执行MongoDB单条删除: {:?}", query);

        let result = self
            .collection(model)
            .delete_one(query, None)
            .await
            .map_err(|e| query_error("删除", e))?;
        Ok(result.deleted_count)
    }

    async fn find_one_and_delete(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<Option<DataValue>> {
        let query = build_query_document(&filter)?;
        self.remove_one(model, query).await
    }

    async fn find_by_id_and_delete(&self, model: &CompiledModel, id: &str) -> QuickModelResult<Option<DataValue>> {
        self.remove_one(model, id_filter(id)).await
    }

    async fn count(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<u64> {
        let query = build_query_document(&filter)?;
        debug!("执行MongoDB计数: {:?}", query);

        self.collection(model)
            .count_documents(query, None)
            .await
            .map_err(|e| query_error("计数", e))
    }

    async fn aggregate(&self, model: &CompiledModel, pipeline: Vec<PipelineStage>) -> QuickModelResult<Vec<DataValue>> {
        let stages = pipeline_to_documents(&pipeline)?;
        debug!("执行MongoDB聚合查询: collection={}, 阶段数={}", model.name, stages.len());

        let cursor = self
            .collection(model)
            .aggregate(stages, None)
            .await
            .map_err(|e| query_error("聚合查询", e))?;
        collect_cursor(cursor).await
    }
}
