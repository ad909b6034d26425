//! # 模型仓储
//!
//! 绑定到已编译模型的类型化门面，所有操作原样转发给持久化引擎

use crate::error::QuickModelResult;
use crate::model::compile::CompiledModel;
use crate::model::schema::SchemaDefinition;
use crate::odm::traits::PersistenceEngine;
use crate::types::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use rat_logger::debug;

/// 模型仓储
///
/// `T` 是记录的结构体类型，仅用于 [`Repository::to_document`] 和
/// [`Repository::from_document`] 的类型转换
pub struct Repository<T> {
    model: Arc<CompiledModel>,
    engine: Arc<dyn PersistenceEngine>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            engine: self.engine.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").field("model", &self.model.name).finish()
    }
}

impl<T> Repository<T> {
    pub fn new(model: Arc<CompiledModel>, engine: Arc<dyn PersistenceEngine>) -> Self {
        Self {
            model,
            engine,
            _marker: PhantomData,
        }
    }

    /// 绑定的编译模型
    pub fn model(&self) -> &Arc<CompiledModel> {
        &self.model
    }

    /// 模型名称
    pub fn name(&self) -> &str {
        &self.model.name
    }

    /// 展平后的模式定义
    pub fn definition(&self) -> &SchemaDefinition {
        self.model.definition()
    }

    /// 按模式定义同步索引
    pub async fn sync_indexes(&self) -> QuickModelResult<()> {
        debug!("同步索引: model={}", self.name());
        self.engine.sync_indexes(&self.model).await
    }

    pub async fn create(&self, document: Document) -> QuickModelResult<DataValue> {
        debug!("创建文档: model={}", self.name());
        self.engine.create(&self.model, document).await
    }

    pub async fn create_many(&self, documents: Vec<Document>) -> QuickModelResult<Vec<DataValue>> {
        debug!("批量创建文档: model={}, 数量={}", self.name(), documents.len());
        self.engine.create_many(&self.model, documents).await
    }

    /// 查找文档，`None` 等同于空过滤条件
    pub async fn find(&self, filter: Option<Filter>) -> QuickModelResult<Vec<DataValue>> {
        debug!("查找文档: model={}", self.name());
        self.engine.find(&self.model, filter.unwrap_or_default()).await
    }

    pub async fn find_one(&self, filter: Option<Filter>) -> QuickModelResult<Option<DataValue>> {
        debug!("查找单个文档: model={}", self.name());
        self.engine.find_one(&self.model, filter.unwrap_or_default()).await
    }

    pub async fn find_by_id(&self, id: &str) -> QuickModelResult<Option<DataValue>> {
        debug!("根据ID查找文档: model={}, id={}", self.name(), id);
        self.engine.find_by_id(&self.model, id).await
    }

    pub async fn update(&self, filter: Filter, patch: UpdatePatch) -> QuickModelResult<u64> {
        debug!("批量更新文档: model={}", self.name());
        self.engine.update(&self.model, filter, patch).await
    }

    pub async fn update_one(&self, filter: Filter, patch: UpdatePatch) -> QuickModelResult<u64> {
        debug!("更新单个文档: model={}", self.name());
        self.engine.update_one(&self.model, filter, patch).await
    }

    pub async fn find_one_and_update(
        &self,
        filter: Filter,
        patch: UpdatePatch,
        options: Option<ModifyOptions>,
    ) -> QuickModelResult<Option<DataValue>> {
        debug!("查找并更新文档: model={}", self.name());
        self.engine.find_one_and_update(&self.model, filter, patch, options).await
    }

    pub async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: UpdatePatch,
        options: Option<ModifyOptions>,
    ) -> QuickModelResult<Option<DataValue>> {
        debug!("根据ID查找并更新文档: model={}, id={}", self.name(), id);
        self.engine.find_by_id_and_update(&self.model, id, patch, options).await
    }

    pub async fn delete(&self, filter: Filter) -> QuickModelResult<u64> {
        debug!("批量删除文档: model={}", self.name());
        self.engine.delete(&self.model, filter).await
    }

    pub async fn delete_one(&self, filter: Filter) -> QuickModelResult<u64> {
        debug!("删除单个文档: model={}", self.name());
        self.engine.delete_one(&self.model, filter).await
    }

    pub async fn find_one_and_delete(&self, filter: Filter) -> QuickModelResult<Option<DataValue>> {
        debug!("查找并删除文档: model={}", self.name());
        self.engine.find_one_and_delete(&self.model, filter).await
    }

    pub async fn find_by_id_and_delete(&self, id: &str) -> QuickModelResult<Option<DataValue>> {
        debug!("根据ID查找并删除文档: model={}, id={}", self.name(), id);
        self.engine.find_by_id_and_delete(&self.model, id).await
    }

    /// 统计文档数，`None` 等同于空过滤条件
    pub async fn count(&self, filter: Option<Filter>) -> QuickModelResult<u64> {
        debug!("统计文档: model={}", self.name());
        self.engine.count(&self.model, filter.unwrap_or_default()).await
    }

    pub async fn aggregate(&self, pipeline: Vec<PipelineStage>) -> QuickModelResult<Vec<DataValue>> {
        debug!("执行聚合管道: model={}, 阶段数={}", self.name(), pipeline.len());
        self.engine.aggregate(&self.model, pipeline).await
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned,
{
    /// 将记录转换为文档
    pub fn to_document(record: &T) -> QuickModelResult<Document> {
        let value = serde_json::to_value(record)
            .map_err(|e| crate::quick_error!(serialization, format!("记录序列化失败: {}", e)))?;
        DataValue::from(value).expect_object()
    }

    /// 将文档转换为记录
    pub fn from_document(document: Document) -> QuickModelResult<T> {
        DataValue::Object(document).deserialize_to::<T>()
    }
}
