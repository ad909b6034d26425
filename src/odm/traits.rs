//! # 持久化引擎接口定义

use crate::error::QuickModelResult;
use crate::model::compile::{CompiledModel, CompiledSchema, compile_json_schema};
use crate::model::schema::SchemaDefinition;
use crate::types::*;
use async_trait::async_trait;

/// 持久化引擎接口
///
/// 模型层只负责构建和编译模式，实际的存储、查询和索引都由实现方完成。
/// 所有文档操作都接收已注册的编译模型，参数和返回值原样传递。
#[async_trait]
pub trait PersistenceEngine: Send + Sync {
    /// 将模式定义编译为引擎原生表示
    ///
    /// 在模型注册表的条目锁内同步调用，默认生成 `$jsonSchema` 验证文档
    fn compile(&self, name: &str, definition: &SchemaDefinition) -> QuickModelResult<CompiledSchema> {
        compile_json_schema(name, definition)
    }

    /// 把编译后的模式同步到存储端（验证器与索引），默认不做任何操作
    async fn sync_indexes(&self, _model: &CompiledModel) -> QuickModelResult<()> {
        Ok(())
    }

    /// 创建单个文档
    async fn create(&self, model: &CompiledModel, document: Document) -> QuickModelResult<DataValue>;

    /// 批量创建文档
    async fn create_many(&self, model: &CompiledModel, documents: Vec<Document>) -> QuickModelResult<Vec<DataValue>>;

    /// 查找所有匹配的文档，空过滤条件匹配全部
    async fn find(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<Vec<DataValue>>;

    /// 查找第一个匹配的文档
    async fn find_one(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<Option<DataValue>>;

    /// 根据ID查找文档
    async fn find_by_id(&self, model: &CompiledModel, id: &str) -> QuickModelResult<Option<DataValue>>;

    /// 批量更新，返回受影响的文档数
    async fn update(&self, model: &CompiledModel, filter: Filter, patch: UpdatePatch) -> QuickModelResult<u64>;

    /// 更新第一个匹配的文档，返回受影响的文档数
    async fn update_one(&self, model: &CompiledModel, filter: Filter, patch: UpdatePatch) -> QuickModelResult<u64>;

    /// 查找并更新第一个匹配的文档
    async fn find_one_and_update(
        &self,
        model: &CompiledModel,
        filter: Filter,
        patch: UpdatePatch,
        options: Option<ModifyOptions>,
    ) -> QuickModelResult<Option<DataValue>>;

    /// 根据ID查找并更新文档
    async fn find_by_id_and_update(
        &self,
        model: &CompiledModel,
        id: &str,
        patch: UpdatePatch,
        options: Option<ModifyOptions>,
    ) -> QuickModelResult<Option<DataValue>>;

    /// 批量删除，返回删除的文档数
    async fn delete(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<u64>;

    /// 删除第一个匹配的文档，返回删除的文档数
    async fn delete_one(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<u64>;

    /// 查找并删除第一个匹配的文档
    async fn find_one_and_delete(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<Option<DataValue>>;

    /// 根据ID查找并删除文档
    async fn find_by_id_and_delete(&self, model: &CompiledModel, id: &str) -> QuickModelResult<Option<DataValue>>;

    /// 统计匹配的文档数
    async fn count(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<u64>;

    /// 执行聚合管道
    async fn aggregate(&self, model: &CompiledModel, pipeline: Vec<PipelineStage>) -> QuickModelResult<Vec<DataValue>>;
}
