//! 模型定义构建器模块
//!
//! 运行 setup 回调收集字段，在 `build` 时编译并注册模型

use crate::error::QuickModelResult;
use crate::manager::ModelRegistry;
use crate::model::field_builder::{FieldDefinitionBuilder, FieldFactory, resolve_defs};
use crate::model::schema::{SchemaCollector, SchemaDefinition};
use crate::odm::context::ModelContext;
use crate::odm::repository::Repository;
use crate::odm::traits::PersistenceEngine;
use std::marker::PhantomData;
use std::sync::Arc;
use rat_logger::{debug, info};

/// 模型定义构建器
///
/// 构造时完成字段收集，之后字段集合不再变化。同名模型在同一注册表内只编译一次，
/// 后续构建器即使字段不同也会复用第一次的编译结果。
pub struct ModelDefinitionBuilder<T> {
    name: String,
    collector: SchemaCollector,
    engine: Arc<dyn PersistenceEngine>,
    registry: Arc<ModelRegistry>,
    validate_names: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ModelDefinitionBuilder<T> {
    /// 创建模型定义
    ///
    /// # 参数
    ///
    /// * `context` - 模型上下文
    /// * `name` - 模型名称，不能为空
    /// * `setup` - 字段定义回调
    pub fn new<F>(context: &ModelContext, name: &str, setup: F) -> QuickModelResult<Self>
    where
        F: FnOnce(&FieldFactory) -> QuickModelResult<Vec<FieldDefinitionBuilder>>,
    {
        if name.trim().is_empty() {
            return Err(crate::quick_error!(config, "模型名称不能为空"));
        }

        let mut collector = SchemaCollector::with_config(context.config());
        let builders = setup(&FieldFactory)?;
        let defs = resolve_defs(builders);
        debug!("模型 {} 字段解析完成: 字段数量={}", name, defs.len());

        collector.initialize(defs)?;

        Ok(Self {
            name: name.to_string(),
            collector,
            engine: context.engine().clone(),
            registry: context.registry().clone(),
            validate_names: context.config().validate_names,
            _marker: PhantomData,
        })
    }

    /// 模型名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 字段收集器
    pub fn schema(&self) -> &SchemaCollector {
        &self.collector
    }

    /// 当前字段集合的展平定义
    pub fn definition(&self) -> SchemaDefinition {
        self.collector.to_definition_mapping()
    }

    /// 编译并注册模型，返回模型仓储
    ///
    /// 注册表中已有同名模型时直接复用，不会重新编译
    pub fn build(&self) -> QuickModelResult<Repository<T>> {
        let model = self.registry.get_or_compile(&self.name, || {
            let definition = self.collector.to_definition_mapping();
            definition.validate_types()?;
            if self.validate_names {
                definition.validate_names()?;
            }

            let schema = self.engine.compile(&self.name, &definition)?;
            info!("编译模型: {}, 字段数量={}", self.name, definition.len());
            Ok(schema)
        })?;

        Ok(Repository::new(model, self.engine.clone()))
    }
}

impl<T> std::fmt::Debug for ModelDefinitionBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelDefinitionBuilder")
            .field("name", &self.name)
            .field("fields", &self.collector.names())
            .finish()
    }
}
