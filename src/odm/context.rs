//! # 模型上下文
//!
//! 将持久化引擎、模型注册表和配置绑定在一起，传递给每个模型构建器

use crate::config::ModelConfig;
use crate::error::QuickModelResult;
use crate::manager::ModelRegistry;
use crate::model::builder::ModelDefinitionBuilder;
use crate::model::field_builder::{FieldDefinitionBuilder, FieldFactory};
use crate::odm::traits::PersistenceEngine;
use std::sync::Arc;

/// 模型上下文
#[derive(Clone)]
pub struct ModelContext {
    engine: Arc<dyn PersistenceEngine>,
    registry: Arc<ModelRegistry>,
    config: ModelConfig,
}

impl ModelContext {
    /// 使用新的独立注册表创建上下文
    pub fn new(engine: Arc<dyn PersistenceEngine>) -> Self {
        Self::with_registry(engine, Arc::new(ModelRegistry::new()))
    }

    /// 使用指定注册表创建上下文
    pub fn with_registry(engine: Arc<dyn PersistenceEngine>, registry: Arc<ModelRegistry>) -> Self {
        Self {
            engine,
            registry,
            config: ModelConfig::default(),
        }
    }

    /// 使用全局默认注册表创建上下文
    pub fn global(engine: Arc<dyn PersistenceEngine>) -> Self {
        Self::with_registry(engine, crate::manager::global_registry())
    }

    /// 替换模型配置
    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn engine(&self) -> &Arc<dyn PersistenceEngine> {
        &self.engine
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// 定义模型
    ///
    /// `setup` 通过字段工厂返回字段构建器列表，返回顺序即字段顺序
    pub fn model<T>(
        &self,
        name: &str,
        setup: impl FnOnce(&FieldFactory) -> QuickModelResult<Vec<FieldDefinitionBuilder>>,
    ) -> QuickModelResult<ModelDefinitionBuilder<T>> {
        ModelDefinitionBuilder::new(self, name, setup)
    }
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("registry", &self.registry.model_names())
            .field("config", &self.config)
            .finish()
    }
}
