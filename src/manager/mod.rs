//! 模型注册表模块
//!
//! 按模型名称保存已编译的模型，同名模型只编译一次

mod model_ops;

use crate::model::compile::CompiledModel;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// 模型注册表
///
/// 可在多个模型上下文之间共享；未显式注入时使用进程级默认注册表
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: DashMap<String, Arc<CompiledModel>>,
}

impl ModelRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            models: DashMap::new(),
        }
    }
}

/// 全局默认模型注册表
static GLOBAL_MODEL_REGISTRY: Lazy<Arc<ModelRegistry>> = Lazy::new(|| Arc::new(ModelRegistry::new()));

/// 获取全局默认模型注册表
pub fn global_registry() -> Arc<ModelRegistry> {
    GLOBAL_MODEL_REGISTRY.clone()
}
