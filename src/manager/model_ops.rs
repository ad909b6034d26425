//! 模型注册表操作

use crate::error::QuickModelResult;
use crate::model::compile::{CompiledModel, CompiledSchema};
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use rat_logger::debug;

use super::ModelRegistry;

impl ModelRegistry {
    /// 按名称查找已注册的模型
    pub fn lookup(&self, name: &str) -> Option<Arc<CompiledModel>> {
        self.models.get(name).map(|model| model.clone())
    }

    /// 注册编译后的模式，同名模型会被覆盖
    pub fn register(&self, name: &str, schema: CompiledSchema) -> Arc<CompiledModel> {
        let model = Arc::new(CompiledModel::new(name, schema));
        if self.models.insert(name.to_string(), model.clone()).is_some() {
            debug!("模型已存在，使用新的编译结果覆盖: {}", name);
        } else {
            debug!("注册模型: {}", name);
        }
        model
    }

    /// 查找模型，不存在时编译并注册
    ///
    /// 查找、编译和插入在同一个条目锁内完成，并发调用同名模型时只有第一个调用者执行编译。
    /// 编译闭包内不能再访问本注册表。
    pub fn get_or_compile<F>(&self, name: &str, compile: F) -> QuickModelResult<Arc<CompiledModel>>
    where
        F: FnOnce() -> QuickModelResult<CompiledSchema>,
    {
        match self.models.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                debug!("模型已注册，复用编译结果: {}", name);
                Ok(entry.get().clone())
            }
            Entry::Vacant(entry) => {
                debug!("模型未注册，开始编译: {}", name);
                let schema = compile()?;
                let model = Arc::new(CompiledModel::new(name, schema));
                entry.insert(model.clone());
                debug!("注册模型: {}, 字段数量={}", name, model.definition().len());
                Ok(model)
            }
        }
    }

    /// 检查模型是否已注册
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// 获取所有已注册的模型名称
    pub fn model_names(&self) -> Vec<String> {
        self.models.iter().map(|entry| entry.key().clone()).collect()
    }

    /// 移除模型
    pub fn remove(&self, name: &str) -> Option<Arc<CompiledModel>> {
        self.models.remove(name).map(|(_, model)| model)
    }

    /// 清空注册表
    pub fn clear(&self) {
        self.models.clear();
        debug!("模型注册表已清空");
    }

    /// 已注册模型数量
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
