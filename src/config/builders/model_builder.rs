//! # 模型配置构建器模块
//!
//! 提供模型配置的构建器实现，支持链式调用和严格验证

use crate::config::core::{DuplicateFieldPolicy, ModelConfig};
use crate::error::QuickModelResult;
use rat_logger::info;

/// 模型配置构建器
#[derive(Debug, Default)]
pub struct ModelConfigBuilder {
    duplicate_policy: Option<DuplicateFieldPolicy>,
    validate_names: Option<bool>,
    string_max_length: Option<Option<usize>>,
}

impl ModelConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            duplicate_policy: None,
            validate_names: None,
            string_max_length: None,
        }
    }

    /// 设置同名字段处理策略
    ///
    /// # 参数
    ///
    /// * `policy` - 处理策略
    pub fn duplicate_policy(mut self, policy: DuplicateFieldPolicy) -> Self {
        self.duplicate_policy = Some(policy);
        self
    }

    /// 设置编译前是否检查字段名
    pub fn validate_names(mut self, validate: bool) -> Self {
        self.validate_names = Some(validate);
        self
    }

    /// 设置字符串字段默认最大长度，`None` 表示不限制
    pub fn string_max_length(mut self, max_length: Option<usize>) -> Self {
        self.string_max_length = Some(max_length);
        self
    }

    /// 构建模型配置
    ///
    /// # 错误
    ///
    /// 如果任何配置项未设置，将返回错误
    pub fn build(self) -> QuickModelResult<ModelConfig> {
        let duplicate_policy = self.duplicate_policy.ok_or_else(|| {
            crate::quick_error!(config, "同名字段处理策略必须设置")
        })?;

        let validate_names = self.validate_names.ok_or_else(|| {
            crate::quick_error!(config, "字段名检查选项必须设置")
        })?;

        let string_max_length = self.string_max_length.ok_or_else(|| {
            crate::quick_error!(config, "字符串默认最大长度必须设置（不限制时传入None）")
        })?;

        let config = ModelConfig {
            duplicate_policy,
            validate_names,
            string_max_length,
        };
        config.check()?;

        info!("创建模型配置: 重复策略={:?}, 检查字段名={}", duplicate_policy, validate_names);
        Ok(config)
    }
}
