//! # 便利配置函数模块
//!
//! 提供常用模型配置的便利函数

use crate::config::core::{DuplicateFieldPolicy, ModelConfig};

/// 严格配置：拒绝重复字段，检查字段名
pub fn strict_model_config(string_max_length: Option<usize>) -> ModelConfig {
    ModelConfig {
        duplicate_policy: DuplicateFieldPolicy::Reject,
        validate_names: true,
        string_max_length,
    }
}

/// 宽松配置：重复字段直接覆盖，不检查字段名
pub fn lenient_model_config() -> ModelConfig {
    ModelConfig {
        duplicate_policy: DuplicateFieldPolicy::Replace,
        validate_names: false,
        string_max_length: None,
    }
}
