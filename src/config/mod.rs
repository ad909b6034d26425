//! # 配置管理模块
//!
//! 提供模型构建行为的配置，支持构建器模式和配置文件加载
//! 构建器遵循严格模式：所有配置项必须显式设置

pub mod builders;
pub mod convenience;
pub mod core;

pub use builders::ModelConfigBuilder;
pub use convenience::{lenient_model_config, strict_model_config};
pub use core::{DuplicateFieldPolicy, ModelConfig};
