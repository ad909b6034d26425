//! # 配置构建器模块
//!
//! 提供配置类型的构建器实现，支持链式调用和严格验证

pub mod model_builder;

pub use model_builder::ModelConfigBuilder;
