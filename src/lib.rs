//! rat_quickmodel - 链式模型定义构建器
//!
//! 通过字段构建器声明记录结构和约束，收集为模式定义并编译为已注册的模型，
//! 再以类型化仓储门面把文档操作转发给持久化引擎

// 导出所有公共模块
pub mod error;
pub mod types;
pub mod model;
pub mod manager;
pub mod odm;
pub mod config;
pub mod adapter;
pub mod i18n;

// 重新导出常用类型和函数
pub use error::{QuickModelError, QuickModelResult};
pub use types::*;
pub use model::{
    CompiledModel, CompiledSchema, FieldDefinition, FieldDefinitionBuilder, FieldFactory, FieldType,
    ModelDefinitionBuilder, PropertyDefinition, SchemaCollector, SchemaDefinition, SchemaOption,
    Validator, array_field, binary_field, boolean_field, date_field, decimal128_field, map_field,
    mixed_field, number_field, object_id_field, reference_field, string_field,
};
pub use manager::{ModelRegistry, global_registry};
pub use odm::{ModelContext, PersistenceEngine, Repository};
pub use config::{DuplicateFieldPolicy, ModelConfig, ModelConfigBuilder};

#[cfg(feature = "mongodb-support")]
pub use adapter::MongoEngine;

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 初始化rat_quickmodel库
///
/// 注册多语言错误消息。日志系统由调用者自行初始化，本库不会初始化日志
pub fn init() {
    i18n::ErrorMessageI18n::init();
}

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
