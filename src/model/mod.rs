//! 模型定义系统模块
//!
//! 通过链式字段构建器声明记录结构，收集为模式定义并编译为已注册的模型

pub mod builder;
pub mod compile;
pub mod convenience;
pub mod field_builder;
pub mod field_types;
pub mod schema;

pub use builder::ModelDefinitionBuilder;
pub use compile::{CompiledModel, CompiledSchema, compile_json_schema};
pub use convenience::*;
pub use field_builder::{FieldDefinitionBuilder, FieldFactory, resolve_defs};
pub use field_types::{FieldDefinition, FieldType, Transform, Validator, ValidatorFn};
pub use schema::{PropertyDefinition, SchemaCollector, SchemaDefinition, SchemaOption};
