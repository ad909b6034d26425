//! 通用数据类型定义
//!
//! 定义引擎无关的文档值、过滤条件、更新补丁和聚合管道类型

pub mod data_value;
pub mod query;
pub mod update_operations;

use std::collections::HashMap;

// 重新导出所有公共类型以保持API兼容性
pub use data_value::{DataValue, json_value_to_data_value};
pub use query::{Filter, ModifyOptions, QueryCondition, QueryOperator, ReturnDocument};
pub use update_operations::{UpdateOperation, UpdateOperator, UpdatePatch};

/// 文档，字段名到值的映射
pub type Document = HashMap<String, DataValue>;

/// 聚合管道阶段，内容由持久化引擎解释
pub type PipelineStage = DataValue;
