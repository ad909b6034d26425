use serde::{Deserialize, Serialize};
use crate::types::data_value::DataValue;

/// 更新操作符
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UpdateOperator {
    /// 直接设置值
    Set,
    /// 删除字段
    Unset,
    /// 原子性增加
    Increment,
    /// 原子性乘法
    Multiply,
    /// 向数组追加元素
    Push,
    /// 从数组移除匹配元素
    Pull,
}

/// 更新操作定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOperation {
    /// 要更新的字段名
    pub field: String,
    /// 更新操作类型
    pub operation: UpdateOperator,
    /// 更新的值
    pub value: DataValue,
}

/// 更新补丁，按顺序应用的更新操作列表
pub type UpdatePatch = Vec<UpdateOperation>;

impl UpdateOperation {
    /// 创建一个设置操作
    pub fn set(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self {
            field: field.into(),
            operation: UpdateOperator::Set,
            value: value.into(),
        }
    }

    /// 创建一个删除字段操作
    pub fn unset(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operation: UpdateOperator::Unset,
            value: DataValue::Null,
        }
    }

    /// 创建一个增加操作
    pub fn increment(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self {
            field: field.into(),
            operation: UpdateOperator::Increment,
            value: value.into(),
        }
    }

    /// 创建一个乘法操作
    pub fn multiply(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self {
            field: field.into(),
            operation: UpdateOperator::Multiply,
            value: value.into(),
        }
    }

    /// 创建一个数组追加操作
    pub fn push(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self {
            field: field.into(),
            operation: UpdateOperator::Push,
            value: value.into(),
        }
    }

    /// 创建一个数组移除操作
    pub fn pull(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self {
            field: field.into(),
            operation: UpdateOperator::Pull,
            value: value.into(),
        }
    }
}
