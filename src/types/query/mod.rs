use crate::types::data_value::DataValue;
use serde::{Deserialize, Serialize};

/// 查询条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCondition {
    /// 字段名
    pub field: String,
    /// 操作符
    pub operator: QueryOperator,
    /// 值
    pub value: DataValue,
}

/// 查询操作符
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryOperator {
    /// 等于
    Eq,
    /// 不等于
    Ne,
    /// 大于
    Gt,
    /// 大于等于
    Gte,
    /// 小于
    Lt,
    /// 小于等于
    Lte,
    /// 在列表中
    In,
    /// 不在列表中
    NotIn,
    /// 正则表达式匹配
    Regex,
    /// 字段存在
    Exists,
}

/// 过滤条件，多个条件之间为 AND 关系
///
/// 空列表表示匹配全部文档
pub type Filter = Vec<QueryCondition>;

impl QueryCondition {
    /// 创建查询条件
    pub fn new(field: impl Into<String>, operator: QueryOperator, value: impl Into<DataValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// 等于条件
    pub fn eq(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(field, QueryOperator::Eq, value)
    }

    /// 不等于条件
    pub fn ne(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(field, QueryOperator::Ne, value)
    }

    /// 大于条件
    pub fn gt(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(field, QueryOperator::Gt, value)
    }

    /// 大于等于条件
    pub fn gte(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(field, QueryOperator::Gte, value)
    }

    /// 小于条件
    pub fn lt(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(field, QueryOperator::Lt, value)
    }

    /// 小于等于条件
    pub fn lte(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(field, QueryOperator::Lte, value)
    }

    /// 在列表中
    pub fn is_in(field: impl Into<String>, values: Vec<DataValue>) -> Self {
        Self::new(field, QueryOperator::In, DataValue::Array(values))
    }
}

/// findOneAndUpdate 类操作返回哪一版本的文档
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReturnDocument {
    /// 返回修改前的文档
    #[default]
    Before,
    /// 返回修改后的文档
    After,
}

/// 查找并修改选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifyOptions {
    /// 返回修改前还是修改后的文档
    pub return_document: ReturnDocument,
    /// 未匹配时是否插入
    pub upsert: bool,
}

impl ModifyOptions {
    /// 创建新的修改选项
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回修改后的文档
    pub fn return_new(mut self) -> Self {
        self.return_document = ReturnDocument::After;
        self
    }

    /// 设置是否插入
    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}
