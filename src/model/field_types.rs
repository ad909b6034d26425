//! 字段类型定义模块
//!
//! 定义模型字段的类型标签、约束和值验证

use crate::error::{QuickModelError, QuickModelResult};
use crate::types::DataValue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use rat_logger::debug;

/// 字段类型枚举
///
/// 封闭的类型标签集合，嵌套类型为空表示嵌套构建器未配置类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// 数值类型
    Number,
    /// 字符串类型
    String,
    /// 布尔类型
    Boolean,
    /// 日期类型
    Date,
    /// 二进制类型
    Binary,
    /// 文档ID类型
    ObjectId,
    /// 任意类型
    Mixed,
    /// 高精度十进制类型
    Decimal128,
    /// 无元素类型约束的数组
    Array,
    /// 无值类型约束的映射
    Map,
    /// 指定元素类型的数组
    ArrayOf(Option<Box<FieldType>>),
    /// 指定值类型的映射
    MapOf(Option<Box<FieldType>>),
}

impl FieldType {
    /// 类型标签名称
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::Number => "Number",
            FieldType::String => "String",
            FieldType::Boolean => "Boolean",
            FieldType::Date => "Date",
            FieldType::Binary => "Binary",
            FieldType::ObjectId => "ObjectId",
            FieldType::Mixed => "Mixed",
            FieldType::Decimal128 => "Decimal128",
            FieldType::Array => "Array",
            FieldType::Map => "Map",
            FieldType::ArrayOf(_) => "ArrayOf",
            FieldType::MapOf(_) => "MapOf",
        }
    }

    /// 由嵌套类型构造数组类型
    pub fn array_of(item: Option<FieldType>) -> Self {
        FieldType::ArrayOf(item.map(Box::new))
    }

    /// 由嵌套类型构造映射类型
    pub fn map_of(value: Option<FieldType>) -> Self {
        FieldType::MapOf(value.map(Box::new))
    }

    /// 嵌套类型是否全部已配置
    pub fn is_resolved(&self) -> bool {
        match self {
            FieldType::ArrayOf(item) | FieldType::MapOf(item) => {
                item.as_deref().map(FieldType::is_resolved).unwrap_or(false)
            }
            _ => true,
        }
    }

    /// 检查值是否符合该类型（Null 由调用方处理）
    pub fn accepts(&self, value: &DataValue) -> bool {
        match (self, value) {
            (FieldType::Mixed, _) => true,
            (FieldType::Number, DataValue::Int(_) | DataValue::Float(_)) => true,
            (FieldType::String, DataValue::String(_)) => true,
            (FieldType::Boolean, DataValue::Bool(_)) => true,
            (FieldType::Date, DataValue::DateTime(_)) => true,
            (FieldType::Binary, DataValue::Bytes(_)) => true,
            (FieldType::ObjectId, DataValue::ObjectId(_)) => true,
            (FieldType::ObjectId, DataValue::String(s)) => is_object_id_hex(s),
            (FieldType::Decimal128, DataValue::Decimal(_) | DataValue::Int(_) | DataValue::Float(_)) => true,
            (FieldType::Array, DataValue::Array(_)) => true,
            (FieldType::Map, DataValue::Object(_)) => true,
            (FieldType::Map, DataValue::Json(serde_json::Value::Object(_))) => true,
            (FieldType::ArrayOf(item), DataValue::Array(items)) => match item {
                Some(item) => items.iter().all(|v| v.is_null() || item.accepts(v)),
                None => true,
            },
            (FieldType::MapOf(inner), DataValue::Object(map)) => match inner {
                Some(inner) => map.values().all(|v| v.is_null() || inner.accepts(v)),
                None => true,
            },
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::ArrayOf(Some(item)) => write!(f, "[{}]", item),
            FieldType::ArrayOf(None) => write!(f, "[?]"),
            FieldType::MapOf(Some(value)) => write!(f, "Map<{}>", value),
            FieldType::MapOf(None) => write!(f, "Map<?>"),
            other => write!(f, "{}", other.tag()),
        }
    }
}

fn is_object_id_hex(s: &str) -> bool {
    s.len() == 24 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// 值转换函数（getter / setter）
pub type Transform = Arc<dyn Fn(DataValue) -> DataValue + Send + Sync>;

/// 值验证函数
pub type ValidatorFn = Arc<dyn Fn(&DataValue) -> bool + Send + Sync>;

/// 自定义验证器
#[derive(Clone)]
pub enum Validator {
    /// 仅验证函数
    Function(ValidatorFn),
    /// 验证函数与失败消息
    WithMessage {
        validator: ValidatorFn,
        message: String,
    },
}

impl Validator {
    /// 执行验证
    pub fn check(&self, value: &DataValue) -> bool {
        match self {
            Validator::Function(f) => f(value),
            Validator::WithMessage { validator, .. } => validator(value),
        }
    }

    /// 验证失败时的消息
    pub fn message(&self) -> Option<&str> {
        match self {
            Validator::Function(_) => None,
            Validator::WithMessage { message, .. } => Some(message),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Function(_) => write!(f, "Validator::Function"),
            Validator::WithMessage { message, .. } => {
                write!(f, "Validator::WithMessage({:?})", message)
            }
        }
    }
}

/// 字段定义
///
/// 名称在构造时确定；类型只能设置一次；其余约束可重复设置，以最后一次为准。
/// 交给模式收集器之后约定不再修改。
#[derive(Clone)]
pub struct FieldDefinition {
    name: String,
    field_type: Option<FieldType>,
    /// 是否必填
    pub required: Option<bool>,
    /// 是否唯一
    pub unique: Option<bool>,
    /// 默认值
    pub default: Option<DataValue>,
    /// 最小值（数值或日期）
    pub min: Option<DataValue>,
    /// 最大值（数值或日期）
    pub max: Option<DataValue>,
    /// 允许的枚举值
    pub enum_values: Option<Vec<DataValue>>,
    /// 引用的模型名称
    pub reference: Option<String>,
    /// 正则匹配
    pub pattern: Option<Regex>,
    /// 是否建立索引
    pub index: Option<bool>,
    /// 是否稀疏索引
    pub sparse: Option<bool>,
    /// 是否默认查询返回
    pub select: Option<bool>,
    /// 是否不可变
    pub immutable: Option<bool>,
    /// 最大字符串长度
    pub max_length: Option<usize>,
    /// 最小字符串长度
    pub min_length: Option<usize>,
    /// 是否去除首尾空白
    pub trim: Option<bool>,
    /// 是否转为小写
    pub lowercase: Option<bool>,
    /// 是否转为大写
    pub uppercase: Option<bool>,
    /// 读取转换函数
    pub getter: Option<Transform>,
    /// 写入转换函数
    pub setter: Option<Transform>,
    /// 字段别名
    pub alias: Option<String>,
    /// 自定义验证器
    pub validator: Option<Validator>,
}

impl FieldDefinition {
    /// 创建未配置类型的字段定义
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            required: None,
            unique: None,
            default: None,
            min: None,
            max: None,
            enum_values: None,
            reference: None,
            pattern: None,
            index: None,
            sparse: None,
            select: None,
            immutable: None,
            max_length: None,
            min_length: None,
            trim: None,
            lowercase: None,
            uppercase: None,
            getter: None,
            setter: None,
            alias: None,
            validator: None,
        }
    }

    /// 字段名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 字段类型
    pub fn field_type(&self) -> Option<&FieldType> {
        self.field_type.as_ref()
    }

    /// 是否已配置类型
    pub fn is_configured(&self) -> bool {
        self.field_type.is_some()
    }

    /// 设置字段类型
    ///
    /// 类型已配置时返回 `TypeAlreadyConfigured`，原类型保持不变
    pub fn set_type(&mut self, field_type: FieldType) -> QuickModelResult<()> {
        if let Some(existing) = &self.field_type {
            return Err(QuickModelError::TypeAlreadyConfigured {
                field: self.name.clone(),
                existing: existing.to_string(),
            });
        }
        debug!("字段 {} 配置类型: {}", self.name, field_type);
        self.field_type = Some(field_type);
        Ok(())
    }

    /// 应用写入转换：trim / lowercase / uppercase，然后是 setter
    pub fn normalize_value(&self, value: DataValue) -> DataValue {
        let value = match value {
            DataValue::String(mut s) => {
                if self.trim == Some(true) {
                    s = s.trim().to_string();
                }
                if self.lowercase == Some(true) {
                    s = s.to_lowercase();
                }
                if self.uppercase == Some(true) {
                    s = s.to_uppercase();
                }
                DataValue::String(s)
            }
            other => other,
        };
        match &self.setter {
            Some(setter) => setter(value),
            None => value,
        }
    }

    /// 验证字段值
    pub fn validate_value(&self, value: &DataValue) -> QuickModelResult<()> {
        let field = self.name.as_str();

        if value.is_null() {
            if self.required == Some(true) {
                return Err(crate::quick_error!(validation, field, "必填字段不能为空"));
            }
            return Ok(());
        }

        if let Some(field_type) = &self.field_type {
            if !field_type.accepts(value) {
                return Err(crate::quick_error!(
                    validation,
                    field,
                    format!("字段类型不匹配，期望 {}，实际收到 {}", field_type, value.type_name())
                ));
            }
        }

        if let Some(min) = &self.min {
            if compare_bound(value, min) == Some(Ordering::Less) {
                return Err(crate::quick_error!(validation, field, format!("值不能小于{}", min)));
            }
        }
        if let Some(max) = &self.max {
            if compare_bound(value, max) == Some(Ordering::Greater) {
                return Err(crate::quick_error!(validation, field, format!("值不能大于{}", max)));
            }
        }

        if let DataValue::String(s) = value {
            let len = s.chars().count();
            if let Some(max_len) = self.max_length {
                if len > max_len {
                    return Err(crate::quick_error!(validation, field, format!("字符串长度不能超过{}", max_len)));
                }
            }
            if let Some(min_len) = self.min_length {
                if len < min_len {
                    return Err(crate::quick_error!(validation, field, format!("字符串长度不能少于{}", min_len)));
                }
            }
            if let Some(pattern) = &self.pattern {
                if !pattern.is_match(s) {
                    return Err(crate::quick_error!(
                        validation,
                        field,
                        format!("字符串不匹配正则表达式 {}", pattern.as_str())
                    ));
                }
            }
        }

        if let Some(values) = &self.enum_values {
            if !values.contains(value) {
                return Err(crate::quick_error!(validation, field, format!("值 {} 不在允许的枚举值中", value)));
            }
        }

        if let Some(validator) = &self.validator {
            if !validator.check(value) {
                let message = validator.message().unwrap_or("自定义验证未通过");
                return Err(crate::quick_error!(validation, field, message));
            }
        }

        Ok(())
    }
}

fn compare_bound(value: &DataValue, bound: &DataValue) -> Option<Ordering> {
    match (value, bound) {
        (DataValue::DateTime(a), DataValue::DateTime(b)) => Some(a.cmp(b)),
        _ => value.as_f64()?.partial_cmp(&bound.as_f64()?),
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("required", &self.required)
            .field("unique", &self.unique)
            .field("default", &self.default)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("enum_values", &self.enum_values)
            .field("reference", &self.reference)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("index", &self.index)
            .field("sparse", &self.sparse)
            .field("select", &self.select)
            .field("immutable", &self.immutable)
            .field("max_length", &self.max_length)
            .field("min_length", &self.min_length)
            .field("trim", &self.trim)
            .field("lowercase", &self.lowercase)
            .field("uppercase", &self.uppercase)
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .field("alias", &self.alias)
            .field("validator", &self.validator)
            .finish()
    }
}
