use base64::Engine;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// 通用数据值类型 - 引擎无关的文档值表示
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    /// 空值
    Null,
    /// 布尔值
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 高精度十进制数（文本形式保存，避免精度丢失）
    Decimal(String),
    /// 字符串
    String(String),
    /// 字节数组
    Bytes(Vec<u8>),
    /// 日期时间
    DateTime(DateTime<FixedOffset>),
    /// 文档ID（24位十六进制字符串）
    ObjectId(String),
    /// UUID
    Uuid(Uuid),
    /// JSON 值
    Json(serde_json::Value),
    /// 数组
    Array(Vec<DataValue>),
    /// 对象/文档
    Object(HashMap<String, DataValue>),
}

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Decimal(d) => write!(f, "{}", d),
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Bytes(bytes) => write!(f, "[{} bytes]", bytes.len()),
            DataValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            DataValue::ObjectId(oid) => write!(f, "ObjectId({})", oid),
            DataValue::Uuid(uuid) => write!(f, "{}", uuid),
            DataValue::Json(json) => write!(f, "{}", json),
            DataValue::Array(_) | DataValue::Object(_) => write!(f, "{}", self.to_json_value()),
        }
    }
}

impl std::fmt::Debug for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug 和 Display 保持一致，显示实际值而不是类型构造函数
        write!(f, "{}", self)
    }
}

impl DataValue {
    /// 获取数据类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "boolean",
            DataValue::Int(_) => "integer",
            DataValue::Float(_) => "float",
            DataValue::Decimal(_) => "decimal",
            DataValue::String(_) => "string",
            DataValue::Bytes(_) => "bytes",
            DataValue::DateTime(_) => "datetime",
            DataValue::ObjectId(_) => "object_id",
            DataValue::Uuid(_) => "uuid",
            DataValue::Json(_) => "json",
            DataValue::Array(_) => "array",
            DataValue::Object(_) => "object",
        }
    }

    /// 判断是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// 尝试取出数值（整数、浮点数或十进制文本）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Int(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            DataValue::Decimal(d) => d.parse().ok(),
            _ => None,
        }
    }

    /// 尝试取出字符串引用
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) | DataValue::ObjectId(s) | DataValue::Decimal(s) => Some(s),
            _ => None,
        }
    }

    /// 转换为 JSON 字符串
    pub fn to_json_string(&self) -> Result<String, crate::error::QuickModelError> {
        serde_json::to_string(&self.to_json_value()).map_err(|e| {
            crate::quick_error!(serialization, format!("DataValue 转换为 JSON 失败: {}", e))
        })
    }

    /// 转换为 JSON 值
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            DataValue::Null => serde_json::Value::Null,
            DataValue::Bool(b) => serde_json::Value::Bool(*b),
            DataValue::Int(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DataValue::Decimal(d) => serde_json::Value::String(d.clone()),
            DataValue::String(s) => serde_json::Value::String(s.clone()),
            // 字节数组转换为 base64 字符串
            DataValue::Bytes(b) => {
                serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
            }
            DataValue::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            DataValue::ObjectId(oid) => serde_json::Value::String(oid.clone()),
            DataValue::Uuid(u) => serde_json::Value::String(u.to_string()),
            DataValue::Json(j) => j.clone(),
            DataValue::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(|item| item.to_json_value()).collect())
            }
            DataValue::Object(obj) => {
                let json_object: serde_json::Map<String, serde_json::Value> = obj
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect();
                serde_json::Value::Object(json_object)
            }
        }
    }

    /// 直接反序列化为指定类型
    pub fn deserialize_to<T>(&self) -> Result<T, crate::error::QuickModelError>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_value(self.to_json_value()).map_err(|e| {
            crate::quick_error!(serialization, format!("DataValue 反序列化失败: {}", e))
        })
    }

    /// 期望Object类型，如果不是则返回错误
    pub fn expect_object(self) -> Result<HashMap<String, DataValue>, crate::error::QuickModelError> {
        match self {
            DataValue::Object(map) => Ok(map),
            other => Err(crate::quick_error!(
                validation,
                "data_type",
                format!("期望Object类型，但收到: {}", other.type_name())
            )),
        }
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Int(value as i64)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Int(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for DataValue {
    fn from(value: Vec<u8>) -> Self {
        DataValue::Bytes(value)
    }
}

impl From<DateTime<Utc>> for DataValue {
    fn from(value: DateTime<Utc>) -> Self {
        DataValue::DateTime(DateTime::<FixedOffset>::from(value))
    }
}

impl From<DateTime<FixedOffset>> for DataValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DataValue::DateTime(value)
    }
}

impl From<Uuid> for DataValue {
    fn from(value: Uuid) -> Self {
        DataValue::Uuid(value)
    }
}

impl From<Vec<DataValue>> for DataValue {
    fn from(value: Vec<DataValue>) -> Self {
        DataValue::Array(value)
    }
}

impl From<HashMap<String, DataValue>> for DataValue {
    fn from(value: HashMap<String, DataValue>) -> Self {
        DataValue::Object(value)
    }
}

impl From<serde_json::Value> for DataValue {
    fn from(value: serde_json::Value) -> Self {
        json_value_to_data_value(value)
    }
}

/// 将 serde_json::Value 转换为对应的 DataValue 类型
/// 而不是简单包装为 DataValue::Json
pub fn json_value_to_data_value(value: serde_json::Value) -> DataValue {
    match value {
        serde_json::Value::Null => DataValue::Null,
        serde_json::Value::Bool(b) => DataValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                DataValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                DataValue::Float(f)
            } else {
                DataValue::Json(serde_json::Value::Number(n))
            }
        }
        serde_json::Value::String(s) => DataValue::String(s),
        serde_json::Value::Array(arr) => {
            DataValue::Array(arr.into_iter().map(json_value_to_data_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let data_object: HashMap<String, DataValue> = obj
                .into_iter()
                .map(|(k, v)| (k, json_value_to_data_value(v)))
                .collect();
            DataValue::Object(data_object)
        }
    }
}
