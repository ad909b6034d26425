//! 错误类型定义模块
//!
//! 定义模型构建、模式编译以及持久化引擎调用过程中可能出现的错误

use thiserror::Error;

/// rat_quickmodel 统一错误类型
#[derive(Error, Debug)]
pub enum QuickModelError {
    /// 字段类型已经配置过，不允许再次设置
    #[error("字段 '{field}' 的类型已配置为 {existing}，不能再次设置")]
    TypeAlreadyConfigured { field: String, existing: String },

    /// 字段未配置类型，无法编译模式
    #[error("字段 '{field}' 未配置类型")]
    TypeNotConfigured { field: String },

    /// 同名字段重复注册（仅在 Reject 策略下出现）
    #[error("字段 '{field}' 重复定义")]
    DuplicateField { field: String },

    /// 验证错误
    #[error("验证失败: {field} - {message}")]
    ValidationError { field: String, message: String },

    /// 配置错误
    #[error("配置错误: {message}")]
    ConfigError { message: String },

    /// 序列化错误
    #[error("序列化失败: {message}")]
    SerializationError { message: String },

    /// 查询错误（由持久化引擎产生）
    #[error("查询执行失败: {message}")]
    QueryError { message: String },

    /// 连接错误（由持久化引擎产生）
    #[error("连接失败: {message}")]
    ConnectionError { message: String },

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 其他错误
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// rat_quickmodel 统一结果类型
pub type QuickModelResult<T> = Result<T, QuickModelError>;

impl QuickModelError {
    /// 获取错误对应的多语言键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            QuickModelError::TypeAlreadyConfigured { .. } => "error.type_already_configured",
            QuickModelError::TypeNotConfigured { .. } => "error.type_not_configured",
            QuickModelError::DuplicateField { .. } => "error.duplicate_field",
            QuickModelError::ValidationError { .. } => "error.validation",
            QuickModelError::ConfigError { .. } => "error.config",
            QuickModelError::SerializationError { .. } => "error.serialization",
            QuickModelError::QueryError { .. } => "error.query",
            QuickModelError::ConnectionError { .. } => "error.connection",
            QuickModelError::IoError(_) => "error.io",
            QuickModelError::Other(_) => "error.other",
        }
    }

    /// 获取当前语言下的错误消息
    ///
    /// 需要先调用 [`crate::init`] 注册翻译，否则返回键本身
    pub fn localized_message(&self) -> String {
        let key = self.i18n_key();
        match self {
            QuickModelError::TypeAlreadyConfigured { field, existing } => {
                crate::i18n::tf(key, &[("field", field.as_str()), ("existing", existing.as_str())])
            }
            QuickModelError::TypeNotConfigured { field } | QuickModelError::DuplicateField { field } => {
                crate::i18n::tf(key, &[("field", field.as_str())])
            }
            QuickModelError::ValidationError { field, message } => {
                crate::i18n::tf(key, &[("field", field.as_str()), ("message", message.as_str())])
            }
            QuickModelError::ConfigError { message }
            | QuickModelError::SerializationError { message }
            | QuickModelError::QueryError { message }
            | QuickModelError::ConnectionError { message } => {
                crate::i18n::tf(key, &[("message", message.as_str())])
            }
            QuickModelError::IoError(e) => crate::i18n::tf(key, &[("message", &e.to_string())]),
            QuickModelError::Other(e) => crate::i18n::tf(key, &[("message", &e.to_string())]),
        }
    }
}

/// 快速构造错误的宏
///
/// ```ignore
/// quick_error!(config, "模型名称不能为空");
/// quick_error!(validation, "age", "值不能小于0");
/// ```
#[macro_export]
macro_rules! quick_error {
    (config, $msg:expr) => {
        $crate::error::QuickModelError::ConfigError { message: ($msg).to_string() }
    };
    (serialization, $msg:expr) => {
        $crate::error::QuickModelError::SerializationError { message: ($msg).to_string() }
    };
    (query, $msg:expr) => {
        $crate::error::QuickModelError::QueryError { message: ($msg).to_string() }
    };
    (connection, $msg:expr) => {
        $crate::error::QuickModelError::ConnectionError { message: ($msg).to_string() }
    };
    (validation, $field:expr, $msg:expr) => {
        $crate::error::QuickModelError::ValidationError {
            field: ($field).to_string(),
            message: ($msg).to_string(),
        }
    };
    (type_not_configured, $field:expr) => {
        $crate::error::QuickModelError::TypeNotConfigured { field: ($field).to_string() }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_error_macro() {
        let err = quick_error!(config, "模型名称不能为空");
        assert!(matches!(err, QuickModelError::ConfigError { .. }));
        assert_eq!(err.to_string(), "配置错误: 模型名称不能为空");

        let err = quick_error!(validation, "age", "值不能小于0");
        match err {
            QuickModelError::ValidationError { field, message } => {
                assert_eq!(field, "age");
                assert_eq!(message, "值不能小于0");
            }
            other => panic!("意外的错误类型: {:?}", other),
        }
    }

    #[test]
    fn test_i18n_keys() {
        let err = QuickModelError::TypeNotConfigured { field: "tags".to_string() };
        assert_eq!(err.i18n_key(), "error.type_not_configured");
        assert_eq!(err.to_string(), "字段 'tags' 未配置类型");
    }
}
