//! # 配置管理模块 - 核心配置类型

use crate::error::{QuickModelError, QuickModelResult};
use serde::{Deserialize, Serialize};
use rat_logger::info;

/// 同名字段的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateFieldPolicy {
    /// 后注册的定义覆盖先注册的
    #[default]
    Replace,
    /// 覆盖并输出警告日志
    Warn,
    /// 拒绝重复定义，返回 DuplicateField 错误
    Reject,
}

/// 模型构建配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// 同名字段处理策略
    pub duplicate_policy: DuplicateFieldPolicy,
    /// 编译前是否检查字段名
    pub validate_names: bool,
    /// 未设置 maxlength 的字符串字段使用的默认最大长度
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_max_length: Option<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicateFieldPolicy::Replace,
            validate_names: true,
            string_max_length: None,
        }
    }
}

impl ModelConfig {
    /// 创建模型配置构建器
    pub fn builder() -> super::builders::ModelConfigBuilder {
        super::builders::ModelConfigBuilder::new()
    }

    /// 从配置文件加载配置
    ///
    /// 扩展名为 `toml` 时按 TOML 解析，否则按 JSON 解析
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径
    pub fn from_file<P: AsRef<std::path::Path>>(config_path: P) -> QuickModelResult<Self> {
        let content = std::fs::read_to_string(config_path.as_ref()).map_err(QuickModelError::IoError)?;

        let config: ModelConfig = if is_toml(config_path.as_ref()) {
            toml::from_str(&content)
                .map_err(|e| crate::quick_error!(config, format!("解析TOML配置文件失败: {}", e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| crate::quick_error!(config, format!("解析JSON配置文件失败: {}", e)))?
        };

        config.check()?;
        info!("从文件加载模型配置: {:?}", config_path.as_ref());
        Ok(config)
    }

    /// 保存配置到文件
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, config_path: P) -> QuickModelResult<()> {
        let content = if is_toml(config_path.as_ref()) {
            toml::to_string_pretty(self)
                .map_err(|e| crate::quick_error!(config, format!("序列化TOML配置失败: {}", e)))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| crate::quick_error!(config, format!("序列化JSON配置失败: {}", e)))?
        };

        std::fs::write(config_path.as_ref(), content).map_err(QuickModelError::IoError)?;

        info!("保存模型配置到文件: {:?}", config_path.as_ref());
        Ok(())
    }

    /// 检查配置值是否合法
    pub(crate) fn check(&self) -> QuickModelResult<()> {
        if self.string_max_length == Some(0) {
            return Err(crate::quick_error!(config, "字符串默认最大长度不能为零"));
        }
        Ok(())
    }
}

fn is_toml(path: &std::path::Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}
