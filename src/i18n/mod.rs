//! 多语言错误消息模块
//!
//! 使用rat_embed_lang框架提供统一的错误消息多语言支持

use std::collections::HashMap;
use rat_embed_lang::register_translations;

/// 错误消息翻译注册器
pub struct ErrorMessageI18n;

impl ErrorMessageI18n {
    /// 注册所有错误消息翻译
    pub fn register_all_translations() {
        let mut translations: HashMap<String, HashMap<String, String>> = HashMap::new();

        // 字段类型重复配置
        let mut type_already_configured = HashMap::new();
        type_already_configured.insert("zh-CN".to_string(), "字段 '{field}' 的类型已配置为 {existing}，不能再次设置".to_string());
        type_already_configured.insert("en-US".to_string(), "Type of field '{field}' is already configured as {existing}".to_string());
        type_already_configured.insert("ja-JP".to_string(), "フィールド '{field}' の型は既に {existing} として設定されています".to_string());
        translations.insert("error.type_already_configured".to_string(), type_already_configured);

        // 字段未配置类型
        let mut type_not_configured = HashMap::new();
        type_not_configured.insert("zh-CN".to_string(), "字段 '{field}' 未配置类型".to_string());
        type_not_configured.insert("en-US".to_string(), "Field '{field}' has no type configured".to_string());
        type_not_configured.insert("ja-JP".to_string(), "フィールド '{field}' の型が設定されていません".to_string());
        translations.insert("error.type_not_configured".to_string(), type_not_configured);

        // 重复字段
        let mut duplicate_field = HashMap::new();
        duplicate_field.insert("zh-CN".to_string(), "字段 '{field}' 重复定义".to_string());
        duplicate_field.insert("en-US".to_string(), "Field '{field}' is defined more than once".to_string());
        duplicate_field.insert("ja-JP".to_string(), "フィールド '{field}' が重複して定義されています".to_string());
        translations.insert("error.duplicate_field".to_string(), duplicate_field);

        // 验证错误
        let mut validation_errors = HashMap::new();
        validation_errors.insert("zh-CN".to_string(), "验证失败: {field} - {message}".to_string());
        validation_errors.insert("en-US".to_string(), "Validation failed: {field} - {message}".to_string());
        validation_errors.insert("ja-JP".to_string(), "検証が失敗しました: {field} - {message}".to_string());
        translations.insert("error.validation".to_string(), validation_errors);

        // 配置错误
        let mut config_errors = HashMap::new();
        config_errors.insert("zh-CN".to_string(), "配置错误: {message}".to_string());
        config_errors.insert("en-US".to_string(), "Configuration error: {message}".to_string());
        config_errors.insert("ja-JP".to_string(), "設定エラー: {message}".to_string());
        translations.insert("error.config".to_string(), config_errors);

        // 序列化错误
        let mut serialization_errors = HashMap::new();
        serialization_errors.insert("zh-CN".to_string(), "序列化失败: {message}".to_string());
        serialization_errors.insert("en-US".to_string(), "Serialization failed: {message}".to_string());
        serialization_errors.insert("ja-JP".to_string(), "シリアライズが失敗しました: {message}".to_string());
        translations.insert("error.serialization".to_string(), serialization_errors);

        // 查询错误
        let mut query_errors = HashMap::new();
        query_errors.insert("zh-CN".to_string(), "查询执行失败: {message}".to_string());
        query_errors.insert("en-US".to_string(), "Query execution failed: {message}".to_string());
        query_errors.insert("ja-JP".to_string(), "クエリ実行が失敗しました: {message}".to_string());
        translations.insert("error.query".to_string(), query_errors);

        // 连接错误
        let mut connection_errors = HashMap::new();
        connection_errors.insert("zh-CN".to_string(), "连接失败: {message}".to_string());
        connection_errors.insert("en-US".to_string(), "Connection failed: {message}".to_string());
        connection_errors.insert("ja-JP".to_string(), "接続に失敗しました: {message}".to_string());
        translations.insert("error.connection".to_string(), connection_errors);

        // IO错误
        let mut io_errors = HashMap::new();
        io_errors.insert("zh-CN".to_string(), "IO错误: {message}".to_string());
        io_errors.insert("en-US".to_string(), "IO error: {message}".to_string());
        io_errors.insert("ja-JP".to_string(), "IOエラー: {message}".to_string());
        translations.insert("error.io".to_string(), io_errors);

        let mut other_errors = HashMap::new();
        other_errors.insert("zh-CN".to_string(), "{message}".to_string());
        other_errors.insert("en-US".to_string(), "{message}".to_string());
        other_errors.insert("ja-JP".to_string(), "{message}".to_string());
        translations.insert("error.other".to_string(), other_errors);

        // 注册所有翻译
        register_translations(translations);
    }

    /// 初始化错误消息多语言支持
    pub fn init() {
        Self::register_all_translations();

        // 从环境变量获取语言设置，默认为zh-CN
        let lang = std::env::var("RAT_LANG")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_else(|_| "zh-CN".to_string());

        // 标准化语言代码
        use rat_embed_lang::normalize_language_code;
        let normalized_lang = normalize_language_code(&lang);
        set_language(&normalized_lang);
    }
}

/// 重新导出rat_embed_lang的核心函数
pub use rat_embed_lang::{t, tf, set_language, current_language};
