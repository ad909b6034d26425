//! 模式收集器模块
//!
//! 按名称收集字段定义，并展平为持久化引擎可编译的模式定义

use crate::config::{DuplicateFieldPolicy, ModelConfig};
use crate::error::{QuickModelError, QuickModelResult};
use crate::model::field_types::{FieldDefinition, FieldType, Transform, Validator};
use crate::types::DataValue;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use rat_logger::{debug, warn};

/// 模式选项，展平后的单个字段属性
#[derive(Clone)]
pub enum SchemaOption {
    Type(FieldType),
    Required(bool),
    Unique(bool),
    Default(DataValue),
    Min(DataValue),
    Max(DataValue),
    Enum(Vec<DataValue>),
    Ref(String),
    Match(Regex),
    Index(bool),
    Sparse(bool),
    Select(bool),
    Immutable(bool),
    MaxLength(usize),
    MinLength(usize),
    Trim(bool),
    Lowercase(bool),
    Uppercase(bool),
    Get(Transform),
    Set(Transform),
    Alias(String),
    Validate(Validator),
}

impl SchemaOption {
    /// 选项在模式定义中的键名
    pub fn key(&self) -> &'static str {
        match self {
            SchemaOption::Type(_) => "type",
            SchemaOption::Required(_) => "required",
            SchemaOption::Unique(_) => "unique",
            SchemaOption::Default(_) => "default",
            SchemaOption::Min(_) => "min",
            SchemaOption::Max(_) => "max",
            SchemaOption::Enum(_) => "enum",
            SchemaOption::Ref(_) => "ref",
            SchemaOption::Match(_) => "match",
            SchemaOption::Index(_) => "index",
            SchemaOption::Sparse(_) => "sparse",
            SchemaOption::Select(_) => "select",
            SchemaOption::Immutable(_) => "immutable",
            SchemaOption::MaxLength(_) => "maxlength",
            SchemaOption::MinLength(_) => "minlength",
            SchemaOption::Trim(_) => "trim",
            SchemaOption::Lowercase(_) => "lowercase",
            SchemaOption::Uppercase(_) => "uppercase",
            SchemaOption::Get(_) => "get",
            SchemaOption::Set(_) => "set",
            SchemaOption::Alias(_) => "alias",
            SchemaOption::Validate(_) => "validate",
        }
    }

    /// 转换为 JSON 值，函数渲染为 "[Function]"
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            SchemaOption::Type(t) => Value::String(t.to_string()),
            SchemaOption::Required(b)
            | SchemaOption::Unique(b)
            | SchemaOption::Index(b)
            | SchemaOption::Sparse(b)
            | SchemaOption::Select(b)
            | SchemaOption::Immutable(b)
            | SchemaOption::Trim(b)
            | SchemaOption::Lowercase(b)
            | SchemaOption::Uppercase(b) => Value::Bool(*b),
            SchemaOption::Default(v) | SchemaOption::Min(v) | SchemaOption::Max(v) => v.to_json_value(),
            SchemaOption::Enum(values) => Value::Array(values.iter().map(DataValue::to_json_value).collect()),
            SchemaOption::Ref(s) | SchemaOption::Alias(s) => Value::String(s.clone()),
            SchemaOption::Match(r) => Value::String(r.as_str().to_string()),
            SchemaOption::MaxLength(n) | SchemaOption::MinLength(n) => Value::from(*n),
            SchemaOption::Get(_) | SchemaOption::Set(_) => Value::String("[Function]".to_string()),
            SchemaOption::Validate(v) => match v.message() {
                Some(message) => serde_json::json!({ "validator": "[Function]", "message": message }),
                None => Value::String("[Function]".to_string()),
            },
        }
    }
}

impl fmt::Debug for SchemaOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key(), self.to_json())
    }
}

/// 单个字段的展平定义：类型标签加上所有已设置的约束
#[derive(Debug, Clone, Default)]
pub struct PropertyDefinition {
    options: Vec<SchemaOption>,
}

impl PropertyDefinition {
    /// 由字段定义展平，未设置的属性直接省略
    pub fn from_field(def: &FieldDefinition) -> Self {
        let mut options = Vec::new();

        if let Some(t) = def.field_type() {
            options.push(SchemaOption::Type(t.clone()));
        }
        if def.required == Some(true) {
            options.push(SchemaOption::Required(true));
        }
        if def.unique == Some(true) {
            options.push(SchemaOption::Unique(true));
        }
        if let Some(v) = &def.default {
            options.push(SchemaOption::Default(v.clone()));
        }
        if let Some(v) = &def.min {
            options.push(SchemaOption::Min(v.clone()));
        }
        if let Some(v) = &def.max {
            options.push(SchemaOption::Max(v.clone()));
        }
        if let Some(values) = &def.enum_values {
            options.push(SchemaOption::Enum(values.clone()));
        }
        if let Some(r) = &def.reference {
            options.push(SchemaOption::Ref(r.clone()));
        }
        if let Some(p) = &def.pattern {
            options.push(SchemaOption::Match(p.clone()));
        }
        if def.index == Some(true) {
            options.push(SchemaOption::Index(true));
        }
        if def.sparse == Some(true) {
            options.push(SchemaOption::Sparse(true));
        }
        // select(false) 有实际含义，只要设置过就输出
        if let Some(select) = def.select {
            options.push(SchemaOption::Select(select));
        }
        if def.immutable == Some(true) {
            options.push(SchemaOption::Immutable(true));
        }
        if let Some(n) = def.max_length {
            options.push(SchemaOption::MaxLength(n));
        }
        if let Some(n) = def.min_length {
            options.push(SchemaOption::MinLength(n));
        }
        if def.trim == Some(true) {
            options.push(SchemaOption::Trim(true));
        }
        if def.lowercase == Some(true) {
            options.push(SchemaOption::Lowercase(true));
        }
        if def.uppercase == Some(true) {
            options.push(SchemaOption::Uppercase(true));
        }
        if let Some(f) = &def.getter {
            options.push(SchemaOption::Get(f.clone()));
        }
        if let Some(f) = &def.setter {
            options.push(SchemaOption::Set(f.clone()));
        }
        if let Some(a) = &def.alias {
            options.push(SchemaOption::Alias(a.clone()));
        }
        if let Some(v) = &def.validator {
            options.push(SchemaOption::Validate(v.clone()));
        }

        Self { options }
    }

    /// 按键名查找选项
    pub fn get(&self, key: &str) -> Option<&SchemaOption> {
        self.options.iter().find(|o| o.key() == key)
    }

    /// 所有选项键名，按输出顺序
    pub fn keys(&self) -> Vec<&'static str> {
        self.options.iter().map(SchemaOption::key).collect()
    }

    /// 所有选项
    pub fn options(&self) -> &[SchemaOption] {
        &self.options
    }

    /// 字段类型
    pub fn field_type(&self) -> Option<&FieldType> {
        self.options.iter().find_map(|o| match o {
            SchemaOption::Type(t) => Some(t),
            _ => None,
        })
    }

    /// 是否必填
    pub fn is_required(&self) -> bool {
        matches!(self.get("required"), Some(SchemaOption::Required(true)))
    }

    fn push_if_absent(&mut self, option: SchemaOption) {
        if self.get(option.key()).is_none() {
            self.options.push(option);
        }
    }

    /// 转换为 JSON 对象
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .options
            .iter()
            .map(|o| (o.key().to_string(), o.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// 模式定义：按插入顺序排列的字段名到展平定义的映射
#[derive(Debug, Clone, Default)]
pub struct SchemaDefinition {
    fields: Vec<(String, PropertyDefinition)>,
}

impl SchemaDefinition {
    /// 按名称查找字段定义
    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    /// 字段名列表，按插入顺序
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// 遍历所有字段
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyDefinition)> {
        self.fields.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// 字段数量
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 是否没有字段
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 必填字段名列表
    pub fn required_fields(&self) -> Vec<&str> {
        self.iter().filter(|(_, p)| p.is_required()).map(|(n, _)| n).collect()
    }

    /// 编译前检查：类型完整性与字段名
    pub fn validate(&self) -> QuickModelResult<()> {
        self.validate_types()?;
        self.validate_names()
    }

    /// 检查类型完整性：每个字段都必须配置类型，嵌套类型也必须配置
    pub fn validate_types(&self) -> QuickModelResult<()> {
        for (name, property) in self.iter() {
            match property.field_type() {
                None => {
                    return Err(QuickModelError::TypeNotConfigured { field: name.to_string() });
                }
                Some(t) if !t.is_resolved() => {
                    return Err(QuickModelError::TypeNotConfigured { field: format!("{}.$item", name) });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// 检查字段名：不能为空，不能以 `$` 开头
    pub fn validate_names(&self) -> QuickModelResult<()> {
        for (name, _) in self.iter() {
            if name.is_empty() {
                return Err(crate::quick_error!(validation, name, "字段名不能为空"));
            }
            if name.starts_with('$') {
                return Err(crate::quick_error!(validation, name, "字段名不能以$开头"));
            }
        }
        Ok(())
    }

    /// 转换为 JSON 对象（用于日志和调试）
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(n, p)| (n.clone(), p.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// 模式收集器
///
/// 按插入顺序保存字段定义；同名字段的处理由 [`DuplicateFieldPolicy`] 决定，
/// 默认后注册的覆盖先注册的，并保留原位置。
#[derive(Debug)]
pub struct SchemaCollector {
    defs: Vec<(String, FieldDefinition)>,
    positions: HashMap<String, usize>,
    duplicate_policy: DuplicateFieldPolicy,
    string_max_length: Option<usize>,
    initialized: bool,
}

impl SchemaCollector {
    /// 使用默认配置创建收集器
    pub fn new() -> Self {
        Self::with_config(&ModelConfig::default())
    }

    /// 使用指定配置创建收集器
    pub fn with_config(config: &ModelConfig) -> Self {
        Self {
            defs: Vec::new(),
            positions: HashMap::new(),
            duplicate_policy: config.duplicate_policy,
            string_max_length: config.string_max_length,
            initialized: false,
        }
    }

    /// 添加或替换字段定义
    ///
    /// 仅在 `Reject` 策略下遇到同名字段时返回错误
    pub fn add(&mut self, name: impl Into<String>, def: FieldDefinition) -> QuickModelResult<&mut Self> {
        let name = name.into();

        if let Some(&position) = self.positions.get(&name) {
            match self.duplicate_policy {
                DuplicateFieldPolicy::Replace => {
                    debug!("字段 {} 已存在，使用新定义覆盖", name);
                }
                DuplicateFieldPolicy::Warn => {
                    warn!("字段 {} 重复定义，使用新定义覆盖", name);
                }
                DuplicateFieldPolicy::Reject => {
                    return Err(QuickModelError::DuplicateField { field: name });
                }
            }
            self.defs[position].1 = def;
        } else {
            self.positions.insert(name.clone(), self.defs.len());
            self.defs.push((name, def));
        }

        Ok(self)
    }

    /// 按顺序批量添加字段定义
    pub fn add_batch(&mut self, defs: Vec<FieldDefinition>) -> QuickModelResult<&mut Self> {
        for def in defs {
            let name = def.name().to_string();
            self.add(name, def)?;
        }
        Ok(self)
    }

    /// 一次性接收模型构建器解析出的全部字段定义
    pub fn initialize(&mut self, defs: Vec<FieldDefinition>) -> QuickModelResult<()> {
        if self.initialized {
            return Err(crate::quick_error!(config, "模式收集器已经初始化，不能重复接收字段定义"));
        }
        self.initialized = true;
        let count = defs.len();
        self.add_batch(defs)?;
        debug!("模式收集器初始化完成: 输入字段={}, 实际字段={}", count, self.defs.len());
        Ok(())
    }

    /// 是否已初始化
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// 按名称获取字段定义
    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.positions.get(name).map(|&position| &self.defs[position].1)
    }

    /// 是否包含字段
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// 字段名列表，按插入顺序
    pub fn names(&self) -> Vec<&str> {
        self.defs.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// 遍历所有字段定义
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.defs.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// 字段数量
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// 是否没有字段
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// 展平为模式定义，每次调用都重新构建
    pub fn to_definition_mapping(&self) -> SchemaDefinition {
        let fields: Vec<(String, PropertyDefinition)> = self
            .defs
            .iter()
            .map(|(name, def)| {
                let mut property = PropertyDefinition::from_field(def);
                if let (Some(max_len), Some(FieldType::String)) = (self.string_max_length, def.field_type()) {
                    property.push_if_absent(SchemaOption::MaxLength(max_len));
                }
                (name.clone(), property)
            })
            .collect();

        crate::debug_log!("展平模式定义: 字段数量={}", fields.len());
        SchemaDefinition { fields }
    }
}

impl Default for SchemaCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfigBuilder;
    use crate::model::field_builder::FieldDefinitionBuilder;

    fn field(name: &str) -> FieldDefinitionBuilder {
        FieldDefinitionBuilder::new(name)
    }

    #[test]
    fn test_last_write_wins() {
        let mut collector = SchemaCollector::new();
        collector
            .add_batch(vec![
                field("x").string().unwrap().build(),
                field("y").boolean().unwrap().build(),
                field("x").number().unwrap().build(),
            ])
            .unwrap();

        let definition = collector.to_definition_mapping();
        assert_eq!(definition.field_names(), vec!["x", "y"]);
        assert_eq!(definition.get("x").unwrap().field_type(), Some(&FieldType::Number));
    }

    #[test]
    fn test_absent_attributes_omitted() {
        let mut collector = SchemaCollector::new();
        collector
            .add_batch(vec![
                field("age").number().unwrap().required().build(),
                field("name").string().unwrap().unique(false).build(),
                field("secret").string().unwrap().select(false).build(),
            ])
            .unwrap();

        let definition = collector.to_definition_mapping();
        assert_eq!(definition.get("age").unwrap().keys(), vec!["type", "required"]);
        assert_eq!(definition.get("name").unwrap().keys(), vec!["type"]);
        assert_eq!(definition.get("secret").unwrap().keys(), vec!["type", "select"]);
        assert_eq!(
            definition.to_json(),
            serde_json::json!({
                "age": {"type": "Number", "required": true},
                "name": {"type": "String"},
                "secret": {"type": "String", "select": false}
            })
        );
    }

    #[test]
    fn test_mapping_reflects_current_contents() {
        let mut collector = SchemaCollector::new();
        collector.add("a", field("a").string().unwrap().build()).unwrap();
        assert_eq!(collector.to_definition_mapping().len(), 1);

        collector.add("b", field("b").date().unwrap().build()).unwrap();
        assert_eq!(collector.to_definition_mapping().field_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_initialize_only_once() {
        let mut collector = SchemaCollector::new();
        collector.initialize(vec![field("a").string().unwrap().build()]).unwrap();
        assert!(collector.is_initialized());
        assert!(collector.initialize(vec![]).is_err());
    }

    #[test]
    fn test_reject_policy() {
        let config = ModelConfigBuilder::new()
            .duplicate_policy(DuplicateFieldPolicy::Reject)
            .validate_names(true)
            .string_max_length(None)
            .build()
            .unwrap();
        let mut collector = SchemaCollector::with_config(&config);

        let result = collector.add_batch(vec![
            field("x").string().unwrap().build(),
            field("x").number().unwrap().build(),
        ]);
        assert!(matches!(result, Err(QuickModelError::DuplicateField { ref field }) if field == "x"));
    }

    #[test]
    fn test_string_max_length_default() {
        let config = ModelConfigBuilder::new()
            .duplicate_policy(DuplicateFieldPolicy::Replace)
            .validate_names(true)
            .string_max_length(Some(255))
            .build()
            .unwrap();
        let mut collector = SchemaCollector::with_config(&config);
        collector
            .add_batch(vec![
                field("title").string().unwrap().build(),
                field("code").string().unwrap().max_length(8).build(),
                field("count").number().unwrap().build(),
            ])
            .unwrap();

        let definition = collector.to_definition_mapping();
        assert_eq!(definition.get("title").unwrap().to_json()["maxlength"], 255);
        assert_eq!(definition.get("code").unwrap().to_json()["maxlength"], 8);
        assert!(definition.get("count").unwrap().get("maxlength").is_none());
    }

    #[test]
    fn test_zero_lengths_are_kept() {
        let mut collector = SchemaCollector::new();
        collector
            .add_batch(vec![field("flag").string().unwrap().max_length(0).min_length(0).build()])
            .unwrap();

        let property = collector.to_definition_mapping().get("flag").unwrap().clone();
        assert!(matches!(property.get("maxlength"), Some(SchemaOption::MaxLength(0))));
        assert!(matches!(property.get("minlength"), Some(SchemaOption::MinLength(0))));
    }

    #[test]
    fn test_validate_reports_untyped_fields() {
        let mut collector = SchemaCollector::new();
        collector
            .add_batch(vec![
                field("ok").string().unwrap().build(),
                field("missing").required().build(),
            ])
            .unwrap();

        let err = collector.to_definition_mapping().validate().unwrap_err();
        assert!(matches!(err, QuickModelError::TypeNotConfigured { ref field } if field == "missing"));
    }

    #[test]
    fn test_validate_names() {
        let mut collector = SchemaCollector::new();
        collector.add("$where", field("$where").string().unwrap().build()).unwrap();
        assert!(collector.to_definition_mapping().validate_names().is_err());
    }
}
