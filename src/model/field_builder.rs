//! 字段定义构建器模块
//!
//! 通过链式调用累积单个字段的类型和约束

use crate::error::{QuickModelError, QuickModelResult};
use crate::model::field_types::{FieldDefinition, FieldType, Validator};
use crate::types::DataValue;
use regex::Regex;
use std::sync::Arc;

/// 字段定义构建器
///
/// 独占一个 [`FieldDefinition`]。类型设置方法只能调用一次，
/// 约束设置方法不受类型状态影响，可任意顺序、任意次数调用。
///
/// `number()`、`string()` 等按值消费的类型方法在返回 `TypeAlreadyConfigured`
/// 时会丢弃构建器；失败后还要继续链式调用的，改用 [`FieldDefinitionBuilder::set_type`]。
#[derive(Debug, Clone)]
pub struct FieldDefinitionBuilder {
    def: FieldDefinition,
}

impl FieldDefinitionBuilder {
    /// 创建新的字段构建器
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: FieldDefinition::new(name),
        }
    }

    /// 静态工厂方法，等价于 [`FieldDefinitionBuilder::new`]
    pub fn field(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    /// 字段名称
    pub fn name(&self) -> &str {
        self.def.name()
    }

    /// 当前已配置的类型
    pub fn field_type(&self) -> Option<&FieldType> {
        self.def.field_type()
    }

    /// 查看正在构建的字段定义
    pub fn definition(&self) -> &FieldDefinition {
        &self.def
    }

    /// 设置字段类型
    ///
    /// 失败时构建器保持原状态，可继续调用约束方法
    pub fn set_type(&mut self, field_type: FieldType) -> QuickModelResult<&mut Self> {
        self.def.set_type(field_type)?;
        Ok(self)
    }

    // 失败时 self 随错误一起被丢弃
    fn with_type(mut self, field_type: FieldType) -> QuickModelResult<Self> {
        self.set_type(field_type)?;
        Ok(self)
    }

    /// 数值类型
    pub fn number(self) -> QuickModelResult<Self> {
        self.with_type(FieldType::Number)
    }

    /// 字符串类型
    pub fn string(self) -> QuickModelResult<Self> {
        self.with_type(FieldType::String)
    }

    /// 布尔类型
    pub fn boolean(self) -> QuickModelResult<Self> {
        self.with_type(FieldType::Boolean)
    }

    /// 日期类型
    pub fn date(self) -> QuickModelResult<Self> {
        self.with_type(FieldType::Date)
    }

    /// 二进制类型
    pub fn binary(self) -> QuickModelResult<Self> {
        self.with_type(FieldType::Binary)
    }

    /// 文档ID类型
    pub fn object_id(self) -> QuickModelResult<Self> {
        self.with_type(FieldType::ObjectId)
    }

    /// 任意类型
    pub fn mixed(self) -> QuickModelResult<Self> {
        self.with_type(FieldType::Mixed)
    }

    /// 高精度十进制类型
    pub fn decimal128(self) -> QuickModelResult<Self> {
        self.with_type(FieldType::Decimal128)
    }

    /// 数组类型
    pub fn array(self) -> QuickModelResult<Self> {
        self.with_type(FieldType::Array)
    }

    /// 映射类型
    pub fn map(self) -> QuickModelResult<Self> {
        self.with_type(FieldType::Map)
    }

    /// 指定元素类型的数组
    ///
    /// 取嵌套构建器当前的类型；嵌套构建器未配置类型时，
    /// 元素类型为空，在模式编译时报 `TypeNotConfigured`
    pub fn array_of(self, nested: FieldDefinitionBuilder) -> QuickModelResult<Self> {
        let item = nested.build().field_type().cloned();
        self.with_type(FieldType::array_of(item))
    }

    /// 指定值类型的映射
    pub fn map_of(self, nested: FieldDefinitionBuilder) -> QuickModelResult<Self> {
        let value = nested.build().field_type().cloned();
        self.with_type(FieldType::map_of(value))
    }

    /// 标记为必填
    pub fn required(mut self) -> Self {
        self.def.required = Some(true);
        self
    }

    /// 最小值（数值或日期）
    pub fn min(mut self, value: impl Into<DataValue>) -> Self {
        self.def.min = Some(value.into());
        self
    }

    /// 最大值（数值或日期）
    pub fn max(mut self, value: impl Into<DataValue>) -> Self {
        self.def.max = Some(value.into());
        self
    }

    /// 唯一约束
    pub fn unique(mut self, unique: bool) -> Self {
        self.def.unique = Some(unique);
        self
    }

    /// 默认值
    pub fn default_value(mut self, value: impl Into<DataValue>) -> Self {
        self.def.default = Some(value.into());
        self
    }

    /// 枚举值，保持给定顺序
    pub fn enum_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        self.def.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// 引用的模型名称
    pub fn reference(mut self, model_name: impl Into<String>) -> Self {
        self.def.reference = Some(model_name.into());
        self
    }

    /// 正则匹配
    pub fn pattern(mut self, regex: Regex) -> Self {
        self.def.pattern = Some(regex);
        self
    }

    /// 由字符串编译正则匹配
    pub fn pattern_str(self, pattern: &str) -> QuickModelResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| QuickModelError::ValidationError {
            field: self.def.name().to_string(),
            message: format!("正则表达式无效: {}", e),
        })?;
        Ok(self.pattern(regex))
    }

    /// 是否建立索引
    pub fn index(mut self, index: bool) -> Self {
        self.def.index = Some(index);
        self
    }

    /// 是否稀疏索引
    pub fn sparse(mut self, sparse: bool) -> Self {
        self.def.sparse = Some(sparse);
        self
    }

    /// 是否默认查询返回
    pub fn select(mut self, select: bool) -> Self {
        self.def.select = Some(select);
        self
    }

    /// 是否不可变
    pub fn immutable(mut self, immutable: bool) -> Self {
        self.def.immutable = Some(immutable);
        self
    }

    /// 最大字符串长度
    pub fn max_length(mut self, length: usize) -> Self {
        self.def.max_length = Some(length);
        self
    }

    /// 最小字符串长度
    pub fn min_length(mut self, length: usize) -> Self {
        self.def.min_length = Some(length);
        self
    }

    /// 是否去除首尾空白
    pub fn trim(mut self, trim: bool) -> Self {
        self.def.trim = Some(trim);
        self
    }

    /// 是否转为小写
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.def.lowercase = Some(lowercase);
        self
    }

    /// 是否转为大写
    pub fn uppercase(mut self, uppercase: bool) -> Self {
        self.def.uppercase = Some(uppercase);
        self
    }

    /// 读取转换函数
    pub fn getter<F>(mut self, f: F) -> Self
    where
        F: Fn(DataValue) -> DataValue + Send + Sync + 'static,
    {
        self.def.getter = Some(Arc::new(f));
        self
    }

    /// 写入转换函数
    pub fn setter<F>(mut self, f: F) -> Self
    where
        F: Fn(DataValue) -> DataValue + Send + Sync + 'static,
    {
        self.def.setter = Some(Arc::new(f));
        self
    }

    /// 字段别名
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.def.alias = Some(alias.into());
        self
    }

    /// 自定义验证函数
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&DataValue) -> bool + Send + Sync + 'static,
    {
        self.def.validator = Some(Validator::Function(Arc::new(f)));
        self
    }

    /// 带失败消息的自定义验证函数
    pub fn validate_with_message<F>(mut self, f: F, message: impl Into<String>) -> Self
    where
        F: Fn(&DataValue) -> bool + Send + Sync + 'static,
    {
        self.def.validator = Some(Validator::WithMessage {
            validator: Arc::new(f),
            message: message.into(),
        });
        self
    }

    /// 完成构建，返回字段定义
    ///
    /// 未配置类型也可以调用，类型完整性在模式编译时检查
    pub fn build(self) -> FieldDefinition {
        self.def
    }
}

/// 字段构建器工厂，传入模型的 setup 回调
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldFactory;

impl FieldFactory {
    /// 按字段名创建构建器
    pub fn field(&self, name: impl Into<String>) -> FieldDefinitionBuilder {
        FieldDefinitionBuilder::new(name)
    }
}

/// 将构建器列表按顺序解析为字段定义
pub fn resolve_defs(builders: Vec<FieldDefinitionBuilder>) -> Vec<FieldDefinition> {
    builders.into_iter().map(FieldDefinitionBuilder::build).collect()
}
