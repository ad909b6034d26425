//! 模型便捷函数模块
//!
//! 提供创建各种字段类型的便捷函数

use crate::error::QuickModelResult;
use crate::model::field_builder::FieldDefinitionBuilder;

/// 便捷函数：创建字符串字段
pub fn string_field(name: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    FieldDefinitionBuilder::new(name).string()
}

/// 便捷函数：创建数值字段
pub fn number_field(name: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    FieldDefinitionBuilder::new(name).number()
}

/// 便捷函数：创建布尔字段
pub fn boolean_field(name: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    FieldDefinitionBuilder::new(name).boolean()
}

/// 便捷函数：创建日期字段
pub fn date_field(name: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    FieldDefinitionBuilder::new(name).date()
}

/// 便捷函数：创建二进制字段
pub fn binary_field(name: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    FieldDefinitionBuilder::new(name).binary()
}

/// 便捷函数：创建文档ID字段
pub fn object_id_field(name: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    FieldDefinitionBuilder::new(name).object_id()
}

/// 便捷函数：创建任意类型字段
pub fn mixed_field(name: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    FieldDefinitionBuilder::new(name).mixed()
}

/// 便捷函数：创建高精度十进制字段
pub fn decimal128_field(name: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    FieldDefinitionBuilder::new(name).decimal128()
}

/// 便捷函数：创建数组字段
pub fn array_field(name: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    FieldDefinitionBuilder::new(name).array()
}

/// 便捷函数：创建映射字段
pub fn map_field(name: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    FieldDefinitionBuilder::new(name).map()
}

/// 便捷函数：创建引用字段（文档ID类型并指向目标模型）
pub fn reference_field(name: &str, target_model: &str) -> QuickModelResult<FieldDefinitionBuilder> {
    Ok(object_id_field(name)?.reference(target_model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field_types::FieldType;

    #[test]
    fn test_reference_field() {
        let def = reference_field("author", "User").unwrap().build();
        assert_eq!(def.field_type(), Some(&FieldType::ObjectId));
        assert_eq!(def.reference.as_deref(), Some("User"));
    }

    #[test]
    fn test_shorthand_type_is_final() {
        assert!(string_field("title").unwrap().number().is_err());
    }
}
