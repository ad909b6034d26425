//! 持久化引擎适配器模块
//!
//! 按特性开关提供具体驱动上的 [`crate::odm::PersistenceEngine`] 实现

#[cfg(feature = "mongodb-support")]
pub mod mongodb;

#[cfg(feature = "mongodb-support")]
pub use self::mongodb::MongoEngine;
