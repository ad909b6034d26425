//! MongoDB持久化引擎
//!
//! 使用mongodb库实现模型的文档操作、验证文档和索引同步

mod adapter;
mod operations;
pub(crate) mod query_builder;
mod schema;
pub(crate) mod utils;

pub use adapter::MongoEngine;
