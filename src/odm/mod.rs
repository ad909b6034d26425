//! # 文档操作层模块
//!
//! 持久化引擎接口、模型仓储门面以及模型上下文

pub mod context;
pub mod repository;
pub mod traits;

pub use context::ModelContext;
pub use repository::Repository;
pub use traits::PersistenceEngine;
