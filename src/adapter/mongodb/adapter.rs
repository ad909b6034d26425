//! MongoDB引擎结构定义

use crate::error::{QuickModelError, QuickModelResult};
use crate::model::compile::CompiledModel;
use mongodb::bson::Document;
use mongodb::{Client, Collection, Database};
use rat_logger::info;

/// MongoDB持久化引擎
///
/// 每个模型对应一个同名集合
#[derive(Debug, Clone)]
pub struct MongoEngine {
    database: Database,
}

impl MongoEngine {
    /// 使用已有的数据库句柄创建引擎
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// 连接MongoDB并创建引擎
    ///
    /// # 参数
    ///
    /// * `uri` - 连接字符串
    /// * `database` - 数据库名称
    pub async fn connect(uri: &str, database: &str) -> QuickModelResult<Self> {
        let client = Client::with_uri_str(uri).await.map_err(|e| QuickModelError::ConnectionError {
            message: format!("MongoDB连接失败: {}", e),
        })?;
        info!("连接MongoDB: database={}", database);
        Ok(Self::new(client.database(database)))
    }

    /// 数据库句柄
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub(crate) fn collection(&self, model: &CompiledModel) -> Collection<Document> {
        self.database.collection(&model.name)
    }
}
