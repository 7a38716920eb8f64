//! SeaORM 存储实现
//!
//! 只连接 MySQL，所有读写都经由存储过程完成。

mod procedures;

use crate::config::AppConfig;
use crate::errors::{AttendanceError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = config.database.connection_url()?;
        if !db_url.starts_with("mysql://") && !db_url.starts_with("mariadb://") {
            return Err(AttendanceError::database_config(
                "Only mysql:// or mariadb:// database URLs are supported",
            ));
        }

        let db = Self::connect(&db_url, config).await?;

        info!(
            "SeaORM storage ready at {}:{}/{}",
            config.database.host, config.database.port, config.database.name
        );

        Ok(Self { db })
    }

    async fn connect(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(config.is_development());

        Database::connect(opt)
            .await
            .map_err(|e| AttendanceError::database_connection(format!("Cannot connect to MySQL: {e}")))
    }
}

use crate::models::procedures::{PagedRows, ProcMessage};
use crate::storage::Storage;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn query(&self, procedure: &str, args: Vec<Value>) -> Result<Vec<Value>> {
        self.query_impl(procedure, args).await
    }

    async fn query_paged(&self, procedure: &str, args: Vec<Value>) -> Result<PagedRows> {
        self.query_paged_impl(procedure, args).await
    }

    async fn execute(&self, procedure: &str, args: Vec<Value>) -> Result<Vec<ProcMessage>> {
        self.execute_impl(procedure, args).await
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| AttendanceError::database_connection(format!("Ping failed: {e}")))
    }
}
