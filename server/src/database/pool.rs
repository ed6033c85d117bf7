//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::config::DatabaseConfig;
use crate::database::platform::StoragePlatform;
use crate::error::StorageError;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool};
use std::time::Duration;

/// A connection checked out for one unit of work; returned to the pool on drop
pub type PooledConnection = sqlx::pool::PoolConnection<Sqlite>;

/// Bounded pool of validated database connections.
///
/// Connections are handed out for the duration of exactly one unit of work
/// and go back to the pool when the guard drops, on every exit path. When
/// the pool is exhausted, callers wait up to the configured acquire timeout
/// and then fail with [`StorageError::Unavailable`]; retry policy belongs to
/// the caller.
pub struct ConnectionPool {
    pool: SqlitePool,
    platform: &'static str,
    ping_timeout: Duration,
}

impl ConnectionPool {
    /// Open a bounded pool against the platform described by `config`
    pub async fn connect(
        platform: &dyn StoragePlatform,
        config: &DatabaseConfig,
    ) -> Result<Self, StorageError> {
        let options = platform.connect_options(config);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout))
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .map_err(|error| {
                tracing::error!("Failed to open {} database: {}", platform.name(), error);
                StorageError::Unavailable(error)
            })?;

        tracing::info!(
            "Opened {} storage pool with {} max connections",
            platform.name(),
            config.max_connections
        );

        Ok(Self {
            pool,
            platform: platform.name(),
            ping_timeout: platform.ping_timeout(config),
        })
    }

    /// Check out a connection for one unit of work
    pub async fn acquire(&self) -> Result<PooledConnection, StorageError> {
        self.pool.acquire().await.map_err(StorageError::Unavailable)
    }

    /// Probe the database, bounded by the platform's ping timeout
    pub async fn ping(&self) -> Result<(), StorageError> {
        let probe = async {
            let mut connection = self.pool.acquire().await?;
            sqlx::query("SELECT 1").execute(&mut *connection).await?;
            Ok::<(), sqlx::Error>(())
        };

        match tokio::time::timeout(self.ping_timeout, probe).await {
            Ok(result) => result.map_err(StorageError::Unavailable),
            Err(_elapsed) => {
                tracing::warn!("{} database ping timed out", self.platform);
                Err(StorageError::Unavailable(sqlx::Error::PoolTimedOut))
            }
        }
    }

    /// Name of the platform this pool was opened against
    pub fn platform(&self) -> &str {
        self.platform
    }

    /// Number of connections currently open
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Close the pool and all of its connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
