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

//! Schema registration and versioning

use crate::database::dao::query_failed;
use crate::database::pool::ConnectionPool;
use crate::error::StorageError;
use async_trait::async_trait;
use std::sync::Arc;

/// Version written by this build; bump alongside DDL changes
pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA_DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS schema_info ( \
         version INTEGER NOT NULL \
     )",
    "CREATE TABLE IF NOT EXISTS locations ( \
         id INTEGER PRIMARY KEY AUTOINCREMENT, \
         world TEXT NOT NULL, \
         x REAL NOT NULL, \
         y REAL NOT NULL, \
         z REAL NOT NULL, \
         yaw INTEGER NOT NULL, \
         pitch INTEGER NOT NULL \
     )",
    "CREATE TABLE IF NOT EXISTS inventories ( \
         id INTEGER PRIMARY KEY AUTOINCREMENT, \
         data BLOB NOT NULL \
     )",
    "CREATE TABLE IF NOT EXISTS profiles ( \
         id INTEGER PRIMARY KEY AUTOINCREMENT, \
         player_ref BLOB NOT NULL UNIQUE, \
         last_name TEXT NOT NULL, \
         credential_hash TEXT, \
         registered INTEGER NOT NULL DEFAULT 0, \
         last_login TEXT, \
         location_id INTEGER REFERENCES locations(id), \
         inventory_id INTEGER REFERENCES inventories(id) \
     )",
    "CREATE INDEX IF NOT EXISTS idx_profiles_last_name ON profiles(last_name)",
];

/// Creates and versions the Lockward tables
#[async_trait]
pub trait MigrationDao: Send + Sync {
    /// Ensure all tables exist and the stored schema version is current
    async fn register_schema(&self) -> Result<(), StorageError>;

    /// Version recorded in storage, `None` before first registration
    async fn schema_version(&self) -> Result<Option<i32>, StorageError>;
}

pub struct SqliteMigrationDao {
    pool: Arc<ConnectionPool>,
}

impl SqliteMigrationDao {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MigrationDao for SqliteMigrationDao {
    async fn register_schema(&self) -> Result<(), StorageError> {
        let mut connection = self.pool.acquire().await?;

        for statement in SCHEMA_DDL {
            sqlx::query(statement)
                .execute(&mut *connection)
                .await
                .map_err(|e| query_failed("Failed to register schema", e))?;
        }

        let stored: Option<(i32,)> = sqlx::query_as("SELECT version FROM schema_info LIMIT 1")
            .fetch_optional(&mut *connection)
            .await
            .map_err(|e| query_failed("Failed to read schema version", e))?;

        match stored {
            None => {
                sqlx::query("INSERT INTO schema_info (version) VALUES (?)")
                    .bind(SCHEMA_VERSION)
                    .execute(&mut *connection)
                    .await
                    .map_err(|e| query_failed("Failed to record schema version", e))?;
                tracing::info!("Registered schema at version {}", SCHEMA_VERSION);
            }
            Some((version,)) if version != SCHEMA_VERSION => {
                sqlx::query("UPDATE schema_info SET version = ?")
                    .bind(SCHEMA_VERSION)
                    .execute(&mut *connection)
                    .await
                    .map_err(|e| query_failed("Failed to bump schema version", e))?;
                tracing::info!("Upgraded schema from version {} to {}", version, SCHEMA_VERSION);
            }
            Some(_) => {}
        }

        Ok(())
    }

    async fn schema_version(&self) -> Result<Option<i32>, StorageError> {
        let mut connection = self.pool.acquire().await?;

        let stored: Option<(i32,)> = sqlx::query_as("SELECT version FROM schema_info LIMIT 1")
            .fetch_optional(&mut *connection)
            .await
            .map_err(|e| query_failed("Failed to read schema version", e))?;

        Ok(stored.map(|(version,)| version))
    }
}
