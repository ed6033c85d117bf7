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

use crate::database::dao::{missing_generated_key, query_failed};
use crate::database::pool::ConnectionPool;
use crate::error::StorageError;
use async_trait::async_trait;
use lockward_common::PlayerInventory;
use std::sync::Arc;

/// Storage operations for inventory snapshots
#[async_trait]
pub trait InventoryDao: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<PlayerInventory>, StorageError>;

    /// Insert a new snapshot and return its generated id
    async fn insert(&self, inventory: &PlayerInventory) -> Result<i64, StorageError>;

    /// Update an existing row; false when no row matched
    async fn update(&self, inventory: &PlayerInventory) -> Result<bool, StorageError>;

    /// Delete an existing row; false when no row matched
    async fn delete(&self, inventory: &PlayerInventory) -> Result<bool, StorageError>;
}

pub struct SqliteInventoryDao {
    pool: Arc<ConnectionPool>,
}

impl SqliteInventoryDao {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryDao for SqliteInventoryDao {
    async fn find_by_id(&self, id: i64) -> Result<Option<PlayerInventory>, StorageError> {
        let mut connection = self.pool.acquire().await?;

        sqlx::query_as::<_, PlayerInventory>("SELECT id, data FROM inventories WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *connection)
            .await
            .map_err(|e| query_failed("Failed to find inventory by id", e))
    }

    async fn insert(&self, inventory: &PlayerInventory) -> Result<i64, StorageError> {
        let mut connection = self.pool.acquire().await?;

        let key: Option<(i64,)> =
            sqlx::query_as("INSERT INTO inventories (data) VALUES (?) RETURNING id")
                .bind(&inventory.data)
                .fetch_optional(&mut *connection)
                .await
                .map_err(|e| query_failed("Failed to insert inventory", e))?;

        let (id,) = key.ok_or_else(|| missing_generated_key("inventory"))?;
        Ok(id)
    }

    async fn update(&self, inventory: &PlayerInventory) -> Result<bool, StorageError> {
        let Some(id) = inventory.id else {
            tracing::warn!("Attempted to update an inventory that was never inserted");
            return Ok(false);
        };
        let mut connection = self.pool.acquire().await?;

        let result = sqlx::query("UPDATE inventories SET data = ? WHERE id = ?")
            .bind(&inventory.data)
            .bind(id)
            .execute(&mut *connection)
            .await
            .map_err(|e| query_failed("Failed to update inventory", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, inventory: &PlayerInventory) -> Result<bool, StorageError> {
        let Some(id) = inventory.id else {
            tracing::warn!("Attempted to delete an inventory that was never inserted");
            return Ok(false);
        };
        let mut connection = self.pool.acquire().await?;

        let result = sqlx::query("DELETE FROM inventories WHERE id = ?")
            .bind(id)
            .execute(&mut *connection)
            .await
            .map_err(|e| query_failed("Failed to delete inventory", e))?;

        Ok(result.rows_affected() > 0)
    }
}
