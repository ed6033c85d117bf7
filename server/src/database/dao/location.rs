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
use lockward_common::PlayerLocation;
use std::sync::Arc;

/// Storage operations for logout locations
#[async_trait]
pub trait LocationDao: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<PlayerLocation>, StorageError>;

    /// Insert a new location row and return its generated id
    async fn insert(&self, location: &PlayerLocation) -> Result<i64, StorageError>;

    /// Update an existing row; false when no row matched
    async fn update(&self, location: &PlayerLocation) -> Result<bool, StorageError>;

    /// Delete an existing row; false when no row matched
    async fn delete(&self, location: &PlayerLocation) -> Result<bool, StorageError>;
}

pub struct SqliteLocationDao {
    pool: Arc<ConnectionPool>,
}

impl SqliteLocationDao {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationDao for SqliteLocationDao {
    async fn find_by_id(&self, id: i64) -> Result<Option<PlayerLocation>, StorageError> {
        let mut connection = self.pool.acquire().await?;

        sqlx::query_as::<_, PlayerLocation>(
            "SELECT id, world, x, y, z, yaw, pitch FROM locations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *connection)
        .await
        .map_err(|e| query_failed("Failed to find location by id", e))
    }

    async fn insert(&self, location: &PlayerLocation) -> Result<i64, StorageError> {
        let mut connection = self.pool.acquire().await?;

        let key: Option<(i64,)> = sqlx::query_as(
            "INSERT INTO locations (world, x, y, z, yaw, pitch) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&location.world)
        .bind(location.x)
        .bind(location.y)
        .bind(location.z)
        .bind(location.yaw)
        .bind(location.pitch)
        .fetch_optional(&mut *connection)
        .await
        .map_err(|e| query_failed("Failed to insert location", e))?;

        let (id,) = key.ok_or_else(|| missing_generated_key("location"))?;
        Ok(id)
    }

    async fn update(&self, location: &PlayerLocation) -> Result<bool, StorageError> {
        let Some(id) = location.id else {
            tracing::warn!("Attempted to update a location that was never inserted");
            return Ok(false);
        };
        let mut connection = self.pool.acquire().await?;

        let result = sqlx::query(
            "UPDATE locations SET world = ?, x = ?, y = ?, z = ?, yaw = ?, pitch = ? \
             WHERE id = ?",
        )
        .bind(&location.world)
        .bind(location.x)
        .bind(location.y)
        .bind(location.z)
        .bind(location.yaw)
        .bind(location.pitch)
        .bind(id)
        .execute(&mut *connection)
        .await
        .map_err(|e| query_failed("Failed to update location", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, location: &PlayerLocation) -> Result<bool, StorageError> {
        let Some(id) = location.id else {
            tracing::warn!("Attempted to delete a location that was never inserted");
            return Ok(false);
        };
        let mut connection = self.pool.acquire().await?;

        let result = sqlx::query("DELETE FROM locations WHERE id = ?")
            .bind(id)
            .execute(&mut *connection)
            .await
            .map_err(|e| query_failed("Failed to delete location", e))?;

        Ok(result.rows_affected() > 0)
    }
}
