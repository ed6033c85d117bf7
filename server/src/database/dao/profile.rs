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
use lockward_common::PlayerProfile;
use std::sync::Arc;
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "id, player_ref, last_name, credential_hash, registered, \
                               last_login, location_id, inventory_id";

/// Storage operations for authentication profiles
#[async_trait]
pub trait ProfileDao: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<PlayerProfile>, StorageError>;

    /// Look a profile up by its stable player identity
    async fn find_by_uuid(&self, player_ref: Uuid) -> Result<Option<PlayerProfile>, StorageError>;

    /// Look a profile up by last-known name, case-insensitively. When several
    /// historical profiles share the name, the most recently logged-in one
    /// wins.
    async fn find_by_name(&self, name: &str) -> Result<Option<PlayerProfile>, StorageError>;

    /// Insert a new profile row and return its generated id
    async fn insert(&self, profile: &PlayerProfile) -> Result<i64, StorageError>;

    /// Update an existing row; false when no row matched
    async fn update(&self, profile: &PlayerProfile) -> Result<bool, StorageError>;

    /// Delete an existing row; false when no row matched
    async fn delete(&self, profile: &PlayerProfile) -> Result<bool, StorageError>;
}

pub struct SqliteProfileDao {
    pool: Arc<ConnectionPool>,
}

impl SqliteProfileDao {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileDao for SqliteProfileDao {
    async fn find_by_id(&self, id: i64) -> Result<Option<PlayerProfile>, StorageError> {
        let mut connection = self.pool.acquire().await?;

        sqlx::query_as::<_, PlayerProfile>(&format!(
            "SELECT {} FROM profiles WHERE id = ?",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *connection)
        .await
        .map_err(|e| query_failed("Failed to find profile by id", e))
    }

    async fn find_by_uuid(&self, player_ref: Uuid) -> Result<Option<PlayerProfile>, StorageError> {
        let mut connection = self.pool.acquire().await?;

        sqlx::query_as::<_, PlayerProfile>(&format!(
            "SELECT {} FROM profiles WHERE player_ref = ?",
            PROFILE_COLUMNS
        ))
        .bind(player_ref)
        .fetch_optional(&mut *connection)
        .await
        .map_err(|e| query_failed("Failed to find profile by player identity", e))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<PlayerProfile>, StorageError> {
        let mut connection = self.pool.acquire().await?;

        // Name reuse: newest last_login wins; never-logged-in rows sort last
        sqlx::query_as::<_, PlayerProfile>(&format!(
            "SELECT {} FROM profiles WHERE last_name = ? COLLATE NOCASE \
             ORDER BY last_login DESC LIMIT 1",
            PROFILE_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&mut *connection)
        .await
        .map_err(|e| query_failed("Failed to find profile by name", e))
    }

    async fn insert(&self, profile: &PlayerProfile) -> Result<i64, StorageError> {
        let mut connection = self.pool.acquire().await?;

        let key: Option<(i64,)> = sqlx::query_as(
            "INSERT INTO profiles \
             (player_ref, last_name, credential_hash, registered, last_login, \
              location_id, inventory_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(profile.player_ref)
        .bind(&profile.last_name)
        .bind(profile.credential_hash.as_deref())
        .bind(profile.registered)
        .bind(profile.last_login)
        .bind(profile.location_id)
        .bind(profile.inventory_id)
        .fetch_optional(&mut *connection)
        .await
        .map_err(|e| query_failed("Failed to insert profile", e))?;

        let (id,) = key.ok_or_else(|| missing_generated_key("profile"))?;
        Ok(id)
    }

    async fn update(&self, profile: &PlayerProfile) -> Result<bool, StorageError> {
        let Some(id) = profile.id else {
            tracing::warn!(
                "Attempted to update profile for {} without a stored id",
                profile.player_ref
            );
            return Ok(false);
        };
        let mut connection = self.pool.acquire().await?;

        let result = sqlx::query(
            "UPDATE profiles SET player_ref = ?, last_name = ?, credential_hash = ?, \
             registered = ?, last_login = ?, location_id = ?, inventory_id = ? \
             WHERE id = ?",
        )
        .bind(profile.player_ref)
        .bind(&profile.last_name)
        .bind(profile.credential_hash.as_deref())
        .bind(profile.registered)
        .bind(profile.last_login)
        .bind(profile.location_id)
        .bind(profile.inventory_id)
        .bind(id)
        .execute(&mut *connection)
        .await
        .map_err(|e| query_failed("Failed to update profile", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, profile: &PlayerProfile) -> Result<bool, StorageError> {
        let Some(id) = profile.id else {
            tracing::warn!(
                "Attempted to delete profile for {} without a stored id",
                profile.player_ref
            );
            return Ok(false);
        };
        let mut connection = self.pool.acquire().await?;

        let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
            .bind(id)
            .execute(&mut *connection)
            .await
            .map_err(|e| query_failed("Failed to delete profile", e))?;

        Ok(result.rows_affected() > 0)
    }
}
