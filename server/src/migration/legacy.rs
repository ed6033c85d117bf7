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

use crate::database::DaoFactory;
use crate::error::MigrationError;
use crate::migration::{Migration, MigrationReport};
use async_trait::async_trait;
use lockward_common::PlayerProfile;
use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::path::Path;
use uuid::Uuid;

/// Imports the pre-rewrite database layout.
///
/// Usage: `legacydb <path>`. The old store kept one `users` table with a
/// text uuid, the player name and the credential hash; rows whose uuid does
/// not parse get a fresh identity and a logged warning. The source is
/// opened read-only and never modified.
pub struct LegacyDbMigration;

impl LegacyDbMigration {
    pub fn new() -> Self {
        Self
    }

    async fn open(&self, path: &str) -> Result<SqliteConnection, sqlx::Error> {
        SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .connect()
            .await
    }
}

impl Default for LegacyDbMigration {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Migration for LegacyDbMigration {
    fn name(&self) -> &'static str {
        "legacydb"
    }

    async fn can_execute(&self, params: &[String]) -> bool {
        let [path] = params else {
            tracing::debug!("Legacy import expects exactly one parameter: <path>");
            return false;
        };
        if !Path::new(path).is_file() {
            tracing::debug!("Legacy database does not exist: {}", path);
            return false;
        }

        match self.open(path).await {
            Ok(mut connection) => {
                let table: Result<Option<(String,)>, sqlx::Error> = sqlx::query_as(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'",
                )
                .fetch_optional(&mut connection)
                .await;
                matches!(table, Ok(Some(_)))
            }
            Err(error) => {
                tracing::debug!("Failed to open legacy database {}: {}", path, error);
                false
            }
        }
    }

    async fn execute(
        &self,
        params: &[String],
        daos: &DaoFactory,
    ) -> Result<MigrationReport, MigrationError> {
        if !self.can_execute(params).await {
            return Err(MigrationError::PreconditionFailed(
                "Legacy import needs an existing database with a users table".to_string(),
            ));
        }

        let mut source = self
            .open(&params[0])
            .await
            .map_err(|e| MigrationError::Source(format!("{}: {}", params[0], e)))?;

        let rows: Vec<(Option<String>, String, Option<String>)> =
            sqlx::query_as("SELECT uuid, username, password FROM users")
                .fetch_all(&mut source)
                .await
                .map_err(|e| MigrationError::Source(format!("{}: {}", params[0], e)))?;

        let mut report = MigrationReport::default();
        for (uuid, username, password) in rows {
            let player_ref = match uuid.as_deref().map(Uuid::parse_str) {
                Some(Ok(parsed)) => parsed,
                Some(Err(error)) => {
                    tracing::warn!(
                        "Legacy row for {} has an unparsable uuid, assigning a new one: {}",
                        username,
                        error
                    );
                    Uuid::new_v4()
                }
                None => Uuid::new_v4(),
            };

            let existing = match daos.profile_dao().find_by_uuid(player_ref).await {
                Ok(existing) => existing,
                Err(error) if error.is_unavailable() => {
                    tracing::error!("Aborting legacy import, storage went away: {}", error);
                    return Err(error.into());
                }
                Err(error) => {
                    tracing::warn!("Dropping legacy row for {}: {}", username, error);
                    report.failed += 1;
                    continue;
                }
            };
            if existing.is_some() {
                report.skipped += 1;
                continue;
            }

            let mut profile = PlayerProfile::new(player_ref, username.clone());
            if let Some(hash) = password {
                profile.set_credential(hash);
            }

            match daos.profile_dao().insert(&profile).await {
                Ok(_) => report.imported += 1,
                Err(error) if error.is_unavailable() => {
                    tracing::error!("Aborting legacy import, storage went away: {}", error);
                    return Err(error.into());
                }
                Err(error) => {
                    tracing::warn!("Dropping legacy row for {}: {}", username, error);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Legacy import finished: {} imported, {} skipped, {} failed",
            report.imported,
            report.skipped,
            report.failed
        );
        Ok(report)
    }
}
