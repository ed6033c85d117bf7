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
use crate::error::{MigrationError, StorageError};
use crate::migration::{Migration, MigrationReport};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lockward_common::{PlayerInventory, PlayerLocation, PlayerProfile};
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

/// One record of the JSON export format
#[derive(Debug, Deserialize)]
struct FlatFileRecord {
    player_ref: Uuid,
    last_name: String,
    #[serde(default)]
    credential_hash: Option<String>,
    #[serde(default)]
    last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    location: Option<FlatFileLocation>,
    #[serde(default)]
    inventory: Option<Vec<u8>>,
}

#[derive(Debug, Deserialize)]
struct FlatFileLocation {
    world: String,
    x: f64,
    y: f64,
    z: f64,
    yaw: i32,
    pitch: i32,
}

/// Imports profiles from a JSON export file.
///
/// Usage: `flatfile <path>`. Players already present in storage are skipped;
/// credential hashes are carried over verbatim.
pub struct FlatFileMigration;

impl FlatFileMigration {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FlatFileMigration {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Migration for FlatFileMigration {
    fn name(&self) -> &'static str {
        "flatfile"
    }

    async fn can_execute(&self, params: &[String]) -> bool {
        let [path] = params else {
            tracing::debug!("Flatfile import expects exactly one parameter: <path>");
            return false;
        };
        if !Path::new(path).is_file() {
            tracing::debug!("Flatfile import source does not exist: {}", path);
            return false;
        }
        true
    }

    async fn execute(
        &self,
        params: &[String],
        daos: &DaoFactory,
    ) -> Result<MigrationReport, MigrationError> {
        if !self.can_execute(params).await {
            return Err(MigrationError::PreconditionFailed(
                "Flatfile import needs an existing export file".to_string(),
            ));
        }

        let raw = tokio::fs::read(&params[0])
            .await
            .map_err(|e| MigrationError::Source(format!("{}: {}", params[0], e)))?;
        let records: Vec<FlatFileRecord> = serde_json::from_slice(&raw)
            .map_err(|e| MigrationError::Source(format!("{}: {}", params[0], e)))?;

        let mut report = MigrationReport::default();
        for record in records {
            let player_ref = record.player_ref;
            match import_record(record, daos).await {
                Ok(true) => report.imported += 1,
                Ok(false) => report.skipped += 1,
                Err(error) if error.is_unavailable() => {
                    tracing::error!("Aborting flatfile import, storage went away: {}", error);
                    return Err(error.into());
                }
                Err(error) => {
                    tracing::warn!("Dropping flatfile row for {}: {}", player_ref, error);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Flatfile import finished: {} imported, {} skipped, {} failed",
            report.imported,
            report.skipped,
            report.failed
        );
        Ok(report)
    }
}

async fn import_record(
    record: FlatFileRecord,
    daos: &DaoFactory,
) -> Result<bool, StorageError> {
    if daos
        .profile_dao()
        .find_by_uuid(record.player_ref)
        .await?
        .is_some()
    {
        return Ok(false);
    }

    let location_id = match record.location {
        Some(l) => {
            let location = PlayerLocation::new(l.world, l.x, l.y, l.z, l.yaw, l.pitch);
            Some(daos.location_dao().insert(&location).await?)
        }
        None => None,
    };

    let inventory_id = match record.inventory {
        Some(data) => Some(
            daos.inventory_dao()
                .insert(&PlayerInventory::new(data))
                .await?,
        ),
        None => None,
    };

    let registered = record.credential_hash.is_some();
    let profile = PlayerProfile {
        id: None,
        player_ref: record.player_ref,
        last_name: record.last_name,
        credential_hash: record.credential_hash,
        registered,
        last_login: record.last_login,
        location_id,
        inventory_id,
    };
    daos.profile_dao().insert(&profile).await?;

    Ok(true)
}
