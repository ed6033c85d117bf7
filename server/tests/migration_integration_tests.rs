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

use lockward_server::config::Configuration;
use lockward_server::database::{DaoFactory, SqlitePlatform};
use lockward_server::error::MigrationError;
use lockward_server::migration::MigrationModule;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;
use uuid::Uuid;

async fn setup_factory(dir: &TempDir) -> DaoFactory {
    let path = dir.path().join("lockward-test.db");
    let yaml = format!("database:\n  path: {}\n  max_connections: 4\n", path.display());
    let config: Configuration =
        serde_yaml::from_str(&yaml).expect("Failed to parse test configuration");

    DaoFactory::build(&SqlitePlatform, &config.database)
        .await
        .expect("Failed to build DAO factory")
}

#[tokio::test]
async fn test_unknown_source_is_absent() {
    let module = MigrationModule::new();
    assert!(module.migration("no-such-source").is_none());
}

#[tokio::test]
async fn test_flatfile_import() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let factory = setup_factory(&dir).await;
    let module = MigrationModule::new();

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let export = serde_json::json!([
        {
            "player_ref": alice,
            "last_name": "Alice",
            "credential_hash": "$2b$12$carriedoverhash",
            "last_login": "2026-01-15T12:00:00Z",
            "location": {"world": "spawn", "x": 1.0, "y": 2.0, "z": 3.0, "yaw": 0, "pitch": 0},
            "inventory": [1, 2, 3, 4]
        },
        {
            "player_ref": bob,
            "last_name": "Bob"
        }
    ]);
    let export_path = dir.path().join("export.json");
    std::fs::write(&export_path, serde_json::to_vec_pretty(&export).unwrap())
        .expect("Failed to write export file");

    let migration = module.migration("flatfile").expect("flatfile not registered");
    let params = vec![export_path.display().to_string()];
    assert!(migration.can_execute(&params).await);

    let report = migration
        .execute(&params, &factory)
        .await
        .expect("Import failed");
    assert_eq!(report.imported, 2);
    assert_eq!(report.failed, 0);

    // Registered player came over with credential, location and inventory
    let stored = factory
        .profile_dao()
        .find_by_uuid(alice)
        .await
        .expect("Find failed")
        .expect("Alice missing after import");
    assert!(stored.registered);
    assert_eq!(stored.credential_hash.as_deref(), Some("$2b$12$carriedoverhash"));

    let location = factory
        .location_dao()
        .find_by_id(stored.location_id.expect("No location imported"))
        .await
        .expect("Find failed")
        .expect("Location missing after import");
    assert_eq!(location.world, "spawn");

    let inventory = factory
        .inventory_dao()
        .find_by_id(stored.inventory_id.expect("No inventory imported"))
        .await
        .expect("Find failed")
        .expect("Inventory missing after import");
    assert_eq!(inventory.data, vec![1, 2, 3, 4]);

    // Unregistered player came over without a credential
    let stored = factory
        .profile_dao()
        .find_by_uuid(bob)
        .await
        .expect("Find failed")
        .expect("Bob missing after import");
    assert!(!stored.registered);
    assert!(stored.credential_hash.is_none());
}

#[tokio::test]
async fn test_flatfile_import_skips_existing_players() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let factory = setup_factory(&dir).await;
    let module = MigrationModule::new();

    let export = serde_json::json!([
        {"player_ref": Uuid::new_v4(), "last_name": "Alice"},
        {"player_ref": Uuid::new_v4(), "last_name": "Bob"}
    ]);
    let export_path = dir.path().join("export.json");
    std::fs::write(&export_path, serde_json::to_vec(&export).unwrap())
        .expect("Failed to write export file");

    let migration = module.migration("flatfile").expect("flatfile not registered");
    let params = vec![export_path.display().to_string()];

    let first = migration.execute(&params, &factory).await.expect("Import failed");
    assert_eq!(first.imported, 2);

    let second = migration.execute(&params, &factory).await.expect("Import failed");
    assert_eq!(second.imported, 0);
    assert_eq!(second.skipped, 2);
}

#[tokio::test]
async fn test_failed_precondition_performs_zero_writes() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let factory = setup_factory(&dir).await;
    let module = MigrationModule::new();

    let migration = module.migration("flatfile").expect("flatfile not registered");
    let params = vec![dir.path().join("missing.json").display().to_string()];
    assert!(!migration.can_execute(&params).await);

    let result = migration.execute(&params, &factory).await;
    assert!(matches!(result, Err(MigrationError::PreconditionFailed(_))));

    // Nothing was written
    let pool = factory.pool();
    let mut connection = pool.acquire().await.expect("Acquire failed");
    let (profiles,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
        .fetch_one(&mut *connection)
        .await
        .expect("Count failed");
    assert_eq!(profiles, 0);
}

#[tokio::test]
async fn test_legacy_db_import() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let factory = setup_factory(&dir).await;
    let module = MigrationModule::new();

    // Build a legacy database with the pre-rewrite users table
    let legacy_path = dir.path().join("legacy.db");
    let carol = Uuid::new_v4();
    {
        let mut connection = SqliteConnectOptions::new()
            .filename(&legacy_path)
            .create_if_missing(true)
            .connect()
            .await
            .expect("Failed to create legacy database");
        sqlx::query("CREATE TABLE users (uuid TEXT, username TEXT NOT NULL, password TEXT)")
            .execute(&mut connection)
            .await
            .expect("Failed to create legacy table");
        sqlx::query("INSERT INTO users (uuid, username, password) VALUES (?, ?, ?)")
            .bind(carol.to_string())
            .bind("Carol")
            .bind("$2b$12$legacyhash")
            .execute(&mut connection)
            .await
            .expect("Failed to seed legacy row");
        sqlx::query("INSERT INTO users (uuid, username, password) VALUES (NULL, ?, NULL)")
            .bind("Drifter")
            .execute(&mut connection)
            .await
            .expect("Failed to seed legacy row");
        connection.close().await.expect("Failed to close legacy database");
    }

    let migration = module.migration("legacydb").expect("legacydb not registered");
    let params = vec![legacy_path.display().to_string()];
    assert!(migration.can_execute(&params).await);

    let report = migration
        .execute(&params, &factory)
        .await
        .expect("Import failed");
    assert_eq!(report.imported, 2);

    let stored = factory
        .profile_dao()
        .find_by_uuid(carol)
        .await
        .expect("Find failed")
        .expect("Carol missing after import");
    assert!(stored.registered);
    assert_eq!(stored.credential_hash.as_deref(), Some("$2b$12$legacyhash"));

    // The uuid-less row still arrived, unregistered, under a fresh identity
    let drifter = factory
        .profile_dao()
        .find_by_name("Drifter")
        .await
        .expect("Find failed")
        .expect("Drifter missing after import");
    assert!(!drifter.registered);
}

#[tokio::test]
async fn test_legacy_db_without_users_table_fails_precondition() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let module = MigrationModule::new();

    let legacy_path = dir.path().join("not-legacy.db");
    {
        let mut connection = SqliteConnectOptions::new()
            .filename(&legacy_path)
            .create_if_missing(true)
            .connect()
            .await
            .expect("Failed to create database");
        sqlx::query("CREATE TABLE something_else (id INTEGER)")
            .execute(&mut connection)
            .await
            .expect("Failed to create table");
        connection.close().await.expect("Failed to close database");
    }

    let migration = module.migration("legacydb").expect("legacydb not registered");
    let params = vec![legacy_path.display().to_string()];
    assert!(!migration.can_execute(&params).await);
}
