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
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use std::time::Duration;

/// Database file used when the configuration leaves the path empty
pub const DEFAULT_DATABASE_FILE: &str = "lockward.db";

/// Adapter for one supported storage engine.
///
/// A platform turns the shared [`DatabaseConfig`] into engine-specific
/// connect options and supplies the validation timeout the pool applies
/// before handing a connection out. One implementation exists per engine;
/// the embedded file database below is the one shipped by default.
pub trait StoragePlatform: Send + Sync {
    /// Name of the platform, used for configuration keys and logging
    fn name(&self) -> &'static str;

    /// Build connect options for this engine from the shared configuration
    fn connect_options(&self, config: &DatabaseConfig) -> SqliteConnectOptions;

    /// How long a connection health probe may take before the connection
    /// counts as dead
    fn ping_timeout(&self, config: &DatabaseConfig) -> Duration {
        Duration::from_secs(config.ping_timeout)
    }
}

/// File-based embedded database platform
#[derive(Debug, Default)]
pub struct SqlitePlatform;

impl StoragePlatform for SqlitePlatform {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn connect_options(&self, config: &DatabaseConfig) -> SqliteConnectOptions {
        let path = if config.path.is_empty() {
            DEFAULT_DATABASE_FILE
        } else {
            config.path.as_str()
        };

        SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_name() {
        assert_eq!(SqlitePlatform.name(), "sqlite");
    }

    #[test]
    fn test_ping_timeout_from_config() {
        let mut config = DatabaseConfig::default();
        config.ping_timeout = 3;
        assert_eq!(
            SqlitePlatform.ping_timeout(&config),
            Duration::from_secs(3)
        );
    }
}
