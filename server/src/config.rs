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

use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Self, String> {
        tracing::debug!("Loading configuration from file: {}", path);
        let file =
            std::fs::File::open(path).map_err(|e| format!("Failed to open config file: {}", e))?;

        let conf = serde_yaml::from_reader(file)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        Ok(conf)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the database file; empty means the platform default
    #[serde(default)]
    pub path: EnvField<String>,

    /// Upper bound on pooled connections (default: 8)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection validation timeout in seconds (default: 10)
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,

    /// How long an acquire waits on an exhausted pool before failing,
    /// in seconds (default: 30)
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout: u64,
}

fn default_max_connections() -> u32 {
    8
}

fn default_ping_timeout() -> u64 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: Default::default(),
            max_connections: default_max_connections(),
            ping_timeout: default_ping_timeout(),
            acquire_timeout: default_acquire_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path.as_str(), "");
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.ping_timeout, 10);
        assert_eq!(config.acquire_timeout, 30);
    }

    #[test]
    fn test_configuration_new_from_file() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            r#"
database:
  path: /var/lib/lockward/lockward.db
  max_connections: 4
  ping_timeout: 5
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = Configuration::load(path).unwrap();

        assert_eq!(config.database.path.as_str(), "/var/lib/lockward/lockward.db");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.ping_timeout, 5);
        // Unset keys fall back to their defaults
        assert_eq!(config.database.acquire_timeout, 30);
    }

    #[test]
    fn test_configuration_missing_file() {
        let result = Configuration::load("/nonexistent/lockward.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_configuration_empty_document_uses_defaults() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "database: {{}}").unwrap();

        let config = Configuration::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.database.max_connections, 8);
    }
}
