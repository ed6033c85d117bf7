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

//! Import framework for carrying player data over from other stores.
//!
//! Importers are registered by name in a static table at startup and write
//! through the DAO set. Imports are best effort: a bad row is logged and
//! skipped, but the whole run aborts if the backing store goes away.

use crate::database::DaoFactory;
use crate::error::MigrationError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub mod flatfile;
pub mod legacy;

pub use flatfile::FlatFileMigration;
pub use legacy::LegacyDbMigration;

/// Row counts from a completed import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Rows written through the DAO set
    pub imported: usize,

    /// Rows already present and left untouched
    pub skipped: usize,

    /// Rows dropped after a logged per-row failure
    pub failed: usize,
}

/// One import strategy, keyed by source name
#[async_trait]
pub trait Migration: Send + Sync {
    /// Source name used to select this migration
    fn name(&self) -> &'static str;

    /// Check parameters and source availability without side effects
    async fn can_execute(&self, params: &[String]) -> bool;

    /// Run the import, writing through the DAO set. Re-checks preconditions
    /// and performs zero writes when they do not hold.
    async fn execute(
        &self,
        params: &[String],
        daos: &DaoFactory,
    ) -> Result<MigrationReport, MigrationError>;
}

/// Name-keyed registry of the available importers
pub struct MigrationModule {
    migrations: HashMap<&'static str, Arc<dyn Migration>>,
}

impl MigrationModule {
    /// Build the registration table. Adding an importer means adding a line
    /// here; there is no scanning.
    pub fn new() -> Self {
        let mut module = Self {
            migrations: HashMap::new(),
        };
        module.register(Arc::new(FlatFileMigration::new()));
        module.register(Arc::new(LegacyDbMigration::new()));
        module
    }

    /// Register an importer under its own name
    pub fn register(&mut self, migration: Arc<dyn Migration>) {
        self.migrations.insert(migration.name(), migration);
    }

    /// Look an importer up by source name, case-insensitively
    pub fn migration(&self, name: &str) -> Option<Arc<dyn Migration>> {
        let name = name.to_ascii_lowercase();
        self.migrations.get(name.as_str()).cloned()
    }

    /// Names of every registered importer
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.migrations.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for MigrationModule {
    fn default() -> Self {
        Self::new()
    }
}
