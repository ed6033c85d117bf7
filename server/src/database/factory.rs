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
use crate::database::dao::inventory::{InventoryDao, SqliteInventoryDao};
use crate::database::dao::location::{LocationDao, SqliteLocationDao};
use crate::database::dao::profile::{ProfileDao, SqliteProfileDao};
use crate::database::dao::schema::{MigrationDao, SqliteMigrationDao};
use crate::database::platform::StoragePlatform;
use crate::database::pool::ConnectionPool;
use crate::error::StorageError;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Hands out the DAO set bound to one pool and platform.
///
/// Each DAO is constructed on first use and cached for the factory's
/// lifetime. DAOs are stateless, so a construction race at worst builds a
/// throwaway duplicate; the cells only ever publish one instance.
pub struct DaoFactory {
    pool: Arc<ConnectionPool>,
    platform_name: String,
    profile_dao: OnceCell<Arc<dyn ProfileDao>>,
    location_dao: OnceCell<Arc<dyn LocationDao>>,
    inventory_dao: OnceCell<Arc<dyn InventoryDao>>,
    migration_dao: OnceCell<Arc<dyn MigrationDao>>,
}

impl DaoFactory {
    /// Create a factory over an already-opened pool
    pub fn new(pool: Arc<ConnectionPool>, platform_name: impl Into<String>) -> Self {
        Self {
            pool,
            platform_name: platform_name.into(),
            profile_dao: OnceCell::new(),
            location_dao: OnceCell::new(),
            inventory_dao: OnceCell::new(),
            migration_dao: OnceCell::new(),
        }
    }

    /// Open the pool for `platform`, register the schema, and return the
    /// ready-to-use factory
    pub async fn build(
        platform: &dyn StoragePlatform,
        config: &DatabaseConfig,
    ) -> Result<Self, StorageError> {
        let pool = Arc::new(ConnectionPool::connect(platform, config).await?);
        let factory = Self::new(pool, platform.name());
        factory.migration_dao().register_schema().await?;
        Ok(factory)
    }

    /// Get the profile data access object
    pub fn profile_dao(&self) -> Arc<dyn ProfileDao> {
        self.profile_dao
            .get_or_init(|| Arc::new(SqliteProfileDao::new(self.pool.clone())))
            .clone()
    }

    /// Get the location data access object
    pub fn location_dao(&self) -> Arc<dyn LocationDao> {
        self.location_dao
            .get_or_init(|| Arc::new(SqliteLocationDao::new(self.pool.clone())))
            .clone()
    }

    /// Get the inventory data access object
    pub fn inventory_dao(&self) -> Arc<dyn InventoryDao> {
        self.inventory_dao
            .get_or_init(|| Arc::new(SqliteInventoryDao::new(self.pool.clone())))
            .clone()
    }

    /// Get the schema migration data access object
    pub fn migration_dao(&self) -> Arc<dyn MigrationDao> {
        self.migration_dao
            .get_or_init(|| Arc::new(SqliteMigrationDao::new(self.pool.clone())))
            .clone()
    }

    /// Name of the platform this factory was configured for
    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }

    /// The shared connection pool behind the DAO set
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }
}
