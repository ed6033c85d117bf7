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

//! Storage layer: platform adapter, connection pool, DAO set and factory

pub mod dao;
pub mod factory;
pub mod platform;
pub mod pool;

pub use dao::inventory::{InventoryDao, SqliteInventoryDao};
pub use dao::location::{LocationDao, SqliteLocationDao};
pub use dao::profile::{ProfileDao, SqliteProfileDao};
pub use dao::schema::{MigrationDao, SqliteMigrationDao, SCHEMA_VERSION};
pub use factory::DaoFactory;
pub use platform::{SqlitePlatform, StoragePlatform};
pub use pool::{ConnectionPool, PooledConnection};
