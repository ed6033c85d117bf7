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

//! Error taxonomy for the storage and migration layers

use thiserror::Error;

/// Failures surfaced by the connection pool and the DAO set.
///
/// Raw driver errors never leave the database module; they are logged at the
/// DAO boundary and wrapped here.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The pool is exhausted or the database cannot be reached. The caller
    /// may retry later; the pool itself never retries.
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// A storage invariant was violated, e.g. no generated key came back
    /// from an insert. Fatal for the operation that hit it.
    #[error("storage corruption: {0}")]
    Corruption(String),

    /// Any other query failure, already logged with context at the DAO
    /// boundary.
    #[error("storage query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl StorageError {
    /// Whether this failure means the backing store itself is gone, as
    /// opposed to a single operation going wrong.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }
}

/// Failures surfaced by the migration (import) framework.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// `can_execute` returned false; no writes were performed.
    #[error("migration precondition failed: {0}")]
    PreconditionFailed(String),

    /// The external source could not be read or parsed.
    #[error("failed to read migration source: {0}")]
    Source(String),

    /// The backing store went away mid-import; the migration aborted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
