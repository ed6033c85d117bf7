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

//! Data access objects, one per stored entity kind.
//!
//! Every DAO operation checks exactly one connection out of the pool,
//! releases it before returning, and translates driver failures at this
//! boundary; nothing above the DAO layer ever sees a raw sqlx error.

use crate::error::StorageError;

pub mod inventory;
pub mod location;
pub mod profile;
pub mod schema;

/// Log a query failure with context and wrap it for the caller
pub(crate) fn query_failed(context: &'static str, error: sqlx::Error) -> StorageError {
    tracing::warn!("{}: {}", context, error);
    StorageError::Query(error)
}

/// An insert came back without a generated key. This cannot happen under a
/// correct schema, so it is treated as corruption rather than a soft failure.
pub(crate) fn missing_generated_key(entity: &'static str) -> StorageError {
    let message = format!("No generated key returned after {} insert", entity);
    tracing::error!("{}", message);
    StorageError::Corruption(message)
}
