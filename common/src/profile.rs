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

//! Player profile data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored authentication profile for one player.
///
/// The credential hash is opaque to everything outside the action layer.
/// Invariant: `credential_hash` is present exactly when `registered` is set;
/// use [`PlayerProfile::set_credential`] / [`PlayerProfile::clear_credential`]
/// to keep the two in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PlayerProfile {
    /// Storage-assigned row id, `None` until the first successful insert
    pub id: Option<i64>,

    /// Stable player identifier from the game host
    pub player_ref: Uuid,

    /// Last name this player was seen with, used for offline lookup
    pub last_name: String,

    /// Hashed credential, present only for registered players
    pub credential_hash: Option<String>,

    /// Whether this player has completed registration
    pub registered: bool,

    /// Timestamp of the last successful login
    pub last_login: Option<DateTime<Utc>>,

    /// Row id of the stored logout location, if any
    pub location_id: Option<i64>,

    /// Row id of the stored inventory snapshot, if any
    pub inventory_id: Option<i64>,
}

impl PlayerProfile {
    /// Create a blank, unregistered profile for a player
    pub fn new(player_ref: Uuid, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            player_ref,
            last_name: last_name.into(),
            credential_hash: None,
            registered: false,
            last_login: None,
            location_id: None,
            inventory_id: None,
        }
    }

    /// Store a new credential hash and mark the profile registered
    pub fn set_credential(&mut self, hash: impl Into<String>) {
        self.credential_hash = Some(hash.into());
        self.registered = true;
    }

    /// Drop the stored credential and mark the profile unregistered
    pub fn clear_credential(&mut self) {
        self.credential_hash = None;
        self.registered = false;
    }
}
