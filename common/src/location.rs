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

/// Last-known position of a player within a game world.
///
/// Coordinates are double precision; yaw and pitch are whole degrees.
/// `id` stays `None` until the row has been inserted; updates and deletes
/// require a present id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PlayerLocation {
    /// Storage-assigned row id, `None` until the first successful insert
    pub id: Option<i64>,

    /// Name of the world the player was last seen in
    pub world: String,

    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Horizontal facing in whole degrees
    pub yaw: i32,

    /// Vertical facing in whole degrees
    pub pitch: i32,
}

impl PlayerLocation {
    /// Create an unsaved location value
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64, yaw: i32, pitch: i32) -> Self {
        Self {
            id: None,
            world: world.into(),
            x,
            y,
            z,
            yaw,
            pitch,
        }
    }
}
