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

/// Serialized inventory snapshot for one player.
///
/// The item-slot encoding belongs to the game host; Lockward stores the
/// blob verbatim and never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PlayerInventory {
    /// Storage-assigned row id, `None` until the first successful insert
    pub id: Option<i64>,

    /// Opaque serialized item-slot contents
    pub data: Vec<u8>,
}

impl PlayerInventory {
    /// Create an unsaved inventory snapshot
    pub fn new(data: Vec<u8>) -> Self {
        Self { id: None, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_inventory_has_no_id() {
        let inventory = PlayerInventory::new(vec![0x01, 0x02, 0x03]);
        assert!(inventory.id.is_none());
        assert_eq!(inventory.data, vec![0x01, 0x02, 0x03]);
    }
}
