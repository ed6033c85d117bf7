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

//! Lockward Common Types
//!
//! This crate defines the shared data types used across Lockward:
//! - Stored entities (PlayerProfile, PlayerLocation, PlayerInventory)
//! - The game-host player identity handle (PlayerHandle)

pub mod inventory;
pub mod location;
pub mod player;
pub mod profile;

pub use inventory::PlayerInventory;
pub use location::PlayerLocation;
pub use player::PlayerHandle;
pub use profile::PlayerProfile;
