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

use crate::database::DaoFactory;
use crate::error::StorageError;
use crate::session::PlayerSession;
use lockward_common::PlayerHandle;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Registry of live player sessions.
///
/// The live map is the single authority for "is this player tracked": at
/// most one session exists per online identity, and `session()` for the
/// same identity always returns the same instance. Offline lookups build
/// detached sessions that never enter the map.
pub struct SessionManager {
    /// Live sessions keyed by stable player identity
    sessions: RwLock<HashMap<Uuid, Arc<PlayerSession>>>,

    /// DAO set shared by every session's worker
    daos: Arc<DaoFactory>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(daos: Arc<DaoFactory>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            daos,
        }
    }

    /// Get the live session for an online player, creating and registering
    /// it on first sight. The profile is loaded before the session becomes
    /// visible, so callers never observe a half-initialized state.
    pub async fn session(
        &self,
        handle: &PlayerHandle,
    ) -> Result<Arc<PlayerSession>, StorageError> {
        if let Some(existing) = self.sessions.read().await.get(&handle.uuid) {
            return Ok(existing.clone());
        }

        // Load outside the write lock; a racing creator just wins the entry
        // and this lookup is discarded.
        let profile = self.daos.profile_dao().find_by_uuid(handle.uuid).await?;

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(handle.uuid).or_insert_with(|| {
            tracing::debug!("Tracking new session for {}", handle);
            PlayerSession::spawn(handle.clone(), true, profile, self.daos.clone())
        });
        Ok(session.clone())
    }

    /// Build a detached session for a player who is not online, looked up
    /// by last-known name. Never inserted into the live map. When the name
    /// is unknown the session carries a throwaway identity and no profile,
    /// so privileged actions against it report rejection through the normal
    /// response channel.
    pub async fn offline_session(
        &self,
        name: &str,
    ) -> Result<Arc<PlayerSession>, StorageError> {
        let profile = self.daos.profile_dao().find_by_name(name).await?;

        let handle = match &profile {
            Some(profile) => PlayerHandle::new(profile.player_ref, profile.last_name.clone()),
            None => PlayerHandle::new(Uuid::new_v4(), name),
        };

        Ok(PlayerSession::spawn(
            handle,
            false,
            profile,
            self.daos.clone(),
        ))
    }

    /// Drop the live session for a disconnecting player. Queued actions
    /// still run to completion; the worker exits once the last handle to
    /// the session goes away.
    pub async fn remove(&self, uuid: Uuid) -> Option<Arc<PlayerSession>> {
        let removed = self.sessions.write().await.remove(&uuid);
        if removed.is_some() {
            tracing::debug!("Stopped tracking session for {}", uuid);
        }
        removed
    }

    /// Whether a live session exists for this identity
    pub async fn is_tracked(&self, uuid: Uuid) -> bool {
        self.sessions.read().await.contains_key(&uuid)
    }

    /// Number of live sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
