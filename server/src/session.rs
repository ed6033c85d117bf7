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

//! Per-player login sessions and their action queue

use crate::database::DaoFactory;
use crate::session::action::{Action, ActionRejection, ActionResponse};
use lockward_common::{PlayerHandle, PlayerProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, oneshot};

pub mod action;
pub mod manager;

/// Authentication state machine for one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthState {
    /// No profile loaded yet
    Unknown,

    /// Profile resolved, no credential on record
    Unregistered,

    /// Credential on record, not verified for this connection
    RegisteredLocked,

    /// Credential verified for this connection
    Authenticated,
}

impl AuthState {
    /// Derive the state a freshly loaded session starts in
    pub fn from_profile(profile: Option<&PlayerProfile>) -> Self {
        match profile {
            Some(profile) if profile.registered => AuthState::RegisteredLocked,
            _ => AuthState::Unregistered,
        }
    }

    /// Whether moving to `next` is a legal transition
    pub fn can_transition(self, next: AuthState) -> bool {
        use AuthState::*;

        matches!(
            (self, next),
            (Unknown, Unregistered)
                | (Unknown, RegisteredLocked)
                | (Unregistered, RegisteredLocked)
                | (RegisteredLocked, Authenticated)
                | (RegisteredLocked, Unregistered)
                | (Authenticated, Unregistered)
                | (Authenticated, RegisteredLocked)
        )
    }
}

struct SessionData {
    auth: AuthState,
    profile: Option<PlayerProfile>,
}

struct QueuedAction {
    action: Box<dyn Action>,
    responder: oneshot::Sender<ActionResponse>,
}

/// In-memory login state for one player.
///
/// All mutation goes through submitted actions. A single worker task drains
/// the queue in submission order, so no two actions for the same player ever
/// run concurrently; sessions for different players are fully independent.
/// Once submitted, an action runs to completion even if the submitter stops
/// waiting; its outcome is still logged.
pub struct PlayerSession {
    handle: PlayerHandle,
    online: bool,
    data: RwLock<SessionData>,
    queue: mpsc::UnboundedSender<QueuedAction>,
}

impl PlayerSession {
    /// Create the session and start its queue worker. The profile must
    /// already have been looked up; the initial state derives from it.
    pub(crate) fn spawn(
        handle: PlayerHandle,
        online: bool,
        profile: Option<PlayerProfile>,
        daos: Arc<DaoFactory>,
    ) -> Arc<Self> {
        let (queue, mut receiver) = mpsc::unbounded_channel::<QueuedAction>();
        let auth = AuthState::from_profile(profile.as_ref());
        let session = Arc::new(Self {
            handle,
            online,
            data: RwLock::new(SessionData { auth, profile }),
            queue,
        });

        // The worker holds only a weak reference so that dropping the last
        // session handle closes the queue and ends the task.
        let worker = Arc::downgrade(&session);
        tokio::spawn(async move {
            while let Some(queued) = receiver.recv().await {
                match worker.upgrade() {
                    Some(session) => {
                        let response = session
                            .run_action(queued.action.as_ref(), daos.as_ref())
                            .await;
                        if queued.responder.send(response).is_err() {
                            tracing::debug!(
                                "Action response for {} was dropped by the submitter",
                                session.handle.name
                            );
                        }
                    }
                    None => {
                        let _ = queued
                            .responder
                            .send(ActionResponse::failure("Session is no longer active"));
                    }
                }
            }
        });

        session
    }

    /// Submit an action for this session.
    ///
    /// The action executes off the caller's context, after every action
    /// submitted before it. The returned channel yields the response exactly
    /// once; await it on whatever execution context needs the result.
    pub fn perform_action(&self, action: Box<dyn Action>) -> oneshot::Receiver<ActionResponse> {
        let (responder, receiver) = oneshot::channel();
        if let Err(rejected) = self.queue.send(QueuedAction { action, responder }) {
            let QueuedAction { responder, .. } = rejected.0;
            let _ = responder.send(ActionResponse::failure(
                "Session is no longer accepting actions",
            ));
        }
        receiver
    }

    /// Submit an action and hand the response to `callback` instead of a
    /// channel. The callback is invoked exactly once, from a worker context;
    /// dispatching onto the game's authoritative thread is its job.
    pub fn perform_action_with<F>(&self, action: Box<dyn Action>, callback: F)
    where
        F: FnOnce(ActionResponse) + Send + 'static,
    {
        let receiver = self.perform_action(action);
        tokio::spawn(async move {
            let response = receiver.await.unwrap_or_else(|_| {
                ActionResponse::failure("Session action was dropped before completion")
            });
            callback(response);
        });
    }

    async fn run_action(&self, action: &dyn Action, daos: &DaoFactory) -> ActionResponse {
        tracing::debug!("Executing {} action for {}", action.kind(), self.handle.name);

        if let Err(rejection) = action.validate(self).await {
            tracing::debug!(
                "Rejected {} action for {}: {}",
                action.kind(),
                self.handle.name,
                rejection
            );
            return ActionResponse::failure(rejection.to_string());
        }

        let response = action.execute(self, daos).await;
        if response.is_success() {
            tracing::info!("Completed {} action for {}", action.kind(), self.handle.name);
        } else {
            tracing::warn!(
                "Failed {} action for {}: {}",
                action.kind(),
                self.handle.name,
                response.message().unwrap_or("no detail")
            );
        }
        response
    }

    /// Identity of the player this session tracks
    pub fn handle(&self) -> &PlayerHandle {
        &self.handle
    }

    /// Whether this session tracks a connected player, as opposed to a
    /// detached offline lookup
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Current authentication state
    pub async fn auth_state(&self) -> AuthState {
        self.data.read().await.auth
    }

    /// Whether the backing profile has completed registration
    pub async fn is_registered(&self) -> bool {
        self.data
            .read()
            .await
            .profile
            .as_ref()
            .map(|profile| profile.registered)
            .unwrap_or(false)
    }

    /// Whether the credential has been verified this connection
    pub async fn is_authenticated(&self) -> bool {
        self.data.read().await.auth == AuthState::Authenticated
    }

    /// Snapshot of the backing profile, if one was found in storage
    pub async fn profile(&self) -> Option<PlayerProfile> {
        self.data.read().await.profile.clone()
    }

    /// Move the state machine, optionally replacing the cached profile in
    /// the same step. Used by actions after their storage work succeeded.
    pub(crate) async fn transition(
        &self,
        profile: Option<PlayerProfile>,
        next: AuthState,
    ) -> Result<(), ActionRejection> {
        let mut data = self.data.write().await;
        if !data.auth.can_transition(next) {
            return Err(ActionRejection::new(format!(
                "Invalid state transition from {:?} to {:?}",
                data.auth, next
            )));
        }
        if let Some(profile) = profile {
            data.profile = Some(profile);
        }
        data.auth = next;
        Ok(())
    }

    /// Replace the cached profile without touching the state machine
    pub(crate) async fn replace_profile(&self, profile: PlayerProfile) {
        self.data.write().await.profile = Some(profile);
    }
}
