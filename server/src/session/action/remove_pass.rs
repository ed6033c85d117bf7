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
use crate::session::action::{Action, ActionKind, ActionRejection, ActionResponse, AuthSource};
use crate::session::{AuthState, PlayerSession};
use async_trait::async_trait;

/// Administrative recovery: clear a player's credential and registration.
///
/// Works against live and offline sessions alike. The acting identity is
/// recorded in the audit log.
pub struct RemovePassAction {
    source: AuthSource,
    actor: String,
}

impl RemovePassAction {
    pub fn new(source: AuthSource, actor: impl Into<String>) -> Self {
        Self {
            source,
            actor: actor.into(),
        }
    }
}

#[async_trait]
impl Action for RemovePassAction {
    fn kind(&self) -> ActionKind {
        ActionKind::RemovePass
    }

    fn source(&self) -> AuthSource {
        self.source
    }

    async fn validate(&self, session: &PlayerSession) -> Result<(), ActionRejection> {
        if !session.is_registered().await {
            return Err(ActionRejection::new(format!(
                "{} is not registered",
                session.handle().name
            )));
        }
        Ok(())
    }

    async fn execute(&self, session: &PlayerSession, daos: &DaoFactory) -> ActionResponse {
        let Some(mut profile) = session.profile().await else {
            return ActionResponse::failure("No profile loaded for this session");
        };
        profile.clear_credential();

        match daos.profile_dao().update(&profile).await {
            Ok(true) => {
                tracing::info!(
                    "Password for {} removed by {} ({})",
                    session.handle().name,
                    self.actor,
                    self.source
                );
                match session.transition(Some(profile), AuthState::Unregistered).await {
                    Ok(()) => ActionResponse::success_with("Password removed"),
                    Err(rejection) => ActionResponse::failure(rejection.to_string()),
                }
            }
            Ok(false) => ActionResponse::failure("Profile is missing from storage"),
            Err(error) => {
                tracing::warn!(
                    "Failed to clear credential for {}: {}",
                    session.handle().name,
                    error
                );
                ActionResponse::failure("Storage is unavailable, try again later")
            }
        }
    }
}
