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
use crate::session::action::{
    Action, ActionKind, ActionRejection, ActionResponse, AuthSource, hash_credential,
};
use crate::session::{AuthState, PlayerSession};
use async_trait::async_trait;
use lockward_common::PlayerProfile;

/// Store a first credential for an unregistered player.
///
/// Inserts a fresh profile row when the player has never been seen before.
pub struct RegisterAction {
    source: AuthSource,
    password: String,
}

impl RegisterAction {
    pub fn new(source: AuthSource, password: impl Into<String>) -> Self {
        Self {
            source,
            password: password.into(),
        }
    }
}

#[async_trait]
impl Action for RegisterAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Register
    }

    fn source(&self) -> AuthSource {
        self.source
    }

    async fn validate(&self, session: &PlayerSession) -> Result<(), ActionRejection> {
        if self.password.is_empty() {
            return Err(ActionRejection::new("Password cannot be empty"));
        }
        if session.is_registered().await {
            return Err(ActionRejection::new(format!(
                "{} is already registered",
                session.handle().name
            )));
        }
        Ok(())
    }

    async fn execute(&self, session: &PlayerSession, daos: &DaoFactory) -> ActionResponse {
        let hash = match hash_credential(&self.password) {
            Ok(hash) => hash,
            Err(error) => {
                tracing::error!(
                    "Failed to hash credential for {}: {}",
                    session.handle().name,
                    error
                );
                return ActionResponse::failure("Failed to hash password");
            }
        };

        let mut profile = session.profile().await.unwrap_or_else(|| {
            PlayerProfile::new(session.handle().uuid, session.handle().name.clone())
        });
        profile.set_credential(hash);

        let dao = daos.profile_dao();
        let stored = if profile.id.is_some() {
            dao.update(&profile).await.map(|_| ())
        } else {
            match dao.insert(&profile).await {
                Ok(id) => {
                    profile.id = Some(id);
                    Ok(())
                }
                Err(error) => Err(error),
            }
        };

        if let Err(error) = stored {
            tracing::warn!(
                "Failed to store registration for {}: {}",
                session.handle().name,
                error
            );
            return ActionResponse::failure("Storage is unavailable, try again later");
        }

        match session
            .transition(Some(profile), AuthState::RegisteredLocked)
            .await
        {
            Ok(()) => ActionResponse::success_with("Registration complete"),
            Err(rejection) => ActionResponse::failure(rejection.to_string()),
        }
    }
}
