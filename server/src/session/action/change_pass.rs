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
    verify_credential,
};
use crate::session::PlayerSession;
use async_trait::async_trait;

/// Replace the stored credential for a logged-in player.
///
/// Requires the current password; the session stays authenticated.
pub struct ChangePassAction {
    source: AuthSource,
    current: String,
    replacement: String,
}

impl ChangePassAction {
    pub fn new(
        source: AuthSource,
        current: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            source,
            current: current.into(),
            replacement: replacement.into(),
        }
    }
}

#[async_trait]
impl Action for ChangePassAction {
    fn kind(&self) -> ActionKind {
        ActionKind::ChangePass
    }

    fn source(&self) -> AuthSource {
        self.source
    }

    async fn validate(&self, session: &PlayerSession) -> Result<(), ActionRejection> {
        if self.replacement.is_empty() {
            return Err(ActionRejection::new("New password cannot be empty"));
        }
        if !session.is_authenticated().await {
            return Err(ActionRejection::new(format!(
                "{} is not logged in",
                session.handle().name
            )));
        }
        Ok(())
    }

    async fn execute(&self, session: &PlayerSession, daos: &DaoFactory) -> ActionResponse {
        let Some(mut profile) = session.profile().await else {
            return ActionResponse::failure("No profile loaded for this session");
        };
        let Some(hash) = profile.credential_hash.clone() else {
            return ActionResponse::failure("No credential on record");
        };

        if !verify_credential(&self.current, &hash) {
            return ActionResponse::failure("Current password is incorrect");
        }

        let replacement = match hash_credential(&self.replacement) {
            Ok(hash) => hash,
            Err(error) => {
                tracing::error!(
                    "Failed to hash replacement credential for {}: {}",
                    session.handle().name,
                    error
                );
                return ActionResponse::failure("Failed to hash password");
            }
        };
        profile.set_credential(replacement);

        match daos.profile_dao().update(&profile).await {
            Ok(true) => {
                session.replace_profile(profile).await;
                ActionResponse::success_with("Password changed")
            }
            Ok(false) => ActionResponse::failure("Profile is missing from storage"),
            Err(error) => {
                tracing::warn!(
                    "Failed to store new credential for {}: {}",
                    session.handle().name,
                    error
                );
                ActionResponse::failure("Storage is unavailable, try again later")
            }
        }
    }
}
