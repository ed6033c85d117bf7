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
    Action, ActionKind, ActionRejection, ActionResponse, AuthSource, verify_credential,
};
use crate::session::{AuthState, PlayerSession};
use async_trait::async_trait;
use chrono::Utc;

/// Verify a credential and unlock the session for this connection
pub struct LoginAction {
    source: AuthSource,
    password: String,
}

impl LoginAction {
    pub fn new(source: AuthSource, password: impl Into<String>) -> Self {
        Self {
            source,
            password: password.into(),
        }
    }
}

#[async_trait]
impl Action for LoginAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Login
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
        if session.is_authenticated().await {
            return Err(ActionRejection::new(format!(
                "{} is already logged in",
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

        if !verify_credential(&self.password, &hash) {
            tracing::info!("Failed login attempt for {}", session.handle().name);
            return ActionResponse::failure("Invalid password");
        }

        // The login stands even if the timestamp write fails; the credential
        // check is what authenticates.
        profile.last_login = Some(Utc::now());
        if let Err(error) = daos.profile_dao().update(&profile).await {
            tracing::warn!(
                "Failed to record login time for {}: {}",
                session.handle().name,
                error
            );
        }

        match session.transition(Some(profile), AuthState::Authenticated).await {
            Ok(()) => ActionResponse::success_with("Login successful"),
            Err(rejection) => ActionResponse::failure(rejection.to_string()),
        }
    }
}
