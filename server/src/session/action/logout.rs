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

/// Re-lock an authenticated session without touching the stored credential
pub struct LogoutAction {
    source: AuthSource,
}

impl LogoutAction {
    pub fn new(source: AuthSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Action for LogoutAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Logout
    }

    fn source(&self) -> AuthSource {
        self.source
    }

    async fn validate(&self, session: &PlayerSession) -> Result<(), ActionRejection> {
        if !session.is_authenticated().await {
            return Err(ActionRejection::new(format!(
                "{} is not logged in",
                session.handle().name
            )));
        }
        Ok(())
    }

    async fn execute(&self, session: &PlayerSession, _daos: &DaoFactory) -> ActionResponse {
        match session.transition(None, AuthState::RegisteredLocked).await {
            Ok(()) => ActionResponse::success_with("Logged out"),
            Err(rejection) => ActionResponse::failure(rejection.to_string()),
        }
    }
}
