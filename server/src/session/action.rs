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

//! Privileged session actions and their responses

use crate::database::DaoFactory;
use crate::session::PlayerSession;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod change_pass;
pub mod login;
pub mod logout;
pub mod register;
pub mod remove_pass;

pub use change_pass::ChangePassAction;
pub use login::LoginAction;
pub use logout::LogoutAction;
pub use register::RegisterAction;
pub use remove_pass::RemovePassAction;

/// Who initiated a privileged action; recorded for audit logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthSource {
    Player,
    Admin,
    Console,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthSource::Player => write!(f, "player"),
            AuthSource::Admin => write!(f, "admin"),
            AuthSource::Console => write!(f, "console"),
        }
    }
}

/// Kind tag for logging and dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Register,
    Login,
    Logout,
    ChangePass,
    RemovePass,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Register => write!(f, "register"),
            ActionKind::Login => write!(f, "login"),
            ActionKind::Logout => write!(f, "logout"),
            ActionKind::ChangePass => write!(f, "change-pass"),
            ActionKind::RemovePass => write!(f, "remove-pass"),
        }
    }
}

/// Outcome of one submitted action, delivered exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    success: bool,
    message: Option<String>,
}

impl ActionResponse {
    /// A successful outcome with no detail message
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// A successful outcome carrying a message for the player/admin
    pub fn success_with(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    /// A failed outcome; precondition failures and storage trouble both
    /// arrive this way, never as a panic of the submitting context
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// An action precondition failed; turned into a failed [`ActionResponse`]
/// before execution starts
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ActionRejection {
    message: String,
}

impl ActionRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A privileged operation against one session and its backing storage.
///
/// Actions are immutable command values. They run on the session's queue
/// worker, strictly after every action submitted before them, and report
/// through the response channel regardless of how they end.
#[async_trait]
pub trait Action: Send + Sync {
    /// Kind tag for logging and dispatch
    fn kind(&self) -> ActionKind;

    /// Who initiated the action
    fn source(&self) -> AuthSource;

    /// Check preconditions against the current session state. Must not have
    /// side effects.
    async fn validate(&self, session: &PlayerSession) -> Result<(), ActionRejection>;

    /// Perform the action against session and storage
    async fn execute(&self, session: &PlayerSession, daos: &DaoFactory) -> ActionResponse;
}

/// Hash a plaintext credential for storage
pub(crate) fn hash_credential(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Verify a plaintext credential against a stored hash. A malformed stored
/// hash counts as a mismatch.
pub(crate) fn verify_credential(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matched) => matched,
        Err(error) => {
            tracing::warn!("Failed to verify credential hash: {}", error);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_constructors() {
        let ok = ActionResponse::success();
        assert!(ok.is_success());
        assert!(ok.message().is_none());

        let ok = ActionResponse::success_with("done");
        assert!(ok.is_success());
        assert_eq!(ok.message(), Some("done"));

        let failed = ActionResponse::failure("nope");
        assert!(!failed.is_success());
        assert_eq!(failed.message(), Some("nope"));
    }

    #[test]
    fn test_credential_round_trip() {
        let hash = hash_credential("hunter2").expect("Failed to hash");
        assert!(verify_credential("hunter2", &hash));
        assert!(!verify_credential("hunter3", &hash));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!verify_credential("hunter2", "not-a-bcrypt-hash"));
    }
}
