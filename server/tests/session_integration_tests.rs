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

use lockward_common::PlayerHandle;
use lockward_server::config::Configuration;
use lockward_server::database::{DaoFactory, SqlitePlatform};
use lockward_server::session::AuthState;
use lockward_server::session::action::{
    AuthSource, ChangePassAction, LoginAction, LogoutAction, RegisterAction, RemovePassAction,
};
use lockward_server::session::manager::SessionManager;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

async fn setup(dir: &TempDir) -> (Arc<DaoFactory>, SessionManager) {
    let path = dir.path().join("lockward-test.db");
    let yaml = format!("database:\n  path: {}\n  max_connections: 4\n", path.display());
    let config: Configuration =
        serde_yaml::from_str(&yaml).expect("Failed to parse test configuration");

    let daos = Arc::new(
        DaoFactory::build(&SqlitePlatform, &config.database)
            .await
            .expect("Failed to build DAO factory"),
    );
    let manager = SessionManager::new(daos.clone());
    (daos, manager)
}

fn handle(name: &str) -> PlayerHandle {
    PlayerHandle::new(Uuid::new_v4(), name)
}

#[tokio::test]
async fn test_register_then_login_flow() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (daos, manager) = setup(&dir).await;

    let player = handle("Alice");
    let session = manager.session(&player).await.expect("Failed to get session");
    assert_eq!(session.auth_state().await, AuthState::Unregistered);
    assert!(session.is_online());

    let response = session
        .perform_action(Box::new(RegisterAction::new(AuthSource::Player, "hunter2")))
        .await
        .expect("No response delivered");
    assert!(response.is_success(), "register failed: {:?}", response.message());
    assert_eq!(session.auth_state().await, AuthState::RegisteredLocked);

    let response = session
        .perform_action(Box::new(LoginAction::new(AuthSource::Player, "hunter2")))
        .await
        .expect("No response delivered");
    assert!(response.is_success(), "login failed: {:?}", response.message());
    assert_eq!(session.auth_state().await, AuthState::Authenticated);

    // Registration landed in storage, with the login timestamp recorded
    let stored = daos
        .profile_dao()
        .find_by_uuid(player.uuid)
        .await
        .expect("Find failed")
        .expect("Profile missing after registration");
    assert!(stored.registered);
    assert!(stored.credential_hash.is_some());
    assert!(stored.last_login.is_some());
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_daos, manager) = setup(&dir).await;

    let player = handle("Bob");
    let session = manager.session(&player).await.expect("Failed to get session");

    let response = session
        .perform_action(Box::new(RegisterAction::new(AuthSource::Player, "hunter2")))
        .await
        .expect("No response delivered");
    assert!(response.is_success());

    let response = session
        .perform_action(Box::new(LoginAction::new(AuthSource::Player, "wrong")))
        .await
        .expect("No response delivered");
    assert!(!response.is_success());
    assert_eq!(session.auth_state().await, AuthState::RegisteredLocked);
}

#[tokio::test]
async fn test_session_lookup_is_idempotent() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_daos, manager) = setup(&dir).await;

    let player = handle("Carol");
    let first = manager.session(&player).await.expect("Failed to get session");
    let second = manager.session(&player).await.expect("Failed to get session");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(manager.session_count().await, 1);
    assert!(manager.is_tracked(player.uuid).await);
}

#[tokio::test]
async fn test_actions_execute_in_submission_order() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_daos, manager) = setup(&dir).await;

    let player = handle("Dave");
    let session = manager.session(&player).await.expect("Failed to get session");

    // Submit both before awaiting either. The login can only succeed if the
    // register before it has fully completed, storage work included.
    let register = session.perform_action(Box::new(RegisterAction::new(
        AuthSource::Player,
        "hunter2",
    )));
    let login = session.perform_action(Box::new(LoginAction::new(AuthSource::Player, "hunter2")));

    let register = register.await.expect("No register response");
    let login = login.await.expect("No login response");
    assert!(register.is_success());
    assert!(login.is_success(), "login failed: {:?}", login.message());
}

#[tokio::test]
async fn test_remove_pass_rejected_when_unregistered() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_daos, manager) = setup(&dir).await;

    let session = manager
        .session(&handle("Eve"))
        .await
        .expect("Failed to get session");

    let response = session
        .perform_action(Box::new(RemovePassAction::new(AuthSource::Admin, "console")))
        .await
        .expect("No response delivered");
    assert!(!response.is_success());
    assert_eq!(session.auth_state().await, AuthState::Unregistered);
}

#[tokio::test]
async fn test_remove_pass_clears_registration() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (daos, manager) = setup(&dir).await;

    let player = handle("Frank");
    let session = manager.session(&player).await.expect("Failed to get session");

    let response = session
        .perform_action(Box::new(RegisterAction::new(AuthSource::Player, "hunter2")))
        .await
        .expect("No response delivered");
    assert!(response.is_success());

    let response = session
        .perform_action(Box::new(RemovePassAction::new(AuthSource::Admin, "console")))
        .await
        .expect("No response delivered");
    assert!(response.is_success(), "remove failed: {:?}", response.message());
    assert_eq!(session.auth_state().await, AuthState::Unregistered);
    assert!(!session.is_registered().await);

    // The credential is gone from storage too
    let stored = daos
        .profile_dao()
        .find_by_uuid(player.uuid)
        .await
        .expect("Find failed")
        .expect("Profile missing");
    assert!(!stored.registered);
    assert!(stored.credential_hash.is_none());
}

#[tokio::test]
async fn test_logout_relocks_session() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_daos, manager) = setup(&dir).await;

    let session = manager
        .session(&handle("Grace"))
        .await
        .expect("Failed to get session");

    for action in [
        session.perform_action(Box::new(RegisterAction::new(AuthSource::Player, "hunter2"))),
        session.perform_action(Box::new(LoginAction::new(AuthSource::Player, "hunter2"))),
        session.perform_action(Box::new(LogoutAction::new(AuthSource::Player))),
    ] {
        let response = action.await.expect("No response delivered");
        assert!(response.is_success(), "step failed: {:?}", response.message());
    }

    assert_eq!(session.auth_state().await, AuthState::RegisteredLocked);
    assert!(session.is_registered().await);
}

#[tokio::test]
async fn test_change_pass_requires_current_password() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_daos, manager) = setup(&dir).await;

    let session = manager
        .session(&handle("Heidi"))
        .await
        .expect("Failed to get session");

    let register = session
        .perform_action(Box::new(RegisterAction::new(AuthSource::Player, "hunter2")))
        .await
        .expect("No response delivered");
    assert!(register.is_success());
    let login = session
        .perform_action(Box::new(LoginAction::new(AuthSource::Player, "hunter2")))
        .await
        .expect("No response delivered");
    assert!(login.is_success());

    let wrong = session
        .perform_action(Box::new(ChangePassAction::new(
            AuthSource::Player,
            "wrong",
            "swordfish",
        )))
        .await
        .expect("No response delivered");
    assert!(!wrong.is_success());

    let changed = session
        .perform_action(Box::new(ChangePassAction::new(
            AuthSource::Player,
            "hunter2",
            "swordfish",
        )))
        .await
        .expect("No response delivered");
    assert!(changed.is_success(), "change failed: {:?}", changed.message());

    // The new credential is live: logout, then login with it
    let logout = session
        .perform_action(Box::new(LogoutAction::new(AuthSource::Player)))
        .await
        .expect("No response delivered");
    assert!(logout.is_success());
    let relogin = session
        .perform_action(Box::new(LoginAction::new(AuthSource::Player, "swordfish")))
        .await
        .expect("No response delivered");
    assert!(relogin.is_success(), "relogin failed: {:?}", relogin.message());
}

#[tokio::test]
async fn test_offline_session_by_name() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (daos, manager) = setup(&dir).await;

    let player = handle("Ivan");
    let session = manager.session(&player).await.expect("Failed to get session");
    let response = session
        .perform_action(Box::new(RegisterAction::new(AuthSource::Player, "hunter2")))
        .await
        .expect("No response delivered");
    assert!(response.is_success());

    // Player disconnects; an admin resets the password by name
    manager.remove(player.uuid).await;
    drop(session);

    let offline = manager
        .offline_session("ivan")
        .await
        .expect("Failed to build offline session");
    assert!(!offline.is_online());
    assert!(offline.is_registered().await);
    assert!(!manager.is_tracked(player.uuid).await);

    let response = offline
        .perform_action(Box::new(RemovePassAction::new(AuthSource::Admin, "console")))
        .await
        .expect("No response delivered");
    assert!(response.is_success(), "remove failed: {:?}", response.message());

    let stored = daos
        .profile_dao()
        .find_by_uuid(player.uuid)
        .await
        .expect("Find failed")
        .expect("Profile missing");
    assert!(!stored.registered);
}

#[tokio::test]
async fn test_offline_session_for_unknown_name() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_daos, manager) = setup(&dir).await;

    let offline = manager
        .offline_session("nobody")
        .await
        .expect("Failed to build offline session");
    assert!(!offline.is_registered().await);

    let response = offline
        .perform_action(Box::new(RemovePassAction::new(AuthSource::Admin, "console")))
        .await
        .expect("No response delivered");
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_callback_delivery() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_daos, manager) = setup(&dir).await;

    let session = manager
        .session(&handle("Judy"))
        .await
        .expect("Failed to get session");

    let (sender, receiver) = tokio::sync::oneshot::channel();
    session.perform_action_with(
        Box::new(RegisterAction::new(AuthSource::Player, "hunter2")),
        move |response| {
            let _ = sender.send(response);
        },
    );

    let response = receiver.await.expect("Callback never ran");
    assert!(response.is_success(), "register failed: {:?}", response.message());
}

#[tokio::test]
async fn test_sessions_for_different_players_are_independent() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_daos, manager) = setup(&dir).await;

    let mut pending = Vec::new();
    for name in ["Kim", "Leo", "Mia", "Nora"] {
        let session = manager
            .session(&handle(name))
            .await
            .expect("Failed to get session");
        pending.push(session.perform_action(Box::new(RegisterAction::new(
            AuthSource::Player,
            format!("{}-secret", name),
        ))));
    }

    for receiver in pending {
        let response = receiver.await.expect("No response delivered");
        assert!(response.is_success(), "register failed: {:?}", response.message());
    }
    assert_eq!(manager.session_count().await, 4);
}
