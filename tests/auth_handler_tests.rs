// Handler-level tests for the authentication actions.

use armoire_cli::error::CliError;
use armoire_cli::handlers;
use armoire_cli::session::SessionStore;
use armoire_cli::test_helpers::{mock_auth_session, MockBackendClient, MockIoHandler};

#[tokio::test]
async fn sms_login_stores_token_and_profile() {
    let client = MockBackendClient::new();
    client
        .login_with_sms_results
        .lock()
        .unwrap()
        .push_back(Ok(mock_auth_session("maya")));
    let session = SessionStore::in_memory();
    let mut io = MockIoHandler::new(vec!["+15550100", "123456"]);

    let user = handlers::handle_sms_login_action(&client, &session, &mut io)
        .await
        .unwrap();

    assert_eq!(user.nickname.as_deref(), Some("maya"));
    assert_eq!(session.token().as_deref(), Some("token-for-maya"));
    assert_eq!(session.user().unwrap().nickname.as_deref(), Some("maya"));
}

#[tokio::test]
async fn sms_login_requires_phone_and_code() {
    let client = MockBackendClient::new();
    let session = SessionStore::in_memory();
    let mut io = MockIoHandler::new(vec!["", ""]);

    let result = handlers::handle_sms_login_action(&client, &session, &mut io).await;

    assert!(matches!(result.unwrap_err(), CliError::Input(_)));
    assert!(client.call_names().is_empty());
    assert_eq!(session.token(), None);
}

#[tokio::test]
async fn password_login_prompts_for_password() {
    let client = MockBackendClient::new();
    client
        .login_with_password_results
        .lock()
        .unwrap()
        .push_back(Ok(mock_auth_session("sam")));
    let session = SessionStore::in_memory();
    let mut io = MockIoHandler::new(vec!["hunter2-but-longer"]);

    let user =
        handlers::login_password_with(&client, &session, &mut io, "sam@example.com".to_string())
            .await
            .unwrap();

    assert_eq!(user.nickname.as_deref(), Some("sam"));
    assert_eq!(session.token().as_deref(), Some("token-for-sam"));
}

#[tokio::test]
async fn registration_rejects_short_passwords_before_any_call() {
    let client = MockBackendClient::new();
    let session = SessionStore::in_memory();
    let mut io = MockIoHandler::new(vec!["short"]);

    let result = handlers::register_with(
        &client,
        &session,
        &mut io,
        "maya@example.com".to_string(),
        None,
    )
    .await;

    assert!(matches!(result.unwrap_err(), CliError::Input(_)));
    assert!(client.call_names().is_empty());
}

#[tokio::test]
async fn registration_rejects_invalid_email() {
    let client = MockBackendClient::new();
    let session = SessionStore::in_memory();
    let mut io = MockIoHandler::new(vec![]);

    let result = handlers::register_with(
        &client,
        &session,
        &mut io,
        "not-an-email".to_string(),
        None,
    )
    .await;

    assert!(matches!(result.unwrap_err(), CliError::Input(_)));
    assert!(client.call_names().is_empty());
}

#[tokio::test]
async fn registration_success_logs_the_user_in() {
    let client = MockBackendClient::new();
    client
        .register_email_results
        .lock()
        .unwrap()
        .push_back(Ok(mock_auth_session("new-user")));
    let session = SessionStore::in_memory();
    let mut io = MockIoHandler::new(vec!["a-long-enough-password"]);

    let user = handlers::register_with(
        &client,
        &session,
        &mut io,
        "new-user@example.com".to_string(),
        Some("new-user".to_string()),
    )
    .await
    .unwrap();

    assert_eq!(user.nickname.as_deref(), Some("new-user"));
    assert_eq!(session.token().as_deref(), Some("token-for-new-user"));
}

#[tokio::test]
async fn logout_clears_the_session() {
    let session = SessionStore::in_memory();
    handlers::store_session(&session, mock_auth_session("maya"));
    assert!(session.token().is_some());

    let mut io = MockIoHandler::new(vec![]);
    handlers::handle_logout_action(&session, &mut io).unwrap();

    assert_eq!(session.token(), None);
    assert!(session.user().is_none());
    io.expect_output("Logged out.");
}

#[test]
fn store_session_writes_the_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let session = SessionStore::load_or_default(path.clone());

    handlers::store_session(&session, mock_auth_session("maya"));

    let reloaded = SessionStore::load_or_default(path);
    assert_eq!(reloaded.token().as_deref(), Some("token-for-maya"));
}

#[tokio::test]
async fn send_code_reports_success() {
    let client = MockBackendClient::new();
    client
        .send_login_code_results
        .lock()
        .unwrap()
        .push_back(Ok(()));
    let mut io = MockIoHandler::new(vec![]);

    handlers::send_code_with(&client, &mut io, "+15550100")
        .await
        .unwrap();

    io.expect_output("Code sent.");
}

#[tokio::test]
async fn profile_action_renders_cached_user() {
    let session = SessionStore::in_memory();
    handlers::store_session(&session, mock_auth_session("maya"));
    let mut io = MockIoHandler::new(vec![]);

    handlers::handle_profile_action(&session, &mut io).unwrap();

    io.expect_output("Nickname: maya");
    io.expect_output("Email: maya@example.com");
}
