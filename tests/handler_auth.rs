mod common;

use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::PgPool;

async fn login(server: &TestServer, email: &str, password: &str) -> axum_test::TestResponse {
    server
        .post("/login")
        .json(&json!({ "email": email, "password": password }))
        .await
}

#[sqlx::test]
async fn test_register(pool: PgPool) {
    let (server, _state) = common::test_server(pool.clone());

    let response = server
        .post("/register")
        .json(&json!({ "email": "new@example.com", "password": "long enough" }))
        .await;

    assert_eq!(response.status_code(), 201);
    let json = response.json::<Value>();
    assert!(json["user_id"].as_i64().is_some());

    let (hash, verified): (String, bool) =
        sqlx::query_as("SELECT password_hash, email_verified FROM users WHERE email = $1")
            .bind("new@example.com")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verified);
}

#[sqlx::test]
async fn test_register_duplicate_email(pool: PgPool) {
    common::create_test_user(&pool, "taken@example.com").await;
    let (server, _state) = common::test_server(pool);

    let response = server
        .post("/register")
        .json(&json!({ "email": "taken@example.com", "password": "long enough" }))
        .await;

    assert_eq!(response.status_code(), 409);
    assert_eq!(response.json::<Value>()["error"]["code"], "conflict");
}

#[sqlx::test]
async fn test_register_validation(pool: PgPool) {
    let (server, _state) = common::test_server(pool);

    server
        .post("/register")
        .json(&json!({ "email": "not-an-email", "password": "long enough" }))
        .await
        .assert_status_bad_request();

    server
        .post("/register")
        .json(&json!({ "email": "short@example.com", "password": "short" }))
        .await
        .assert_status_bad_request();

    let wrong_type = server
        .post("/register")
        .json(&json!({ "email": "typed@example.com", "password": 12345678 }))
        .await;
    wrong_type.assert_status_bad_request();
    assert_eq!(wrong_type.json::<Value>()["error"]["code"], "validation_error");
}

#[sqlx::test]
async fn test_login_and_me(pool: PgPool) {
    common::create_test_user(&pool, "login@example.com").await;
    let (server, _state) = common::test_server(pool.clone());

    let response = login(&server, "login@example.com", common::PASSWORD).await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 900);
    assert_eq!(json["user"]["email"], "login@example.com");
    assert!(json["user"].get("password_hash").is_none());

    let access = json["access_token"].as_str().unwrap();
    let me = server
        .get("/me")
        .add_header("Authorization", format!("Bearer {access}"))
        .await;
    me.assert_status_ok();
    let me = me.json::<Value>();
    assert_eq!(me["user"]["email"], "login@example.com");
    assert!(me["user"]["last_login"].is_string());

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 1);
}

#[sqlx::test]
async fn test_login_wrong_password_and_unknown_user(pool: PgPool) {
    common::create_test_user(&pool, "wrong@example.com").await;
    let (server, _state) = common::test_server(pool);

    let wrong = login(&server, "wrong@example.com", "not the password").await;
    wrong.assert_status_unauthorized();

    let unknown = login(&server, "nobody@example.com", "not the password").await;
    unknown.assert_status_unauthorized();

    assert_eq!(
        wrong.json::<Value>()["error"]["message"],
        unknown.json::<Value>()["error"]["message"]
    );
}

#[sqlx::test]
async fn test_lockout_after_repeated_failures(pool: PgPool) {
    common::create_test_user(&pool, "locked@example.com").await;
    let (server, _state) = common::test_server(pool.clone());

    for _ in 0..5 {
        login(&server, "locked@example.com", "not the password")
            .await
            .assert_status_unauthorized();
    }

    let response = login(&server, "locked@example.com", common::PASSWORD).await;
    assert_eq!(response.status_code(), 423);
    assert_eq!(response.json::<Value>()["error"]["code"], "account_locked");

    sqlx::query(
        "UPDATE users SET failed_login_attempts = 0, account_locked_until = NULL WHERE email = $1",
    )
    .bind("locked@example.com")
    .execute(&pool)
    .await
    .unwrap();

    login(&server, "locked@example.com", common::PASSWORD)
        .await
        .assert_status_ok();
}

#[sqlx::test]
async fn test_refresh_and_logout(pool: PgPool) {
    common::create_test_user(&pool, "refresh@example.com").await;
    let (server, _state) = common::test_server(pool);

    let tokens = login(&server, "refresh@example.com", common::PASSWORD)
        .await
        .json::<Value>();
    let refresh_token = tokens["refresh_token"].as_str().unwrap();
    let access = tokens["access_token"].as_str().unwrap();

    let refreshed = server
        .post("/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .await;
    refreshed.assert_status_ok();
    let new_access = refreshed.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    server
        .get("/me")
        .add_header("Authorization", format!("Bearer {new_access}"))
        .await
        .assert_status_ok();

    let logout = server
        .post("/logout")
        .add_header("Authorization", format!("Bearer {access}"))
        .await;
    logout.assert_status_ok();
    assert_eq!(logout.json::<Value>()["revoked_tokens"], 1);

    server
        .post("/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_refresh_with_unknown_token(pool: PgPool) {
    let (server, _state) = common::test_server(pool);

    server
        .post("/refresh")
        .json(&json!({ "refresh_token": "never-issued" }))
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_logout_requires_token(pool: PgPool) {
    let (server, _state) = common::test_server(pool);

    server.post("/logout").await.assert_status_unauthorized();
}
