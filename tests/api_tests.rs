use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use unimart::config::Config;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = unimart::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    unimart::api::router(state).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Registers a user and returns their bearer token and id.
async fn register_user(app: &Router, username: &str, email: &str, password: &str) -> (String, i64) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": email,
            "password": password,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let id = body["data"]["user"]["id"].as_i64().unwrap();
    (token, id)
}

async fn create_listing(app: &Router, token: &str, title: &str, price: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/listings",
        Some(token),
        Some(json!({
            "title": title,
            "description": "some description",
            "price": price,
            "category": "textbooks",
            "condition": "good",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "create listing failed: {}", body);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_register_returns_user_and_token() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "alice@campus.edu",
            "password": "secret1",
            "school": "State University",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["user"]["email"], "alice@campus.edu");
    assert_eq!(body["data"]["user"]["school"], "State University");
    assert!(body["data"]["token"].as_str().unwrap().len() > 20);

    // The hash must never appear in any response shape.
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicate_identity() {
    let app = spawn_app().await;
    register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    // Same email, different username.
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "alice2",
            "email": "alice@campus.edu",
            "password": "secret1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("already"));

    // Same username, different email.
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "other@campus.edu",
            "password": "secret1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "bob",
            "email": "bob@campus.edu",
            "password": "12345",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("6"));
}

#[tokio::test]
async fn test_login_flows() {
    let app = spawn_app().await;
    register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@campus.edu", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert!(body["data"]["token"].is_string());

    // Wrong password and unknown email must be indistinguishable.
    let (status, wrong_pw) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@campus.edu", "password": "nope99"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ghost@campus.edu", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw["error"], unknown["error"]);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/favorites", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        "GET",
        "/api/favorites",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Tokens signed with a different secret fail verification.
    let (status, _) = send(
        &app,
        "POST",
        "/api/listings",
        Some("eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOjF9.bad-signature"),
        Some(json!({
            "title": "x", "description": "y", "price": 1,
            "category": "other", "condition": "good",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_profile() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/profile",
        Some(&token),
        Some(json!({
            "username": "alice",
            "email": "alice@campus.edu",
            "school": "New College",
            "phone": "0911222333",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["school"], "New College");
    assert_eq!(body["data"]["phone"], "0911222333");
}

#[tokio::test]
async fn test_profile_update_cannot_steal_identity() {
    let app = spawn_app().await;
    register_user(&app, "alice", "alice@campus.edu", "secret1").await;
    let (bob_token, _) = register_user(&app, "bob", "bob@campus.edu", "secret1").await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/auth/profile",
        Some(&bob_token),
        Some(json!({
            "username": "bob",
            "email": "alice@campus.edu",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    // Wrong current password is a credential failure.
    let (status, _) = send(
        &app,
        "PUT",
        "/api/auth/password",
        Some(&token),
        Some(json!({"current_password": "wrong1", "new_password": "secret2"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/auth/password",
        Some(&token),
        Some(json!({"current_password": "secret1", "new_password": "secret2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old password no longer works, new one does.
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@campus.edu", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@campus.edu", "password": "secret2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_rejects_short_new_password() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/password",
        Some(&token),
        Some(json!({"current_password": "secret1", "new_password": "12345"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("6"));

    // The rejected change left the old password in place.
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@campus.edu", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_listing_validation() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    for bad_price in [0, -5] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/listings",
            Some(&token),
            Some(json!({
                "title": "Lamp",
                "description": "desk lamp",
                "price": bad_price,
                "category": "household",
                "condition": "good",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("positive"));
    }

    let (status, _) = send(
        &app,
        "POST",
        "/api/listings",
        Some(&token),
        Some(json!({
            "title": "",
            "description": "no title",
            "price": 100,
            "category": "other",
            "condition": "good",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Price of exactly 1 is fine.
    create_listing(&app, &token, "One dollar pen", 1).await;
}

#[tokio::test]
async fn test_listing_rejects_unknown_category() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/listings",
        Some(&token),
        Some(json!({
            "title": "Mystery box",
            "description": "???",
            "price": 50,
            "category": "vehicles",
            "condition": "good",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_browse_and_get_listing() {
    let app = spawn_app().await;
    let (token, alice_id) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    let first = create_listing(&app, &token, "Calculus Textbook", 350).await;
    let second = create_listing(&app, &token, "Linear Algebra", 280).await;

    // Public browse needs no token; newest first.
    let (status, body) = send(&app, "GET", "/api/listings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"].as_i64().unwrap(), second);
    assert_eq!(items[1]["id"].as_i64().unwrap(), first);

    let (status, body) = send(&app, "GET", &format!("/api/listings/{}", first), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Calculus Textbook");
    assert_eq!(body["data"]["price"], 350);
    assert_eq!(body["data"]["seller_id"].as_i64().unwrap(), alice_id);
    assert_eq!(body["data"]["seller_name"], "alice");

    let (status, body) = send(&app, "GET", "/api/listings/9999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_browse_filters_are_conjunctive() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    create_listing(&app, &token, "Calculus Textbook", 350).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/listings",
        Some(&token),
        Some(json!({
            "title": "Kettle",
            "description": "electric kettle",
            "price": 400,
            "category": "household",
            "condition": "like-new",
        })),
    )
    .await;
    assert_eq!(body["data"]["category"], "household");

    let (status, body) = send(&app, "GET", "/api/listings?category=textbooks", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Calculus Textbook");

    // Both filters must match.
    let (_, body) = send(
        &app,
        "GET",
        "/api/listings?category=textbooks&condition=like-new",
        None,
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (_, body) = send(
        &app,
        "GET",
        "/api/listings?category=household&condition=like-new",
        None,
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_matches_title_and_description() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    create_listing(&app, &token, "Calculus Textbook", 350).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/listings",
        Some(&token),
        Some(json!({
            "title": "Desk lamp",
            "description": "LED lamp, perfect for reading calculus at night",
            "price": 600,
            "category": "household",
            "condition": "good",
        })),
    )
    .await;
    assert_eq!(body["success"], true);

    let (status, body) = send(&app, "GET", "/api/listings/search?q=calculus", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/listings/search?q=lamp", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", "/api/listings/search?q=zzzz", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_my_listings() {
    let app = spawn_app().await;
    let (alice_token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;
    let (bob_token, _) = register_user(&app, "bob", "bob@campus.edu", "secret1").await;

    create_listing(&app, &alice_token, "Alice's book", 100).await;
    create_listing(&app, &bob_token, "Bob's kettle", 200).await;

    let (status, body) = send(&app, "GET", "/api/listings/mine", Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Alice's book");
}

#[tokio::test]
async fn test_only_owner_can_mutate_listing() {
    let app = spawn_app().await;
    let (alice_token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;
    let (bob_token, _) = register_user(&app, "bob", "bob@campus.edu", "secret1").await;

    let listing_id = create_listing(&app, &alice_token, "Calculus Textbook", 350).await;
    let update = json!({
        "title": "Calculus Textbook (updated)",
        "description": "some description",
        "price": 300,
        "category": "textbooks",
        "condition": "good",
    });

    let uri = format!("/api/listings/{}", listing_id);

    let (status, body) = send(&app, "PUT", &uri, Some(&bob_token), Some(update.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "DELETE", &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The failed attempts changed nothing.
    let (_, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(body["data"]["title"], "Calculus Textbook");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice_token), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Calculus Textbook (updated)");
    assert_eq!(body["data"]["price"], 300);

    let (status, _) = send(&app, "DELETE", &uri, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_listing_rejects_invalid_fields() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    let listing_id = create_listing(&app, &token, "Calculus Textbook", 350).await;
    let uri = format!("/api/listings/{}", listing_id);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({
            "title": "Calculus Textbook",
            "description": "some description",
            "price": 0,
            "category": "textbooks",
            "condition": "good",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("positive"));

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({
            "title": "Calculus Textbook",
            "description": "some description",
            "price": 350,
            "category": "vehicles",
            "condition": "good",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Neither rejected update touched the row.
    let (_, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(body["data"]["price"], 350);
    assert_eq!(body["data"]["category"], "textbooks");
}

#[tokio::test]
async fn test_mutating_missing_listing_is_not_found() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/listings/9999",
        Some(&token),
        Some(json!({
            "title": "x", "description": "y", "price": 1,
            "category": "other", "condition": "good",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/listings/9999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Favorites
// ============================================================================

#[tokio::test]
async fn test_favorites_lifecycle() {
    let app = spawn_app().await;
    let (alice_token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;
    let (bob_token, _) = register_user(&app, "bob", "bob@campus.edu", "secret1").await;

    let book = create_listing(&app, &alice_token, "Calculus Textbook", 350).await;
    let kettle = create_listing(&app, &alice_token, "Kettle", 400).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&bob_token),
        Some(json!({"listing_id": book})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["message"], "Added to favorites");

    // Favoriting the same listing twice is an error, not a no-op.
    let (status, body) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&bob_token),
        Some(json!({"listing_id": book})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already"));

    let (_, _) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&bob_token),
        Some(json!({"listing_id": kettle})),
    )
    .await;

    // Newest-favorited first, full listing rows.
    let (status, body) = send(&app, "GET", "/api/favorites", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"].as_i64().unwrap(), kettle);
    assert_eq!(items[1]["id"].as_i64().unwrap(), book);
    assert_eq!(items[1]["seller_name"], "alice");

    // Favorites are per-user.
    let (_, body) = send(&app, "GET", "/api/favorites", Some(&alice_token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/favorites/{}", book),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Removing a favorite that is not there is a 404.
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/favorites/{}", book),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // After removal the pair can be favorited again.
    let (status, _) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&bob_token),
        Some(json!({"listing_id": book})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_favoriting_missing_listing_is_not_found() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&token),
        Some(json!({"listing_id": 9999})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comments_thread() {
    let app = spawn_app().await;
    let (alice_token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;
    let (bob_token, bob_id) = register_user(&app, "bob", "bob@campus.edu", "secret1").await;

    let listing_id = create_listing(&app, &alice_token, "Calculus Textbook", 350).await;
    let uri = format!("/api/listings/{}/comments", listing_id);

    // Reading the thread is public, writing is not.
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, _) = send(&app, "POST", &uri, None, Some(json!({"content": "hi"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&bob_token),
        Some(json!({"content": "Is this still available?"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["username"], "bob");
    assert_eq!(body["data"]["user_id"].as_i64().unwrap(), bob_id);

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&alice_token),
        Some(json!({"content": "Yes, it is."})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Newest first.
    let (_, body) = send(&app, "GET", &uri, None, None).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["content"], "Yes, it is.");
    assert_eq!(items[0]["username"], "alice");
    assert_eq!(items[1]["content"], "Is this still available?");
}

#[tokio::test]
async fn test_commenting_on_missing_listing_is_not_found() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@campus.edu", "secret1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/listings/9999/comments",
        Some(&token),
        Some(json!({"content": "anyone home?"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Cascade
// ============================================================================

#[tokio::test]
async fn test_deleting_listing_removes_comments_and_favorites() {
    let app = spawn_app().await;
    let (alice_token, _) = register_user(&app, "alice", "a@x.edu", "secret1").await;
    let (bob_token, _) = register_user(&app, "bob", "b@x.edu", "secret1").await;

    let listing_id = create_listing(&app, &alice_token, "Calculus Textbook", 350).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&bob_token),
        Some(json!({"listing_id": listing_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/listings/{}/comments", listing_id),
        Some(&bob_token),
        Some(json!({"content": "Interested!"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/listings/{}", listing_id),
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Bob's favorites list no longer carries the dead listing.
    let (_, body) = send(&app, "GET", "/api/favorites", Some(&bob_token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/listings/{}", listing_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
