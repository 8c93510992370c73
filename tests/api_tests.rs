use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use cinelog::auth::TokenIssuer;
use cinelog::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection keeps every query on the same in-memory db.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.auth.secret = Some(TEST_SECRET.to_string());

    let state = cinelog::api::create_app_state(config)
        .await
        .expect("Failed to create app state");
    cinelog::api::router(state).await
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn get_json(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();

    (status, json)
}

async fn obtain_token(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/signup",
        None,
        json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");

    let (status, body) = send_json(
        app,
        "POST",
        "/signin",
        None,
        json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signin failed: {body}");

    body["data"]["token"].as_str().unwrap().to_string()
}

fn sample_movie() -> Value {
    json!({
        "title": "X",
        "year": "2020",
        "genre": "Drama",
        "actors": [{ "actorName": "A", "characterName": "B" }],
        "imageURL": "http://x"
    })
}

#[tokio::test]
async fn test_signup_then_duplicate_username() {
    let app = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/signup",
        None,
        json!({ "username": "alice", "password": "p1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // Same username again, different password: conflict, not a new user.
    let (status, body) = send_json(
        &app,
        "POST",
        "/signup",
        None,
        json!({ "username": "alice", "password": "p2" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // The original password still works, so the first record was untouched.
    let (status, _) = send_json(
        &app,
        "POST",
        "/signin",
        None,
        json!({ "username": "alice", "password": "p1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_signup_requires_username_and_password() {
    let app = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/signup",
        None,
        json!({ "username": "bob" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send_json(
        &app,
        "POST",
        "/signup",
        None,
        json!({ "password": "p1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signin_returns_decodable_token() {
    let app = spawn_app().await;
    let token = obtain_token(&app, "bob", "hunter2").await;

    let issuer = TokenIssuer::new(TEST_SECRET, 72);
    let claims = issuer.verify(&token).expect("token should verify");

    assert_eq!(claims.username, "bob");
    assert!(claims.sub.parse::<i32>().unwrap() > 0);
}

#[tokio::test]
async fn test_signin_failures_are_undifferentiated() {
    let app = spawn_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/signup",
        None,
        json!({ "username": "alice", "password": "p1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, wrong_password) = send_json(
        &app,
        "POST",
        "/signin",
        None,
        json!({ "username": "alice", "password": "wrong" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = send_json(
        &app,
        "POST",
        "/signin",
        None,
        json!({ "username": "nobody", "password": "p1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Identical bodies: signin must not reveal whether the username exists.
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_movie_routes_require_token() {
    let app = spawn_app().await;

    let (status, _) = get_json(&app, "/movies", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get_json(&app, "/movies", Some("garbage.token.here")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get_json(&app, "/reviews", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_legacy_jwt_scheme_accepted() {
    let app = spawn_app().await;
    let token = obtain_token(&app, "carol", "pw").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/movies")
                .header("Authorization", format!("JWT {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_and_get_movie() {
    let app = spawn_app().await;
    let token = obtain_token(&app, "dave", "pw").await;

    let (status, body) = send_json(&app, "POST", "/movies", Some(&token), sample_movie()).await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    let id = body["data"]["id"].as_i64().unwrap();
    assert!(id > 0);

    let (status, body) = get_json(&app, &format!("/movies/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "X");
    assert_eq!(body["data"]["year"], "2020");
    assert_eq!(body["data"]["genre"], "Drama");
    assert_eq!(body["data"]["imageURL"], "http://x");
    assert_eq!(body["data"]["actors"][0]["actorName"], "A");
    assert_eq!(body["data"]["actors"][0]["characterName"], "B");
    // Without ?reviews=true the joined field is absent entirely.
    assert!(body["data"].get("reviews").is_none());

    let (status, body) = get_json(&app, "/movies", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_movie_validation_leaves_store_unchanged() {
    let app = spawn_app().await;
    let token = obtain_token(&app, "erin", "pw").await;

    let mut no_actors = sample_movie();
    no_actors["actors"] = json!([]);
    let (status, _) = send_json(&app, "POST", "/movies", Some(&token), no_actors).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_genre = sample_movie();
    bad_genre["genre"] = json!("Musical");
    let (status, _) = send_json(&app, "POST", "/movies", Some(&token), bad_genre).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut no_title = sample_movie();
    no_title["title"] = json!("");
    let (status, _) = send_json(&app, "POST", "/movies", Some(&token), no_title).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(&app, "/movies", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_id_is_distinct_from_not_found() {
    let app = spawn_app().await;
    let token = obtain_token(&app, "frank", "pw").await;

    let (status, body) = get_json(&app, "/movies/abc", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = get_json(&app, "/movies/9999", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_review_flow_and_join() {
    let app = spawn_app().await;
    let token = obtain_token(&app, "grace", "pw").await;

    let (_, body) = send_json(&app, "POST", "/movies", Some(&token), sample_movie()).await;
    let movie_id = body["data"]["id"].as_i64().unwrap();

    let mut other = sample_movie();
    other["title"] = json!("Y");
    let (_, body) = send_json(&app, "POST", "/movies", Some(&token), other).await;
    let other_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        "/reviews",
        Some(&token),
        json!({ "movieId": movie_id, "review": "great", "rating": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "review create failed: {body}");
    assert!(body["data"]["id"].as_i64().unwrap() > 0);
    assert!(!body["data"]["date"].as_str().unwrap().is_empty());

    let (status, body) = get_json(&app, "/reviews", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body["data"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["movieId"], movie_id);
    assert_eq!(reviews[0]["review"], "great");

    // Joined read embeds exactly the matching reviews.
    let (status, body) =
        get_json(&app, &format!("/movies/{movie_id}?reviews=true"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let embedded = body["data"]["reviews"].as_array().unwrap();
    assert_eq!(embedded.len(), 1);
    assert_eq!(embedded[0]["review"], "great");

    // A movie with zero reviews joins to an empty array, not an error.
    let (status, body) =
        get_json(&app, &format!("/movies/{other_id}?reviews=true"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reviews"].as_array().unwrap().len(), 0);

    // The unjoined list still answers without the field.
    let (status, body) = get_json(&app, "/movies", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"][0].get("reviews").is_none());
}

#[tokio::test]
async fn test_review_validation() {
    let app = spawn_app().await;
    let token = obtain_token(&app, "heidi", "pw").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/reviews",
        Some(&token),
        json!({ "movieId": 1, "rating": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/reviews",
        Some(&token),
        json!({ "movieId": 1, "review": "great" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/reviews",
        Some(&token),
        json!({ "review": "great", "rating": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dangling_movie_reference_accepted() {
    let app = spawn_app().await;
    let token = obtain_token(&app, "ivan", "pw").await;

    // No movie 999 exists; the reference is stored anyway.
    let (status, body) = send_json(
        &app,
        "POST",
        "/reviews",
        Some(&token),
        json!({ "movieId": 999, "review": "orphaned", "rating": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["movieId"], 999);

    let (_, body) = get_json(&app, "/reviews", Some(&token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
