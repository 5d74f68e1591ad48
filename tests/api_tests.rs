use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use tvhub::config::Config;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_url = "sqlite::memory:".to_string();
    config.security.pbkdf2_iterations = 1;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = tvhub::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    tvhub::api::router(state).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
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
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_device(app: &Router, device_id: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/devices",
        Some(json!({ "device_id": device_id, "name": name, "type": "tv" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_user_registration_flow() {
    let app = spawn_app().await;
    let user = json!({ "username": "alice", "password": "s3cret", "email": "alice@example.com" });

    let (status, body) = send(&app, "POST", "/api/users", Some(user.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "POST", "/api/users", Some(user)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, "GET", "/api/users/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["is_locked"], "LOCKED");
    assert_eq!(body["data"]["scopes"], json!(["web"]));
    assert!(body["data"].get("password").is_none());

    let uri = format!("/api/users/{id}/lock");
    let (status, _) = send(&app, "PUT", &uri, Some(json!({ "locked": false }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/users/alice", None).await;
    assert_eq!(body["data"]["is_locked"], "UNLOCKED");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/users/missing/lock",
        Some(json!({ "locked": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/users/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_registration_validation() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "username": "", "password": "pw", "email": "x@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "username": "bob", "password": "", "email": "bob@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_device_registration() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/devices",
        Some(json!({
            "device_id": "tv-001",
            "name": "Living room",
            "os": "android",
            "grants": ["live", "vod"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // 32 bytes, hex encoded
    assert_eq!(body["data"]["device_secret"].as_str().unwrap().len(), 64);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/devices",
        Some(json!({ "device_id": "tv-001", "name": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/devices",
        Some(json!({ "device_id": "  ", "name": "Blank" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", &format!("/api/devices/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("device_secret").is_none());
    let mut grants: Vec<String> = serde_json::from_value(body["data"]["grants"].clone()).unwrap();
    grants.sort();
    assert_eq!(grants, vec!["live", "vod"]);

    let (status, body) = send(&app, "GET", "/api/devices/by-device-id/tv-001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());
    assert!(body["data"].get("device_secret").is_none());

    let (status, _) = send(&app, "GET", "/api/devices/by-device-id/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/devices/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_device_listing() {
    let app = spawn_app().await;
    for i in 0..12 {
        create_device(&app, &format!("list-{i:02}"), &format!("Screen {i}")).await;
    }
    create_device(&app, "kitchen", "Kitchen tablet").await;

    let (status, body) = send(&app, "GET", "/api/devices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 13);
    assert_eq!(body["data"]["page_size"], 10);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 10);

    let (_, body) = send(&app, "GET", "/api/devices?page_number=2&page_size=10", None).await;
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 3);

    let (_, body) = send(&app, "GET", "/api/devices?name=tablet", None).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["device_id"], "kitchen");
    assert!(body["data"]["data"][0].get("device_secret").is_none());

    let (_, body) = send(&app, "GET", "/api/devices?is_online=ONLINE&type=tv", None).await;
    assert_eq!(body["data"]["total"], 13);

    let (status, _) = send(&app, "GET", "/api/devices?page_size=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/devices?page_size=101", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_device_update_grants_and_delete() {
    let app = spawn_app().await;
    let id = create_device(&app, "upd-1", "Hall").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/devices/{id}"),
        Some(json!({ "os": "tizen", "is_locked": "LOCKED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["os"], "tizen");
    assert_eq!(body["data"]["is_locked"], "LOCKED");
    assert_eq!(body["data"]["is_online"], "ONLINE");

    let (status, _) = send(&app, "PUT", &format!("/api/devices/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/devices/missing",
        Some(json!({ "os": "webos" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/devices/{id}/grants"),
        Some(json!({ "names": ["live", "live", "dvr"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let mut grants: Vec<String> = serde_json::from_value(body["data"]["grants"].clone()).unwrap();
    grants.sort();
    assert_eq!(grants, vec!["dvr", "live"]);

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "username": "owner", "password": "pw", "email": "o@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let user_id = body["data"]["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/devices/{id}/users"),
            Some(json!({ "user_id": user_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = send(
        &app,
        "POST",
        "/api/devices/missing/users",
        Some(json!({ "user_id": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "DELETE",
        "/api/devices",
        Some(json!({ "ids": [id.clone(), "unknown"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 1);

    let (status, _) = send(&app, "GET", &format!("/api/devices/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
