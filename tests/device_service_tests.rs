//! Service-level flows that span several store operations.

use std::collections::BTreeSet;

use tvhub::config::Config;
use tvhub::models::device::{DeviceUpdate, NewDevice};
use tvhub::models::status::LockState;
use tvhub::models::user::RegisterUser;
use tvhub::services::{DeviceError, RegisterDevice, UserError};
use tvhub::state::SharedState;

async fn test_state() -> SharedState {
    let db_path =
        std::env::temp_dir().join(format!("tvhub-service-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.security.pbkdf2_iterations = 1;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    SharedState::new(config).await.expect("failed to build state")
}

fn register_request(device_id: &str, grants: &[&str], user_id: Option<String>) -> RegisterDevice {
    RegisterDevice {
        device: NewDevice {
            device_id: device_id.to_string(),
            name: "Lounge".to_string(),
            os: None,
            device_type: None,
            engine: None,
            access_token_validate_seconds: None,
            refresh_token_validate_seconds: None,
        },
        user_id,
        grants: grants.iter().map(|s| (*s).to_string()).collect(),
    }
}

#[tokio::test]
async fn test_register_links_grants_and_owner() {
    let state = test_state().await;

    let user_id = state
        .user_service
        .register(RegisterUser {
            username: "owner".to_string(),
            password: "correct horse".to_string(),
            email: "owner@example.com".to_string(),
        })
        .await
        .unwrap();

    let credentials = state
        .device_service
        .register(register_request("svc-1", &["live", "vod"], Some(user_id)))
        .await
        .unwrap();

    let detail = state.device_service.detail(&credentials.id).await.unwrap();
    let grants: BTreeSet<_> = detail.grants.into_iter().collect();
    assert_eq!(
        grants,
        BTreeSet::from(["live".to_string(), "vod".to_string()])
    );

    let record = state.user_service.find_by_name("owner").await.unwrap().unwrap();
    assert!(record.user.password.starts_with("$argon2id$"));
    assert_eq!(record.user.is_locked, LockState::Locked);
}

#[tokio::test]
async fn test_register_duplicate_device_is_conflict() {
    let state = test_state().await;

    state
        .device_service
        .register(register_request("svc-dup", &[], None))
        .await
        .unwrap();
    let err = state
        .device_service
        .register(register_request("svc-dup", &[], None))
        .await
        .unwrap_err();

    assert!(matches!(err, DeviceError::Conflict(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_assign_grants_merges_with_existing() {
    let state = test_state().await;
    let credentials = state
        .device_service
        .register(register_request("svc-2", &["live"], None))
        .await
        .unwrap();

    let grants = state
        .device_service
        .assign_grants(&credentials.id, &["live".to_string(), "dvr".to_string()])
        .await
        .unwrap();
    let grants: BTreeSet<_> = grants.into_iter().collect();
    assert_eq!(grants, BTreeSet::from(["dvr".to_string(), "live".to_string()]));

    let err = state
        .device_service
        .assign_grants("missing", &["live".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, DeviceError::NotFound(_)));
}

#[tokio::test]
async fn test_update_requires_a_change_and_an_existing_device() {
    let state = test_state().await;
    let credentials = state
        .device_service
        .register(register_request("svc-3", &[], None))
        .await
        .unwrap();

    let err = state
        .device_service
        .update(DeviceUpdate {
            id: credentials.id.clone(),
            ..DeviceUpdate::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DeviceError::Validation(_)));

    let detail = state
        .device_service
        .update(DeviceUpdate {
            id: credentials.id.clone(),
            is_locked: Some(LockState::Locked),
            ..DeviceUpdate::default()
        })
        .await
        .unwrap();
    assert_eq!(detail.device.is_locked, LockState::Locked);

    let err = state
        .device_service
        .update(DeviceUpdate {
            id: "missing".to_string(),
            is_locked: Some(LockState::Locked),
            ..DeviceUpdate::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DeviceError::NotFound(_)));
}

#[tokio::test]
async fn test_user_lock_and_duplicate_username() {
    let state = test_state().await;
    let params = RegisterUser {
        username: "heidi".to_string(),
        password: "pw".to_string(),
        email: "heidi@example.com".to_string(),
    };

    let id = state.user_service.register(params.clone()).await.unwrap();
    let err = state.user_service.register(params).await.unwrap_err();
    assert!(matches!(err, UserError::UsernameTaken(_)));

    state
        .user_service
        .set_lock(&id, LockState::Unlocked)
        .await
        .unwrap();
    let record = state.user_service.find_by_name("heidi").await.unwrap().unwrap();
    assert_eq!(record.user.is_locked, LockState::Unlocked);

    let err = state
        .user_service
        .set_lock("missing", LockState::Locked)
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::NotFound(_)));
}

#[tokio::test]
async fn test_cache_keys_follow_configured_templates() {
    let state = test_state().await;

    assert_eq!(state.keys.client_key("c1"), "clients:c1");
    assert_eq!(state.keys.token_key("t1"), "tokens:t1");
    assert_eq!(state.keys.user_key("u1"), "users:u1");
}
