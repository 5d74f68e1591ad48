use serde::{Deserialize, Serialize};

use super::status::LockState;
use crate::entities::{scopes, users};

/// Scope every new account receives.
pub const DEFAULT_SCOPE: &str = "web";

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: users::Model,
    pub scopes: Vec<scopes::Model>,
}

impl UserRecord {
    #[must_use]
    pub fn scope_names(&self) -> Vec<String> {
        self.scopes.iter().map(|s| s.name.clone()).collect()
    }
}

/// User as returned over the API (no credential).
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_locked: LockState,
    pub scopes: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserInfo {
    fn from(record: UserRecord) -> Self {
        let scopes = record.scope_names();
        let user = record.user;
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_locked: user.is_locked,
            scopes,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
