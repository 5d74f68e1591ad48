use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::db::error::{StoreError, StoreResult};
use crate::entities::{prelude::*, scopes, user_on_scope, users};
use crate::models::status::LockState;
use crate::models::user::{DEFAULT_SCOPE, RegisterUser, UserRecord};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get user by username with scopes loaded
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        debug!(username, "Looking up user by name");

        let Some(user) = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let scopes = user.find_related(Scopes).all(&self.conn).await?;
        Ok(Some(UserRecord { user, scopes }))
    }

    /// Create a locked account linked to the default scope.
    ///
    /// The user row, the scope and the link are written in one transaction.
    pub async fn register(&self, params: RegisterUser) -> StoreResult<String> {
        info!(username = %params.username, "Registering user");

        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let txn = self
            .conn
            .begin()
            .await
            .map_err(StoreError::in_transaction)?;

        Users::insert(users::ActiveModel {
            id: Set(id.clone()),
            username: Set(params.username),
            password: Set(params.password),
            email: Set(params.email),
            is_locked: Set(LockState::Locked),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
        })
        .exec_without_returning(&txn)
        .await
        .map_err(StoreError::in_transaction)?;

        Scopes::insert(scopes::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(DEFAULT_SCOPE.to_string()),
        })
        .on_conflict(
            OnConflict::column(scopes::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await
        .map_err(StoreError::in_transaction)?;

        let scope_id: String = Scopes::find()
            .select_only()
            .column(scopes::Column::Id)
            .filter(scopes::Column::Name.eq(DEFAULT_SCOPE))
            .into_tuple()
            .one(&txn)
            .await
            .map_err(StoreError::in_transaction)?
            .ok_or_else(|| {
                StoreError::TransactionFailure(format!("Scope '{DEFAULT_SCOPE}' missing"))
            })?;

        UserOnScope::insert(user_on_scope::ActiveModel {
            user_id: Set(id.clone()),
            scope_id: Set(scope_id),
            created_at: Set(now),
        })
        .on_conflict(
            OnConflict::columns([user_on_scope::Column::UserId, user_on_scope::Column::ScopeId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await
        .map_err(StoreError::in_transaction)?;

        txn.commit().await.map_err(StoreError::in_transaction)?;

        info!(id = %id, "User registered");
        Ok(id)
    }

    /// Lock or unlock an account. Returns false if the user does not exist.
    pub async fn set_lock(&self, user_id: &str, state: LockState) -> StoreResult<bool> {
        let result = Users::update_many()
            .set(users::ActiveModel {
                is_locked: Set(state),
                updated_at: Set(chrono::Utc::now().to_rfc3339()),
                ..Default::default()
            })
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.conn)
            .await?;

        info!(user_id, ?state, rows = result.rows_affected, "Updated user lock");
        Ok(result.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> StoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| StoreError::Internal(format!("Invalid Argon2 params: {e}")))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::Internal(format!("Failed to hash password: {e}")))?;

    Ok(hash.to_string())
}
