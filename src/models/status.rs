use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a user or device may authenticate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockState {
    #[sea_orm(num_value = 0)]
    Unlocked,
    #[sea_orm(num_value = 1)]
    Locked,
}

impl LockState {
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl From<bool> for LockState {
    fn from(locked: bool) -> Self {
        if locked { Self::Locked } else { Self::Unlocked }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnlineStatus {
    #[sea_orm(num_value = 0)]
    Offline,
    #[sea_orm(num_value = 1)]
    Online,
}
