//! User roles

use serde::{Deserialize, Serialize};

/// Application roles consumed by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "app_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppRole {
    Admin,
    Storekeeper,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::Admin => "admin",
            AppRole::Storekeeper => "storekeeper",
        }
    }
}

impl std::str::FromStr for AppRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AppRole::Admin),
            "storekeeper" => Ok(AppRole::Storekeeper),
            _ => Err(()),
        }
    }
}
