//! User and role models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles below this id (admin, supervisor tiers) see every active
/// project; everyone else only sees assigned ongoing work.
pub const ELEVATED_ROLE_THRESHOLD: i32 = 5;

/// A user account on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub full_name: String,
    pub role_id: i32,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_full_project_access(&self) -> bool {
        self.role_id < ELEVATED_ROLE_THRESHOLD
    }
}

/// A role tier; lower ids carry wider access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub role_id: i32,
    pub role_name: String,
    pub status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role_id: i32) -> User {
        User {
            id: Uuid::nil(),
            user_name: "ops1".into(),
            full_name: "Operator One".into(),
            role_id,
            password_hash: String::new(),
            status: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_project_access_by_role_tier() {
        assert!(user(1).has_full_project_access());
        assert!(user(4).has_full_project_access());
        assert!(!user(5).has_full_project_access());
        assert!(!user(9).has_full_project_access());
    }
}
