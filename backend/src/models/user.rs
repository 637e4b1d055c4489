//! Models for user accounts and role metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Database representation of a user account.
///
/// Authentication is handled upstream; this service only needs identity,
/// role, and company scoping to evaluate approval permissions.
pub struct User {
    /// Unique identifier for the user.
    pub id: String,
    /// Human-readable full name.
    pub full_name: String,
    /// Role describing the user's privileges.
    pub role: UserRole,
    /// Company the user belongs to, for company-scoped accounts.
    pub company_id: Option<String>,
    /// Creation timestamp for auditing.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp for auditing.
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
/// Supported user roles stored in the database.
pub enum UserRole {
    /// Field worker who gets assigned to shifts.
    #[default]
    Staff,
    /// Client-company account scoped to a single company.
    CompanyUser,
    /// Global administrator (manager tier).
    Admin,
}

impl UserRole {
    /// Returns the canonical snake_case representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Staff => "staff",
            UserRole::CompanyUser => "company_user",
            UserRole::Admin => "admin",
        }
    }
}

impl User {
    pub fn new(
        full_name: String,
        role: UserRole,
        company_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            full_name,
            role,
            company_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// True when the user is a company account scoped to the given company.
    pub fn belongs_to_company(&self, company_id: &str) -> bool {
        self.role == UserRole::CompanyUser && self.company_id.as_deref() == Some(company_id)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Payload for creating a new user account.
pub struct CreateUser {
    pub full_name: String,
    #[serde(default)]
    pub role: UserRole,
    pub company_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// API-facing representation of a user.
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub role: UserRole,
    pub company_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            full_name: user.full_name,
            role: user.role,
            company_id: user.company_id,
            created_at: user.created_at,
        }
    }
}
