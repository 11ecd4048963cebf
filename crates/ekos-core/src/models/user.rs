use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role governs write/delete capability, never data shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Inspector,
    Viewer,
}

impl Role {
    /// Whether this role may create, edit, or delete records and files.
    pub fn can_edit(self) -> bool {
        matches!(self, Role::Admin | Role::Inspector)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Authenticated user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub user: User,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub role: Role,
}

/// Payload for `POST /auth/verify-email`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}
