use serde::{Deserialize, Serialize};

use super::auth::{Role, RoleFlags};

const fn enabled_by_default() -> bool {
    true
}

/// Profile returned by `GET /api/auth/user` and the user administration endpoints.
///
/// Every field except `roles` may be absent: right after sign-in the clients
/// only know the display name and roles carried by the token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl UserProfile {
    /// Minimal record built from sign-in claims.
    #[must_use]
    pub fn from_claims(full_name: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            full_name: full_name.into(),
            roles,
            enabled: true,
            ..Self::default()
        }
    }

    /// Role flags for this profile.
    #[must_use]
    pub fn role_flags(&self) -> RoleFlags {
        RoleFlags::from_roles(&self.roles)
    }

    /// Whether the profile carries `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|name| name == role.as_str())
    }

    /// Name to show in headers and menus.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.full_name.trim().is_empty() {
            &self.full_name
        } else if !self.username.is_empty() {
            &self.username
        } else {
            &self.email
        }
    }
}

/// Compact user reference embedded in expenses and approval requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    #[serde(default)]
    pub full_name: String,
}

/// Payload for `PUT /api/admin/users/{id}/roles`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateRolesRequest {
    pub roles: Vec<String>,
}

/// Payload for `PUT /api/admin/users/{id}/status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateStatusRequest {
    pub enabled: bool,
}
