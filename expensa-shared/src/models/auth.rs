use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Backend role names the clients understand.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_MANAGER")]
    Manager,
    #[serde(rename = "ROLE_USER")]
    User,
}

impl Role {
    /// Every role, in the order the user administration screen lists them.
    pub const ALL: [Self; 3] = [Self::User, Self::Manager, Self::Admin];

    /// Return the role name as the backend spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ROLE_ADMIN",
            Self::Manager => "ROLE_MANAGER",
            Self::User => "ROLE_USER",
        }
    }

    /// Human readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::User => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "ROLE_ADMIN" => Ok(Self::Admin),
            "ROLE_MANAGER" => Ok(Self::Manager),
            "ROLE_USER" => Ok(Self::User),
            _ => Err("unknown role"),
        }
    }
}

/// Role flags derived from a backend role list. They gate what the UI shows;
/// the backend enforces access on its own.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleFlags {
    pub is_admin: bool,
    pub is_manager: bool,
}

impl RoleFlags {
    /// Derive the flags from role names. Unknown names set neither flag.
    pub fn from_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        roles
            .into_iter()
            .fold(Self::default(), |flags, role| match role.as_ref().parse() {
                Ok(Role::Admin) => Self {
                    is_admin: true,
                    ..flags
                },
                Ok(Role::Manager) => Self {
                    is_manager: true,
                    ..flags
                },
                _ => flags,
            })
    }

    /// Whether the holder may look at the approval queue.
    #[must_use]
    pub const fn can_review(self) -> bool {
        self.is_admin || self.is_manager
    }
}

/// Credentials for `POST /api/auth/public/sign-in`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful sign-in response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub jwt_token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Registration payload for `POST /api/auth/public/sign-up`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl SignUpRequest {
    /// Checks the form before it is sent.
    ///
    /// # Errors
    /// Returns every problem found, one message per field.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("Username is required".to_string());
        }
        if self.full_name.trim().is_empty() {
            errors.push("Full name is required".to_string());
        }
        if !looks_like_email(&self.email) {
            errors.push("A valid email address is required".to_string());
        }
        if self.password.chars().count() < 6 {
            errors.push("Password must be at least 6 characters".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload for `PUT /api/users`. A missing password leaves it unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Anti-forgery token issued by `GET /api/auth/csrf`.
impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.full_name.trim().is_empty() {
            errors.push("Full name is required".to_string());
        }
        if !looks_like_email(&self.email) {
            errors.push("A valid email address is required".to_string());
        }
        if self
            .password
            .as_ref()
            .is_some_and(|password| password.chars().count() < 6)
        {
            errors.push("Password must be at least 6 characters".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub token: String,
    #[serde(default)]
    pub header_name: Option<String>,
    #[serde(default)]
    pub parameter_name: Option<String>,
}

/// Plain acknowledgement body used by the public auth endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

pub(crate) fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
