use shared::models::{Role, UpdateRolesRequest, UpdateStatusRequest, UserProfile};

use crate::api::{ApiClient, ApiError};

/// User administration; the backend only allows admins here.
#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    api: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<UserProfile>, ApiError> {
        self.api.get_json("api/admin/users").await
    }

    pub async fn set_roles(&self, id: i64, roles: &[Role]) -> Result<UserProfile, ApiError> {
        let request = UpdateRolesRequest {
            roles: roles.iter().map(|role| role.as_str().to_string()).collect(),
        };
        self.api
            .put_json(&format!("api/admin/users/{id}/roles"), &request)
            .await
    }

    pub async fn set_enabled(&self, id: i64, enabled: bool) -> Result<UserProfile, ApiError> {
        self.api
            .put_json(
                &format!("api/admin/users/{id}/status"),
                &UpdateStatusRequest { enabled },
            )
            .await
    }
}
