use shared::models::{
    LoginRequest, LoginResponse, MessageResponse, SignUpRequest, UpdateProfileRequest, UserProfile,
};

use crate::api::{ApiClient, ApiError, ApiRequest};

/// Sign-in, registration, password recovery and the own profile.
#[derive(Debug, Clone, Copy)]
pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Exchanges credentials for a bearer token. The session is not touched;
    /// see [`crate::SessionStore::sign_in`].
    pub async fn sign_in(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.api
            .post_json("api/auth/public/sign-in", credentials)
            .await
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<MessageResponse, ApiError> {
        self.api
            .send(ApiRequest::post("api/auth/public/sign-up").json(request)?)
            .await?
            .message()
    }

    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.api.get_json("api/auth/user").await
    }

    /// Asks the backend to mail a reset link to `email`.
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        self.api
            .post_form("api/auth/public/forgot-password", [("email", email.trim())])
            .await?
            .message()
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.api
            .post_form(
                "api/auth/public/reset-password",
                [("token", token), ("newPassword", new_password)],
            )
            .await?
            .message()
    }

    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        self.api.put_json("api/users", request).await
    }
}
