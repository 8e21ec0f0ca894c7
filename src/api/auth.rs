//! Authentication endpoints (`/auth/*`)

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        user::{
            AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
            MessageResponse, ProfileUpdate, RegisterRequest,
        },
        SessionStatus, User,
    },
    services::session::SessionCache,
};

use super::client::ApiClient;

#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
    session: Arc<SessionCache>,
}

impl AuthApi {
    pub fn new(client: ApiClient, session: Arc<SessionCache>) -> Self {
        Self { client, session }
    }

    /// Sign in; the session cache is dropped before the request goes out
    pub async fn login(&self, request: &LoginRequest) -> AppResult<User> {
        request.validate()?;
        self.session.invalidate().await;
        let response: AuthResponse = self.client.post_json("/auth/login", request).await?;
        tracing::info!("Logged in as {}", response.user.email);
        Ok(response.user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        request.validate()?;
        let response: AuthResponse = self.client.post_json("/auth/register", request).await?;
        tracing::info!("Registered {} as {}", response.user.email, response.user.role);
        Ok(response.user)
    }

    pub async fn logout(&self) -> AppResult<String> {
        self.session.invalidate().await;
        let response: MessageResponse = self
            .client
            .post_json("/auth/logout", &serde_json::json!({}))
            .await?;
        Ok(response.message)
    }

    /// Cached `GET /auth/verify-session`
    pub async fn verify_session(&self) -> AppResult<SessionStatus> {
        self.session
            .get_or_fetch(|| self.client.get_json("/auth/verify-session", Vec::new()))
            .await
    }

    pub async fn me(&self) -> AppResult<User> {
        self.client.get_json("/auth/me", Vec::new()).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<User> {
        update.validate()?;
        let response: AuthResponse = self.client.patch_json("/auth/profile", update).await?;
        self.session.invalidate().await;
        Ok(response.user)
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> AppResult<String> {
        request.validate()?;
        let response: MessageResponse = self
            .client
            .post_json("/auth/change-password", request)
            .await?;
        Ok(response.message)
    }

    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> AppResult<String> {
        request.validate()?;
        let response: MessageResponse = self
            .client
            .post_json("/auth/forgot-password", request)
            .await?;
        Ok(response.message)
    }
}
