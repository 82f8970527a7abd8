use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::SessionClient;
use crate::api::{LoginRequest, StorefrontApi};
use crate::domain::Session;
use crate::error::AccountError;

/// Login, logout and password reset on top of the session store.
#[derive(Clone)]
pub struct AccountClient {
    session: SessionClient,
    api: Arc<dyn StorefrontApi>,
}

impl AccountClient {
    pub fn new(session: SessionClient, api: Arc<dyn StorefrontApi>) -> Self {
        Self { session, api }
    }

    /// Authenticate and persist the resulting session. Blank fields are
    /// rejected before any network call.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AccountError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AccountError::ValidationError(
                "Please enter both username and password".to_string(),
            ));
        }

        debug!("Sending login request");
        let response = self
            .api
            .login(LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        let Some(token) = response.token.filter(|token| !token.is_empty()) else {
            let message = response
                .message
                .unwrap_or_else(|| "Invalid credentials".to_string());
            warn!(%message, "Login rejected");
            return Err(AccountError::LoginRejected(message));
        };

        let session = Session::new(token, username, response.user_type.unwrap_or_default());
        self.session.start(session.clone()).await?;
        info!(user_type = session.user_type.as_str(), "Logged in");

        Ok(session)
    }

    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AccountError> {
        self.session.clear().await?;
        info!("Logged out");
        Ok(())
    }

    /// Ask the backend to send a reset link. Requires an email and, like the
    /// rest of the API, an authenticated session.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), AccountError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AccountError::ValidationError(
                "Please enter your email".to_string(),
            ));
        }

        let Some(session) = self.session.current().await? else {
            return Err(AccountError::ValidationError(
                "Token not found. Please login again.".to_string(),
            ));
        };

        self.api.forgot_password(&session.token, email).await?;
        info!("Password reset requested");
        Ok(())
    }
}
