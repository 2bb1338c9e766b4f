//! Typed client for the ShopSense identity service.

use crate::error::{GatewayError, GatewayResult};
use crate::types::{Identity, LoginResponse, ProfileUpdate, Receipt};
use crate::RequestAuthorizer;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

/// Stateless, typed operations against the identity service.
///
/// Requests to protected endpoints carry whatever credential the injected
/// [`RequestAuthorizer`] holds at send time. The gateway never touches
/// persistence or session state; callers decide what a failure means.
#[derive(Clone)]
pub struct AuthGateway {
    http_client: reqwest::Client,
    base_url: String,
    authorizer: RequestAuthorizer,
}

impl AuthGateway {
    /// Create a new gateway.
    ///
    /// # Arguments
    /// * `base_url` - The service base URL (e.g., `http://localhost:8000`)
    /// * `authorizer` - Shared credential slot for protected requests
    pub fn new(base_url: impl Into<String>, authorizer: RequestAuthorizer) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authorizer,
        }
    }

    /// Build the full URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the status and FastAPI `{"detail": ...}` message out of a
    /// failed response, falling back to the raw body.
    async fn error_detail(response: reqwest::Response) -> (StatusCode, String) {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        #[derive(serde::Deserialize)]
        struct ErrorBody {
            detail: serde_json::Value,
        }

        let detail = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => match parsed.detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            },
            Err(_) => body,
        };

        (status, detail)
    }

    /// Create a new account. Does not log the new account in.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> GatewayResult<Identity> {
        let url = self.api_url("/api/auth/register");
        debug!(url = %url, email = %email, "Registering account");

        let response = self
            .http_client
            .post(&url)
            .json(&RegisterRequest {
                email,
                username,
                password,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = Self::error_detail(response).await;
            warn!(status = %status, detail = %detail, "Registration failed");
            return Err(match status {
                StatusCode::CONFLICT => GatewayError::Conflict(detail),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    GatewayError::Validation(detail)
                }
                _ => GatewayError::UnexpectedStatus { status, detail },
            });
        }

        Ok(response.json().await?)
    }

    /// Exchange email/password for a credential and the owning identity.
    pub async fn login(&self, email: &str, password: &str) -> GatewayResult<LoginResponse> {
        let url = self.api_url("/api/auth/login");
        debug!(url = %url, email = %email, "Attempting login");

        let response = self
            .http_client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = Self::error_detail(response).await;
            warn!(status = %status, detail = %detail, "Login failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => GatewayError::InvalidCredentials(detail),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    GatewayError::Validation(detail)
                }
                _ => GatewayError::UnexpectedStatus { status, detail },
            });
        }

        Ok(response.json().await?)
    }

    /// Validate a credential by fetching the identity it belongs to.
    ///
    /// Takes the credential explicitly rather than reading the authorizer:
    /// the session controller validates candidate credentials that are not
    /// necessarily the attached one.
    pub async fn fetch_current_identity(&self, credential: &str) -> GatewayResult<Identity> {
        let url = self.api_url("/api/auth/me");
        debug!(url = %url, "Fetching current identity");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(credential)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = Self::error_detail(response).await;
            warn!(status = %status, detail = %detail, "Identity fetch rejected");
            return Err(match status {
                StatusCode::UNAUTHORIZED => GatewayError::Unauthorized(detail),
                _ => GatewayError::UnexpectedStatus { status, detail },
            });
        }

        Ok(response.json().await?)
    }

    /// Update the authenticated profile; returns the replacement identity.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> GatewayResult<Identity> {
        let url = self.api_url("/api/auth/profile");
        debug!(url = %url, "Updating profile");

        let response = self
            .authorizer
            .apply(self.http_client.put(&url))
            .json(update)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = Self::error_detail(response).await;
            warn!(status = %status, detail = %detail, "Profile update failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => GatewayError::Unauthorized(detail),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    GatewayError::Validation(detail)
                }
                _ => GatewayError::UnexpectedStatus { status, detail },
            });
        }

        Ok(response.json().await?)
    }

    /// Change the account password.
    pub async fn change_password(&self, current: &str, next: &str) -> GatewayResult<()> {
        let url = self.api_url("/api/auth/change-password");
        debug!(url = %url, "Changing password");

        let response = self
            .authorizer
            .apply(self.http_client.put(&url))
            .json(&ChangePasswordRequest {
                current_password: current,
                new_password: next,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = Self::error_detail(response).await;
            warn!(status = %status, detail = %detail, "Password change failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => GatewayError::InvalidCredentials(detail),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    GatewayError::Validation(detail)
                }
                _ => GatewayError::UnexpectedStatus { status, detail },
            });
        }

        Ok(())
    }

    /// List the authenticated user's receipts.
    pub async fn list_receipts(&self) -> GatewayResult<Vec<Receipt>> {
        let url = self.api_url("/api/receipts/");
        debug!(url = %url, "Listing receipts");

        let response = self
            .authorizer
            .apply(self.http_client.get(&url))
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = Self::error_detail(response).await;
            warn!(status = %status, detail = %detail, "Receipts listing failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => GatewayError::Unauthorized(detail),
                _ => GatewayError::UnexpectedStatus { status, detail },
            });
        }

        Ok(response.json().await?)
    }
}
