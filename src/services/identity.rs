//! Identity provider client for credential lifecycle calls.
//!
//! Sign-up, sign-in, sign-out, and password recovery are direct
//! pass-throughs: the server forwards the request to the provider and
//! relays the provider's status and body to the caller. Password hashing
//! and session storage stay with the provider.

use actix_web::http::StatusCode;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;

use crate::config::IdentityConfig;
use crate::error::{AppError, AppResult};

/// HTTP connect timeout for provider calls.
const HTTP_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
/// HTTP total timeout for provider calls.
const HTTP_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Client for the hosted identity provider's auth endpoints.
#[derive(Clone)]
pub struct IdentityClient {
    http: Client,
    url: String,
    api_key: SecretString,
}

impl IdentityClient {
    pub fn new(config: &IdentityConfig) -> Self {
        let http = Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client for identity provider");

        IdentityClient {
            http,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Register a new user with email and password.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<(StatusCode, JsonValue)> {
        let url = format!("{}/auth/v1/signup", self.url);
        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });

        self.post_json(&url, Some(&payload), None).await
    }

    /// Exchange email and password for a session.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<(StatusCode, JsonValue)> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.url);
        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });

        self.post_json(&url, Some(&payload), None).await
    }

    /// Invalidate the session behind the given access token.
    pub async fn sign_out(&self, access_token: &str) -> AppResult<(StatusCode, JsonValue)> {
        let url = format!("{}/auth/v1/logout", self.url);

        self.post_json(&url, None, Some(access_token)).await
    }

    /// Send a password recovery email.
    pub async fn reset_password_for_email(
        &self,
        email: &str,
    ) -> AppResult<(StatusCode, JsonValue)> {
        let url = format!("{}/auth/v1/recover", self.url);
        let payload = serde_json::json!({
            "email": email,
        });

        self.post_json(&url, Some(&payload), None).await
    }

    /// POST to the provider and relay its status and JSON body.
    ///
    /// Network-level failures become Provider errors; provider-level
    /// failures (wrong password and the like) are relayed as-is so the
    /// caller sees the provider's own status and message.
    async fn post_json(
        &self,
        url: &str,
        payload: Option<&JsonValue>,
        bearer: Option<&str>,
    ) -> AppResult<(StatusCode, JsonValue)> {
        let mut request = self
            .http
            .post(url)
            .header("apikey", self.api_key.expose_secret())
            .header("Content-Type", "application/json");

        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Identity provider request failed: {}", e)))?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Provider(format!("Identity provider response failed: {}", e)))?;

        // Sign-out returns an empty 204 body
        let body = if bytes.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| JsonValue::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        Ok((status, body))
    }
}
