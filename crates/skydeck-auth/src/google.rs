//! Google identity provider: interactive OAuth2 consent flow.
//!
//! `sign_in` opens the system browser and parks a localhost callback
//! server, suspending until the user completes or abandons the flow.
//! The resulting access token is traded for a userinfo record to build
//! the [`Identity`].

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::oneshot;
use warp::Filter;

use skydeck_core::AuthError;

use crate::identity::Identity;
use crate::provider::IdentityProvider;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const GOOGLE_REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";

const PROFILE_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.profile";
const EMAIL_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";

const CALLBACK_PORT: u16 = 8080;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    picture: Option<String>,
}

pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    userinfo_url: String,
    revoke_url: String,
}

impl GoogleIdentityProvider {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
            revoke_url: GOOGLE_REVOKE_URL.to_string(),
        }
    }

    /// Point the token/userinfo/revoke endpoints at a different host (tests).
    pub fn new_with_endpoints(client_id: &str, client_secret: &str, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: format!("{}/token", base),
            userinfo_url: format!("{}/userinfo", base),
            revoke_url: format!("{}/revoke", base),
        }
    }

    /// Authorization URL plus the CSRF state to verify on callback.
    pub fn authorization_url(&self, port: u16) -> (String, String) {
        let state = uuid::Uuid::new_v4().to_string();
        let redirect_uri = format!("http://localhost:{}/callback", port);
        let scopes = format!("{} {}", PROFILE_SCOPE, EMAIL_SCOPE);

        let url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&prompt=consent",
            GOOGLE_AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(&state),
        );

        (url, state)
    }

    /// Exchange an authorization code for an access token.
    #[tracing::instrument(skip(self, code), level = "info")]
    pub async fn exchange_code(&self, code: &str, port: u16) -> Result<String, AuthError> {
        let redirect_uri = format!("http://localhost:{}/callback", port);

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", &redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::Flow(format!("token exchange failed: {}", text)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Flow(format!("token response: {}", e)))?;

        Ok(token.access_token)
    }

    /// Build an [`Identity`] from the token via the userinfo endpoint.
    #[tracing::instrument(skip(self, access_token), level = "info")]
    pub async fn fetch_identity(&self, access_token: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidToken);
        }
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::Flow(format!("userinfo failed: {}", text)));
        }

        let info: UserInfo = response
            .json()
            .await
            .map_err(|e| AuthError::Flow(format!("userinfo response: {}", e)))?;

        Ok(Identity {
            id: info.sub,
            name: info.name,
            email: info.email,
            avatar_url: info.picture,
            access_token: Some(access_token.to_string()),
        })
    }

    /// Revoke the token. Best-effort: failures are logged, never returned.
    pub async fn revoke_token(&self, access_token: &str) {
        let result = self
            .client
            .post(&self.revoke_url)
            .form(&[("token", access_token)])
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!("Revoked Google access token");
            }
            Ok(resp) => {
                tracing::warn!("Token revocation returned status {}", resp.status());
            }
            Err(e) => {
                tracing::warn!("Token revocation failed: {}", e);
            }
        }
    }

    /// Run the browser + localhost callback handshake, returning the
    /// authorization code once the user completes consent.
    async fn await_callback(&self) -> Result<String, AuthError> {
        let (auth_url, csrf_state) = self.authorization_url(CALLBACK_PORT);

        let (tx, rx) = oneshot::channel::<(String, String, Option<String>)>();
        let tx = Arc::new(tokio::sync::Mutex::new(Some(tx)));

        let routes = warp::get()
            .and(warp::path("callback"))
            .and(warp::query::<std::collections::HashMap<String, String>>())
            .and(warp::any().map(move || tx.clone()))
            .and_then(
                |params: std::collections::HashMap<String, String>,
                 tx: Arc<tokio::sync::Mutex<Option<oneshot::Sender<(String, String, Option<String>)>>>>| async move {
                    let code = params.get("code").cloned().unwrap_or_default();
                    let state = params.get("state").cloned().unwrap_or_default();
                    let error = params.get("error").cloned();

                    if let Some(sender) = tx.lock().await.take() {
                        let _ = sender.send((code, state, error));
                    }

                    Ok::<_, warp::Rejection>(warp::reply::html(
                        "<html><body><h1>Sign-in complete</h1><p>You can close this window and return to Skydeck.</p></body></html>",
                    ))
                },
            );

        let server = warp::serve(routes).bind(([127, 0, 0, 1], CALLBACK_PORT));
        let server_handle = tokio::spawn(server);

        tracing::info!("Opening browser for Google sign-in");
        webbrowser::open(&auth_url)
            .context("Failed to open browser")
            .map_err(|e| AuthError::Flow(e.to_string()))?;

        // Suspends until the user finishes or abandons the flow; no timeout.
        let (code, state, error) = rx
            .await
            .map_err(|_| AuthError::Flow("callback channel closed".to_string()))?;

        server_handle.abort();

        if let Some(error) = error {
            return if error == "access_denied" {
                Err(AuthError::Cancelled)
            } else {
                Err(AuthError::Flow(error))
            };
        }

        if state != csrf_state {
            return Err(AuthError::Flow("state mismatch".to_string()));
        }

        Ok(code)
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        let code = self.await_callback().await?;
        let access_token = self.exchange_code(&code, CALLBACK_PORT).await?;
        let identity = self.fetch_identity(&access_token).await?;

        tracing::info!("Signed in as {}", identity.email);
        Ok(identity)
    }

    async fn sign_out(&self, identity: &Identity) {
        if let Some(token) = &identity.access_token {
            self.revoke_token(token).await;
        }
        tracing::info!("Signed out {}", identity.email);
    }
}
