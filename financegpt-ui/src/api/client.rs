//! HTTP API Client
//!
//! Auth endpoints of the FinanceGPT REST API, plugged into the shared
//! submission flow through [`AuthBackend`].

use async_trait::async_trait;
use financegpt::auth::{error_detail, LoginRequest, SignupRequest};
use financegpt::{ApiConfig, AuthBackend, AuthError, AuthResponse, AuthResult, Endpoint};
use gloo_net::http::{Request, Response};
use serde::Serialize;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// localStorage key overriding [`DEFAULT_API_BASE`]
const API_URL_KEY: &str = "financegpt_api_url";

fn normalize_base(stored: Option<String>) -> String {
    let url = stored
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let stored = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten());
    normalize_base(stored)
}

pub fn api_config() -> ApiConfig {
    ApiConfig::new(get_api_base())
}

/// [`AuthBackend`] over the browser fetch API
#[derive(Debug, Clone)]
pub struct GlooAuthBackend {
    api: ApiConfig,
}

impl GlooAuthBackend {
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }

    async fn post_credentials<T: Serialize>(
        &self,
        endpoint: Endpoint,
        body: &T,
    ) -> AuthResult<AuthResponse> {
        let response = Request::post(&self.api.url(endpoint))
            .json(body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(rejection(response).await);
        }

        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

/// Non-2xx response into [`AuthError::Rejected`], keeping the server's detail
async fn rejection(response: Response) -> AuthError {
    let status = response.status();
    let detail = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| error_detail(&body));
    AuthError::Rejected { status, detail }
}

#[async_trait(?Send)]
impl AuthBackend for GlooAuthBackend {
    async fn login(&self, request: &LoginRequest) -> AuthResult<AuthResponse> {
        self.post_credentials(Endpoint::Login, request).await
    }

    async fn signup(&self, request: &SignupRequest) -> AuthResult<AuthResponse> {
        self.post_credentials(Endpoint::Signup, request).await
    }

    async fn logout(&self, token: Option<&str>) -> AuthResult<()> {
        let mut request = Request::post(&self.api.url(Endpoint::Logout));
        if let Some(token) = token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.ok() {
            Ok(())
        } else {
            Err(rejection(response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base() {
        assert_eq!(normalize_base(None), DEFAULT_API_BASE);
        assert_eq!(normalize_base(Some("  ".to_string())), DEFAULT_API_BASE);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(
            normalize_base(Some("https://api.example.com/".to_string())),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_ws_url_from_base() {
        let api = ApiConfig::new(normalize_base(Some("https://api.example.com".to_string())));
        assert_eq!(api.ws_url(), "wss://api.example.com/ws/stream");
    }
}
