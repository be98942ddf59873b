//! FinanceGPT auth REST client
//!
//! reqwest implementation of [`AuthBackend`] for the terminal client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;

use super::backend::{error_detail, AuthBackend, AuthError, AuthResponse, AuthResult};
use super::form::{LoginRequest, SignupRequest};
use crate::config::{ApiConfig, Endpoint};

pub struct HttpAuthBackend {
    client: Client,
    api: ApiConfig,
}

impl HttpAuthBackend {
    pub fn new(api: ApiConfig) -> AuthResult<Self> {
        let client = Client::builder()
            .timeout(api.request_timeout())
            .build()
            .map_err(|e| AuthError::Network(e.to_string()))?;

        Ok(Self { client, api })
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    async fn post_credentials<T: Serialize>(
        &self,
        endpoint: Endpoint,
        body: &T,
    ) -> AuthResult<AuthResponse> {
        let url = self.api.url(endpoint);
        tracing::debug!(%url, "Submitting credentials");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

fn network_error(e: reqwest::Error) -> AuthError {
    if e.is_timeout() {
        AuthError::Network("request timed out".to_string())
    } else if e.is_connect() {
        AuthError::Network(format!("backend unavailable: {}", e))
    } else {
        AuthError::Network(e.to_string())
    }
}

async fn rejection(response: Response) -> AuthError {
    let status = response.status().as_u16();
    let detail = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| error_detail(&body));
    tracing::debug!(status, detail = ?detail, "Auth request rejected");
    AuthError::Rejected { status, detail }
}

#[async_trait(?Send)]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, request: &LoginRequest) -> AuthResult<AuthResponse> {
        self.post_credentials(Endpoint::Login, request).await
    }

    async fn signup(&self, request: &SignupRequest) -> AuthResult<AuthResponse> {
        self.post_credentials(Endpoint::Signup, request).await
    }

    async fn logout(&self, token: Option<&str>) -> AuthResult<()> {
        let mut request = self.client.post(self.api.url(Endpoint::Logout));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(network_error)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejection(response).await)
        }
    }
}
