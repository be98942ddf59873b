//! Auth Form Controller
//!
//! Submission flow shared by every front end: validate, one backend call,
//! persist the bearer token, derive the display name. The HTTP transport is
//! behind [`AuthBackend`] so the browser and the terminal client plug in
//! their own clients.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::form::{LoginForm, LoginRequest, SignupForm, SignupRequest};
use crate::token::{TokenStore, TokenStoreError};

/// Successful login/signup body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Which form is being submitted; picks the fallback error text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Signup,
}

impl AuthAction {
    pub fn fallback_message(self) -> &'static str {
        match self {
            AuthAction::Login => "Login failed",
            AuthAction::Signup => "Signup failed",
        }
    }
}

/// Generic message for transport failures
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// Errors from the auth flow
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Required field left empty; caught before any request
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Non-2xx response
    #[error("Request rejected with status {status}")]
    Rejected { status: u16, detail: Option<String> },

    /// Connection refused, timeout, reset
    #[error("Network error: {0}")]
    Network(String),

    /// 2xx response without a usable body
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token storage failed: {0}")]
    Storage(#[from] TokenStoreError),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Inline text shown under the form
    pub fn user_message(&self, action: AuthAction) -> String {
        match self {
            AuthError::MissingField(field) => {
                format!("Please fill in {}", field.replace('_', " "))
            }
            AuthError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            AuthError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            AuthError::Rejected { detail: None, .. }
            | AuthError::InvalidResponse(_)
            | AuthError::Storage(_) => action.fallback_message().to_string(),
        }
    }
}

/// Pull the user-facing message out of an error body.
///
/// `detail` is usually a string; request validation failures carry a list
/// of `{ "msg": ... }` entries instead.
pub fn error_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

/// Display name after login: the server's name, else the email local part
pub fn login_display_name(email: &str, server_name: Option<&str>) -> String {
    match server_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => email
            .split_once('@')
            .map_or(email, |(local, _)| local)
            .to_string(),
    }
}

/// REST transport for the auth endpoints
#[async_trait(?Send)]
pub trait AuthBackend {
    async fn login(&self, request: &LoginRequest) -> AuthResult<AuthResponse>;

    async fn signup(&self, request: &SignupRequest) -> AuthResult<AuthResponse>;

    /// Server-side logout; the token is sent as a bearer credential
    async fn logout(&self, token: Option<&str>) -> AuthResult<()>;
}

fn persist_token<S: TokenStore + ?Sized>(store: &S, response: &AuthResponse) -> AuthResult<()> {
    if response.access_token.is_empty() {
        return Err(AuthError::InvalidResponse(
            "response carried an empty access_token".to_string(),
        ));
    }
    store.set(&response.access_token)?;
    Ok(())
}

/// Log in; on success the token is stored and the display name returned
pub async fn submit_login<B, S>(backend: &B, store: &S, form: &LoginForm) -> AuthResult<String>
where
    B: AuthBackend + ?Sized,
    S: TokenStore + ?Sized,
{
    form.validate()?;
    let response = backend.login(&form.to_request()).await?;
    persist_token(store, &response)?;
    tracing::info!("Login succeeded");
    Ok(login_display_name(&form.email, response.name.as_deref()))
}

/// Create an account; the display name is the name field verbatim
pub async fn submit_signup<B, S>(backend: &B, store: &S, form: &SignupForm) -> AuthResult<String>
where
    B: AuthBackend + ?Sized,
    S: TokenStore + ?Sized,
{
    form.validate()?;
    let response = backend.signup(&form.to_request()).await?;
    persist_token(store, &response)?;
    tracing::info!("Signup succeeded");
    Ok(form.name.clone())
}

/// Best-effort server logout; the local token is cleared either way
pub async fn logout<B, S>(backend: &B, store: &S) -> AuthResult<()>
where
    B: AuthBackend + ?Sized,
    S: TokenStore + ?Sized,
{
    let token = store.get();
    let result = backend.logout(token.as_deref()).await;
    store.clear()?;
    if let Err(e) = &result {
        tracing::warn!(error = %e, "Server logout failed; local token cleared");
    }
    result
}

/// Loading flag and inline error text of one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFormState {
    loading: bool,
    error: Option<String>,
}

impl AuthFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit button disabled
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submission started
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Submission finished; returns the display name on success
    pub fn settle(&mut self, result: AuthResult<String>, action: AuthAction) -> Option<String> {
        self.loading = false;
        match result {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::debug!(error = %e, "Auth submission failed");
                self.error = Some(e.user_message(action));
                None
            }
        }
    }

    pub async fn submit_login<B, S>(&mut self, backend: &B, store: &S, form: &LoginForm) -> Option<String>
    where
        B: AuthBackend + ?Sized,
        S: TokenStore + ?Sized,
    {
        self.begin();
        let result = submit_login(backend, store, form).await;
        self.settle(result, AuthAction::Login)
    }

    pub async fn submit_signup<B, S>(&mut self, backend: &B, store: &S, form: &SignupForm) -> Option<String>
    where
        B: AuthBackend + ?Sized,
        S: TokenStore + ?Sized,
    {
        self.begin();
        let result = submit_signup(backend, store, form).await;
        self.settle(result, AuthAction::Signup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;
    use serde_json::json;
    use std::cell::RefCell;

    /// Canned backend recording what it was asked
    #[derive(Default)]
    struct FakeBackend {
        response: Option<AuthResult<AuthResponse>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeBackend {
        fn answering(response: AuthResult<AuthResponse>) -> Self {
            Self {
                response: Some(response),
                calls: RefCell::default(),
            }
        }

        fn reply(&self) -> AuthResult<AuthResponse> {
            self.response
                .clone()
                .unwrap_or_else(|| Err(AuthError::Network("no response configured".into())))
        }
    }

    #[async_trait(?Send)]
    impl AuthBackend for FakeBackend {
        async fn login(&self, request: &LoginRequest) -> AuthResult<AuthResponse> {
            self.calls.borrow_mut().push(format!("login:{}", request.email));
            self.reply()
        }

        async fn signup(&self, request: &SignupRequest) -> AuthResult<AuthResponse> {
            self.calls.borrow_mut().push(format!("signup:{}", request.email));
            self.reply()
        }

        async fn logout(&self, token: Option<&str>) -> AuthResult<()> {
            self.calls
                .borrow_mut()
                .push(format!("logout:{}", token.unwrap_or("-")));
            self.reply().map(|_| ())
        }
    }

    fn token(access_token: &str, name: Option<&str>) -> AuthResponse {
        AuthResponse {
            access_token: access_token.to_string(),
            name: name.map(str::to_string),
            token_type: Some("bearer".to_string()),
        }
    }

    fn signup_form() -> SignupForm {
        SignupForm {
            email: "new@b.com".into(),
            password: "pw".into(),
            name: "Meera Iyer".into(),
            age: "29".into(),
            income: "900000".into(),
            employment_type: "self-employed".into(),
            risk_appetite: "aggressive".into(),
            financial_goals: "Buy a house".into(),
            credit_score: "720".into(),
            kyc_verified: false,
        }
    }

    #[test]
    fn test_login_display_name() {
        assert_eq!(login_display_name("a@b.com", None), "a");
        assert_eq!(login_display_name("a@b.com", Some("")), "a");
        assert_eq!(login_display_name("a@b.com", Some("Anita")), "Anita");
        assert_eq!(login_display_name("no-at-sign", None), "no-at-sign");
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(&json!({"detail": "email taken"})).as_deref(),
            Some("email taken")
        );
        assert_eq!(
            error_detail(&json!({"detail": [
                {"loc": ["body", "age"], "msg": "value is not a valid integer"},
                {"loc": ["body", "email"], "msg": "value is not a valid email address"}
            ]}))
            .as_deref(),
            Some("value is not a valid integer; value is not a valid email address")
        );
        assert_eq!(error_detail(&json!({"message": "nope"})), None);
        assert_eq!(error_detail(&json!({"detail": ""})), None);
    }

    #[test]
    fn test_user_messages() {
        let rejected = AuthError::Rejected { status: 401, detail: Some("Invalid credentials".into()) };
        assert_eq!(rejected.user_message(AuthAction::Login), "Invalid credentials");

        let bare = AuthError::Rejected { status: 500, detail: None };
        assert_eq!(bare.user_message(AuthAction::Login), "Login failed");
        assert_eq!(bare.user_message(AuthAction::Signup), "Signup failed");

        let network = AuthError::Network("connection refused".into());
        assert_eq!(network.user_message(AuthAction::Signup), "Network error");
    }

    #[tokio::test]
    async fn test_login_without_name_uses_email_local_part() {
        let backend = FakeBackend::answering(Ok(token("t1", None)));
        let store = MemoryTokenStore::new();

        let name = submit_login(&backend, &store, &LoginForm::new("a@b.com", "pw"))
            .await
            .unwrap();

        assert_eq!(name, "a");
        assert_eq!(store.get().as_deref(), Some("t1"));
        assert_eq!(*backend.calls.borrow(), vec!["login:a@b.com".to_string()]);
    }

    #[tokio::test]
    async fn test_login_prefers_server_name() {
        let backend = FakeBackend::answering(Ok(token("t1", Some("Anita"))));
        let store = MemoryTokenStore::new();
        let name = submit_login(&backend, &store, &LoginForm::new("a@b.com", "pw"))
            .await
            .unwrap();
        assert_eq!(name, "Anita");
    }

    #[tokio::test]
    async fn test_missing_field_makes_no_request() {
        let backend = FakeBackend::answering(Ok(token("t1", None)));
        let store = MemoryTokenStore::new();

        let err = submit_login(&backend, &store, &LoginForm::new("a@b.com", ""))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::MissingField("password"));
        assert!(backend.calls.borrow().is_empty());
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_signup_returns_name_verbatim() {
        let backend = FakeBackend::answering(Ok(token("t2", Some("ignored"))));
        let store = MemoryTokenStore::new();
        let name = submit_signup(&backend, &store, &signup_form()).await.unwrap();
        assert_eq!(name, "Meera Iyer");
        assert_eq!(store.get().as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn test_failed_signup_sets_error_and_keeps_form() {
        let backend = FakeBackend::answering(Err(AuthError::Rejected {
            status: 400,
            detail: Some("email taken".into()),
        }));
        let store = MemoryTokenStore::new();
        let form = signup_form();
        let mut state = AuthFormState::new();

        let outcome = state.submit_signup(&backend, &store, &form).await;

        assert_eq!(outcome, None);
        assert_eq!(state.error(), Some("email taken"));
        assert!(!state.is_loading());
        assert_eq!(form, signup_form());
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_new_error_replaces_previous() {
        let store = MemoryTokenStore::new();
        let mut state = AuthFormState::new();

        let first = FakeBackend::answering(Err(AuthError::Network("refused".into())));
        state.submit_login(&first, &store, &LoginForm::new("a@b.com", "pw")).await;
        assert_eq!(state.error(), Some("Network error"));

        let second = FakeBackend::answering(Err(AuthError::Rejected { status: 401, detail: None }));
        state.submit_login(&second, &store, &LoginForm::new("a@b.com", "pw")).await;
        assert_eq!(state.error(), Some("Login failed"));

        let third = FakeBackend::answering(Ok(token("t3", None)));
        let name = state.submit_login(&third, &store, &LoginForm::new("a@b.com", "pw")).await;
        assert_eq!(name.as_deref(), Some("a"));
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn test_empty_access_token_is_invalid() {
        let backend = FakeBackend::answering(Ok(token("", None)));
        let store = MemoryTokenStore::with_token("old");
        let err = submit_login(&backend, &store, &LoginForm::new("a@b.com", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
        assert_eq!(store.get().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_logout_clears_token_even_when_server_fails() {
        let backend = FakeBackend::answering(Err(AuthError::Network("down".into())));
        let store = MemoryTokenStore::with_token("t1");

        let result = logout(&backend, &store).await;

        assert!(result.is_err());
        assert_eq!(store.get(), None);
        assert_eq!(*backend.calls.borrow(), vec!["logout:t1".to_string()]);
    }
}
