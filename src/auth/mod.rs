//! Authentication
//!
//! Login and signup forms, the submission flow that stores the bearer
//! token, and the REST backend seam.

mod backend;
#[cfg(feature = "native")]
mod client;
mod form;

pub use backend::{
    error_detail, login_display_name, logout, submit_login, submit_signup, AuthAction,
    AuthBackend, AuthError, AuthFormState, AuthResponse, AuthResult, NETWORK_ERROR_MESSAGE,
};
#[cfg(feature = "native")]
pub use client::HttpAuthBackend;
pub use form::{
    to_number, LoginForm, LoginRequest, SignupForm, SignupRequest, EMPLOYMENT_TYPES,
    RISK_APPETITES,
};
