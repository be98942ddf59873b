//! Login and signup forms
//!
//! Field values are kept exactly as typed. Validation is limited to
//! required-field checks; numeric fields are converted on submission the way
//! a browser number input would be, so junk becomes NaN (sent as `null`) and
//! is left for the server to reject.

use serde::{Serialize, Serializer};

use super::backend::{AuthError, AuthResult};

/// Employment type choices as (value, label)
pub const EMPLOYMENT_TYPES: [(&str, &str); 4] = [
    ("full-time", "Full-time"),
    ("part-time", "Part-time"),
    ("self-employed", "Self-employed"),
    ("unemployed", "Unemployed"),
];

/// Risk appetite choices as (value, label)
pub const RISK_APPETITES: [(&str, &str); 3] = [
    ("conservative", "Conservative"),
    ("moderate", "Moderate"),
    ("aggressive", "Aggressive"),
];

fn require(field: &'static str, value: &str) -> AuthResult<()> {
    if value.is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Browser-style number conversion: blank is 0, junk is NaN
pub fn to_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Integral values go out as JSON integers, non-finite values as `null`
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if !value.is_finite() {
        serializer.serialize_none()
    } else if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> AuthResult<()> {
        require("email", &self.email)?;
        require("password", &self.password)
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub name: String,
    pub age: String,
    pub income: String,
    pub employment_type: String,
    pub risk_appetite: String,
    pub financial_goals: String,
    pub credit_score: String,
    pub kyc_verified: bool,
}

/// `POST /auth/signup` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(serialize_with = "serialize_number")]
    pub age: f64,
    #[serde(serialize_with = "serialize_number")]
    pub income: f64,
    pub employment_type: String,
    pub risk_appetite: String,
    pub financial_goals: String,
    #[serde(serialize_with = "serialize_number")]
    pub credit_score: f64,
    /// `"true"` or `"false"`
    pub kyc_verified: String,
}

impl SignupForm {
    /// First missing field, in on-screen order
    pub fn validate(&self) -> AuthResult<()> {
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("name", &self.name)?;
        require("age", &self.age)?;
        require("income", &self.income)?;
        require("credit_score", &self.credit_score)?;
        require("employment_type", &self.employment_type)?;
        require("risk_appetite", &self.risk_appetite)?;
        require("financial_goals", &self.financial_goals)
    }

    pub fn to_request(&self) -> SignupRequest {
        SignupRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
            age: to_number(&self.age),
            income: to_number(&self.income),
            employment_type: self.employment_type.clone(),
            risk_appetite: self.risk_appetite.clone(),
            financial_goals: self.financial_goals.clone(),
            credit_score: to_number(&self.credit_score),
            kyc_verified: self.kyc_verified.to_string(),
        }
    }
}
