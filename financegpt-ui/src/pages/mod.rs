//! Pages
//!
//! One component per navigator screen (the transition screen lives in
//! `components`).

pub mod chat;
pub mod login;
pub mod signup;
pub mod welcome;

pub use chat::ChatPage;
pub use login::LoginPage;
pub use signup::SignupPage;
pub use welcome::WelcomePage;
