//! UI Components
//!
//! Reusable Leptos components for the chat client.

pub mod analyzing;
pub mod message_bubble;
pub mod toast;
pub mod welcome_animation;

pub use analyzing::AnalyzingAnimation;
pub use message_bubble::MessageBubble;
pub use toast::Toast;
pub use welcome_animation::WelcomeAnimation;
