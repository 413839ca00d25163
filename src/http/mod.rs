//! Axum HTTP handlers exposing client registrations.

pub mod context;
mod handler_providers;
mod handler_registrations;
mod middleware_auth;
pub mod server;

pub use context::AppState;
pub use handler_providers::ProviderLink;
pub use handler_registrations::{RegistrationRequest, RegistrationView};
pub use middleware_auth::AdminAuth;
pub use server::build_router;
