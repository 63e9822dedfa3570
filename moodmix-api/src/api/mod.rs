//! HTTP API handlers for moodmix-api

pub mod auth;
pub mod health;
pub mod probe;
pub mod recommend;
pub mod register;

pub use auth::{auth_middleware, AuthenticatedApp};
pub use health::health_routes;
pub use probe::test_credential;
pub use recommend::recommend;
pub use register::register_app;
