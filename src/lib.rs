pub mod config;
pub mod error;
pub mod onboarding;
pub mod routes;
pub mod store;
pub mod subscriptions;
