pub mod auth;
pub mod cli;
pub mod configuration;
pub mod error;
pub mod telemetry;
