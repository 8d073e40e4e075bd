//! Shared building blocks for the employee directory service.
//!
//! - [`config`]: process settings and the named connection profile store
//! - [`response`]: the uniform API response envelope
//! - [`logging`]: structured logging facade over `tracing`

pub mod client;
pub mod config;
pub mod errors;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod response;
