//! Shared data models.

pub mod connection;
pub mod employee;

// Re-export commonly used types
pub use connection::{ConnectionProfile, ProviderKind};
pub use employee::EmployeeRecord;
