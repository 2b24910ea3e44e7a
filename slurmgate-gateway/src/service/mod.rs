//! Service Module
//!
//! Business logic layer for the gateway.
//! Services sequence the credential cache, the translator and the scheduler.

pub mod launch;
pub mod submitter;

// Re-export for convenience
pub use launch as launch_service;
pub use submitter::{JobSubmitter, SubmittedJob};
