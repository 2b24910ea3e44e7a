//! Data Transfer Objects
//!
//! Bodies exchanged over the gateway HTTP API.

pub mod launch;
pub mod status;
