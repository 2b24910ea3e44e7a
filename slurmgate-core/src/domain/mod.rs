//! Domain Module
//!
//! Core business entities for the runner gateway.

pub mod credential;
pub mod job;
pub mod repository;
