//! Slurmgate Core
//!
//! Core types shared by the Slurmgate gateway and its scheduler client.
//!
//! This crate contains:
//! - Domain types: repository mappings, scheduler credentials, batch job descriptors
//! - DTOs: request and response bodies of the gateway HTTP API

pub mod domain;
pub mod dto;
