//! services/api/src/lib.rs
//!
//! Library root for the API service. Exposes the configuration, error type,
//! adapters, and the web layer to the service binaries.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
