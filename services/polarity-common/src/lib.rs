//! Polarity Common - Shared configuration and logging for the Polarity service.
//!
//! This crate provides:
//! - Configuration types and loading (file, `.env`, environment)
//! - Configuration validation
//! - Logging setup with noise filtering

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod logging;
pub mod validation;

pub use config::{Config, NetworkConfig, ObservabilityConfig, StoreConfig};
pub use validation::{Validate, ValidationError, ValidationResult};

