//! Shared utilities for stonk-pulse
//!
//! This crate provides the ambient pieces used across the workspace:
//! tracing setup and `.env` / environment variable loading.

pub mod env;
pub mod logging;

pub use env::{EnvError, load_env_file, optional_var, require_var};
pub use logging::init_tracing_with_default;
