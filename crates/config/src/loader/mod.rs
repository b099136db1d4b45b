//! Configuration loader for YAML files and environment variables.
//!
//! Responsibilities:
//! - Locate and read the YAML configuration file.
//! - Provide a builder-pattern `ConfigLoader` for layering CLI and environment overrides.
//! - Enforce the `DOTENV_DISABLED` gate before loading `.env` files.
//!
//! Does NOT handle:
//! - Rule resolution (see `rules.rs`).
//! - Talking to the cluster.
//!
//! Invariants / Assumptions:
//! - Precedence: explicit builder values > environment variables > file values.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The loaded configuration is validated before it is returned.

mod builder;
mod env;
mod error;

pub use builder::{ConfigLoader, default_config_path};
pub use env::env_var_or_none;
pub use error::ConfigError;

#[cfg(test)]
mod tests;
