//! Configuration management for esmaint.
//!
//! This crate provides the YAML configuration types, a loader that layers
//! environment overrides on top of the file, and the rule engine that maps
//! index names to their maintenance thresholds.

pub mod constants;
mod loader;
pub mod rules;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path, env_var_or_none};
pub use rules::{
    IgnoreReason, IgnoreSet, InvalidRule, PrefixMatch, Resolution, Rule, RuleFormatError,
    RuleResolver, RuleTable, parse_rule,
};
pub use types::{CheckWindow, Conf, CosConfig, DirConfig, ElasticsearchConfig, IndicesConfig};
