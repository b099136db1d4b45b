//! Configuration types for esmaint.
//!
//! The file layout mirrors the YAML document: `elasticsearch`, `cos`, `dir`
//! and `indices` sections. Only `elasticsearch` and `indices` are consumed by
//! the maintenance core; `cos` and `dir` belong to the archival collaborator.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::loader::ConfigError;
use crate::rules::{
    IgnoreSet, InvalidRule, PrefixMatch, Resolution, RuleResolver, RuleTable, parse_rule,
};

/// Module for deserializing optional SecretString values from plain strings.
mod secret_string {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.filter(|s| !s.is_empty())
            .map(|s| SecretString::new(s.into())))
    }
}

/// Module for deserializing Duration from whole seconds.
mod duration_seconds {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

/// Connection settings for the Elasticsearch cluster.
#[derive(Debug, Clone, Deserialize)]
pub struct ElasticsearchConfig {
    /// Cluster URL (e.g., http://127.0.0.1:9200)
    #[serde(default)]
    pub url: String,
    /// Username for basic authentication
    #[serde(default)]
    pub username: Option<String>,
    /// Password for basic authentication
    #[serde(default, with = "secret_string")]
    pub password: Option<SecretString>,
    /// Request timeout (seconds in the file)
    #[serde(default, with = "duration_seconds")]
    pub timeout: Option<Duration>,
    /// Skip TLS verification (self-signed clusters)
    #[serde(default)]
    pub skip_verify: bool,
    /// Retries for throttled (HTTP 429) requests
    #[serde(default)]
    pub max_retries: Option<usize>,
}

impl ElasticsearchConfig {
    pub fn timeout_or_default(&self) -> Duration {
        self.timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn max_retries_or_default(&self) -> usize {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }
}

/// Inclusive range of days-ago to verify archival completeness (`"1:5"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct CheckWindow {
    pub from_days: u32,
    pub to_days: u32,
}

impl CheckWindow {
    pub fn contains(&self, days_ago: i64) -> bool {
        days_ago >= i64::from(self.from_days) && days_ago <= i64::from(self.to_days)
    }
}

impl FromStr for CheckWindow {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            var: "cos.check".to_string(),
            message: format!("{message} (got '{s}')"),
        };

        let (from, to) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected FROM:TO"))?;
        let from_days: u32 = from
            .trim()
            .parse()
            .map_err(|_| invalid("FROM must be a non-negative integer"))?;
        let to_days: u32 = to
            .trim()
            .parse()
            .map_err(|_| invalid("TO must be a non-negative integer"))?;
        if from_days > to_days {
            return Err(invalid("FROM must not exceed TO"));
        }

        Ok(Self { from_days, to_days })
    }
}

impl TryFrom<String> for CheckWindow {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for CheckWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from_days, self.to_days)
    }
}

/// Object storage settings used by the archival collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CosConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub secret_id: String,
    #[serde(default, with = "secret_string")]
    pub secret_key: Option<SecretString>,
    #[serde(default)]
    pub check: Option<CheckWindow>,
}

/// Working directories used by the archival collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirConfig {
    #[serde(default)]
    pub workspace: PathBuf,
    #[serde(default)]
    pub templates: PathBuf,
}

/// Index selection and rule configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndicesConfig {
    #[serde(default)]
    pub prefix_match: PrefixMatch,
    #[serde(default)]
    pub ignores: IgnoreSet,
    #[serde(default)]
    pub rules: RuleTable,
}

impl IndicesConfig {
    pub fn resolver(&self) -> RuleResolver<'_> {
        RuleResolver::new(&self.ignores, &self.rules, self.prefix_match)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Conf {
    pub elasticsearch: ElasticsearchConfig,
    #[serde(default)]
    pub cos: CosConfig,
    #[serde(default)]
    pub dir: DirConfig,
    #[serde(default)]
    pub indices: IndicesConfig,
}

impl Conf {
    /// Shorthand for resolving a single index against the configured rules.
    pub fn find_rule(&self, index: &str) -> Result<Resolution<'_>, InvalidRule> {
        self.indices.resolver().resolve(index)
    }

    /// Check values the YAML schema cannot express.
    ///
    /// Rule strings are only linted here. A malformed rule is logged and left
    /// in the table so that it fails the indices it governs when they are
    /// resolved, while every other prefix keeps working.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elasticsearch.url.trim().is_empty() {
            return Err(ConfigError::MissingEsUrl);
        }
        let parsed = url::Url::parse(&self.elasticsearch.url).map_err(|e| {
            ConfigError::InvalidValue {
                var: "elasticsearch.url".to_string(),
                message: e.to_string(),
            }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                var: "elasticsearch.url".to_string(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        for (prefix, raw) in self.indices.rules.iter() {
            match parse_rule(raw) {
                Ok(rule) if !rule.is_monotonic() => tracing::warn!(
                    prefix,
                    %rule,
                    "rule thresholds are not ascending; transitions will still be applied as configured"
                ),
                Ok(_) => {}
                Err(error) => tracing::warn!(
                    prefix,
                    rule = raw,
                    %error,
                    "malformed rule; indices under this prefix will fail resolution"
                ),
            }
        }

        Ok(())
    }
}
