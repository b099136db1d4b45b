//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Render command results as tab-separated tables or JSON.
//!
//! Does NOT handle:
//! - Printing (returns formatted strings).
//! - Logging, which always goes to stderr via `tracing`.
//!
//! Invariants:
//! - JSON output is a single valid document, even when empty.
//! - Tables print a human message instead of an empty body.

use anyhow::Result;
use serde::Serialize;

use esmaint_config::{Conf, PrefixMatch, Resolution};
use esmaint_lifecycle::{IndexOutcome, PassReport};

/// Value shown for absent fields in tables.
const MISSING: &str = "-";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!("Invalid output format: {}. Valid options: table, json", s),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RuleEntry {
    pub prefix: String,
    pub rule: String,
    pub monotonic: bool,
}

/// What `check-config` reports.
#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub elasticsearch_url: String,
    pub prefix_match: &'static str,
    pub ignores: Vec<String>,
    pub rules: Vec<RuleEntry>,
}

impl ConfigSummary {
    /// Summarize a validated configuration.
    pub fn from_conf(conf: &Conf) -> Result<Self> {
        let rules = conf
            .indices
            .rules
            .parse_all()?
            .into_iter()
            .map(|(prefix, rule)| RuleEntry {
                prefix: prefix.to_string(),
                rule: rule.to_string(),
                monotonic: rule.is_monotonic(),
            })
            .collect();
        Ok(Self {
            elasticsearch_url: conf.elasticsearch.url.clone(),
            prefix_match: match conf.indices.prefix_match {
                PrefixMatch::Longest => "longest",
                PrefixMatch::ReverseLexicographic => "reverse_lexicographic",
            },
            ignores: conf.indices.ignores.patterns().to_vec(),
            rules,
        })
    }
}

/// One row of `resolve` output.
#[derive(Debug, Serialize)]
pub struct ResolutionRow {
    pub index: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ResolutionRow {
    pub fn from_resolution(index: &str, resolution: &Resolution<'_>) -> Self {
        match resolution {
            Resolution::Ignored(reason) => Self {
                index: index.to_string(),
                status: "ignored",
                prefix: None,
                rule: None,
                detail: Some(reason.to_string()),
            },
            Resolution::Governed { prefix, rule } => Self {
                index: index.to_string(),
                status: "governed",
                prefix: prefix.map(str::to_string),
                rule: Some(rule.to_string()),
                detail: prefix.is_none().then(|| "no matching rule".to_string()),
            },
        }
    }

    pub fn from_error(index: &str, error: &dyn std::fmt::Display) -> Self {
        Self {
            index: index.to_string(),
            status: "invalid",
            prefix: None,
            rule: None,
            detail: Some(error.to_string()),
        }
    }
}

pub fn format_config(summary: &ConfigSummary, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(summary);
    }

    let mut out = String::new();
    out.push_str(&format!("Elasticsearch: {}\n", summary.elasticsearch_url));
    out.push_str(&format!("Prefix match: {}\n", summary.prefix_match));
    if summary.ignores.is_empty() {
        out.push_str("Ignores: (none)\n");
    } else {
        out.push_str(&format!("Ignores: {}\n", summary.ignores.join(", ")));
    }
    if summary.rules.is_empty() {
        out.push_str("No rules configured.\n");
        return Ok(out);
    }
    out.push_str("\nPrefix\tWarm,Move,Cold,Delete\n");
    for entry in &summary.rules {
        let flag = if entry.monotonic { "" } else { "\t(not ascending)" };
        out.push_str(&format!("{}\t{}{}\n", entry.prefix, entry.rule, flag));
    }
    Ok(out)
}

pub fn format_resolutions(rows: &[ResolutionRow], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(rows);
    }

    let mut out = String::from("Index\tStatus\tPrefix\tRule\tDetail\n");
    for row in rows {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            row.index,
            row.status,
            row.prefix.as_deref().unwrap_or(MISSING),
            row.rule.as_deref().unwrap_or(MISSING),
            row.detail.as_deref().unwrap_or(""),
        ));
    }
    Ok(out)
}

pub fn format_report(report: &PassReport, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(report);
    }

    if report.indices.is_empty() {
        return Ok("No indices found.\n".to_string());
    }

    let mut out = String::from("Index\tOutcome\tAge\tTransitions\tDetail\n");
    for entry in &report.indices {
        let (outcome, age, transitions, detail) = match &entry.outcome {
            IndexOutcome::Skipped { reason } => {
                ("skipped", MISSING.to_string(), MISSING.to_string(), reason.to_string())
            }
            IndexOutcome::Planned { plan } => (
                "planned",
                plan.age_days.to_string(),
                join(&plan.transitions),
                plan.prefix
                    .as_deref()
                    .map(|p| format!("rule {p}: {}", plan.rule))
                    .unwrap_or_default(),
            ),
            IndexOutcome::Applied { plan, notes } => (
                "applied",
                plan.age_days.to_string(),
                join(&plan.transitions),
                notes.join("; "),
            ),
            IndexOutcome::Failed { error } => {
                ("failed", MISSING.to_string(), MISSING.to_string(), error.clone())
            }
        };
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            entry.index, outcome, age, transitions, detail
        ));
    }

    let (skipped, planned, applied, failed) = report.counts();
    out.push_str(&format!(
        "\n{skipped} skipped, {planned} planned, {applied} applied, {failed} failed\n"
    ));
    Ok(out)
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return MISSING.to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
