//! Index maintenance rules and prefix-based rule resolution.
//!
//! Responsibilities:
//! - Parse serialized rules (`warm,move,cold,delete`, `-` for "not applicable").
//! - Hold the ordered prefix -> rule table and the ignore list from configuration.
//! - Resolve which rule governs a given index name.
//!
//! Does NOT handle:
//! - Extracting dates from index names or computing ages (see `esmaint-lifecycle`).
//! - Deciding which transitions are due for a given age.
//!
//! Invariants:
//! - Names starting with `.` are always ignored, regardless of the rule table.
//! - Rule strings are parsed lazily at resolution time; a malformed rule only fails
//!   the indices it governs.
//! - A name with no matching prefix resolves to the all-zero rule, not an error.

use std::fmt;
use std::num::ParseIntError;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Placeholder token for a transition that does not apply.
pub const NOT_APPLICABLE: &str = "-";

/// Number of comma-separated fields in a serialized rule.
const RULE_FIELDS: usize = 4;

/// Age thresholds, in days since the date embedded in an index name.
///
/// A threshold of zero means the transition does not apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rule {
    pub warm: i64,
    pub r#move: i64,
    pub cold: i64,
    pub delete: i64,
}

impl Rule {
    /// True if every threshold is zero (no policy configured).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True if the non-zero thresholds are in ascending order.
    ///
    /// Parsing never enforces this; it is only reported by configuration checks.
    pub fn is_monotonic(&self) -> bool {
        let active: Vec<i64> = [self.warm, self.r#move, self.cold, self.delete]
            .into_iter()
            .filter(|days| *days != 0)
            .collect();
        active.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |days: i64| {
            if days == 0 {
                NOT_APPLICABLE.to_string()
            } else {
                days.to_string()
            }
        };
        write!(
            f,
            "{},{},{},{}",
            field(self.warm),
            field(self.r#move),
            field(self.cold),
            field(self.delete)
        )
    }
}

/// Errors produced while parsing a serialized rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleFormatError {
    #[error("expected 4 comma-separated fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("invalid field '{field}': {source}")]
    InvalidField {
        field: String,
        #[source]
        source: ParseIntError,
    },
}

/// A rule-table entry whose rule string could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid rule for prefix '{prefix}': {source}")]
pub struct InvalidRule {
    pub prefix: String,
    #[source]
    pub source: RuleFormatError,
}

/// Parse a serialized rule such as `"5, 8, -, 10"`.
pub fn parse_rule(s: &str) -> Result<Rule, RuleFormatError> {
    let fields: Vec<&str> = s.split(',').collect();
    if fields.len() != RULE_FIELDS {
        return Err(RuleFormatError::WrongFieldCount {
            found: fields.len(),
        });
    }

    let mut days = [0i64; RULE_FIELDS];
    for (slot, raw) in days.iter_mut().zip(&fields) {
        let field = raw.trim();
        if field == NOT_APPLICABLE {
            continue;
        }
        *slot = field
            .parse::<i64>()
            .map_err(|source| RuleFormatError::InvalidField {
                field: field.to_string(),
                source,
            })?;
    }

    let [warm, r#move, cold, delete] = days;
    Ok(Rule {
        warm,
        r#move,
        cold,
        delete,
    })
}

/// Ordered mapping from index-name prefix to serialized rule.
///
/// Entries keep the order in which they appear in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    entries: Vec<(String, String)>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the rule for `prefix`. Replacing keeps the original position.
    pub fn insert(&mut self, prefix: impl Into<String>, rule: impl Into<String>) {
        let prefix = prefix.into();
        let rule = rule.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = rule,
            None => self.entries.push((prefix, rule)),
        }
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, r)| r.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, r)| (p.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse every rule, failing on the first malformed entry.
    pub fn parse_all(&self) -> Result<Vec<(&str, Rule)>, InvalidRule> {
        self.iter()
            .map(|(prefix, raw)| {
                parse_rule(raw)
                    .map(|rule| (prefix, rule))
                    .map_err(|source| InvalidRule {
                        prefix: prefix.to_string(),
                        source,
                    })
            })
            .collect()
    }
}

impl<P: Into<String>, R: Into<String>> FromIterator<(P, R)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (P, R)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (prefix, rule) in iter {
            table.insert(prefix, rule);
        }
        table
    }
}

impl<'de> Deserialize<'de> for RuleTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuleTableVisitor;

        impl<'de> Visitor<'de> for RuleTableVisitor {
            type Value = RuleTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of index prefix to rule string")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(RuleTable::new())
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = RuleTable::new();
                while let Some((prefix, rule)) = map.next_entry::<String, String>()? {
                    if table.get(&prefix).is_some() {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate rule prefix '{prefix}'"
                        )));
                    }
                    table.insert(prefix, rule);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_any(RuleTableVisitor)
    }
}

/// Substrings that exclude an index from every lifecycle action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct IgnoreSet(Vec<String>);

impl IgnoreSet {
    pub fn new(patterns: Vec<String>) -> Self {
        Self(patterns)
    }

    /// The first pattern contained in `index`, if any.
    pub fn matching(&self, index: &str) -> Option<&str> {
        self.0
            .iter()
            .map(String::as_str)
            .find(|pattern| index.contains(pattern))
    }

    pub fn patterns(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// How a prefix is chosen when several rule-table keys match an index name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixMatch {
    /// The longest matching prefix wins; equal lengths keep the first-inserted key.
    #[default]
    Longest,
    /// Keys are tried in reverse lexicographic order and the first match wins.
    ReverseLexicographic,
}

/// Why an index was excluded from maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason<'a> {
    /// Internal index (name starts with `.`).
    SystemIndex,
    /// Name contains the given ignore pattern.
    Matched(&'a str),
}

impl fmt::Display for IgnoreReason<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemIndex => write!(f, "system index"),
            Self::Matched(pattern) => write!(f, "matches ignore pattern '{pattern}'"),
        }
    }
}

/// Outcome of resolving an index name against the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Ignored(IgnoreReason<'a>),
    /// `prefix` is `None` when no key matched; the rule is then all zeros.
    Governed {
        prefix: Option<&'a str>,
        rule: Rule,
    },
}

impl Resolution<'_> {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }

    pub fn rule(&self) -> Option<Rule> {
        match self {
            Self::Ignored(_) => None,
            Self::Governed { rule, .. } => Some(*rule),
        }
    }
}

/// Maps index names to the rule that governs them.
#[derive(Debug, Clone, Copy)]
pub struct RuleResolver<'a> {
    ignores: &'a IgnoreSet,
    rules: &'a RuleTable,
    strategy: PrefixMatch,
}

impl<'a> RuleResolver<'a> {
    pub fn new(ignores: &'a IgnoreSet, rules: &'a RuleTable, strategy: PrefixMatch) -> Self {
        Self {
            ignores,
            rules,
            strategy,
        }
    }

    pub fn resolve(&self, index: &str) -> Result<Resolution<'a>, InvalidRule> {
        if index.starts_with('.') {
            return Ok(Resolution::Ignored(IgnoreReason::SystemIndex));
        }
        if let Some(pattern) = self.ignores.matching(index) {
            return Ok(Resolution::Ignored(IgnoreReason::Matched(pattern)));
        }

        let Some((prefix, raw)) = self.matching_prefix(index) else {
            return Ok(Resolution::Governed {
                prefix: None,
                rule: Rule::default(),
            });
        };

        let rule = parse_rule(raw).map_err(|source| InvalidRule {
            prefix: prefix.to_string(),
            source,
        })?;
        Ok(Resolution::Governed {
            prefix: Some(prefix),
            rule,
        })
    }

    fn matching_prefix(&self, index: &str) -> Option<(&'a str, &'a str)> {
        let candidates = self.rules.iter().filter(|(prefix, _)| index.starts_with(prefix));
        match self.strategy {
            PrefixMatch::Longest => candidates.fold(None, |best, candidate| match best {
                Some((prefix, _)) if prefix.len() >= candidate.0.len() => best,
                _ => Some(candidate),
            }),
            PrefixMatch::ReverseLexicographic => candidates.max_by(|a, b| a.0.cmp(b.0)),
        }
    }
}
