//! Transition policy: which lifecycle transitions are due for an index.

use serde::Serialize;
use std::fmt;

use esmaint_config::Rule;

/// A lifecycle transition, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    /// Force-merge and recompress.
    Warm,
    /// Archive segments to object storage.
    Move,
    /// Relocate shards to hdd nodes.
    Cold,
    /// Drop the index.
    Delete,
}

impl Transition {
    pub const ALL: [Transition; 4] = [Self::Warm, Self::Move, Self::Cold, Self::Delete];

    /// The threshold governing this transition in `rule`.
    pub fn threshold(self, rule: &Rule) -> i64 {
        match self {
            Self::Warm => rule.warm,
            Self::Move => rule.r#move,
            Self::Cold => rule.cold,
            Self::Delete => rule.delete,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Move => "move",
            Self::Cold => "cold",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transitions due for an index of `age_days` under `rule`.
///
/// A transition is due when its threshold is non-zero and the index is at
/// least that old. A due delete supersedes everything else; otherwise the
/// due transitions come back in ascending severity.
pub fn due_transitions(rule: &Rule, age_days: i64) -> Vec<Transition> {
    let is_due = |transition: Transition| {
        let threshold = transition.threshold(rule);
        threshold != 0 && age_days >= threshold
    };

    if is_due(Transition::Delete) {
        return vec![Transition::Delete];
    }
    Transition::ALL
        .into_iter()
        .filter(|transition| is_due(*transition))
        .collect()
}
