//! Index settings models.
//!
//! Settings are always exchanged in flat form (`flat_settings=true`), so keys
//! are dotted paths such as `index.routing.allocation.require.disktype`.
//!
//! Updates are expressed as a [`SettingsPatch`]: a map of explicit tri-state
//! [`SettingUpdate`] values. `Clear` is sent as JSON `null`, which removes the
//! setting on the cluster and restores its default.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flat settings of a single index, as returned by `GET /{index}/_settings`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FlatSettings(Map<String, Value>);

impl FlatSettings {
    pub fn new(settings: Map<String, Value>) -> Self {
        Self(settings)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`; absent and non-string values yield `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply a patch the way the cluster does: `Set` overwrites, `Clear` removes.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        for (key, update) in patch.iter() {
            match update {
                SettingUpdate::Unset => {}
                SettingUpdate::Set(value) => {
                    self.0.insert(key.to_string(), value.clone());
                }
                SettingUpdate::Clear => {
                    self.0.remove(key);
                }
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FlatSettings {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Desired change for a single setting.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SettingUpdate {
    /// Leave the setting untouched; the key is not sent.
    #[default]
    Unset,
    /// Assign a value.
    Set(Value),
    /// Remove the setting so the cluster default applies (sent as `null`).
    Clear,
}

/// An ordered set of setting updates for `PUT /{index}/_settings`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    updates: BTreeMap<String, SettingUpdate>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `key`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.updates
            .insert(key.into(), SettingUpdate::Set(value.into()));
        self
    }

    /// Remove `key` on the cluster.
    pub fn clear(mut self, key: impl Into<String>) -> Self {
        self.updates.insert(key.into(), SettingUpdate::Clear);
        self
    }

    /// The update recorded for `key`, `Unset` when none.
    pub fn get(&self, key: &str) -> &SettingUpdate {
        self.updates.get(key).unwrap_or(&SettingUpdate::Unset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingUpdate)> {
        self.updates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when serializing would send no keys.
    pub fn is_empty(&self) -> bool {
        self.updates
            .values()
            .all(|update| matches!(update, SettingUpdate::Unset))
    }
}

impl Serialize for SettingsPatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, update) in &self.updates {
            match update {
                SettingUpdate::Unset => {}
                SettingUpdate::Set(value) => map.serialize_entry(key, value)?,
                SettingUpdate::Clear => map.serialize_entry(key, &Value::Null)?,
            }
        }
        map.end()
    }
}
