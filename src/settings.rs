//! Configuration snapshots from the host's settings cascade.
//!
//! The host merges its user/org/global settings layers into one flat
//! key/value document and emits a full [`ConfigurationSnapshot`] on every
//! change, plus one initial emission representing "no configuration
//! observed yet" before the first real value arrives. prism only ever
//! reads snapshots; mutation stays with the host's settings store.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

/// Settings key prefix for creation-flow insights.
///
/// Every key `codeStatsInsights.insight.<name>` holds one insight
/// definition object, or `null`/`false` once the insight is removed.
pub const INSIGHT_KEY_PREFIX: &str = "codeStatsInsights.insight.";

/// Settings key for the single-insight legacy shape: a full query string.
pub const LEGACY_QUERY_KEY: &str = "codeStatsInsights.query";

/// Settings key for the legacy shape's "Other" bucket threshold.
pub const LEGACY_THRESHOLD_KEY: &str = "codeStatsInsights.otherThreshold";

/// One immutable view of the fully merged settings cascade.
///
/// Backed by a shared sorted map, so clones are cheap and iteration order
/// (and therefore insight resolution order) is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationSnapshot {
    entries: Arc<BTreeMap<String, Value>>,
}

impl ConfigurationSnapshot {
    /// The "no configuration observed yet" snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from a merged settings document.
    ///
    /// The cascade is a key/value map by contract; any non-object document
    /// resolves to the empty snapshot rather than an error.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => Self::empty(),
        }
    }

    /// Look up a raw settings value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a string-valued setting.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Look up a numeric setting.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Number of settings keys in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the snapshot holds no settings at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for ConfigurationSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}
