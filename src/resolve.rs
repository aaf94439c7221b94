//! Insight resolution from configuration snapshots.
//!
//! Resolution is a pure function from one snapshot to an ordered list of
//! `(id, Option<InsightDefinition>)` pairs. A `None` definition is a
//! tombstone: the insight existed under that id and must be torn down.
//! Resolution never fails; malformed values resolve to tombstones.
//!
//! Two shapes are merged:
//! 1. Creation-flow insights, one per `codeStatsInsights.insight.<name>`
//!    key holding a definition object (or `null`/`false` once removed).
//! 2. The single-insight legacy shape, a bare query string under
//!    `codeStatsInsights.query`, synthesized under a reserved id so it can
//!    never collide with a creation-flow insight.

use serde::Deserialize;
use serde_json::Value;

use crate::settings::{
    ConfigurationSnapshot, INSIGHT_KEY_PREFIX, LEGACY_QUERY_KEY, LEGACY_THRESHOLD_KEY,
};

/// Share below which a language folds into the "Other" slice, unless the
/// definition overrides it.
pub const DEFAULT_OTHER_THRESHOLD: f64 = 0.03;

/// Reserved id for the insight synthesized from the legacy shape.
pub const LEGACY_INSIGHT_ID: &str = "codeStatsInsight.language";

/// Title of the insight synthesized from the legacy shape.
pub const LEGACY_INSIGHT_TITLE: &str = "Language usage";

/// One configured code-stats insight.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightDefinition {
    /// Chart title shown by the host.
    pub title: String,
    /// Repository whose language statistics to chart.
    #[serde(default)]
    pub repository: Option<String>,
    /// Share below which a language folds into "Other".
    #[serde(default)]
    pub other_threshold: Option<f64>,
    /// Full query string from the legacy shape. Kept so insights created
    /// before the repository field existed keep working.
    #[serde(default, rename = "query")]
    pub legacy_query: Option<String>,
}

impl InsightDefinition {
    /// The definition's threshold, or [`DEFAULT_OTHER_THRESHOLD`].
    pub fn effective_threshold(&self) -> f64 {
        self.other_threshold.unwrap_or(DEFAULT_OTHER_THRESHOLD)
    }
}

/// One resolution pass: `(id, definition)` pairs in resolution order, with
/// `None` marking a removed insight. Equality is order- and
/// value-sensitive, so comparing passes detects any effective change.
pub type Resolution = Vec<(String, Option<InsightDefinition>)>;

/// Derive the current insight set from one configuration snapshot.
pub fn resolve(snapshot: &ConfigurationSnapshot) -> Resolution {
    let mut resolution = Resolution::new();

    for (key, value) in snapshot.iter() {
        if !key.starts_with(INSIGHT_KEY_PREFIX) {
            continue;
        }
        let definition = match value {
            Value::Null | Value::Bool(false) => None,
            other => match serde_json::from_value::<InsightDefinition>(other.clone()) {
                Ok(definition) => Some(definition),
                Err(error) => {
                    tracing::warn!("ignoring malformed insight definition {}: {}", key, error);
                    None
                }
            },
        };
        resolution.push((key.clone(), definition));
    }

    // The legacy entry is always emitted, as a tombstone when the key is
    // gone, so removing the setting tears the old insight down.
    let legacy = snapshot
        .string(LEGACY_QUERY_KEY)
        .filter(|query| !query.is_empty())
        .map(|query| InsightDefinition {
            title: LEGACY_INSIGHT_TITLE.to_string(),
            repository: None,
            other_threshold: snapshot.number(LEGACY_THRESHOLD_KEY),
            legacy_query: Some(query.to_string()),
        });
    resolution.push((LEGACY_INSIGHT_ID.to_string(), legacy));

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: Value) -> ConfigurationSnapshot {
        ConfigurationSnapshot::from_value(value)
    }

    #[test]
    fn test_empty_snapshot_resolves_to_legacy_tombstone() {
        let resolution = resolve(&ConfigurationSnapshot::empty());
        assert_eq!(resolution, vec![(LEGACY_INSIGHT_ID.to_string(), None)]);
    }

    #[test]
    fn test_creation_flow_insight_resolves() {
        let resolution = resolve(&snapshot(json!({
            "codeStatsInsights.insight.acmeLanguageUsage": {
                "title": "Acme Language Usage",
                "repository": "github.com/acme/api",
                "otherThreshold": 0.05,
            }
        })));

        assert_eq!(resolution.len(), 2);
        let (id, definition) = &resolution[0];
        assert_eq!(id, "codeStatsInsights.insight.acmeLanguageUsage");
        let definition = definition.as_ref().unwrap();
        assert_eq!(definition.title, "Acme Language Usage");
        assert_eq!(definition.repository.as_deref(), Some("github.com/acme/api"));
        assert_eq!(definition.other_threshold, Some(0.05));
        assert_eq!(definition.legacy_query, None);
    }

    #[test]
    fn test_null_and_false_values_are_tombstones() {
        let resolution = resolve(&snapshot(json!({
            "codeStatsInsights.insight.removed": null,
            "codeStatsInsights.insight.disabled": false,
        })));

        assert_eq!(
            resolution,
            vec![
                ("codeStatsInsights.insight.disabled".to_string(), None),
                ("codeStatsInsights.insight.removed".to_string(), None),
                (LEGACY_INSIGHT_ID.to_string(), None),
            ]
        );
    }

    #[test]
    fn test_malformed_object_is_a_tombstone() {
        // title is required; resolution must not fail on its absence
        let resolution = resolve(&snapshot(json!({
            "codeStatsInsights.insight.broken": { "repository": 7 },
        })));

        assert_eq!(resolution[0], ("codeStatsInsights.insight.broken".to_string(), None));
    }

    #[test]
    fn test_unrelated_keys_are_ignored() {
        let resolution = resolve(&snapshot(json!({
            "theme": "dark",
            "codeStatsInsightsSomethingElse": { "title": "nope" },
        })));

        assert_eq!(resolution, vec![(LEGACY_INSIGHT_ID.to_string(), None)]);
    }

    #[test]
    fn test_legacy_shape_synthesizes_reserved_insight() {
        let resolution = resolve(&snapshot(json!({
            "codeStatsInsights.query": "repo:^github\\.com/acme/api$",
            "codeStatsInsights.otherThreshold": 0.01,
        })));

        assert_eq!(resolution.len(), 1);
        let (id, definition) = &resolution[0];
        assert_eq!(id, LEGACY_INSIGHT_ID);
        let definition = definition.as_ref().unwrap();
        assert_eq!(definition.title, LEGACY_INSIGHT_TITLE);
        assert_eq!(
            definition.legacy_query.as_deref(),
            Some("repo:^github\\.com/acme/api$")
        );
        assert_eq!(definition.other_threshold, Some(0.01));
        assert_eq!(definition.repository, None);
    }

    #[test]
    fn test_empty_legacy_query_is_a_tombstone() {
        let resolution = resolve(&snapshot(json!({
            "codeStatsInsights.query": "",
        })));

        assert_eq!(resolution, vec![(LEGACY_INSIGHT_ID.to_string(), None)]);
    }

    #[test]
    fn test_legacy_threshold_of_wrong_type_falls_back_to_default() {
        let resolution = resolve(&snapshot(json!({
            "codeStatsInsights.query": "repo:^x$",
            "codeStatsInsights.otherThreshold": "0.01",
        })));

        let definition = resolution[0].1.as_ref().unwrap();
        assert_eq!(definition.other_threshold, None);
        assert!((definition.effective_threshold() - DEFAULT_OTHER_THRESHOLD).abs() < f64::EPSILON);
    }

    #[test]
    fn test_both_shapes_resolve_together() {
        let resolution = resolve(&snapshot(json!({
            "codeStatsInsights.insight.acme": { "title": "Acme", "repository": "github.com/acme/api" },
            "codeStatsInsights.query": "repo:^github\\.com/acme/legacy$",
        })));

        let ids: Vec<&str> = resolution.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["codeStatsInsights.insight.acme", LEGACY_INSIGHT_ID]
        );
        assert!(resolution.iter().all(|(_, definition)| definition.is_some()));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let snapshot = snapshot(json!({
            "codeStatsInsights.insight.a": { "title": "A", "repository": "github.com/acme/a" },
            "codeStatsInsights.insight.b": null,
            "codeStatsInsights.query": "repo:^x$",
        }));

        assert_eq!(resolve(&snapshot), resolve(&snapshot));
    }

    #[test]
    fn test_effective_threshold_default() {
        let definition: InsightDefinition =
            serde_json::from_value(json!({ "title": "T" })).unwrap();
        assert!((definition.effective_threshold() - 0.03).abs() < f64::EPSILON);

        let overridden: InsightDefinition =
            serde_json::from_value(json!({ "title": "T", "otherThreshold": 0.1 })).unwrap();
        assert!((overridden.effective_threshold() - 0.1).abs() < f64::EPSILON);
    }
}
