//! Chart payloads and the stat bucketing algorithm.
//!
//! [`aggregate`] turns the raw per-language line counts for one query into
//! a colored, linked pie-chart data series: languages below the "Other"
//! threshold fold into one synthesized slice, every slice is colored from
//! the static language table, and every slice deep-links back to the full
//! stats page for the query that produced it.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::languages;

/// Name of the synthesized slice aggregating below-threshold languages.
pub const OTHER_SLICE_NAME: &str = "Other";

/// Raw line-count statistics for one language, as reported by the stats
/// endpoint. Names are unique within one response; order is not meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStat {
    /// Language name, e.g. "Go" or "TypeScript".
    pub name: String,
    /// Total lines written in this language across the query's results.
    pub total_lines: u64,
}

impl LanguageStat {
    /// Create a new language stat.
    pub fn new(name: impl Into<String>, total_lines: u64) -> Self {
        Self {
            name: name.into(),
            total_lines,
        }
    }
}

/// One rendered pie slice: a language (or the "Other" bucket) with its
/// display color and a deep link to the full stats page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeriesEntry {
    /// Slice label.
    pub name: String,
    /// Slice magnitude.
    pub total_lines: u64,
    /// Display color, from the language table or the gray fallback.
    pub fill_color: String,
    /// Deep link to the stats page for the query behind this chart.
    #[serde(rename = "linkURL")]
    pub link_url: String,
}

/// The declarative view returned to the host for one render request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    /// View title, from the insight definition.
    pub title: String,
    /// Chart blocks; currently always a single pie block.
    pub content: Vec<ChartContent>,
}

/// One chart block inside a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "lowercase")]
pub enum ChartContent {
    /// A pie chart block holding one or more pies.
    Pie {
        /// The pies to render.
        pies: Vec<PieChart>,
    },
}

/// One pie: its data series plus the field names the host reads the
/// series entries by.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChart {
    /// The data series, one entry per slice.
    pub data: Vec<ChartSeriesEntry>,
    /// Field carrying the slice magnitude.
    pub data_key: &'static str,
    /// Field carrying the slice label.
    pub name_key: &'static str,
    /// Field carrying the slice color.
    pub fill_key: &'static str,
    /// Field carrying the slice deep link.
    #[serde(rename = "linkURLKey")]
    pub link_url_key: &'static str,
}

impl PieChart {
    /// Build a language-usage pie over the given series.
    pub fn language_usage(data: Vec<ChartSeriesEntry>) -> Self {
        Self {
            data,
            data_key: "totalLines",
            name_key: "name",
            fill_key: "fillColor",
            link_url_key: "linkURL",
        }
    }
}

/// Build the deep-link URL for the stats page of one query.
///
/// The link is the host's `/stats` path with the effective query carried
/// in the `q` parameter.
pub fn stats_url(base: &Url, query: &str) -> Url {
    let mut link = base.clone();
    link.set_path("/stats");
    link.set_fragment(None);
    link.query_pairs_mut().clear().append_pair("q", query);
    link
}

/// Bucket raw language stats into a pie-chart data series.
///
/// Languages whose share of the total line count is at least
/// `other_threshold` keep their own slice, in input order; the rest fold
/// into a synthesized [`OTHER_SLICE_NAME`] slice, appended last even when
/// empty. With a zero total every share is treated as below threshold, so
/// all languages fold into "Other".
///
/// The returned series is never empty and its line counts always sum to
/// the input's total.
pub fn aggregate(
    stats: &[LanguageStat],
    other_threshold: f64,
    query: &str,
    base_stats_url: &Url,
) -> Vec<ChartSeriesEntry> {
    let total: u64 = stats.iter().map(|language| language.total_lines).sum();
    let link_url = stats_url(base_stats_url, query).to_string();

    let mut kept = Vec::with_capacity(stats.len() + 1);
    let mut folded_lines: u64 = 0;
    for language in stats {
        // A zero total makes the share NaN, which compares below any
        // threshold and routes the language into "Other".
        let share = language.total_lines as f64 / total as f64;
        if share >= other_threshold {
            kept.push(language.clone());
        } else {
            folded_lines += language.total_lines;
        }
    }
    kept.push(LanguageStat::new(OTHER_SLICE_NAME, folded_lines));

    kept.into_iter()
        .map(|language| ChartSeriesEntry {
            fill_color: languages::color_or_fallback(&language.name).to_string(),
            link_url: link_url.clone(),
            name: language.name,
            total_lines: language.total_lines,
        })
        .collect()
}
