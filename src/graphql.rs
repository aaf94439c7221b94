//! Remote query client for language statistics.
//!
//! The host supplies the transport as a [`QueryChannel`]; this module owns
//! the query document, response error handling, and the typed payload
//! decode. Retry policy lives with the caller (see the view module).

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::chart::LanguageStat;
use crate::error::{PrismError, Result};

/// The query document fetching per-language line counts for one search
/// query, along with the result-limit flag.
pub const LANGUAGE_STATS_QUERY: &str = "\
query SearchResultsStats($query: String!) {
    search(query: $query) {
        results {
            limitHit
        }
        stats {
            languages {
                name
                totalLines
            }
        }
    }
}";

/// Host-provided channel executing remote queries.
///
/// Implementations perform the network call and return the raw response
/// envelope. Transport and timeout failures must surface as
/// [`PrismError::Fetch`] so callers can classify them as transient.
#[async_trait]
pub trait QueryChannel: Send + Sync {
    /// Execute one query document with the given variables.
    async fn run(&self, query: &str, variables: Value) -> Result<GraphQlResponse>;
}

/// Blanket implementation for Arc-wrapped channels, so one channel can be
/// shared across every registered insight.
#[async_trait]
impl<T: QueryChannel + ?Sized> QueryChannel for Arc<T> {
    async fn run(&self, query: &str, variables: Value) -> Result<GraphQlResponse> {
        (**self).run(query, variables).await
    }
}

/// Raw response envelope from the query endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQlResponse {
    /// The typed payload, absent when the query failed outright.
    pub data: Option<Value>,
    /// Error list; any non-empty list fails the whole request.
    pub errors: Option<Vec<GraphQlError>>,
}

/// One error reported by the query endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    /// Human-readable error message.
    pub message: String,
}

/// Execute a query and decode its payload.
///
/// A response carrying a non-empty error list fails with
/// [`PrismError::RemoteQuery`] whose message joins every reported message
/// with newlines. No retries happen at this layer.
pub async fn execute<T, C>(channel: &C, query: &str, variables: Value) -> Result<T>
where
    T: DeserializeOwned,
    C: QueryChannel + ?Sized,
{
    let response = channel.run(query, variables).await?;

    if let Some(errors) = &response.errors {
        if !errors.is_empty() {
            let message = errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(PrismError::remote_query(message));
        }
    }

    let data = response
        .data
        .ok_or_else(|| PrismError::decode("response carried no data payload"))?;
    serde_json::from_value(data).map_err(|error| PrismError::decode(error.to_string()))
}

/// Payload of [`LANGUAGE_STATS_QUERY`].
#[derive(Debug, Clone, Deserialize)]
pub struct SearchStatsData {
    /// The search result, absent when the query matched nothing at all.
    pub search: Option<Search>,
}

/// The search block of the stats payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Search {
    /// Result metadata.
    pub results: ResultsInfo,
    /// Aggregated statistics over the results.
    pub stats: SearchStats,
}

/// Result metadata for one stats query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsInfo {
    /// True when the search hit its result limit, meaning the stats cover
    /// a truncated result set.
    pub limit_hit: bool,
}

/// Aggregated per-language statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchStats {
    /// One entry per language found in the results.
    pub languages: Vec<LanguageStat>,
}

/// Fetch the per-language statistics for one search query.
pub async fn fetch_language_stats<C>(channel: &C, query: &str) -> Result<SearchStats>
where
    C: QueryChannel + ?Sized,
{
    let data: SearchStatsData = execute(
        channel,
        LANGUAGE_STATS_QUERY,
        serde_json::json!({ "query": query }),
    )
    .await?;

    let search = data
        .search
        .ok_or_else(|| PrismError::decode("search payload missing from stats response"))?;
    Ok(search.stats)
}

/// Scripted query channel for tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Pops one canned outcome per call; calls beyond the script fail with
    /// a fetch error so runaway retries show up in tests.
    pub struct MockChannel {
        script: Mutex<VecDeque<Result<GraphQlResponse>>>,
        calls: AtomicUsize,
    }

    impl MockChannel {
        pub fn new() -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
            }
        }

        /// Queue one outcome.
        pub fn push(&self, outcome: Result<GraphQlResponse>) {
            self.script.lock().unwrap().push_back(outcome);
        }

        /// Number of calls made so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// A well-formed stats response over the given languages.
        pub fn stats_response(languages: &[(&str, u64)]) -> GraphQlResponse {
            let languages: Vec<Value> = languages
                .iter()
                .map(|(name, lines)| serde_json::json!({ "name": name, "totalLines": lines }))
                .collect();
            GraphQlResponse {
                data: Some(serde_json::json!({
                    "search": {
                        "results": { "limitHit": false },
                        "stats": { "languages": languages },
                    }
                })),
                errors: None,
            }
        }
    }

    #[async_trait]
    impl QueryChannel for MockChannel {
        async fn run(&self, _query: &str, _variables: Value) -> Result<GraphQlResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PrismError::fetch("mock script exhausted")))
        }
    }
}
