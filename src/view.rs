//! View content for registered insights.
//!
//! The host calls [`ViewProvider::provide_view`] on demand, once per render
//! request. Each request resolves the effective query, fetches the language
//! statistics (retrying transient failures), buckets them, and returns one
//! declarative [`ChartView`]. Failures surface to the host whole; no
//! partial chart is ever produced.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::chart::{aggregate, ChartContent, ChartView, PieChart};
use crate::error::{PrismError, Result};
use crate::graphql::{fetch_language_stats, QueryChannel, SearchStats};
use crate::resolve::InsightDefinition;

/// Total fetch attempts per render request. Search timeouts are expected
/// to hit a warm cache on retry, so retries fire immediately.
pub const MAX_FETCH_ATTEMPTS: u32 = 4;

/// Where the host is rendering a view.
#[derive(Debug, Clone, Default)]
pub struct RenderingContext {
    /// The directory the user is currently looking at, when rendering
    /// inside a directory view.
    pub viewer: Option<DirectoryViewer>,
}

impl RenderingContext {
    /// Context for the global insights page: no current location.
    pub fn global() -> Self {
        Self { viewer: None }
    }

    /// Context for a directory view at the given URI.
    pub fn directory(uri: Url) -> Self {
        Self {
            viewer: Some(DirectoryViewer { uri }),
        }
    }
}

/// The directory a render request is scoped to.
#[derive(Debug, Clone)]
pub struct DirectoryViewer {
    /// Directory URI, e.g. `git://github.com/acme/api`.
    pub uri: Url,
}

/// Extract the repository identifier from a directory URI: the URI's host
/// followed by its path, e.g. `github.com/acme/api`.
pub fn repo_from_uri(uri: &Url) -> String {
    format!("{}{}", uri.host_str().unwrap_or(""), uri.path())
}

/// Provides the content for one registered view on demand.
#[async_trait]
pub trait ViewProvider: Send + Sync {
    /// Produce the chart view for one render request.
    async fn provide_view(&self, context: RenderingContext) -> Result<ChartView>;
}

/// The view provider bound to one resolved insight definition.
///
/// One instance serves both rendering contexts of its definition; it holds
/// no mutable state, so concurrent render requests are independent.
pub struct InsightViewProvider {
    id: String,
    definition: InsightDefinition,
    channel: Arc<dyn QueryChannel>,
    base_url: Url,
}

impl InsightViewProvider {
    /// Bind a provider to one insight definition.
    pub fn new(
        id: impl Into<String>,
        definition: InsightDefinition,
        channel: Arc<dyn QueryChannel>,
        base_url: Url,
    ) -> Self {
        Self {
            id: id.into(),
            definition,
            channel,
            base_url,
        }
    }

    /// Resolve the query to run for one render request.
    ///
    /// The current location wins over anything configured: a directory view
    /// charts the repository being looked at. Otherwise a legacy query is
    /// used verbatim, and failing that the configured repository becomes an
    /// exact-match filter.
    fn effective_query(&self, context: &RenderingContext) -> Result<String> {
        if let Some(viewer) = &context.viewer {
            let repo = repo_from_uri(&viewer.uri);
            return Ok(format!("repo:^{}$", regex::escape(&repo)));
        }
        if let Some(query) = &self.definition.legacy_query {
            return Ok(query.clone());
        }
        if let Some(repository) = &self.definition.repository {
            return Ok(format!("repo:^{}", regex::escape(repository)));
        }
        Err(PrismError::malformed_definition(&self.id))
    }

    /// Fetch stats, retrying transient failures up to
    /// [`MAX_FETCH_ATTEMPTS`] total attempts.
    async fn fetch_with_retry(&self, query: &str) -> Result<SearchStats> {
        let mut attempt = 1;
        loop {
            match fetch_language_stats(self.channel.as_ref(), query).await {
                Ok(stats) => return Ok(stats),
                Err(error) if error.is_transient() && attempt < MAX_FETCH_ATTEMPTS => {
                    tracing::warn!(
                        "stats fetch for insight {} failed (attempt {}/{}): {}",
                        self.id,
                        attempt,
                        MAX_FETCH_ATTEMPTS,
                        error
                    );
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[async_trait]
impl ViewProvider for InsightViewProvider {
    async fn provide_view(&self, context: RenderingContext) -> Result<ChartView> {
        let query = self.effective_query(&context)?;
        let stats = self.fetch_with_retry(&query).await?;

        let data = aggregate(
            &stats.languages,
            self.definition.effective_threshold(),
            &query,
            &self.base_url,
        );

        Ok(ChartView {
            title: self.definition.title.clone(),
            content: vec![ChartContent::Pie {
                pies: vec![PieChart::language_usage(data)],
            }],
        })
    }
}
