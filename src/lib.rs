//! prism - live language-usage pie chart insights for a code host.
//!
//! prism watches the host's layered settings cascade for configured
//! "insight" definitions and keeps one pair of view registrations (global
//! insights page + per-directory view) live per definition. Each render
//! request fetches per-language line counts over the host's query channel,
//! buckets small languages into an "Other" slice, and returns a declarative
//! pie-chart payload with colors and deep links.
//!
//! The host supplies three capabilities: a stream of configuration
//! snapshots, a [`QueryChannel`] for remote queries, and a [`ViewRegistry`]
//! accepting view registrations. Wire them into a [`Reconciler`] and drive
//! it with [`Reconciler::run`]; closing the settings stream shuts the whole
//! subsystem down and releases every live registration.

pub mod chart;
pub mod error;
pub mod graphql;
pub mod languages;
pub mod reconcile;
pub mod resolve;
pub mod settings;
pub mod view;

pub use chart::{
    aggregate, stats_url, ChartContent, ChartSeriesEntry, ChartView, LanguageStat, PieChart,
    OTHER_SLICE_NAME,
};
pub use error::{PrismError, Result};
pub use graphql::{
    execute, fetch_language_stats, GraphQlError, GraphQlResponse, QueryChannel, SearchStats,
    LANGUAGE_STATS_QUERY,
};
pub use reconcile::{
    registration_name, Reconciler, RegistrationBag, RegistrationHandle, ViewLocation,
    ViewRegistry, REGISTRATION_PREFIX,
};
pub use resolve::{
    resolve, InsightDefinition, Resolution, DEFAULT_OTHER_THRESHOLD, LEGACY_INSIGHT_ID,
    LEGACY_INSIGHT_TITLE,
};
pub use settings::{
    ConfigurationSnapshot, INSIGHT_KEY_PREFIX, LEGACY_QUERY_KEY, LEGACY_THRESHOLD_KEY,
};
pub use view::{
    repo_from_uri, DirectoryViewer, InsightViewProvider, RenderingContext, ViewProvider,
    MAX_FETCH_ATTEMPTS,
};
