//! Registration lifecycle for resolved insights.
//!
//! The [`Reconciler`] consumes configuration snapshots one at a time and
//! keeps the host's view registrations in step with the resolved insight
//! set: exactly one registration pair (insights page + directory) per live
//! definition, none for anything else. Each pass tears the previous pass's
//! registrations down in full before standing new ones up, so a duplicate
//! name can never reach the host. Snapshots resolving to a structurally
//! identical insight set are skipped to avoid registration churn.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use crate::error::Result;
use crate::graphql::QueryChannel;
use crate::resolve::{resolve, InsightDefinition, Resolution};
use crate::settings::ConfigurationSnapshot;
use crate::view::{InsightViewProvider, ViewProvider};

/// Prefix for view registration names.
pub const REGISTRATION_PREFIX: &str = "codeStatsInsight.";

/// The host surface a view is registered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewLocation {
    /// The global insights page.
    InsightsPage,
    /// A per-directory view.
    Directory,
}

impl ViewLocation {
    /// Both surfaces, in registration order.
    pub const ALL: [ViewLocation; 2] = [Self::InsightsPage, Self::Directory];

    /// The host-facing name of this surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsightsPage => "insightsPage",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for ViewLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The registration name for one insight on one surface.
pub fn registration_name(id: &str, location: ViewLocation) -> String {
    format!("{REGISTRATION_PREFIX}{id}.{location}")
}

/// One live view registration held with the host.
///
/// Consumed by [`RegistrationHandle::release`], so a handle can only ever
/// be released once.
#[async_trait]
pub trait RegistrationHandle: Send {
    /// Unregister the view. Safe to call while a render request for the
    /// registration is still in flight.
    async fn release(self: Box<Self>);
}

/// Host surface accepting view registrations.
///
/// Registering a name that is already live is a host error.
#[async_trait]
pub trait ViewRegistry: Send + Sync {
    /// Register a view under `name` on the given surface.
    async fn register(
        &self,
        name: &str,
        location: ViewLocation,
        provider: Arc<dyn ViewProvider>,
    ) -> Result<Box<dyn RegistrationHandle>>;
}

/// Blanket implementation for Arc-wrapped registries.
#[async_trait]
impl<T: ViewRegistry + ?Sized> ViewRegistry for Arc<T> {
    async fn register(
        &self,
        name: &str,
        location: ViewLocation,
        provider: Arc<dyn ViewProvider>,
    ) -> Result<Box<dyn RegistrationHandle>> {
        (**self).register(name, location, provider).await
    }
}

/// The registrations created by one reconciliation pass.
///
/// Replacing a pass releases the whole prior bag before anything new is
/// registered.
#[derive(Default)]
pub struct RegistrationBag {
    handles: Vec<Box<dyn RegistrationHandle>>,
}

impl RegistrationBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of one handle.
    pub fn add(&mut self, handle: Box<dyn RegistrationHandle>) {
        self.handles.push(handle);
    }

    /// Number of live handles in the bag.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check if the bag holds no handles.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Release every handle, leaving the bag empty.
    pub async fn release_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.release().await;
        }
    }
}

/// Keeps host view registrations in step with the resolved insight set.
pub struct Reconciler {
    registry: Arc<dyn ViewRegistry>,
    channel: Arc<dyn QueryChannel>,
    base_url: Url,
    last: Resolution,
    bag: RegistrationBag,
}

impl Reconciler {
    /// Create a reconciler in the "no configuration observed yet" state.
    pub fn new(
        registry: Arc<dyn ViewRegistry>,
        channel: Arc<dyn QueryChannel>,
        base_url: Url,
    ) -> Self {
        Self {
            registry,
            channel,
            base_url,
            last: resolve(&ConfigurationSnapshot::empty()),
            bag: RegistrationBag::new(),
        }
    }

    /// Drive reconciliation until the settings stream closes, then release
    /// every live registration.
    ///
    /// Snapshots are processed strictly in emission order; one snapshot is
    /// fully applied before the next is received. Closing the sender is
    /// the shutdown signal.
    pub async fn run(mut self, mut snapshots: mpsc::Receiver<ConfigurationSnapshot>) {
        while let Some(snapshot) = snapshots.recv().await {
            self.observe(&snapshot).await;
        }
        self.shutdown().await;
    }

    /// Apply one configuration snapshot.
    ///
    /// A snapshot whose resolution is structurally identical to the
    /// previous one is a no-op, so unrelated settings changes cause no
    /// registration churn.
    pub async fn observe(&mut self, snapshot: &ConfigurationSnapshot) {
        let resolution = resolve(snapshot);
        if resolution == self.last {
            tracing::debug!("configuration change resolves identically, skipping");
            return;
        }
        self.apply(&resolution).await;
        self.last = resolution;
    }

    /// Release every live registration. Safe to call more than once.
    pub async fn shutdown(&mut self) {
        if !self.bag.is_empty() {
            tracing::info!("releasing {} registrations on shutdown", self.bag.len());
        }
        self.bag.release_all().await;
    }

    async fn apply(&mut self, resolution: &Resolution) {
        // Teardown strictly precedes setup: the host rejects duplicate
        // names, so nothing may be registered while its predecessor lives.
        self.bag.release_all().await;

        let mut definitions: Vec<(&str, &InsightDefinition)> = Vec::new();
        for (id, definition) in resolution {
            let Some(definition) = definition else {
                continue;
            };
            // Later entries win when an id repeats.
            match definitions.iter_mut().find(|(seen, _)| *seen == id.as_str()) {
                Some(slot) => slot.1 = definition,
                None => definitions.push((id.as_str(), definition)),
            }
        }

        for (id, definition) in definitions {
            let provider: Arc<dyn ViewProvider> = Arc::new(InsightViewProvider::new(
                id,
                definition.clone(),
                Arc::clone(&self.channel),
                self.base_url.clone(),
            ));
            for location in ViewLocation::ALL {
                let name = registration_name(id, location);
                match self
                    .registry
                    .register(&name, location, Arc::clone(&provider))
                    .await
                {
                    Ok(handle) => self.bag.add(handle),
                    Err(error) => {
                        tracing::warn!("failed to register view {}: {}", name, error)
                    }
                }
            }
        }

        tracing::debug!(
            "reconciliation pass complete, {} registrations live",
            self.bag.len()
        );
    }
}
