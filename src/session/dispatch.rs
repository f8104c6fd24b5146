//! Search session: request correlation, provider fan-out, incremental
//! delivery, and the more-results controller.
//!
//! Every call to [`SearchSession::search`] mints a request id strictly
//! greater than all previous ones and makes it the single current id.
//! Providers respond asynchronously and independently; each response is
//! merged as it arrives and the caller is notified incrementally with a
//! re-sorted snapshot. A response carrying a superseded id is silently
//! dropped — the only cancellation mechanism; in-flight provider calls
//! are never aborted. The staleness check and the merge happen under one
//! lock, so a late response from request N−1 can never slip into request
//! N's accumulator.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::config::SearchOptions;
use crate::error::SearchError;
use crate::registry::ProviderRegistry;
use crate::session::geometry;
use crate::session::merge::Accumulator;
use crate::types::{MapState, MoreItem, PlaceItem, RequestId, ResolvedGeometry, ResultGroup};

/// One incremental notification to the host: the full merged, sorted
/// group list for `request_id` as of this delivery.
#[derive(Debug, Clone)]
pub struct SearchUpdate {
    pub request_id: RequestId,
    pub groups: Vec<ResultGroup>,
}

struct SessionState {
    current: RequestId,
    accumulator: Accumulator,
}

pub(crate) struct SessionInner {
    state: Mutex<SessionState>,
    updates: mpsc::UnboundedSender<SearchUpdate>,
}

impl SessionInner {
    /// The sole channel from a provider response into the session.
    ///
    /// Drops the delivery when `request_id` is no longer current (a
    /// defined no-op, logged only at trace level). Otherwise merges and
    /// emits a snapshot. Staleness check and merge are one atomic step.
    pub(crate) fn deliver(
        &self,
        request_id: RequestId,
        provider_id: &str,
        groups: Vec<ResultGroup>,
        incremental: bool,
    ) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if request_id != state.current {
            tracing::trace!(
                request = %request_id,
                current = %state.current,
                provider = provider_id,
                "stale response dropped"
            );
            return;
        }
        if incremental && groups.is_empty() {
            // Nothing to merge and nothing for the host to redraw.
            return;
        }
        tracing::debug!(
            request = %request_id,
            provider = provider_id,
            groups = groups.len(),
            incremental,
            "provider delivery merged"
        );
        state.accumulator.merge(provider_id, groups, incremental);
        let _ = self.updates.send(SearchUpdate {
            request_id,
            groups: state.accumulator.sorted_groups(),
        });
    }
}

/// One search session: owns the current-request counter and the merge
/// accumulator. The registry is shared; the session is cheap to clone
/// into provider tasks via its inner `Arc`.
///
/// Must be used from within a tokio runtime — [`search`](Self::search)
/// spawns one task per provider.
pub struct SearchSession {
    registry: Arc<ProviderRegistry>,
    options: SearchOptions,
    inner: Arc<SessionInner>,
}

impl SearchSession {
    /// Create a session and the receiving end of its update channel.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] when the options are invalid.
    pub fn new(
        registry: Arc<ProviderRegistry>,
        options: SearchOptions,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SearchUpdate>), SearchError> {
        options.validate()?;
        let (updates, receiver) = mpsc::unbounded_channel();
        let inner = Arc::new(SessionInner {
            state: Mutex::new(SessionState {
                current: RequestId::ZERO,
                accumulator: Accumulator::default(),
            }),
            updates,
        });
        Ok((
            Self {
                registry,
                options,
                inner,
            },
            receiver,
        ))
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// The id of the current (latest) request.
    pub fn current_request(&self) -> RequestId {
        self.lock_state().current
    }

    /// The merged groups accumulated so far for the current request, in
    /// final display order.
    pub fn snapshot(&self) -> Vec<ResultGroup> {
        self.lock_state().accumulator.sorted_groups()
    }

    /// Start a new search, superseding any previous request.
    ///
    /// Abandons the previous accumulator, fans the query out to every
    /// provider available for `map`, and returns the freshly minted
    /// request id immediately. Results flow through the update channel
    /// as providers respond; a provider that errors contributes an empty
    /// group list without affecting the others.
    pub fn search(&self, text: &str, map: &MapState) -> RequestId {
        let request_id = {
            let mut state = self.lock_state();
            state.current = state.current.next();
            state.accumulator.clear();
            state.current
        };

        let providers = self.registry.available(map);
        tracing::debug!(
            request = %request_id,
            providers = providers.len(),
            "search dispatched"
        );
        tracing::trace!(request = %request_id, text, "search text");

        for provider in providers {
            let inner = Arc::clone(&self.inner);
            let text = text.to_owned();
            let options = self.options.clone();
            tokio::spawn(async move {
                let provider_id = provider.id().to_owned();
                let groups = match provider.search(&text, &options).await {
                    Ok(groups) => groups,
                    Err(err) => {
                        tracing::warn!(
                            provider = %provider_id,
                            error = %err,
                            "provider search failed"
                        );
                        Vec::new()
                    }
                };
                inner.deliver(request_id, &provider_id, groups, true);
            });
        }

        request_id
    }

    /// Expand a truncated group via the owning provider.
    ///
    /// Mints a fresh request id (superseding any still-in-flight search
    /// deliveries) but keeps the accumulated groups, so the expanded
    /// response replaces exactly the originating provider's groups and
    /// every other group survives untouched. The replacement is subject
    /// to the same staleness check as any delivery. If the expanded
    /// fetch fails, the truncated group simply stays as it was.
    ///
    /// # Errors
    ///
    /// [`SearchError::UnknownProvider`] when the item references an
    /// unregistered provider, [`SearchError::Unsupported`] when that
    /// provider declares no more-results capability.
    pub fn more_results(&self, item: &MoreItem, text: &str) -> Result<RequestId, SearchError> {
        let provider = self
            .registry
            .get(&item.provider_id)
            .ok_or_else(|| SearchError::UnknownProvider(item.provider_id.clone()))?;
        if !provider.supports_more_results() {
            return Err(SearchError::Unsupported(format!(
                "{} does not support expanded results",
                provider.id()
            )));
        }

        let request_id = {
            let mut state = self.lock_state();
            state.current = state.current.next();
            state.current
        };
        tracing::debug!(
            request = %request_id,
            provider = %item.provider_id,
            category = item.category.as_deref().unwrap_or(""),
            "more-results dispatched"
        );

        let inner = Arc::clone(&self.inner);
        let item = item.clone();
        let text = text.to_owned();
        let options = self.options.clone();
        tokio::spawn(async move {
            let provider_id = provider.id().to_owned();
            match provider.more_results(&item, &text, &options).await {
                Ok(groups) => inner.deliver(request_id, &provider_id, groups, false),
                Err(err) => {
                    tracing::warn!(
                        provider = %provider_id,
                        error = %err,
                        "more-results fetch failed"
                    );
                }
            }
        });

        Ok(request_id)
    }

    /// Resolve full geometry for one displayed place item.
    ///
    /// Independent of the request accumulator and not subject to
    /// staleness — the item, once rendered, stays relevant to the user's
    /// selection regardless of later searches.
    ///
    /// # Errors
    ///
    /// Surfaced only to this caller; a failure here never affects the
    /// result list. See [`geometry::resolve_geometry`].
    pub async fn resolve_geometry(
        &self,
        item: &PlaceItem,
    ) -> Result<ResolvedGeometry, SearchError> {
        geometry::resolve_geometry(&self.registry, item, &self.options).await
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &Arc<SessionInner> {
        &self.inner
    }
}

/// One-shot search: await every available provider, merge, and return
/// the final sorted group list.
///
/// Same merge and failure semantics as the incremental session path
/// (a failing provider contributes nothing), without the update channel.
/// Suited to hosts that do not render partial results.
///
/// # Errors
///
/// Returns [`SearchError::Config`] when the options are invalid. Provider
/// failures are absorbed, never returned.
pub async fn search_collect(
    registry: &ProviderRegistry,
    text: &str,
    map: &MapState,
    options: &SearchOptions,
) -> Result<Vec<ResultGroup>, SearchError> {
    options.validate()?;

    let providers = registry.available(map);
    let futures: Vec<_> = providers
        .iter()
        .map(|provider| async move { (provider.id().to_owned(), provider.search(text, options).await) })
        .collect();
    let outcomes = futures::future::join_all(futures).await;

    let mut accumulator = Accumulator::default();
    for (provider_id, outcome) in outcomes {
        match outcome {
            Ok(groups) => {
                tracing::debug!(provider = %provider_id, groups = groups.len(), "provider returned groups");
                accumulator.merge(&provider_id, groups, true);
            }
            Err(err) => {
                tracing::warn!(provider = %provider_id, error = %err, "provider query failed");
            }
        }
    }

    Ok(accumulator.sorted_groups())
}
