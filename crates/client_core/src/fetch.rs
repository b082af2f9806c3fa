use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use shared::error::SyncError;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::{pagination::FetchTarget, source::RemoteDataSource, ClientEvent, ViewState};

/// Maps page/size changes to at most one applied fetch outcome.
///
/// Every issued request is stamped with a monotonically increasing token;
/// a completion is applied only while its token is still the latest issued,
/// so an out-of-order response for an older page can never overwrite newer
/// state. The staleness decision is made under the view lock, after which
/// no newer completion can slip in ahead of the application. Fetches are
/// triggered exclusively by explicit targets, never by cache-content
/// changes.
pub struct FetchCoordinator {
    source: Arc<dyn RemoteDataSource>,
    view: Arc<Mutex<ViewState>>,
    events: broadcast::Sender<ClientEvent>,
    issued: AtomicU64,
    loading: AtomicBool,
    inflight_target: Mutex<Option<(FetchTarget, u64)>>,
}

impl FetchCoordinator {
    pub fn new(
        source: Arc<dyn RemoteDataSource>,
        view: Arc<Mutex<ViewState>>,
        events: broadcast::Sender<ClientEvent>,
    ) -> Self {
        Self {
            source,
            view,
            events,
            issued: AtomicU64::new(0),
            loading: AtomicBool::new(false),
            inflight_target: Mutex::new(None),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Loads `target` and, on success, replaces pagination metadata and
    /// cache contents atomically. A request for the target already on the
    /// wire is coalesced into it. A superseded completion (success or
    /// failure) is discarded without touching any state.
    pub async fn refresh(&self, target: FetchTarget) -> Result<(), SyncError> {
        let token = {
            let mut inflight = self.inflight_target.lock().await;
            if inflight.map(|(inflight_target, _)| inflight_target) == Some(target) {
                debug!(page = target.page, size = target.size, "coalescing duplicate fetch");
                return Ok(());
            }
            let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            *inflight = Some((target, token));
            token
        };
        self.loading.store(true, Ordering::SeqCst);
        debug!(page = target.page, size = target.size, token, "issuing page fetch");

        let result = self.source.list(target.page, target.size).await;

        {
            // Cleared by token, not by target: a later request for the same
            // target owns the slot now and must keep coalescing against it.
            let mut inflight = self.inflight_target.lock().await;
            if inflight.map(|(_, issued)| issued) == Some(token) {
                *inflight = None;
            }
        }

        match result {
            Ok(snapshot) => {
                let meta = snapshot.meta;
                {
                    let mut view = self.view.lock().await;
                    // Staleness is decided here, under the view lock; a newer
                    // fetch may have been issued (or applied) since this one
                    // came off the wire.
                    if token != self.issued.load(Ordering::SeqCst) {
                        debug!(token, "discarding superseded fetch completion");
                        return Ok(());
                    }
                    self.loading.store(false, Ordering::SeqCst);
                    view.pagination.apply_page_meta(&meta);
                    view.cache.replace(snapshot.records);
                    view.last_error = None;
                }
                let _ = self.events.send(ClientEvent::PageLoaded { meta });
                Ok(())
            }
            Err(err) => {
                // Previously displayed data stays intact.
                {
                    let mut view = self.view.lock().await;
                    if token != self.issued.load(Ordering::SeqCst) {
                        debug!(token, "discarding superseded fetch failure");
                        return Ok(());
                    }
                    self.loading.store(false, Ordering::SeqCst);
                    view.last_error = Some(err.to_string());
                }
                let _ = self.events.send(ClientEvent::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Re-reads the page the view currently points at.
    pub async fn refresh_current(&self) -> Result<(), SyncError> {
        let target = { self.view.lock().await.pagination.current_target() };
        self.refresh(target).await
    }
}
