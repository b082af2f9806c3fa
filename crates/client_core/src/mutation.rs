use std::{collections::HashSet, sync::Arc};

use shared::{
    domain::{AttendanceDraft, AttendanceId},
    error::SyncError,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use crate::{fetch::FetchCoordinator, source::RemoteDataSource, ClientEvent, ViewState};

/// What became of a requested mutation. `Ignored` covers the single-flight
/// and confirmation-protocol no-ops: nothing was sent, nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MutationKey {
    Create,
    Record(AttendanceId),
}

/// Executes create/update/delete against the remote store and reconciles
/// the view afterward. At most one mutation per record identity is on the
/// wire at a time; a second request against the same identity is ignored
/// rather than queued.
pub struct MutationCoordinator {
    source: Arc<dyn RemoteDataSource>,
    view: Arc<Mutex<ViewState>>,
    fetch: Arc<FetchCoordinator>,
    events: broadcast::Sender<ClientEvent>,
    inflight: Mutex<HashSet<MutationKey>>,
    pending_deletes: Mutex<HashSet<AttendanceId>>,
}

impl MutationCoordinator {
    pub fn new(
        source: Arc<dyn RemoteDataSource>,
        view: Arc<Mutex<ViewState>>,
        fetch: Arc<FetchCoordinator>,
        events: broadcast::Sender<ClientEvent>,
    ) -> Self {
        Self {
            source,
            view,
            fetch,
            events,
            inflight: Mutex::new(HashSet::new()),
            pending_deletes: Mutex::new(HashSet::new()),
        }
    }

    async fn begin(&self, key: MutationKey) -> bool {
        self.inflight.lock().await.insert(key)
    }

    async fn finish(&self, key: MutationKey) {
        self.inflight.lock().await.remove(&key);
    }

    async fn report_failure(&self, err: &SyncError) {
        {
            let mut view = self.view.lock().await;
            view.last_error = Some(err.to_string());
        }
        let _ = self.events.send(ClientEvent::Error(err.to_string()));
    }

    /// Creates a record and refreshes the current page. The new item may or
    /// may not land on it depending on server ordering, so there is no
    /// optimistic insert. A failed post-create refresh surfaces through the
    /// fetch error channel; the create itself has already committed.
    pub async fn create(&self, draft: &AttendanceDraft) -> Result<MutationOutcome, SyncError> {
        validate_draft(draft)?;

        if !self.begin(MutationKey::Create).await {
            debug!("create already in flight; ignoring duplicate submit");
            return Ok(MutationOutcome::Ignored);
        }
        let result = self.source.create(draft).await;
        self.finish(MutationKey::Create).await;

        match result {
            Ok(record) => {
                let _ = self.events.send(ClientEvent::RecordCreated { record });
                let _ = self.fetch.refresh_current().await;
                Ok(MutationOutcome::Applied)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// Updates a record and applies the server's own response payload to
    /// the cache, never the client-submitted draft. No refetch needed.
    pub async fn update(
        &self,
        id: AttendanceId,
        draft: &AttendanceDraft,
    ) -> Result<MutationOutcome, SyncError> {
        if !self.begin(MutationKey::Record(id)).await {
            debug!(id = id.0, "mutation for record already in flight; ignoring update");
            return Ok(MutationOutcome::Ignored);
        }
        let result = self.source.update(id, draft).await;
        self.finish(MutationKey::Record(id)).await;

        match result {
            Ok(record) => {
                {
                    let mut view = self.view.lock().await;
                    if !view.cache.apply_update(id, record.clone()) {
                        debug!(id = id.0, "updated record no longer on the current page");
                    }
                    view.last_error = None;
                }
                let _ = self.events.send(ClientEvent::RecordUpdated { record });
                Ok(MutationOutcome::Applied)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// First step of the delete protocol: marks the record as awaiting a
    /// yes/no decision. Only records on the current page can be targeted.
    pub async fn request_delete(&self, id: AttendanceId) -> bool {
        if self.view.lock().await.cache.get(id).is_none() {
            debug!(id = id.0, "delete requested for record not on the current page");
            return false;
        }
        let newly_requested = self.pending_deletes.lock().await.insert(id);
        if newly_requested {
            let _ = self
                .events
                .send(ClientEvent::DeleteConfirmationRequested { id });
        }
        newly_requested
    }

    pub async fn cancel_delete(&self, id: AttendanceId) -> bool {
        self.pending_deletes.lock().await.remove(&id)
    }

    /// Second step: runs only for a previously requested id. On success the
    /// record is dropped locally and the current page number is re-read; if
    /// the response reports fewer total pages than the page we are on, the
    /// view is driven to the last page before the final re-read, so a
    /// delete never strands the view on an empty page.
    pub async fn confirm_delete(&self, id: AttendanceId) -> Result<MutationOutcome, SyncError> {
        if !self.pending_deletes.lock().await.remove(&id) {
            warn!(id = id.0, "confirm_delete without a pending request; ignoring");
            return Ok(MutationOutcome::Ignored);
        }
        if !self.begin(MutationKey::Record(id)).await {
            debug!(id = id.0, "mutation for record already in flight; ignoring delete");
            return Ok(MutationOutcome::Ignored);
        }
        let result = self.source.delete(id).await;
        self.finish(MutationKey::Record(id)).await;

        match result {
            Ok(()) => {
                {
                    let mut view = self.view.lock().await;
                    view.cache.remove_locally(id);
                    view.last_error = None;
                }
                let _ = self.events.send(ClientEvent::RecordDeleted { id });
                self.refetch_after_delete().await;
                Ok(MutationOutcome::Applied)
            }
            Err(err) => {
                // The record stays visible; the operator may retry.
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    async fn refetch_after_delete(&self) {
        if self.fetch.refresh_current().await.is_err() {
            return;
        }
        let fallback = {
            let view = self.view.lock().await;
            let pagination = &view.pagination;
            if pagination.page() > pagination.total_pages() {
                pagination.request_page(pagination.total_pages())
            } else {
                None
            }
        };
        if let Some(target) = fallback {
            debug!(page = target.page, "current page emptied; falling back to last page");
            let _ = self.fetch.refresh(target).await;
        }
    }
}

/// Defense in depth behind the form's own validation. Date and status
/// presence are already guaranteed by the types; the one thing left to
/// check is a blank name.
fn validate_draft(draft: &AttendanceDraft) -> Result<(), SyncError> {
    if draft.employee_name.trim().is_empty() {
        return Err(SyncError::Validation(
            "employee name must not be empty".to_string(),
        ));
    }
    Ok(())
}
