use std::sync::Arc;

use shared::{
    domain::{AttendanceDraft, AttendanceId, AttendanceRecord},
    error::SyncError,
    protocol::PageMeta,
};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

pub mod cache;
pub mod edit;
pub mod fetch;
pub mod mutation;
pub mod pagination;
pub mod source;

pub use cache::ListCache;
pub use edit::EditSession;
pub use fetch::FetchCoordinator;
pub use mutation::{MutationCoordinator, MutationOutcome};
pub use pagination::{FetchTarget, PaginationController};
pub use source::{HttpDataSource, PageSnapshot, RemoteDataSource};

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination metadata and page contents, guarded together so a fetch
/// completion replaces both atomically. Mutated only by the fetch and
/// mutation coordinators at their completion points.
pub struct ViewState {
    pub pagination: PaginationController,
    pub cache: ListCache,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    PageLoaded { meta: PageMeta },
    RecordCreated { record: AttendanceRecord },
    RecordUpdated { record: AttendanceRecord },
    RecordDeleted { id: AttendanceId },
    DeleteConfirmationRequested { id: AttendanceId },
    Error(String),
}

/// The attendance list engine: a paginated view of a remote store with
/// synchronous edit sessions and reconciling mutations. All state lives
/// behind single-writer entry points; completions arriving on arbitrary
/// worker threads serialize through the view lock.
pub struct AttendanceClient {
    view: Arc<Mutex<ViewState>>,
    fetch: Arc<FetchCoordinator>,
    mutation: MutationCoordinator,
    edit: Mutex<Option<EditSession>>,
    events: broadcast::Sender<ClientEvent>,
}

impl AttendanceClient {
    pub fn new(source: Arc<dyn RemoteDataSource>) -> Arc<Self> {
        Self::with_page_size(source, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(source: Arc<dyn RemoteDataSource>, page_size: u32) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        let view = Arc::new(Mutex::new(ViewState {
            pagination: PaginationController::new(page_size),
            cache: ListCache::new(),
            last_error: None,
        }));
        let fetch = Arc::new(FetchCoordinator::new(
            Arc::clone(&source),
            Arc::clone(&view),
            events.clone(),
        ));
        let mutation = MutationCoordinator::new(
            source,
            Arc::clone(&view),
            Arc::clone(&fetch),
            events.clone(),
        );
        Arc::new(Self {
            view,
            fetch,
            mutation,
            edit: Mutex::new(None),
            events,
        })
    }

    /// Loads (or re-reads) the page the view currently points at.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        self.fetch.refresh_current().await
    }

    /// Navigates to page `n`. Out-of-range requests are silent no-ops.
    pub async fn request_page(&self, n: u32) -> Result<(), SyncError> {
        let target = { self.view.lock().await.pagination.request_page(n) };
        match target {
            Some(target) => self.fetch.refresh(target).await,
            None => {
                debug!(page = n, "page request out of range; ignoring");
                Ok(())
            }
        }
    }

    pub async fn request_previous(&self) -> Result<(), SyncError> {
        let target = { self.view.lock().await.pagination.request_previous() };
        match target {
            Some(target) => self.fetch.refresh(target).await,
            None => Ok(()),
        }
    }

    pub async fn request_next(&self) -> Result<(), SyncError> {
        let target = { self.view.lock().await.pagination.request_next() };
        match target {
            Some(target) => self.fetch.refresh(target).await,
            None => Ok(()),
        }
    }

    pub async fn set_page_size(&self, size: u32) -> Result<(), SyncError> {
        let target = { self.view.lock().await.pagination.request_size(size) };
        match target {
            Some(target) => self.fetch.refresh(target).await,
            None => {
                debug!(size, "rejecting zero page size");
                Ok(())
            }
        }
    }

    pub async fn create(&self, draft: &AttendanceDraft) -> Result<MutationOutcome, SyncError> {
        self.mutation.create(draft).await
    }

    /// Opens an edit session for a record on the current page, implicitly
    /// cancelling any session already open. Returns false when the record
    /// is not on the page.
    pub async fn open_edit(&self, id: AttendanceId) -> bool {
        let record = { self.view.lock().await.cache.get(id).cloned() };
        match record {
            Some(record) => {
                let mut edit = self.edit.lock().await;
                if let Some(previous) = edit.replace(EditSession::open(record)) {
                    debug!(id = previous.id().0, "implicitly cancelling previous edit session");
                }
                true
            }
            None => false,
        }
    }

    pub async fn edit_draft(&self) -> Option<AttendanceDraft> {
        self.edit.lock().await.as_ref().map(|s| s.draft().clone())
    }

    /// Replaces the open session's draft. Touches nothing else.
    pub async fn set_edit_draft(&self, draft: AttendanceDraft) -> bool {
        match self.edit.lock().await.as_mut() {
            Some(session) => {
                session.set_draft(draft);
                true
            }
            None => false,
        }
    }

    /// Discards the draft. No network call, cache untouched.
    pub async fn cancel_edit(&self) -> bool {
        self.edit.lock().await.take().is_some()
    }

    /// Commits the open session's draft. The session closes only when the
    /// update applies; on failure (and on an ignored duplicate) it stays
    /// open so the operator can correct and retry, or cancel.
    pub async fn save_edit(&self) -> Result<MutationOutcome, SyncError> {
        let pending = {
            let edit = self.edit.lock().await;
            edit.as_ref().map(|s| (s.id(), s.draft().clone()))
        };
        let Some((id, draft)) = pending else {
            debug!("save_edit without an open session; ignoring");
            return Ok(MutationOutcome::Ignored);
        };

        let outcome = self.mutation.update(id, &draft).await?;
        if outcome == MutationOutcome::Applied {
            self.edit.lock().await.take();
        }
        Ok(outcome)
    }

    pub async fn request_delete(&self, id: AttendanceId) -> bool {
        self.mutation.request_delete(id).await
    }

    pub async fn cancel_delete(&self, id: AttendanceId) -> bool {
        self.mutation.cancel_delete(id).await
    }

    pub async fn confirm_delete(&self, id: AttendanceId) -> Result<MutationOutcome, SyncError> {
        self.mutation.confirm_delete(id).await
    }

    pub async fn records(&self) -> Vec<AttendanceRecord> {
        self.view.lock().await.cache.records().to_vec()
    }

    pub async fn page_meta(&self) -> PageMeta {
        self.view.lock().await.pagination.snapshot()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.view.lock().await.last_error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_loading()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
