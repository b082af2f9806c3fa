use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{AttendanceDraft, AttendanceId, AttendanceRecord},
    error::SyncError,
    protocol::{ErrorBody, ListAttendancesResponse, PageMeta},
};

/// One page as handed back by the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub records: Vec<AttendanceRecord>,
    pub meta: PageMeta,
}

/// The remote attendance store. The engine only sees this seam; the HTTP
/// implementation below is one collaborator, tests plug in their own.
#[async_trait]
pub trait RemoteDataSource: Send + Sync {
    async fn list(&self, page: u32, size: u32) -> Result<PageSnapshot, SyncError>;
    async fn create(&self, draft: &AttendanceDraft) -> Result<AttendanceRecord, SyncError>;
    async fn update(
        &self,
        id: AttendanceId,
        draft: &AttendanceDraft,
    ) -> Result<AttendanceRecord, SyncError>;
    async fn delete(&self, id: AttendanceId) -> Result<(), SyncError>;
}

/// REST-backed data source against `{base_url}/attendances`.
pub struct HttpDataSource {
    http: Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/attendances", self.base_url)
    }

    fn record_url(&self, id: AttendanceId) -> String {
        format!("{}/attendances/{}", self.base_url, id.0)
    }
}

fn transport_error(err: reqwest::Error) -> SyncError {
    SyncError::Transport(err.to_string())
}

fn malformed(err: reqwest::Error) -> SyncError {
    SyncError::MalformedResponse(err.to_string())
}

/// Non-success statuses carry a `{ message }` body when the server had
/// something to say; fall back to the status reason otherwise.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(SyncError::Server {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteDataSource for HttpDataSource {
    async fn list(&self, page: u32, size: u32) -> Result<PageSnapshot, SyncError> {
        let response = self
            .http
            .get(self.collection_url())
            .query(&[("page", page), ("size", size)])
            .send()
            .await
            .map_err(transport_error)?;
        let body: ListAttendancesResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(malformed)?;

        if body.data.len() > body.paging.size as usize {
            return Err(SyncError::MalformedResponse(format!(
                "page holds {} records but reports size {}",
                body.data.len(),
                body.paging.size
            )));
        }

        Ok(PageSnapshot {
            records: body.data,
            meta: body.paging,
        })
    }

    async fn create(&self, draft: &AttendanceDraft) -> Result<AttendanceRecord, SyncError> {
        let response = self
            .http
            .post(self.collection_url())
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?.json().await.map_err(malformed)
    }

    async fn update(
        &self,
        id: AttendanceId,
        draft: &AttendanceDraft,
    ) -> Result<AttendanceRecord, SyncError> {
        let body = draft.clone().into_record(id);
        let response = self
            .http
            .put(self.record_url(id))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?.json().await.map_err(malformed)
    }

    async fn delete(&self, id: AttendanceId) -> Result<(), SyncError> {
        let response = self
            .http
            .delete(self.record_url(id))
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}
