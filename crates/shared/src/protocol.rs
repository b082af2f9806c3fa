use serde::{Deserialize, Serialize};

use crate::domain::AttendanceRecord;

/// Pagination metadata as reported by the server alongside every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub size: u32,
    #[serde(rename = "totalPage")]
    pub total_pages: u32,
    #[serde(rename = "totalItems")]
    pub total_items: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAttendancesResponse {
    pub data: Vec<AttendanceRecord>,
    pub paging: PageMeta,
}

/// Body shape of non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
