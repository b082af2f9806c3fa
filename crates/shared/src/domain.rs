use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(AttendanceId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "HADIR")]
    Hadir,
    #[serde(rename = "IZIN")]
    Izin,
    #[serde(rename = "SAKIT")]
    Sakit,
    #[serde(rename = "TIDAK HADIR")]
    TidakHadir,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Hadir => "HADIR",
            AttendanceStatus::Izin => "IZIN",
            AttendanceStatus::Sakit => "SAKIT",
            AttendanceStatus::TidakHadir => "TIDAK HADIR",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HADIR" => Ok(AttendanceStatus::Hadir),
            "IZIN" => Ok(AttendanceStatus::Izin),
            "SAKIT" => Ok(AttendanceStatus::Sakit),
            "TIDAK HADIR" | "TIDAK_HADIR" => Ok(AttendanceStatus::TidakHadir),
            other => Err(format!(
                "unknown attendance status '{other}' (expected HADIR, IZIN, SAKIT or TIDAK HADIR)"
            )),
        }
    }
}

/// A persisted attendance entry. The id is assigned by the server; a record
/// that has not been created yet is an [`AttendanceDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub employee_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn to_draft(&self) -> AttendanceDraft {
        AttendanceDraft {
            employee_name: self.employee_name.clone(),
            date: self.date,
            status: self.status,
        }
    }
}

/// The client-editable half of a record: everything except the
/// server-assigned id. Used as the create body and as edit-session drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDraft {
    pub employee_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceDraft {
    pub fn into_record(self, id: AttendanceId) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_name: self.employee_name,
            date: self.date,
            status: self.status,
        }
    }
}
