use shared::domain::{AttendanceDraft, AttendanceId, AttendanceRecord};

/// A transient, discardable draft of one record. Opened from a cache entry
/// by snapshot copy; field edits touch only the draft, never the original
/// and never the cache. Committing goes through the mutation coordinator.
#[derive(Debug, Clone)]
pub struct EditSession {
    original: AttendanceRecord,
    draft: AttendanceDraft,
}

impl EditSession {
    pub fn open(record: AttendanceRecord) -> Self {
        let draft = record.to_draft();
        Self {
            original: record,
            draft,
        }
    }

    pub fn id(&self) -> AttendanceId {
        self.original.id
    }

    pub fn original(&self) -> &AttendanceRecord {
        &self.original
    }

    pub fn draft(&self) -> &AttendanceDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut AttendanceDraft {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: AttendanceDraft) {
        self.draft = draft;
    }

    pub fn is_dirty(&self) -> bool {
        self.original.to_draft() != self.draft
    }
}
