use std::collections::HashMap;

use shared::domain::{AttendanceId, AttendanceRecord};

/// In-memory records for the current page, keyed by id for local lookup.
/// Bulk content enters only through [`ListCache::replace`]; there is no
/// partial merge between fetches.
#[derive(Debug, Default)]
pub struct ListCache {
    records: Vec<AttendanceRecord>,
    index: HashMap<AttendanceId, usize>,
}

impl ListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale replacement after a successful fetch.
    pub fn replace(&mut self, records: Vec<AttendanceRecord>) {
        self.index = records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.id, position))
            .collect();
        self.records = records;
    }

    /// Replaces one entry in place if present. Used after a successful
    /// update so the page reflects the server's record without a refetch.
    pub fn apply_update(&mut self, id: AttendanceId, record: AttendanceRecord) -> bool {
        match self.index.get(&id) {
            Some(&position) => {
                self.records[position] = record;
                true
            }
            None => false,
        }
    }

    /// Removes one entry. Only called after the server has confirmed a
    /// delete, to bridge the gap until the authoritative refetch lands.
    pub fn remove_locally(&mut self, id: AttendanceId) -> bool {
        let Some(position) = self.index.remove(&id) else {
            return false;
        };
        self.records.remove(position);
        for (shifted, record) in self.records.iter().enumerate().skip(position) {
            self.index.insert(record.id, shifted);
        }
        true
    }

    pub fn get(&self, id: AttendanceId) -> Option<&AttendanceRecord> {
        self.index.get(&id).map(|&position| &self.records[position])
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
