//! Job Store
//!
//! Process-wide mutable job state behind one abstraction: job records, the
//! job → Section Tree map, the active-job admission set, and pending cleanup
//! task handles. Every table is keyed by job identifier and each entry has
//! its own lock (dashmap), so two jobs never contend and the orchestrator can
//! run on a multi-threaded runtime without a coarse table lock.

use dashmap::{DashMap, DashSet};
use tokio::task::JoinHandle;

use crate::types::{JobRecord, Result, Section, SmithError};

#[derive(Default)]
pub struct JobStore {
    records: DashMap<String, JobRecord>,
    structures: DashMap<String, Vec<Section>>,
    active: DashSet<String>,
    cleanups: DashMap<String, JoinHandle<()>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Admission
    // =========================================================================

    /// Admit a new job, rejecting synchronously above the ceiling. No record
    /// is created for a rejected submission.
    pub fn try_admit(&self, job_id: &str, limit: usize) -> Result<()> {
        let active = self.active.len();
        if active >= limit {
            return Err(SmithError::TooManyJobs { active, limit });
        }
        self.active.insert(job_id.to_string());
        Ok(())
    }

    /// Remove the job from the active set (on terminal status).
    pub fn deactivate(&self, job_id: &str) {
        self.active.remove(job_id);
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    // =========================================================================
    // Records
    // =========================================================================

    pub fn put_record(&self, job_id: &str, record: JobRecord) {
        self.records.insert(job_id.to_string(), record);
    }

    /// Mutate a job's record in place. Returns false when the record is gone
    /// (already cleaned up).
    pub fn update_record(&self, job_id: &str, update: impl FnOnce(&mut JobRecord)) -> bool {
        match self.records.get_mut(job_id) {
            Some(mut record) => {
                update(&mut record);
                true
            }
            None => false,
        }
    }

    pub fn get_record(&self, job_id: &str) -> Option<JobRecord> {
        self.records.get(job_id).map(|r| r.clone())
    }

    pub fn remove_record(&self, job_id: &str) -> Option<JobRecord> {
        self.records.remove(job_id).map(|(_, record)| record)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    // =========================================================================
    // Structures
    // =========================================================================

    pub fn put_structure(&self, job_id: &str, structure: Vec<Section>) {
        self.structures.insert(job_id.to_string(), structure);
    }

    pub fn get_structure(&self, job_id: &str) -> Option<Vec<Section>> {
        self.structures.get(job_id).map(|s| s.clone())
    }

    pub fn remove_structure(&self, job_id: &str) {
        self.structures.remove(job_id);
    }

    // =========================================================================
    // Deferred Cleanup Handles
    // =========================================================================

    /// Track the pending deferred-cleanup task for a job, replacing (and
    /// aborting) any previous one.
    pub fn register_cleanup(&self, job_id: &str, handle: JoinHandle<()>) {
        if let Some(previous) = self.cleanups.insert(job_id.to_string(), handle) {
            previous.abort();
        }
    }

    /// Cancel a pending deferred cleanup, if one exists. Used by explicit
    /// early cleanup so the job is not deleted twice.
    pub fn cancel_cleanup(&self, job_id: &str) {
        if let Some((_, handle)) = self.cleanups.remove(job_id) {
            handle.abort();
        }
    }

    /// Drop the handle entry once a cleanup has run.
    pub fn forget_cleanup(&self, job_id: &str) {
        self.cleanups.remove(job_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobState;

    #[test]
    fn test_admission_ceiling() {
        let store = JobStore::new();
        for i in 0..10 {
            store.try_admit(&format!("job-{}", i), 10).unwrap();
        }
        let err = store.try_admit("job-11", 10).unwrap_err();
        assert!(err.is_retry_later());
        assert_eq!(store.active_count(), 10);

        // Finishing one job frees a slot
        store.deactivate("job-0");
        assert!(store.try_admit("job-11", 10).is_ok());
    }

    #[test]
    fn test_record_update_round_trip() {
        let store = JobStore::new();
        store.put_record("a", JobRecord::processing("starting", 10));

        assert!(store.update_record("a", |r| {
            r.progress = 40;
            r.status = JobState::Completed;
        }));
        let record = store.get_record("a").unwrap();
        assert_eq!(record.progress, 40);
        assert_eq!(record.status, JobState::Completed);

        assert!(!store.update_record("missing", |_| {}));
    }

    #[test]
    fn test_structure_storage_is_independent_of_records() {
        let store = JobStore::new();
        store.put_structure("a", vec![Section::new("k", "T", 1)]);
        assert!(store.get_record("a").is_none());
        assert_eq!(store.get_structure("a").unwrap().len(), 1);
        store.remove_structure("a");
        assert!(store.get_structure("a").is_none());
    }

    #[tokio::test]
    async fn test_register_cleanup_aborts_previous() {
        let store = JobStore::new();
        let first = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        store.register_cleanup("a", first);
        let second = tokio::spawn(async {});
        store.register_cleanup("a", second);

        // Only the replaced handle was aborted; cancel removes the second.
        store.cancel_cleanup("a");
        store.cancel_cleanup("a"); // idempotent
    }
}
