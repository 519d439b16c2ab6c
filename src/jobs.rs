// ============================================================================
// Deferred Job Queue
// ============================================================================
//
// Work that must happen on a later tick of the same loop (overlay transition
// completion, delayed weather refresh) is queued here with a due time. Each
// entry is identified by a `JobId`, which doubles as the completion token the
// owner compares against to drop stale callbacks.

use std::time::Instant;

/// Identity of a scheduled job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

/// Job types for deferred work
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobType {
    /// The running overlay transition reached its end
    FinishOverlayTransition,
    /// Ask the weather provider for fresh data
    RefreshWeather,
}

/// A due job, handed back by [`Scheduler::drain_due`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub job_type: JobType,
}

#[derive(Debug)]
struct Entry {
    due: Instant,
    job: Job,
}

/// Single-threaded queue of deferred jobs
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a job to run on the first tick at or after `due`
    pub fn schedule(&mut self, due: Instant, job_type: JobType) -> JobId {
        self.next_id += 1;
        let id = JobId(self.next_id);
        self.entries.push(Entry {
            due,
            job: Job { id, job_type },
        });
        id
    }

    /// Drop a queued job. Returns false if it already ran or never existed.
    pub fn cancel(&mut self, id: JobId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.job.id != id);
        self.entries.len() != before
    }

    /// Remove and return every job due at `now`, oldest due time first
    pub fn drain_due(&mut self, now: Instant) -> Vec<Job> {
        let (mut due, pending): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.due <= now);
        self.entries = pending;
        due.sort_by_key(|entry| (entry.due, entry.job.id));
        due.into_iter().map(|entry| entry.job).collect()
    }

    /// Drop every queued job
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, id: JobId) -> bool {
        self.entries.iter().any(|entry| entry.job.id == id)
    }

    /// Check if there are pending jobs
    pub fn has_pending_jobs(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Earliest due time, if anything is queued
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.due).min()
    }
}
