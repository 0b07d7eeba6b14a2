pub mod connection;
pub mod job_repository;
pub mod memory;
pub mod migrations;
pub mod models;

use async_trait::async_trait;

use crate::api::job::{Job, JobId, JobPatch, NewJob};

pub use job_repository::JobRepository;
pub use memory::MemoryJobStore;

/// Errors raised by a job store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be turned back into a job
    #[error("corrupt job record: {0}")]
    Corrupt(String),
}

/// Keyed storage of job postings
///
/// Identifiers are parsed before they reach the store, so every lookup
/// here is for a well-formed id; absence is reported as `None`/`false`.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a job under a freshly generated id
    async fn insert(&self, job: NewJob) -> Result<Job, StoreError>;

    /// Insert several jobs at once, returning how many were stored
    async fn insert_many(&self, jobs: Vec<NewJob>) -> Result<u64, StoreError>;

    /// All jobs in insertion order
    async fn find_all(&self) -> Result<Vec<Job>, StoreError>;

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, StoreError>;

    /// Merge the supplied fields into an existing job
    async fn update_by_id(&self, id: JobId, patch: JobPatch) -> Result<Option<Job>, StoreError>;

    /// Returns whether a job was removed
    async fn delete_by_id(&self, id: JobId) -> Result<bool, StoreError>;

    /// Remove every job, returning how many were removed
    async fn delete_all(&self) -> Result<u64, StoreError>;

    /// Check that the backing storage is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release backing resources
    async fn close(&self);
}
