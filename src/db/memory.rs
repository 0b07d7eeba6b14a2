use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::api::job::{Job, JobId, JobPatch, NewJob};
use super::{JobStore, StoreError};

/// Process-local job store, used when no database is configured and in tests
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<Vec<Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: NewJob) -> Result<Job, StoreError> {
        let job = Job::from_new(JobId::generate(), job, Utc::now());
        debug!("Creating job in memory: id={}, title={}", job.id, job.title);

        self.jobs.write().await.push(job.clone());
        Ok(job)
    }

    async fn insert_many(&self, jobs: Vec<NewJob>) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut stored = self.jobs.write().await;
        let count = jobs.len() as u64;

        stored.extend(jobs.into_iter().map(|job| Job::from_new(JobId::generate(), job, now)));
        debug!("Bulk insert completed: {} jobs stored in memory", count);
        Ok(count)
    }

    async fn find_all(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.jobs.read().await.clone())
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.read().await.iter().find(|job| job.id == id).cloned())
    }

    async fn update_by_id(&self, id: JobId, patch: JobPatch) -> Result<Option<Job>, StoreError> {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.iter_mut().find(|job| job.id == id) else {
            return Ok(None);
        };

        job.apply(patch, Utc::now());
        debug!("Updated job in memory: id={}", id);
        Ok(Some(job.clone()))
    }

    async fn delete_by_id(&self, id: JobId) -> Result<bool, StoreError> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|job| job.id != id);
        Ok(jobs.len() < before)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut jobs = self.jobs.write().await;
        let count = jobs.len() as u64;
        jobs.clear();
        Ok(count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::{CompanyPatch, NewCompany};

    fn new_job(title: &str, company: &str) -> NewJob {
        NewJob {
            title: title.to_string(),
            job_type: "Full-Time".to_string(),
            description: format!("{} duties", title),
            company: NewCompany {
                name: company.to_string(),
                contact_email: None,
                contact_phone: None,
            },
        }
    }

    #[actix_web::test]
    async fn find_all_returns_jobs_in_insertion_order() {
        let store = MemoryJobStore::new();
        store.insert(new_job("Web Developer", "WebWorks")).await.unwrap();
        store
            .insert_many(vec![
                new_job("Marketing Specialist", "AdVision"),
                new_job("Product Owner", "Tech Innovations"),
            ])
            .await
            .unwrap();

        let titles: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|job| job.title)
            .collect();
        assert_eq!(titles, ["Web Developer", "Marketing Specialist", "Product Owner"]);
    }

    #[actix_web::test]
    async fn insert_then_find_returns_same_record() {
        let store = MemoryJobStore::new();
        let created = store.insert(new_job("Web Developer", "WebWorks")).await.unwrap();

        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[actix_web::test]
    async fn unknown_id_is_absent() {
        let store = MemoryJobStore::new();
        store.insert(new_job("Web Developer", "WebWorks")).await.unwrap();

        let unknown = JobId::generate();
        assert_eq!(store.find_by_id(unknown).await.unwrap(), None);
        assert_eq!(store.update_by_id(unknown, JobPatch::default()).await.unwrap(), None);
        assert!(!store.delete_by_id(unknown).await.unwrap());
    }

    #[actix_web::test]
    async fn update_merges_into_existing_record() {
        let store = MemoryJobStore::new();
        let created = store.insert(new_job("Web Developer", "WebWorks")).await.unwrap();

        let patch = JobPatch {
            description: Some("Updated job responsibilities".to_string()),
            company: Some(CompanyPatch {
                contact_email: Some("hr@webworks.com".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let updated = store.update_by_id(created.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.description, "Updated job responsibilities");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.company.name, "WebWorks");
        assert_eq!(updated.company.contact_email.as_deref(), Some("hr@webworks.com"));
        assert_eq!(store.find_by_id(created.id).await.unwrap(), Some(updated));
    }

    #[actix_web::test]
    async fn delete_is_permanent() {
        let store = MemoryJobStore::new();
        let created = store.insert(new_job("Web Developer", "WebWorks")).await.unwrap();

        assert!(store.delete_by_id(created.id).await.unwrap());
        assert!(!store.delete_by_id(created.id).await.unwrap());
        assert_eq!(store.find_by_id(created.id).await.unwrap(), None);
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn delete_all_reports_removed_count() {
        let store = MemoryJobStore::new();
        store
            .insert_many(vec![new_job("A", "X"), new_job("B", "Y")])
            .await
            .unwrap();

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }
}
