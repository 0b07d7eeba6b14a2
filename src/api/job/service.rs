use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::sync::Arc;
use tracing::{error, info, warn};
use validator::{Validate, ValidationErrors};

use crate::api::validation::{ErrorResponse, validation_fields};
use crate::db::{JobStore, StoreError};
use super::dto::{BulkJobResponse, JobError};
use super::id::{InvalidJobId, JobId};
use super::models::{Job, JobPatch, NewJob};

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Validation failed
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Path id is not a well-formed job id
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidJobId),

    /// Job not found
    #[error("job not found: {0}")]
    NotFound(JobId),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Validation(_) | ServiceError::InvalidIdentifier(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ServiceError::Store(e) => {
                error!("Store error: {}", e);
                ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                }
            }
            ServiceError::Validation(errors) => {
                warn!("Validation error: {}", errors);
                ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: validation_fields(errors),
                }
            }
            ServiceError::InvalidIdentifier(e) => {
                warn!("Invalid job id: {}", e.0);
                ErrorResponse {
                    error: "Invalid job id".to_string(),
                    fields: serde_json::json!({"message": e.to_string()}),
                }
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": format!("Job with id {} not found", id)}),
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Job service containing business logic
#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    /// Create a new JobService over the given store
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// All stored jobs, in insertion order
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ServiceError> {
        let jobs = self.store.find_all().await?;
        info!("Service: Listed {} jobs", jobs.len());
        Ok(jobs)
    }

    /// Create a single job
    ///
    /// The body has already been validated by the extractor; validation is
    /// repeated here so callers outside the HTTP layer get the same rules.
    pub async fn create_job(&self, job: NewJob) -> Result<Job, ServiceError> {
        job.validate()?;
        info!("Service: Creating job with title={}", job.title);

        let job = self.store.insert(job).await?;

        info!("Service: Job created successfully with id={}", job.id);
        Ok(job)
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, ServiceError> {
        let id: JobId = id.parse()?;

        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Apply a partial update
    ///
    /// Only the supplied fields change. An empty patch returns the stored
    /// job untouched.
    pub async fn update_job(&self, id: &str, patch: JobPatch) -> Result<Job, ServiceError> {
        let id: JobId = id.parse()?;
        patch.validate()?;

        if patch.is_empty() {
            info!("Service: Empty update for job id={}, returning stored record", id);
            return self.store.find_by_id(id).await?.ok_or(ServiceError::NotFound(id));
        }

        let job = self
            .store
            .update_by_id(id, patch)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        info!("Service: Job updated successfully with id={}", job.id);
        Ok(job)
    }

    /// Delete a job; returns whether anything was removed
    pub async fn delete_job(&self, id: &str) -> Result<bool, ServiceError> {
        let id: JobId = id.parse()?;

        let deleted = self.store.delete_by_id(id).await?;
        if deleted {
            info!("Service: Job deleted with id={}", id);
        } else {
            warn!("Service: Delete requested for unknown job id={}", id);
        }
        Ok(deleted)
    }

    /// Bulk create jobs, e.g. from a seed file
    ///
    /// # Business Logic
    /// - Validates each job individually
    /// - Collects validation errors with job titles
    /// - Bulk inserts only valid jobs
    /// - Returns summary with created count and errors
    pub async fn bulk_create_jobs(&self, jobs: Vec<NewJob>) -> Result<BulkJobResponse, ServiceError> {
        info!("Service: Processing bulk job creation for {} jobs", jobs.len());

        let mut valid_jobs = Vec::new();
        let mut errors = Vec::new();

        for job in jobs {
            if let Err(validation_errors) = job.validate() {
                warn!("Service: Validation failed for job: {}", job.title);
                errors.push(JobError {
                    title: job.title,
                    errors: error_messages(&validation_errors),
                });
            } else {
                valid_jobs.push(job);
            }
        }

        let created_count = if !valid_jobs.is_empty() {
            info!("Service: Bulk inserting {} valid jobs", valid_jobs.len());
            self.store.insert_many(valid_jobs).await? as usize
        } else {
            warn!("Service: No valid jobs to insert");
            0
        };

        let error_count = errors.len();
        if error_count == 0 {
            info!("Service: Bulk job creation completed successfully: {} jobs created", created_count);
        } else {
            warn!("Service: Bulk job creation completed with {} validation errors", error_count);
        }

        Ok(BulkJobResponse {
            created: created_count,
            errors,
        })
    }

    /// Remove every job, returning how many were removed
    pub async fn clear_jobs(&self) -> Result<u64, ServiceError> {
        let removed = self.store.delete_all().await?;
        info!("Service: Removed {} jobs", removed);
        Ok(removed)
    }
}

/// Flatten nested validation errors into their messages
fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Validation error in field: {}", field))
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, out),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect_messages(inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::NewCompany;
    use crate::db::MemoryJobStore;
    use actix_web::body::to_bytes;

    fn service() -> JobService {
        JobService::new(Arc::new(MemoryJobStore::new()))
    }

    fn new_job(title: &str, company: &str) -> NewJob {
        NewJob {
            title: title.to_string(),
            job_type: "Full-Time".to_string(),
            description: "Oversee product development from start to finish.".to_string(),
            company: NewCompany {
                name: company.to_string(),
                contact_email: Some("careers@techinnovations.com".to_string()),
                contact_phone: Some("777888999".to_string()),
            },
        }
    }

    #[actix_web::test]
    async fn malformed_id_is_distinct_from_missing_job() {
        let service = service();

        let malformed = service.get_job("12345").await.unwrap_err();
        assert!(matches!(malformed, ServiceError::InvalidIdentifier(_)));
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

        let missing = service.get_job(&JobId::generate().to_string()).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_id_is_rejected_on_update_and_delete() {
        let service = service();

        let update = service.update_job("12345", JobPatch::default()).await.unwrap_err();
        assert!(matches!(update, ServiceError::InvalidIdentifier(_)));

        let delete = service.delete_job("12345").await.unwrap_err();
        assert!(matches!(delete, ServiceError::InvalidIdentifier(_)));
    }

    #[actix_web::test]
    async fn create_rejects_blank_required_fields() {
        let mut job = new_job("Product Owner", "Tech Innovations");
        job.description = String::new();

        let err = service().create_job(job).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn empty_patch_returns_stored_job() {
        let service = service();
        let created = service.create_job(new_job("Product Owner", "Tech Innovations")).await.unwrap();

        let same = service
            .update_job(&created.id.to_string(), JobPatch::default())
            .await
            .unwrap();
        assert_eq!(same, created);
    }

    #[actix_web::test]
    async fn empty_patch_on_unknown_job_is_not_found() {
        let err = service()
            .update_job(&JobId::generate().to_string(), JobPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[actix_web::test]
    async fn bulk_create_skips_invalid_jobs() {
        let service = service();
        let mut invalid = new_job("Broken", "Nowhere");
        invalid.company.name = String::new();

        let summary = service
            .bulk_create_jobs(vec![new_job("Product Owner", "Tech Innovations"), invalid])
            .await
            .unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].title, "Broken");
        assert_eq!(summary.errors[0].errors, ["Company name is required"]);
        assert_eq!(service.list_jobs().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn not_found_renders_json_error_body() {
        let id = JobId::generate();
        let response = ServiceError::NotFound(id).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Not found");
        assert_eq!(value["fields"]["message"], format!("Job with id {} not found", id));
    }
}
