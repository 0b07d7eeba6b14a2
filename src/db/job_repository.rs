use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;

use crate::api::job::{Job, JobId, JobPatch, NewJob};
use crate::db::models::JobRow;
use super::{JobStore, StoreError};

const JOB_COLUMNS: &str = r#"id, title, "type", description, company_name,
    company_contact_email, company_contact_phone, created_at, updated_at"#;

/// Insertion order; rows from one bulk insert share `created_at`
const ORDER_BY_INSERTION: &str = "ORDER BY seq";

/// Rows per INSERT statement when bulk inserting (9 binds per row)
const BULK_CHUNK: usize = 1000;

/// PostgreSQL-backed job store
#[derive(Clone)]
pub struct JobRepository {
    pool: Pool<Postgres>,
}

impl JobRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn into_jobs(rows: Vec<JobRow>) -> Result<Vec<Job>, StoreError> {
    rows.into_iter().map(Job::try_from).collect()
}

#[async_trait]
impl JobStore for JobRepository {
    async fn insert(&self, job: NewJob) -> Result<Job, StoreError> {
        let id = JobId::generate();
        debug!("Creating job: id={}, title={}", id, job.title);

        let now = Utc::now();
        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            INSERT INTO jobs (id, title, "type", description, company_name,
                company_contact_email, company_contact_phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id.to_string())
        .bind(&job.title)
        .bind(&job.job_type)
        .bind(&job.description)
        .bind(&job.company.name)
        .bind(&job.company.contact_email)
        .bind(&job.company.contact_phone)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!("Job created with id={}", row.id);
        row.try_into()
    }

    async fn insert_many(&self, jobs: Vec<NewJob>) -> Result<u64, StoreError> {
        if jobs.is_empty() {
            debug!("Bulk create called with empty job list");
            return Ok(0);
        }

        debug!("Starting bulk insert of {} jobs", jobs.len());

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut rows_affected = 0;

        for chunk in jobs.chunks(BULK_CHUNK) {
            let mut builder = QueryBuilder::<Postgres>::new(
                r#"INSERT INTO jobs (id, title, "type", description, company_name,
                    company_contact_email, company_contact_phone, created_at, updated_at) "#,
            );
            builder.push_values(chunk, |mut b, job| {
                b.push_bind(JobId::generate().to_string())
                    .push_bind(job.title.clone())
                    .push_bind(job.job_type.clone())
                    .push_bind(job.description.clone())
                    .push_bind(job.company.name.clone())
                    .push_bind(job.company.contact_email.clone())
                    .push_bind(job.company.contact_phone.clone())
                    .push_bind(now)
                    .push_bind(now);
            });

            rows_affected += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        debug!("Bulk insert completed: {} rows inserted", rows_affected);

        Ok(rows_affected)
    }

    async fn find_all(&self) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs {ORDER_BY_INSERTION}"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched {} jobs", rows.len());
        into_jobs(rows)
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        debug!("Fetching job id={}", id);

        sqlx::query_as::<_, JobRow>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(Job::try_from)
            .transpose()
    }

    async fn update_by_id(&self, id: JobId, patch: JobPatch) -> Result<Option<Job>, StoreError> {
        debug!("Updating job id={}", id);

        let company = patch.company.unwrap_or_default();
        sqlx::query_as::<_, JobRow>(&format!(
            r#"
            UPDATE jobs SET
                title = COALESCE($2, title),
                "type" = COALESCE($3, "type"),
                description = COALESCE($4, description),
                company_name = COALESCE($5, company_name),
                company_contact_email = COALESCE($6, company_contact_email),
                company_contact_phone = COALESCE($7, company_contact_phone),
                updated_at = $8
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id.to_string())
        .bind(patch.title)
        .bind(patch.job_type)
        .bind(patch.description)
        .bind(company.name)
        .bind(company.contact_email)
        .bind(company.contact_phone)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .map(Job::try_from)
        .transpose()
    }

    async fn delete_by_id(&self, id: JobId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        debug!("Delete job id={}: {} rows affected", id, result.rows_affected());
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM jobs").execute(&self.pool).await?;
        debug!("Deleted all jobs: {} rows affected", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATE_JOBS: &str = include_str!("../../migrations/20250101000000_create_jobs.sql");

    #[test]
    fn listing_orders_by_serial_column_not_timestamp() {
        assert_eq!(ORDER_BY_INSERTION, "ORDER BY seq");
        assert!(CREATE_JOBS.contains("seq BIGSERIAL NOT NULL UNIQUE"));
    }

    #[test]
    fn bulk_chunk_stays_under_postgres_bind_limit() {
        assert!(BULK_CHUNK * 9 <= u16::MAX as usize);
    }
}
