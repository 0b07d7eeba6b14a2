use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::api::job::{Company, Job};
use super::StoreError;

/// Database representation of a job with all fields
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: String,
    pub title: String,
    #[sqlx(rename = "type")]
    pub job_type: String,
    pub description: String,
    pub company_name: String,
    pub company_contact_email: Option<String>,
    pub company_contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = StoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .trim()
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("{}", e)))?;

        Ok(Job {
            id,
            title: row.title,
            job_type: row.job_type,
            description: row.description,
            company: Company {
                name: row.company_name,
                contact_email: row.company_contact_email,
                contact_phone: row.company_contact_phone,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
