use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::id::JobId;

/// Company offering a job, as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

/// A stored job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub description: String,
    pub company: Company,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Company details supplied when creating a job
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Job model for creating and validating jobs
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NewJob {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub job_type: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(nested)]
    pub company: NewCompany,
}

/// Partial company update; `None` leaves the stored value alone
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    #[validate(length(min = 1, message = "Company name cannot be empty"))]
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Partial job update; only supplied fields change
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct JobPatch {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type cannot be empty"))]
    pub job_type: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[validate(nested)]
    pub company: Option<CompanyPatch>,
}

impl Job {
    /// Build a stored job from a validated creation request
    pub fn from_new(id: JobId, new: NewJob, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            job_type: new.job_type,
            description: new.description,
            company: Company {
                name: new.company.name,
                contact_email: new.company.contact_email,
                contact_phone: new.company.contact_phone,
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into this job, touching `updated_at`
    pub fn apply(&mut self, patch: JobPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(job_type) = patch.job_type {
            self.job_type = job_type;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(company) = patch.company {
            if let Some(name) = company.name {
                self.company.name = name;
            }
            if let Some(email) = company.contact_email {
                self.company.contact_email = Some(email);
            }
            if let Some(phone) = company.contact_phone {
                self.company.contact_phone = Some(phone);
            }
        }
        self.updated_at = now;
    }
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.job_type.is_none()
            && self.description.is_none()
            && self.company.as_ref().map_or(true, |c| {
                c.name.is_none() && c.contact_email.is_none() && c.contact_phone.is_none()
            })
    }
}
