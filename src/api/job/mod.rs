pub mod dto;
pub mod handlers;
pub mod id;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use id::{InvalidJobId, JobId};
pub use models::{Company, CompanyPatch, Job, JobPatch, NewCompany, NewJob};
pub use service::{JobService, ServiceError};
