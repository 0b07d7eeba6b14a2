/// Error details for a job that failed validation during bulk creation
#[derive(Debug)]
pub struct JobError {
    pub title: String,
    pub errors: Vec<String>,
}

/// Summary of a bulk job creation
#[derive(Debug)]
pub struct BulkJobResponse {
    pub created: usize,
    pub errors: Vec<JobError>,
}
