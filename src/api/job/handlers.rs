use actix_web::{
    HttpResponse, delete, get, post, put,
    web::{Data, Path, ServiceConfig, scope},
};
use actix_web_validator::Json;

use super::models::{JobPatch, NewJob};
use super::service::{JobService, ServiceError};

#[get("")]
async fn list_jobs(service: Data<JobService>) -> Result<HttpResponse, ServiceError> {
    let jobs = service.list_jobs().await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[post("")]
async fn create_job(
    service: Data<JobService>,
    job: Json<NewJob>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.create_job(job.into_inner()).await?;
    Ok(HttpResponse::Created().json(job))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    id: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(&id).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[put("/{id}")]
async fn update_job(
    service: Data<JobService>,
    id: Path<String>,
    patch: Json<JobPatch>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.update_job(&id, patch.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// Responds 204 whether or not a job was removed; only a malformed id fails
#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    id: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    service.delete_job(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/jobs")
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(update_job)
            .service(delete_job),
    );
}
