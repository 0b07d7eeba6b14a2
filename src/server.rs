use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{health::health_config, job::handlers::job_config, job::JobService, validation};
use crate::config::Config;
use crate::db::{self, JobRepository, JobStore, MemoryJobStore};
use crate::shutdown::ShutdownCoordinator;

/// Register every HTTP route of the service
pub fn routes(config: &mut web::ServiceConfig) {
    config.configure(health_config).configure(job_config);
}

/// Open the configured job store
///
/// With a `DATABASE_URL` this connects to PostgreSQL and applies pending
/// migrations; without one the jobs live in process memory.
pub async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn JobStore>> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set, jobs will be kept in memory and lost on exit");
        return Ok(Arc::new(MemoryJobStore::new()));
    };

    let pool = db::connection::get_connection(database_url, config.max_db_connections)
        .await
        .context("Failed to connect to database")?;
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(Arc::new(JobRepository::new(pool)))
}

/// Start the HTTP server and block until it is shut down
pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting job-board application");
    info!("Configuration loaded successfully:");
    info!("  - Bind address: {}:{}", config.host, config.port);
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);

    let store = connect_store(&config).await?;
    let job_service = JobService::new(store.clone());
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(job_service.clone()))
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config(max_payload_size))
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?
    .run();

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, store)
        .wait_for_shutdown()
        .await
        .context("HTTP server failed")
}
