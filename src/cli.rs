use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::job::dto::{BulkJobResponse, JobError};
use crate::api::job::{JobService, NewJob};
use crate::config::Config;
use crate::db::{self, JobStore};
use crate::server;

#[derive(Debug, Parser)]
#[command(name = "job-board", about = "REST API for job postings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Bulk insert jobs from a JSON array file
    Seed {
        file: PathBuf,
        /// Delete all existing jobs first
        #[arg(long)]
        replace: bool,
    },
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::serve(config).await,
        Command::Migrate => migrate(&config).await,
        Command::Seed { file, replace } => seed(&config, file, replace).await,
    }
}

async fn migrate(config: &Config) -> anyhow::Result<()> {
    let Some(database_url) = config.database_url.as_deref() else {
        bail!("DATABASE_URL must be set to run migrations");
    };

    let pool = db::connection::get_connection(database_url, config.max_db_connections)
        .await
        .context("Failed to connect to database")?;
    db::migrations::run_migrations(&pool).await?;
    pool.close().await;
    Ok(())
}

async fn seed(config: &Config, file: PathBuf, replace: bool) -> anyhow::Result<()> {
    if config.database_url.is_none() {
        warn!("Seeding the in-memory store; the jobs will be discarded on exit");
    }

    let contents = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let store = server::connect_store(config).await?;
    let result = seed_store(store.clone(), &contents, replace).await;
    store.close().await;

    let summary = result.with_context(|| format!("Failed to seed jobs from {}", file.display()))?;
    info!(
        "Seeding from {} completed. {} created, {} failed",
        file.display(),
        summary.created,
        summary.errors.len()
    );
    for error in &summary.errors {
        warn!("Skipped job '{}': {}", error.title, error.errors.join("; "));
    }
    Ok(())
}

/// Insert the jobs of a seed file into `store`, optionally clearing it first
///
/// Entries that fail to deserialize or validate are reported in the
/// summary instead of aborting the whole file.
async fn seed_store(
    store: Arc<dyn JobStore>,
    contents: &str,
    replace: bool,
) -> anyhow::Result<BulkJobResponse> {
    let (jobs, mut errors) =
        parse_seed(contents).context("Seed file must contain a JSON array of jobs")?;
    let service = JobService::new(store);

    if replace {
        service.clear_jobs().await?;
    }

    let mut summary = service.bulk_create_jobs(jobs).await?;
    summary.errors.append(&mut errors);
    Ok(summary)
}

/// Split a seed file into jobs that deserialize and per-entry errors for
/// those that do not
fn parse_seed(contents: &str) -> Result<(Vec<NewJob>, Vec<JobError>), serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(contents)?;
    let mut jobs = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();

    for entry in entries {
        let title = entry
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or("<untitled>")
            .to_string();

        match serde_json::from_value::<NewJob>(entry) {
            Ok(job) => jobs.push(job),
            Err(e) => errors.push(JobError {
                title,
                errors: vec![e.to_string()],
            }),
        }
    }

    Ok((jobs, errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::NewCompany;
    use crate::db::MemoryJobStore;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::parse_from(["job-board"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_seed_arguments() {
        let cli = Cli::parse_from(["job-board", "seed", "jobs.json", "--replace"]);
        match cli.command {
            Some(Command::Seed { file, replace }) => {
                assert_eq!(file, PathBuf::from("jobs.json"));
                assert!(replace);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn seed_file_separates_malformed_entries() {
        let (jobs, errors) = parse_seed(
            r#"[
                {
                    "title": "Web Developer",
                    "type": "Full-Time",
                    "description": "Build and maintain websites.",
                    "company": { "name": "WebWorks", "contactEmail": "hr@webworks.com" }
                },
                { "title": "Marketing Specialist", "type": "Part-Time" }
            ]"#,
        )
        .unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company.name, "WebWorks");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].title, "Marketing Specialist");
        assert!(errors[0].errors[0].contains("missing field"));
    }

    #[test]
    fn seed_file_must_be_an_array() {
        assert!(parse_seed(r#"{"title": "Web Developer"}"#).is_err());
    }

    const SEED_FILE: &str = r#"[
        {
            "title": "Product Owner",
            "type": "Full-Time",
            "description": "Oversee product development from start to finish.",
            "company": { "name": "Tech Innovations" }
        },
        {
            "title": "Data Analyst",
            "type": "Contract",
            "description": "Turn raw data into reports.",
            "company": { "name": "" }
        },
        { "title": "Designer" }
    ]"#;

    fn existing_job() -> NewJob {
        NewJob {
            title: "Web Developer".to_string(),
            job_type: "Full-Time".to_string(),
            description: "Build and maintain websites.".to_string(),
            company: NewCompany {
                name: "WebWorks".to_string(),
                contact_email: None,
                contact_phone: None,
            },
        }
    }

    #[actix_web::test]
    async fn seeding_appends_valid_jobs_and_reports_the_rest() {
        let store = Arc::new(MemoryJobStore::new());
        store.insert(existing_job()).await.unwrap();

        let summary = seed_store(store.clone(), SEED_FILE, false).await.unwrap();
        assert_eq!(summary.created, 1);

        let mut skipped: Vec<&str> = summary.errors.iter().map(|e| e.title.as_str()).collect();
        skipped.sort();
        assert_eq!(skipped, ["Data Analyst", "Designer"]);

        let titles: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|job| job.title)
            .collect();
        assert_eq!(titles, ["Web Developer", "Product Owner"]);
    }

    #[actix_web::test]
    async fn seeding_with_replace_removes_existing_jobs() {
        let store = Arc::new(MemoryJobStore::new());
        store.insert(existing_job()).await.unwrap();

        seed_store(store.clone(), SEED_FILE, true).await.unwrap();

        let jobs = store.find_all().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Product Owner");
        assert_eq!(jobs[0].company.name, "Tech Innovations");
    }

    #[actix_web::test]
    async fn seeding_rejects_non_array_file_without_touching_store() {
        let store = Arc::new(MemoryJobStore::new());
        store.insert(existing_job()).await.unwrap();

        assert!(seed_store(store.clone(), r#"{"title": "Web Developer"}"#, true).await.is_err());
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn seeds_from_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, SEED_FILE).unwrap();

        seed(&Config::default(), path, true).await.unwrap();
    }

    #[actix_web::test]
    async fn seeding_a_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(seed(&Config::default(), dir.path().join("absent.json"), false).await.is_err());
    }
}
