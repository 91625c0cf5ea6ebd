use std::path::{Path, PathBuf};

use crate::{
    configuration::Settings,
    domain::normalize,
    services::{
        export, ActorService, ApifyClient, ExportError, JobRunner, RunError, ServiceError,
        Sleeper, TokioSleeper,
    },
};

pub const DEFAULT_POST_URLS: [&str; 2] = [
    "https://www.tiktok.com/@idealis92/video/7545305469414411576",
    "https://www.tiktok.com/@idealis92/video/7544924362500017414",
];

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Exported { path: PathBuf, rows: usize },
    NoItems,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub fn build_runner(
    settings: &Settings,
) -> Result<JobRunner<ApifyClient, TokioSleeper>, ServiceError> {
    let client = ApifyClient::new(&settings.apify)?;
    Ok(JobRunner::new(client, TokioSleeper, settings.scraper.clone()))
}

pub fn target_urls(settings: &Settings) -> Vec<String> {
    match &settings.scraper.post_urls {
        Some(urls) => urls.clone(),
        None => DEFAULT_POST_URLS.iter().map(|u| u.to_string()).collect(),
    }
}

/// Scrape, normalize, export. Zero items skips the export.
pub async fn run<S: ActorService, Z: Sleeper>(
    runner: &JobRunner<S, Z>,
    post_urls: &[String],
    output: &Path,
) -> Result<RunOutcome, PipelineError> {
    let items = runner.run(post_urls).await?;
    if items.is_empty() {
        return Ok(RunOutcome::NoItems);
    }

    let table = normalize(&items);
    let path = export(&table, output)?;

    Ok(RunOutcome::Exported {
        path,
        rows: table.len(),
    })
}
