use std::time::Duration;

use crate::{
    configuration::ScraperSettings,
    domain::{RawItem, RunInfo, RunInput, RunStatus},
};

use super::ServiceError;

/// The remote actor: submit a run, check on it, read its dataset.
#[allow(async_fn_in_trait)]
pub trait ActorService {
    async fn start_run(&self, input: &RunInput) -> Result<RunInfo, ServiceError>;

    async fn get_run(&self, run_id: &str) -> Result<RunInfo, ServiceError>;

    async fn list_items(
        &self,
        dataset_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawItem>, ServiceError>;
}

#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy {
            max_attempts: 12,
            interval: Duration::from_secs(5),
        }
    }
}

impl PollPolicy {
    pub fn from_settings(settings: &ScraperSettings) -> Self {
        PollPolicy {
            max_attempts: settings.max_poll_attempts,
            interval: settings.poll_interval(),
        }
    }

    /// Longest time spent waiting before giving up locally.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("no post urls to scrape")]
    NoTargets,
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("remote run {run_id} failed with status {status}")]
    RemoteFailed { run_id: String, status: RunStatus },
    #[error("polling timeout: run {run_id} not finished after {attempts} checks ({waited:?})")]
    PollingTimeout {
        run_id: String,
        attempts: u32,
        waited: Duration,
    },
    #[error("run {run_id} finished without a dataset")]
    MissingDataset { run_id: String },
}

pub struct JobRunner<S, Z> {
    service: S,
    sleeper: Z,
    settings: ScraperSettings,
    policy: PollPolicy,
}

impl<S: ActorService, Z: Sleeper> JobRunner<S, Z> {
    pub fn new(service: S, sleeper: Z, settings: ScraperSettings) -> Self {
        let policy = PollPolicy::from_settings(&settings);
        JobRunner {
            service,
            sleeper,
            settings,
            policy,
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Submits one run for `post_urls`, waits for it and returns every item
    /// of its dataset. An empty dataset is a valid result.
    pub async fn run(&self, post_urls: &[String]) -> Result<Vec<RawItem>, RunError> {
        if post_urls.is_empty() {
            return Err(RunError::NoTargets);
        }

        let input = RunInput::new(post_urls.to_vec(), &self.settings);
        log::info!("Starting actor run for {} post url(s)", post_urls.len());
        let run = self.service.start_run(&input).await?;
        log::info!("Run ID: {}. Waiting for results...", run.id);

        let finished = self.wait_for_run(&run.id).await?;
        let dataset_id = finished
            .default_dataset_id
            .ok_or_else(|| RunError::MissingDataset {
                run_id: finished.id.clone(),
            })?;

        log::info!("Fetching dataset {}", dataset_id);
        let items = DatasetReader::new(&self.service, &dataset_id, self.settings.dataset_page_size)
            .collect_all()
            .await?;

        if items.is_empty() {
            log::warn!("Dataset {} has no items", dataset_id);
        } else {
            log::info!("Fetched {} item(s) from dataset {}", items.len(), dataset_id);
        }

        Ok(items)
    }

    /// Checks the run status up to `max_attempts` times, sleeping `interval`
    /// after every non-terminal answer.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunInfo, RunError> {
        for attempt in 1..=self.policy.max_attempts {
            let run = self.service.get_run(run_id).await?;
            log::info!(
                "Run {} status: {} (check {}/{})",
                run_id,
                run.status,
                attempt,
                self.policy.max_attempts
            );

            if run.status == RunStatus::Succeeded {
                return Ok(run);
            }
            if run.status.is_failure() {
                return Err(RunError::RemoteFailed {
                    run_id: run_id.to_string(),
                    status: run.status,
                });
            }

            self.sleeper.sleep(self.policy.interval).await;
        }

        Err(RunError::PollingTimeout {
            run_id: run_id.to_string(),
            attempts: self.policy.max_attempts,
            waited: self.policy.budget(),
        })
    }
}

/// Lazily pages through a dataset with offset/limit requests.
pub struct DatasetReader<'a, S> {
    service: &'a S,
    dataset_id: &'a str,
    page_size: usize,
    offset: usize,
    done: bool,
}

impl<'a, S: ActorService> DatasetReader<'a, S> {
    pub fn new(service: &'a S, dataset_id: &'a str, page_size: usize) -> Self {
        DatasetReader {
            service,
            dataset_id,
            page_size: page_size.max(1),
            offset: 0,
            done: false,
        }
    }

    /// Next non-empty page, or `None` once the dataset is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RawItem>>, ServiceError> {
        if self.done {
            return Ok(None);
        }

        let page = self
            .service
            .list_items(self.dataset_id, self.offset, self.page_size)
            .await?;
        log::debug!(
            "Dataset {} page at offset {} returned {} item(s)",
            self.dataset_id,
            self.offset,
            page.len()
        );

        self.offset += page.len();
        if page.len() < self.page_size {
            self.done = true;
        }

        if page.is_empty() {
            Ok(None)
        } else {
            Ok(Some(page))
        }
    }

    pub async fn collect_all(mut self) -> Result<Vec<RawItem>, ServiceError> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page);
        }
        Ok(items)
    }
}
