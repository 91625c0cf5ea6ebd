use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::{
    configuration::ApifySettings,
    domain::{RawItem, RunInfo, RunInput},
};

use super::ActorService;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid actor service base url {0:?}")]
    InvalidBaseUrl(String),
    #[error("request to actor service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("actor service responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response from actor service: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Apify API v2 client bound to a single actor.
pub struct ApifyClient {
    client: Client,
    base_url: Url,
    token: String,
    actor_id: String,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Serialize)]
struct ItemsQuery {
    offset: usize,
    limit: usize,
    format: &'static str,
}

impl ApifyClient {
    pub fn new(settings: &ApifySettings) -> Result<Self, ServiceError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|_| ServiceError::InvalidBaseUrl(settings.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidBaseUrl(settings.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(ApifyClient {
            client,
            base_url,
            token: settings.token.clone(),
            actor_id: settings.actor_id.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Actor service returned {}: {}", status, body);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ActorService for ApifyClient {
    async fn start_run(&self, input: &RunInput) -> Result<RunInfo, ServiceError> {
        let url = self.endpoint(&["acts", self.actor_id.as_str(), "runs"])?;
        let envelope: DataEnvelope<RunInfo> = self.send(self.client.post(url).json(input)).await?;
        Ok(envelope.data)
    }

    async fn get_run(&self, run_id: &str) -> Result<RunInfo, ServiceError> {
        let url = self.endpoint(&["actor-runs", run_id])?;
        let envelope: DataEnvelope<RunInfo> = self.send(self.client.get(url)).await?;
        Ok(envelope.data)
    }

    async fn list_items(
        &self,
        dataset_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawItem>, ServiceError> {
        let url = self.endpoint(&["datasets", dataset_id, "items"])?;
        let query = ItemsQuery {
            offset,
            limit,
            format: "json",
        };
        self.send(self.client.get(url).query(&query)).await
    }
}
