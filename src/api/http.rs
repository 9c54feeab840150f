//! reqwest-backed [`PhotoApi`] for Unsplash-compatible endpoints.

use super::{ApiError, PhotoApi, PhotoRequest, redact_client_id};
use crate::config::ApiConfig;
use crate::types::{Image, SearchResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub struct HttpPhotoApi {
    client: reqwest::Client,
    base_url: Url,
    client_id: String,
}

impl HttpPhotoApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            client_id: config.client_id.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET the request and decode the body as `T`.
    ///
    /// Transport failures, non-success statuses, and schema mismatches are
    /// reported as distinct [`ApiError`] variants.
    async fn get_json<T: DeserializeOwned>(&self, request: &PhotoRequest) -> Result<T, ApiError> {
        let url = request.to_url(&self.base_url, &self.client_id)?;
        tracing::debug!(url = %redact_client_id(&url), "requesting photos");

        let response = self
            .client
            .get(url)
            .header("Accept-Version", "v1")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: request.endpoint().to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl PhotoApi for HttpPhotoApi {
    async fn list_photos(&self, page: u32, per_page: u32) -> Result<Vec<Image>, ApiError> {
        self.get_json(&PhotoRequest::Browse { page, per_page })
            .await
    }

    async fn search_photos(&self, query: &str, page: u32) -> Result<SearchResult, ApiError> {
        let request = PhotoRequest::Search {
            query: query.to_string(),
            page,
        };
        self.get_json(&request).await
    }
}

impl std::fmt::Debug for HttpPhotoApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPhotoApi")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
