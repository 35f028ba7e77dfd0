use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::config::FeedSettings;
use crate::error::{AppError, Result};
use crate::models::{Entry, FeedFetchResult};

const AUTH_HEADER: &str = "X-Auth-Token";

/// Statuses the feed service answers a successful entry update with.
const WRITE_OK: [StatusCode; 3] = [StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT];

#[derive(Debug, Serialize)]
struct UpdateEntryRequest<'a> {
    content: &'a str,
}

/// Authenticated handle on the Miniflux REST API.
pub struct FeedClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FeedClient {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("feed-annotator/1.0")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_settings(settings: &FeedSettings) -> Result<Self> {
        Self::new(&settings.base_url, settings.api_key.clone(), settings.timeout)
    }

    /// Fetch unread entries of one category.
    pub async fn fetch_unread(&self, category_id: i64) -> Result<Vec<Entry>> {
        let category = category_id.to_string();
        let response = self
            .client
            .get(format!("{}/v1/entries", self.base_url))
            .header(AUTH_HEADER, &self.api_key)
            .query(&[("status", "unread"), ("category_id", category.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::FeedApi {
                status: status.as_u16(),
                body,
            });
        }

        let result: FeedFetchResult = response.json().await?;
        tracing::debug!(
            "Fetched {} unread entries (total reported: {:?}) from category {}",
            result.entries.len(),
            result.total,
            category_id
        );

        Ok(result.entries)
    }

    /// Replace the stored content of one entry with `content`.
    ///
    /// The update is not a merge: `content` must be the complete new body.
    pub async fn write_back(&self, entry_id: i64, content: &str) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/v1/entries/{}", self.base_url, entry_id))
            .header(AUTH_HEADER, &self.api_key)
            .json(&UpdateEntryRequest { content })
            .send()
            .await?;

        let status = response.status();
        if !WRITE_OK.contains(&status) {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Failed to update entry ID {}. Status code: {}, Response: {}",
                entry_id,
                status.as_u16(),
                body
            );
            return Err(AppError::FeedApi {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
