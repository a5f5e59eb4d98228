use std::collections::HashMap;

use deckwise::DeckProgress;
use deckwise::dto::{DeckRequestDto, DeleteStatesDto, DeletedDto, RecordReviewDto, ReviewOutcomeDto};
use deckwise::models::{CardIdentity, ContentFingerprint, ReviewState};
use deckwise::scheduler::ReviewPreview;
use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;

/// Error type for CLI client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server returned an error status with a message body
    #[error("Server error ({}): {message}", .status.as_u16())]
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    /// The configured server URL cannot carry a path
    #[error("Invalid server URL {0}")]
    InvalidUrl(String),
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<Value>().await {
            Ok(body) => body
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// HTTP client wrapper for communicating with the Deckwise server
pub struct DeckwiseClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    client: Client,
}

impl DeckwiseClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Builds `{base_url}/{segments...}`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Records a review of one card
    pub async fn record_review(
        &self,
        user_id: &str,
        card_identity: CardIdentity,
        content_hash: ContentFingerprint,
        quality: i32,
    ) -> Result<ReviewOutcomeDto, ClientError> {
        let url = self.endpoint(&["users", user_id, "reviews"])?;
        let dto = RecordReviewDto {
            card_identity,
            content_hash,
            quality,
        };
        let response = self.client.post(url).json(&dto).send().await?.check().await?;
        Ok(response.json().await?)
    }

    /// Previews the review buttons of one card
    pub async fn preview_review(
        &self,
        user_id: &str,
        card_identity: &CardIdentity,
        content_hash: &ContentFingerprint,
    ) -> Result<Vec<ReviewPreview>, ClientError> {
        let url = self.endpoint(&["users", user_id, "cards", card_identity.as_str(), "preview"])?;
        let response = self
            .client
            .get(url)
            .query(&[("content_hash", content_hash.as_str())])
            .send()
            .await?
            .check()
            .await?;
        Ok(response.json().await?)
    }

    /// Fetches the progress view of a deck
    pub async fn deck_progress(&self, user_id: &str, cards: Value) -> Result<DeckProgress, ClientError> {
        let url = self.endpoint(&["users", user_id, "deck-progress"])?;
        let dto = DeckRequestDto { cards };
        let response = self.client.post(url).json(&dto).send().await?.check().await?;
        Ok(response.json().await?)
    }

    /// Bulk loads stored states; unseen cards are absent
    pub async fn load_states(
        &self,
        user_id: &str,
        cards: &[CardIdentity],
    ) -> Result<HashMap<CardIdentity, ReviewState>, ClientError> {
        let url = self.endpoint(&["users", user_id, "states"])?;
        let params: Vec<(&str, &str)> = cards.iter().map(|c| ("card_identity", c.as_str())).collect();
        let response = self.client.get(url).query(&params).send().await?.check().await?;
        Ok(response.json().await?)
    }

    /// Deletes the user's progress on `cards`
    pub async fn delete_states(&self, user_id: &str, cards: Vec<CardIdentity>) -> Result<DeletedDto, ClientError> {
        let url = self.endpoint(&["users", user_id, "states"])?;
        let dto = DeleteStatesDto { card_identities: cards };
        let response = self.client.delete(url).json(&dto).send().await?.check().await?;
        Ok(response.json().await?)
    }
}
