//! HTTP client for the remote tracker API.
//!
//! The tracker authenticates every request with a key/token pair passed as
//! query parameters. Responses are JSON; uploads are multipart.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Errors from tracker synchronization.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Tracker configuration error: {0}")]
    Configuration(String),

    #[error("Tracker request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tracker API error: status {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// A list as known to the remote tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerList {
    pub id: String,
    pub name: String,
}

/// A card as known to the remote tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

/// An attachment on a remote card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerAttachment {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Client for the remote tracker REST API.
#[derive(Debug, Clone)]
pub struct TrackerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_token: String,
    board_id: String,
}

impl TrackerClient {
    /// Create a client for one remote board.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_token: impl Into<String>,
        board_id: impl Into<String>,
    ) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(TrackerClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_token: api_token.into(),
            board_id: board_id.into(),
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Environment Variables
    /// - `TRACKER_BASE_URL` (required): API base URL
    /// - `TRACKER_API_KEY` (required): API key
    /// - `TRACKER_API_TOKEN` (required): API token
    /// - `TRACKER_BOARD_ID` (required): Remote board identifier
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create a client from an arbitrary variable lookup. [`from_env`] passes
    /// the process environment; tests pass their own map.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SyncError> {
        let var = |name: &str| {
            lookup(name).ok_or_else(|| SyncError::Configuration(format!("{} must be set", name)))
        };
        Self::new(
            var("TRACKER_BASE_URL")?,
            var("TRACKER_API_KEY")?,
            var("TRACKER_API_TOKEN")?,
            var("TRACKER_BOARD_ID")?,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [("key", self.api_key.as_str()), ("token", self.api_token.as_str())]
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SyncError::Api { status, body })
    }

    /// Create a list on the remote board.
    pub async fn create_list(&self, name: &str) -> Result<TrackerList, SyncError> {
        let response = self
            .http
            .post(self.url("lists"))
            .query(&self.auth())
            .query(&[("name", name), ("idBoard", self.board_id.as_str())])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Rename a remote list.
    pub async fn rename_list(&self, list_id: &str, name: &str) -> Result<TrackerList, SyncError> {
        let response = self
            .http
            .put(self.url(&format!("lists/{}", list_id)))
            .query(&self.auth())
            .query(&[("name", name)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Archive a remote list. The tracker has no hard delete for lists.
    pub async fn archive_list(&self, list_id: &str) -> Result<(), SyncError> {
        let response = self
            .http
            .put(self.url(&format!("lists/{}/closed", list_id)))
            .query(&self.auth())
            .query(&[("value", "true")])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Create a card in a remote list, optionally with a due date
    /// (`YYYY-MM-DD`).
    pub async fn create_card(
        &self,
        list_id: &str,
        name: &str,
        desc: &str,
        due: Option<&str>,
    ) -> Result<TrackerCard, SyncError> {
        let mut request = self
            .http
            .post(self.url("cards"))
            .query(&self.auth())
            .query(&[("idList", list_id), ("name", name), ("desc", desc)]);
        if let Some(due) = due {
            request = request.query(&[("due", due)]);
        }
        let response = request.send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Update name and description of a remote card.
    pub async fn update_card(
        &self,
        card_id: &str,
        name: &str,
        desc: &str,
    ) -> Result<TrackerCard, SyncError> {
        let response = self
            .http
            .put(self.url(&format!("cards/{}", card_id)))
            .query(&self.auth())
            .query(&[("name", name), ("desc", desc)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Delete a remote card.
    pub async fn delete_card(&self, card_id: &str) -> Result<(), SyncError> {
        let response = self
            .http
            .delete(self.url(&format!("cards/{}", card_id)))
            .query(&self.auth())
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Move a remote card to another remote list.
    pub async fn move_card(&self, card_id: &str, list_id: &str) -> Result<(), SyncError> {
        let response = self
            .http
            .put(self.url(&format!("cards/{}", card_id)))
            .query(&self.auth())
            .query(&[("idList", list_id)])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// List attachments on a remote card.
    pub async fn list_attachments(
        &self,
        card_id: &str,
    ) -> Result<Vec<TrackerAttachment>, SyncError> {
        let response = self
            .http
            .get(self.url(&format!("cards/{}/attachments", card_id)))
            .query(&self.auth())
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Upload a file attachment to a remote card.
    pub async fn upload_attachment(
        &self,
        card_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<TrackerAttachment, SyncError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(self.url(&format!("cards/{}/attachments", card_id)))
            .query(&self.auth())
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Delete an attachment from a remote card.
    pub async fn delete_attachment(
        &self,
        card_id: &str,
        attachment_id: &str,
    ) -> Result<(), SyncError> {
        let response = self
            .http
            .delete(self.url(&format!("cards/{}/attachments/{}", card_id, attachment_id)))
            .query(&self.auth())
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
