use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::notify::NotificationSink;

/// Posts to Slack through the Web API with a bot token.
pub struct SlackNotifier {
    http: reqwest::Client,
    token: Option<String>,
    api_url: String,
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    error: Option<String>,
}

impl SlackNotifier {
    pub fn new(http: reqwest::Client, token: String, api_url: impl Into<String>) -> Self {
        Self {
            http,
            token: Some(token),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// A notifier that accepts and drops everything.
    pub fn disabled() -> Self {
        Self {
            http: reqwest::Client::new(),
            token: None,
            api_url: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    async fn check(resp: reqwest::Response, method: &str) -> Result<()> {
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Notify(format!("{method} returned HTTP {status}")));
        }
        let body: SlackResponse = resp.json().await?;
        if body.ok {
            Ok(())
        } else {
            Err(AppError::Notify(format!(
                "{method} failed: {}",
                body.error.unwrap_or_else(|| "unknown error".to_string())
            )))
        }
    }
}

#[async_trait]
impl NotificationSink for SlackNotifier {
    async fn send_message(&self, channel: &str, text: &str) -> Result<()> {
        let Some(token) = &self.token else {
            debug!("Slack disabled, dropping message for {channel}");
            return Ok(());
        };
        let resp = self
            .http
            .post(format!("{}/chat.postMessage", self.api_url))
            .bearer_auth(token)
            .json(&PostMessageRequest { channel, text })
            .send()
            .await?;
        Self::check(resp, "chat.postMessage").await?;
        info!("Posted message to {channel}");
        Ok(())
    }

    async fn send_file(&self, channel: &str, path: &Path) -> Result<()> {
        let Some(token) = &self.token else {
            debug!("Slack disabled, dropping file {} for {channel}", path.display());
            return Ok(());
        };
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        let form = Form::new()
            .text("channels", channel.to_string())
            .part("file", Part::bytes(bytes).file_name(file_name));

        let resp = self
            .http
            .post(format!("{}/files.upload", self.api_url))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        Self::check(resp, "files.upload").await?;
        info!("Uploaded {} to {channel}", path.display());
        Ok(())
    }
}
