//! Outbound notifications: the sink seam, its Slack implementation and the
//! mode-gated dispatcher.

pub mod dispatcher;
pub mod slack;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub use dispatcher::Dispatcher;
pub use slack::SlackNotifier;

/// Where alert and report messages go.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send_message(&self, channel: &str, text: &str) -> Result<()>;

    async fn send_file(&self, channel: &str, path: &Path) -> Result<()>;
}
