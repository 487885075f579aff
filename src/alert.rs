//! Operator alerting.
//!
//! End users never see error detail; operators get a structured alert with
//! the server, the failing command if any, and the error kind. Alerts always
//! reach the log; when an operator channel is configured they are mirrored
//! to Discord as well.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::ChannelId;
use serenity::http::Http;

/// One operator-visible alert.
#[derive(Debug, Clone)]
pub struct OperatorAlert {
    pub platform_id: String,
    pub command_name: Option<String>,
    /// Machine-readable error class, e.g. `gateway_timeout`.
    pub kind: String,
    pub message: String,
}

impl OperatorAlert {
    fn render(&self) -> String {
        match &self.command_name {
            Some(command) => format!(
                "[{}] server {} command '{}': {}",
                self.kind, self.platform_id, command, self.message
            ),
            None => format!(
                "[{}] server {}: {}",
                self.kind, self.platform_id, self.message
            ),
        }
    }
}

/// Destination for operator alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn alert(&self, alert: OperatorAlert);
}

/// Log-only sink, used when no operator channel is configured.
pub struct TracingAlertSink;

#[async_trait]
impl AlertSink for TracingAlertSink {
    async fn alert(&self, alert: OperatorAlert) {
        tracing::error!(
            platform_id = %alert.platform_id,
            command = alert.command_name.as_deref().unwrap_or("-"),
            kind = %alert.kind,
            "{}",
            alert.message
        );
    }
}

/// Sink that mirrors alerts into a Discord channel.
///
/// Logging happens first, so an unreachable channel never loses the alert.
pub struct DiscordAlertSink {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordAlertSink {
    pub fn new(http: Arc<Http>, channel_id: u64) -> Self {
        Self {
            http,
            channel_id: ChannelId::new(channel_id),
        }
    }
}

#[async_trait]
impl AlertSink for DiscordAlertSink {
    async fn alert(&self, alert: OperatorAlert) {
        TracingAlertSink.alert(alert.clone()).await;

        if let Err(e) = self.channel_id.say(&self.http, alert.render()).await {
            tracing::error!("Failed to deliver operator alert to channel: {:?}", e);
        }
    }
}
