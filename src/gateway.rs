//! The narrow interface between the sync core and the chat gateway.
//!
//! The core never talks to the transport directly. Inbound, the connection
//! layer translates transport callbacks into `GatewayEvent`s on a channel
//! consumed by the sync coordinator. Outbound, command registration goes
//! through the `CommandGateway` trait so the registry can be exercised
//! against a recording fake in tests. Wire encoding belongs entirely to the
//! transport side of this boundary.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::command::CommandDescriptor;

/// Inbound events delivered by the gateway transport.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// Membership snapshot on connect or reconnect. Stored servers absent
    /// from the snapshot left while the process was down.
    Connected { server_ids: Vec<String> },
    /// A server became available: startup, join, rename, or outage recovery.
    ServerAvailable {
        platform_id: String,
        display_name: String,
    },
    /// The gateway evicted the bot from a server.
    ServerRemoved { platform_id: String },
    /// A user invoked a command. Consumed for belief-state drift checks;
    /// the interaction reply itself happens at the transport edge.
    CommandInvoked {
        platform_id: String,
        command_name: String,
    },
}

/// Failures of outbound registration calls.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// The call did not complete within its deadline. Transient.
    #[error("Gateway call timed out")]
    Timeout,

    /// The gateway rejected the call.
    #[error("Gateway rejected the call: {0}")]
    Remote(String),
}

/// Outbound command-registration calls.
///
/// Implementations perform one remote call per method and return the
/// gateway-assigned registration id. Deadlines are applied by the caller,
/// not the implementation.
#[async_trait]
pub trait CommandGateway: Send + Sync {
    /// Registers a new command, returning the remote registration id.
    async fn register_command(
        &self,
        platform_id: &str,
        command: &CommandDescriptor,
    ) -> Result<String, GatewayError>;

    /// Replaces the schema of an existing registration, returning the
    /// (possibly re-assigned) remote registration id.
    async fn update_command(
        &self,
        platform_id: &str,
        remote_id: &str,
        command: &CommandDescriptor,
    ) -> Result<String, GatewayError>;

    /// Deletes an existing registration.
    async fn delete_command(&self, platform_id: &str, remote_id: &str)
        -> Result<(), GatewayError>;
}
