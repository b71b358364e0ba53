//! NATS transport for the simulation kernel.
//!
//! Outbound: each subject is fed by a [`ChannelSink`] of capacity
//! [`OUTBOUND_CAPACITY`]. A forwarder task drains the receiving half,
//! encodes each message as JSON and publishes it. When the forwarder is
//! busy the sink drops new messages instead of queueing them.
//!
//! Inbound: a subscriber task decodes JSON [`VelocityCommand`]s from the
//! velocity subject and hands them to [`VelocityIngress`].

use futures::StreamExt as _;
use serde::Serialize;
use swarmsim_core::ingress::{IngressOutcome, VelocityIngress};
use swarmsim_core::sink::ChannelSink;
use swarmsim_types::VelocityCommand;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::EngineError;

/// Depth of every outbound channel.
pub const OUTBOUND_CAPACITY: usize = 1;

/// Create an outbound sink for `subject` and spawn its forwarder.
///
/// The forwarder runs until every clone of the returned sink is dropped.
/// It returns the number of messages published.
pub fn outbound<M>(
    client: async_nats::Client,
    subject: String,
) -> (ChannelSink<M>, JoinHandle<u64>)
where
    M: Serialize + Send + 'static,
{
    let (sink, rx) = ChannelSink::channel(OUTBOUND_CAPACITY);
    let handle = tokio::spawn(forward(client, subject, rx));
    (sink, handle)
}

async fn forward<M: Serialize>(
    client: async_nats::Client,
    subject: String,
    mut rx: mpsc::Receiver<M>,
) -> u64 {
    let mut published: u64 = 0;
    while let Some(message) = rx.recv().await {
        let payload = match serde_json::to_vec(&message) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(subject = %subject, error = %e, "failed to serialize outbound message");
                continue;
            }
        };
        match client.publish(subject.clone(), payload.into()).await {
            Ok(()) => published = published.saturating_add(1),
            Err(e) => debug!(subject = %subject, error = %e, "outbound publish failed"),
        }
    }
    debug!(subject = %subject, published, "outbound forwarder finished");
    published
}

/// Subscribe to velocity commands on `subject` and apply each one.
///
/// # Errors
///
/// Returns [`EngineError::Nats`] if the subscription cannot be created.
pub async fn spawn_velocity_subscriber(
    client: &async_nats::Client,
    subject: String,
    ingress: VelocityIngress,
) -> Result<JoinHandle<()>, EngineError> {
    let mut subscriber = client
        .subscribe(subject.clone())
        .await
        .map_err(|e| EngineError::Nats {
            message: format!("failed to subscribe to {subject}: {e}"),
        })?;
    info!(subject = %subject, "Velocity subscriber started");

    Ok(tokio::spawn(async move {
        while let Some(message) = subscriber.next().await {
            handle_velocity_payload(&ingress, &message.payload);
        }
        debug!(subject = %subject, "Velocity subscription closed");
    }))
}

/// Decode and apply one inbound payload. Rejections are logged and
/// dropped.
pub fn handle_velocity_payload(
    ingress: &VelocityIngress,
    payload: &[u8],
) -> Option<IngressOutcome> {
    let command: VelocityCommand = match serde_json::from_slice(payload) {
        Ok(command) => command,
        Err(e) => {
            warn!(error = %e, "malformed velocity command");
            return None;
        }
    };
    match ingress.apply(&command) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            warn!(agent = %command.agent_identifier, error = %e, "velocity command rejected");
            None
        }
    }
}
