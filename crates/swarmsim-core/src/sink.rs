//! Best-effort outbound message sinks.
//!
//! The publishing loop and the leader selector hand their messages to a
//! [`MessageSink`]. A sink must never block: when the consumer is slow or
//! gone, the message is dropped and the caller is told why via
//! [`SinkError`]. Nothing is queued for retry.

use tokio::sync::mpsc;

/// Why a message was not accepted by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The consumer has not caught up; the message was dropped.
    #[error("sink is full, message dropped")]
    Full,

    /// The consumer is gone; the message was dropped.
    #[error("sink is closed, message dropped")]
    Closed,
}

/// A fire-and-forget consumer of outbound messages.
pub trait MessageSink<M>: Send + Sync {
    /// Offer `message` to the consumer without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the message was dropped. Callers log and
    /// move on.
    fn publish(&self, message: M) -> Result<(), SinkError>;
}

/// A sink that accepts and discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<M> MessageSink<M> for NullSink {
    fn publish(&self, _message: M) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink backed by a bounded tokio channel.
///
/// Uses `try_send`, so a full channel drops the new message instead of
/// waiting. The receiving half is typically drained by a transport task
/// (see the engine's NATS bridge).
#[derive(Debug)]
pub struct ChannelSink<M> {
    tx: mpsc::Sender<M>,
}

impl<M> ChannelSink<M> {
    /// Wrap an existing sender.
    pub const fn new(tx: mpsc::Sender<M>) -> Self {
        Self { tx }
    }

    /// Create a sink and the receiver that drains it.
    ///
    /// `capacity` is clamped to at least 1.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<M>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl<M> Clone for ChannelSink<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<M: Send> MessageSink<M> for ChannelSink<M> {
    fn publish(&self, message: M) -> Result<(), SinkError> {
        self.tx.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::Full,
            mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}
