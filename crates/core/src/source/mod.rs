//! Message sources feeding the consumer loop.

pub mod kafka_source;
pub mod memory;

pub use kafka_source::*;
pub use memory::*;

use tokio::sync::mpsc;
use tracing::debug;

use crate::events::MessageMetadata;

/// Anything that hands out encoded audit messages one at a time.
pub trait MessageSource {
    /// Next delivered message. `None` once the source will never deliver again.
    async fn recv(&mut self) -> Option<RawMessage>;
}

/// Encoded payload plus the handle needed to acknowledge it.
pub struct RawMessage {
    pub payload: Vec<u8>,
    pub metadata: MessageMetadata,
    ack: AckHandle,
}

impl RawMessage {
    pub fn new(payload: Vec<u8>, metadata: MessageMetadata, ack: AckHandle) -> Self {
        Self {
            payload,
            metadata,
            ack,
        }
    }

    /// Acknowledge the message and release it.
    pub fn commit(self) {
        self.ack.commit();
    }
}

/// Single-use acknowledgement for one delivered message. Dropping it without
/// calling [`AckHandle::commit`] leaves the message unacknowledged.
pub struct AckHandle {
    metadata: MessageMetadata,
    acks: mpsc::UnboundedSender<MessageMetadata>,
}

impl AckHandle {
    pub fn new(metadata: MessageMetadata, acks: mpsc::UnboundedSender<MessageMetadata>) -> Self {
        Self { metadata, acks }
    }

    pub fn commit(self) {
        if let Err(mpsc::error::SendError(metadata)) = self.acks.send(self.metadata) {
            debug!(
                topic = %metadata.topic,
                partition = metadata.partition,
                offset = metadata.offset,
                "ack dropped, source already closed"
            );
        }
    }
}
