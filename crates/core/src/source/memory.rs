use tokio::sync::mpsc;

use crate::{
    events::MessageMetadata,
    source::{AckHandle, MessageSource, RawMessage},
};

/// In-process source backed by a channel. Every message lands on partition 0
/// with consecutive offsets starting at 0.
pub struct MemorySource {
    rx: mpsc::UnboundedReceiver<RawMessage>,
}

pub struct MemoryProducer {
    topic: String,
    next_offset: i64,
    tx: mpsc::UnboundedSender<RawMessage>,
    acks_tx: mpsc::UnboundedSender<MessageMetadata>,
}

/// Receiving side of the acknowledgements issued for a [`MemorySource`].
pub struct MemoryAcks {
    rx: mpsc::UnboundedReceiver<MessageMetadata>,
}

impl MemorySource {
    pub fn channel(topic: impl Into<String>) -> (MemoryProducer, MemorySource, MemoryAcks) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (acks_tx, acks_rx) = mpsc::unbounded_channel();

        (
            MemoryProducer {
                topic: topic.into(),
                next_offset: 0,
                tx,
                acks_tx,
            },
            MemorySource { rx },
            MemoryAcks { rx: acks_rx },
        )
    }
}

impl MessageSource for MemorySource {
    async fn recv(&mut self) -> Option<RawMessage> {
        self.rx.recv().await
    }
}

impl MemoryProducer {
    /// Queue a payload. Returns where it was placed, or `None` if the source
    /// has been dropped.
    pub fn send(&mut self, payload: impl Into<Vec<u8>>) -> Option<MessageMetadata> {
        let metadata = MessageMetadata {
            topic: self.topic.clone(),
            partition: 0,
            offset: self.next_offset,
        };
        let ack = AckHandle::new(metadata.clone(), self.acks_tx.clone());

        self.tx
            .send(RawMessage::new(payload.into(), metadata.clone(), ack))
            .ok()?;
        self.next_offset += 1;
        Some(metadata)
    }
}

impl MemoryAcks {
    pub async fn next(&mut self) -> Option<MessageMetadata> {
        self.rx.recv().await
    }

    /// Acknowledgements already issued, without waiting.
    pub fn drain(&mut self) -> Vec<MessageMetadata> {
        let mut acked = Vec::new();
        while let Ok(metadata) = self.rx.try_recv() {
            acked.push(metadata);
        }
        acked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_in_order_and_reports_commits() {
        let (mut producer, mut source, mut acks) = MemorySource::channel("audit-events");
        producer.send(b"first".to_vec()).unwrap();
        producer.send(b"second".to_vec()).unwrap();

        let first = source.recv().await.unwrap();
        let second = source.recv().await.unwrap();
        assert_eq!(first.payload, b"first");
        assert_eq!(second.metadata.offset, 1);

        second.commit();
        drop(first);

        let acked = acks.drain();
        assert_eq!(acked.len(), 1);
        assert_eq!(acked[0].offset, 1);
        assert_eq!(acked[0].topic, "audit-events");
    }

    #[tokio::test]
    async fn ends_when_producer_is_dropped() {
        let (producer, mut source, _acks) = MemorySource::channel("audit-events");
        drop(producer);

        assert!(source.recv().await.is_none());
    }
}
