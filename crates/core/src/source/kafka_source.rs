use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use kafka::consumer::{Consumer, FetchOffset, GroupOffsetStorage};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{
    config::ConsumerConfig,
    error::SourceError,
    events::MessageMetadata,
    shutdown::ShutdownReason,
    source::{AckHandle, MessageSource, RawMessage},
};

const OUTPUT_BUFFER: usize = 256;
const POLL_RETRY_DELAY: Duration = Duration::from_millis(500);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Kafka group consumer running on its own thread.
///
/// The blocking client lives on the thread for its whole life. Messages are
/// forwarded to the async side through a bounded channel, acknowledgements
/// come back through an unbounded one and are marked consumed and committed
/// between polls.
pub struct KafkaSource {
    rx: mpsc::Receiver<RawMessage>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl KafkaSource {
    /// Connect to the brokers and join the consumer group. Resolves once the
    /// consumer exists, or with the error that prevented it.
    pub async fn connect(config: &ConsumerConfig) -> Result<Self, SourceError> {
        let (out_tx, rx) = mpsc::channel::<RawMessage>(OUTPUT_BUFFER);
        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), SourceError>>();
        let stop = Arc::new(AtomicBool::new(false));

        let config = config.clone();
        let thread_stop = Arc::clone(&stop);
        let worker = thread::Builder::new()
            .name("kafka-consumer".to_string())
            .spawn(move || {
                let consumer = match create_consumer(&config) {
                    Ok(consumer) => consumer,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                if ready_tx.send(Ok(())).is_err() {
                    return;
                }

                info!(
                    topic = %config.topic,
                    group = %config.group,
                    brokers = ?config.brokers,
                    "kafka consumer ready"
                );
                poll_loop(consumer, out_tx, thread_stop);
            })?;

        match ready_rx.await {
            Ok(Ok(())) => Ok(Self {
                rx,
                stop,
                worker: Some(worker),
            }),
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(e)
            }
            Err(_) => Err(SourceError::Abandoned),
        }
    }

    /// Like [`KafkaSource::connect`], but gives up as soon as `shutdown`
    /// resolves. `Ok(None)` means shutdown won; the half-built consumer thread
    /// is abandoned and exits on its own once it notices nobody is waiting.
    pub async fn connect_or_shutdown<F>(
        config: &ConsumerConfig,
        shutdown: F,
    ) -> Result<Option<Self>, SourceError>
    where
        F: Future<Output = ShutdownReason>,
    {
        tokio::select! {
            source = Self::connect(config) => source.map(Some),
            reason = shutdown => {
                info!(%reason, "shutdown requested before the consumer was ready");
                Ok(None)
            }
        }
    }

    /// Stop polling, commit whatever was acknowledged but not yet committed,
    /// and wait a short while for the consumer thread to finish.
    pub async fn close(self) {
        self.close_within(CLOSE_TIMEOUT).await;
    }

    /// [`KafkaSource::close`] with an explicit bound on the join. A thread
    /// still stuck in the client after `limit` is left behind.
    pub async fn close_within(mut self, limit: Duration) {
        self.stop.store(true, Ordering::Release);
        // Unblocks a forwarder waiting on a full channel.
        self.rx.close();
        while self.rx.try_recv().is_ok() {}

        let Some(worker) = self.worker.take() else {
            return;
        };

        let join = tokio::task::spawn_blocking(move || worker.join());
        match tokio::time::timeout(limit, join).await {
            Ok(Ok(Ok(()))) => debug!("kafka consumer thread stopped"),
            Ok(Ok(Err(_))) => warn!("kafka consumer thread panicked"),
            Ok(Err(e)) => warn!(error = %e, "failed to join kafka consumer thread"),
            Err(_) => warn!(
                timeout_ms = limit.as_millis() as u64,
                "kafka consumer thread did not stop in time, leaving it behind"
            ),
        }
    }
}

impl MessageSource for KafkaSource {
    async fn recv(&mut self) -> Option<RawMessage> {
        self.rx.recv().await
    }
}

impl Drop for KafkaSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}

fn create_consumer(config: &ConsumerConfig) -> Result<Consumer, SourceError> {
    Consumer::from_hosts(config.brokers.clone())
        .with_topic(config.topic.clone())
        .with_group(config.group.clone())
        .with_fallback_offset(FetchOffset::Earliest)
        .with_offset_storage(Some(GroupOffsetStorage::Kafka))
        .create()
        .map_err(|source| SourceError::Connect {
            brokers: config.brokers.clone(),
            source,
        })
}

fn poll_loop(mut consumer: Consumer, out: mpsc::Sender<RawMessage>, stop: Arc<AtomicBool>) {
    let (acks_tx, mut acks_rx) = mpsc::unbounded_channel::<MessageMetadata>();

    'poll: while !stop.load(Ordering::Acquire) {
        apply_acks(&mut consumer, &mut acks_rx);

        let sets = match consumer.poll() {
            Ok(sets) => sets,
            Err(e) => {
                warn!(error = %e, "kafka poll failed, retrying");
                thread::sleep(POLL_RETRY_DELAY);
                continue;
            }
        };

        for set in sets.iter() {
            for m in set.messages() {
                let metadata = MessageMetadata {
                    topic: set.topic().to_string(),
                    partition: set.partition(),
                    offset: m.offset,
                };
                let ack = AckHandle::new(metadata.clone(), acks_tx.clone());

                if out
                    .blocking_send(RawMessage::new(m.value.to_vec(), metadata, ack))
                    .is_err()
                {
                    break 'poll;
                }
            }
        }
    }

    drop(acks_tx);
    apply_acks(&mut consumer, &mut acks_rx);
}

/// Mark every acknowledged message consumed, then commit once.
fn apply_acks(consumer: &mut Consumer, acks: &mut mpsc::UnboundedReceiver<MessageMetadata>) {
    let mut marked = 0usize;

    while let Ok(ack) = acks.try_recv() {
        match consumer.consume_message(&ack.topic, ack.partition, ack.offset) {
            Ok(()) => marked += 1,
            Err(e) => warn!(
                error = %e,
                topic = %ack.topic,
                partition = ack.partition,
                offset = ack.offset,
                "failed to mark message consumed"
            ),
        }
    }

    if marked == 0 {
        return;
    }

    match consumer.commit_consumed() {
        Ok(()) => debug!(marked, "committed consumed offsets"),
        Err(e) => warn!(error = %e, marked, "failed to commit consumed offsets"),
    }
}
