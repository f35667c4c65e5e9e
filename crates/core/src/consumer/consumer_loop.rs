use std::future::Future;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    codec::Codec,
    consumer::LoopStats,
    error::DecodeError,
    shutdown::ShutdownReason,
    source::{MessageSource, RawMessage},
    tally::TallyTable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    ShuttingDown,
}

/// What the loop hands back once it stops running.
#[derive(Debug)]
pub struct LoopOutcome {
    pub session_id: Uuid,
    pub reason: ShutdownReason,
    pub state: LoopState,
    pub table: TallyTable,
    pub stats: LoopStats,
}

/// Owns the tally table for the whole run. Messages and the shutdown signal
/// are two arms of the same `select!`, so the table is never read while an
/// update is in progress.
pub struct ConsumerLoop {
    session_id: Uuid,
    codec: Codec,
    table: TallyTable,
    stats: LoopStats,
    state: LoopState,
}

impl ConsumerLoop {
    pub fn new(codec: Codec) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            codec,
            table: TallyTable::new(),
            stats: LoopStats::default(),
            state: LoopState::Running,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn table(&self) -> &TallyTable {
        &self.table
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Process one message: decode, count, log, then acknowledge.
    ///
    /// A message that fails to decode is logged and dropped without being
    /// acknowledged; the table is left untouched.
    pub fn handle(&mut self, message: RawMessage) -> Result<(), DecodeError> {
        self.stats.received += 1;

        let event = match self.codec.decode(&message.payload) {
            Ok(event) => event,
            Err(e) => {
                self.stats.failed += 1;
                error!(
                    error = %e,
                    topic = %message.metadata.topic,
                    partition = message.metadata.partition,
                    offset = message.metadata.offset,
                    payload_len = message.payload.len(),
                    "failed to unmarshal event"
                );
                return Err(e);
            }
        };

        self.table
            .record(&event.attempted_action, &event.action_result);
        self.stats.decoded += 1;

        info!(
            created = %event.created,
            service = %event.service,
            request_id = %event.request_id,
            user = %event.user,
            attempted_action = %event.attempted_action,
            action_result = %event.action_result,
            params = ?event.params,
            offset = message.metadata.offset,
            "received message"
        );

        message.commit();
        Ok(())
    }

    /// Run until `shutdown` resolves.
    ///
    /// When the source ends, the loop stops polling it and only waits for
    /// shutdown; it never exits on its own.
    #[instrument(name = "consumer", skip_all, fields(session_id = %self.session_id))]
    pub async fn run<S, F>(mut self, source: &mut S, shutdown: F) -> LoopOutcome
    where
        S: MessageSource,
        F: Future<Output = ShutdownReason>,
    {
        tokio::pin!(shutdown);
        let mut source_open = true;

        info!("consumer loop running");

        let reason = loop {
            tokio::select! {
                reason = &mut shutdown => break reason,
                message = source.recv(), if source_open => match message {
                    Some(message) => {
                        if self.handle(message).is_err() {
                            // Already logged and counted; the message stays unacknowledged.
                            continue;
                        }
                    }
                    None => {
                        warn!("message source closed, waiting for shutdown signal");
                        source_open = false;
                    }
                },
            }
        };

        self.state = LoopState::ShuttingDown;
        info!(%reason, received = self.stats.received, "consumer loop shutting down");

        LoopOutcome {
            session_id: self.session_id,
            reason,
            state: self.state,
            table: self.table,
            stats: self.stats,
        }
    }
}
