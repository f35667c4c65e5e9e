pub mod codec;
pub mod config;
pub mod consumer;
pub mod error;
pub mod events;
pub mod format;
pub mod observability;
pub mod report;
pub mod shutdown;
pub mod source;
pub mod tally;

pub use codec::Codec;
pub use config::{ConsumerConfig, DEFAULT_GROUP, DEFAULT_TOPIC};
pub use consumer::{ConsumerLoop, LoopOutcome, LoopState, LoopStats};
pub use error::{CodecError, ConfigError, DecodeError, EncodeError, SourceError};
pub use events::{ActionResult, AuditEvent, MessageMetadata};
pub use format::format_tally_readable;
pub use observability::{LogFormat, init_logging};
pub use report::{ReportFormat, report};
pub use shutdown::{ShutdownReason, ShutdownSignal};
pub use source::{AckHandle, KafkaSource, MemorySource, MessageSource, RawMessage};
pub use tally::{ActionTally, TallySnapshot, TallyTable};
