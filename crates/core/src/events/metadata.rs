use serde::Serialize;

/// Where a raw message came from on the log. Also identifies the message when
/// it is acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MessageMetadata {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}
