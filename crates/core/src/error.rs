use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing kafka brokers, must be comma separated")]
    MissingBrokers,

    #[error("topic name must not be empty")]
    EmptyTopic,

    #[error("consumer group must not be empty")]
    EmptyGroup,
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("could not obtain consumer for brokers {brokers:?}: {source}")]
    Connect {
        brokers: Vec<String>,
        #[source]
        source: kafka::Error,
    },

    #[error("consumer thread failed to start: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("consumer thread exited before reporting readiness")]
    Abandoned,
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("embedded audit event schema is invalid: {0}")]
    Schema(#[source] apache_avro::Error),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed avro datum: {0}")]
    Datum(#[source] apache_avro::Error),

    #[error("datum does not match the audit event schema: {0}")]
    Shape(#[source] apache_avro::Error),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("audit event cannot be represented as avro: {0}")]
    Value(#[source] apache_avro::Error),

    #[error("avro datum does not satisfy the audit event schema: {0}")]
    Datum(#[source] apache_avro::Error),
}
