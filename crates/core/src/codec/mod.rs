//! Avro binary codec for [`AuditEvent`].
//!
//! Messages on the audit topic are bare Avro datums (no container header, no
//! schema fingerprint) written with [`AUDIT_EVENT_SCHEMA`].

pub mod schema;

pub use schema::AUDIT_EVENT_SCHEMA;

use apache_avro::{Schema, from_avro_datum, from_value, to_avro_datum, to_value};

use crate::{
    error::{CodecError, DecodeError, EncodeError},
    events::AuditEvent,
};

#[derive(Debug, Clone)]
pub struct Codec {
    schema: Schema,
}

impl Codec {
    pub fn new() -> Result<Self, CodecError> {
        let schema = Schema::parse_str(AUDIT_EVENT_SCHEMA).map_err(CodecError::Schema)?;
        Ok(Self { schema })
    }

    /// Decode one datum. Bytes after the end of the record are ignored.
    pub fn decode(&self, bytes: &[u8]) -> Result<AuditEvent, DecodeError> {
        let mut reader = bytes;
        let value = from_avro_datum(&self.schema, &mut reader, None).map_err(DecodeError::Datum)?;
        from_value::<AuditEvent>(&value).map_err(DecodeError::Shape)
    }

    pub fn encode(&self, event: &AuditEvent) -> Result<Vec<u8>, EncodeError> {
        let value = to_value(event).map_err(EncodeError::Value)?;
        to_avro_datum(&self.schema, value).map_err(EncodeError::Datum)
    }
}
