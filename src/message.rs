//! Record payloads and consumed messages.
//!
//! The proxy carries keys and values in one of three embedded formats. The
//! format decides both the content type of the request and how payloads
//! look inside the JSON envelope:
//!
//! - `binary`: raw bytes, base64 encoded into a JSON string
//! - `json`: any JSON value, embedded as is
//! - `avro`: JSON encoding of an Avro value, checked by the proxy against a schema

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Embedded format of keys and values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Binary,
    Json,
    Avro,
}

impl Format {
    /// Content type for produce requests and consumer reads.
    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Binary => "application/vnd.kafka.binary.v1+json",
            Format::Json => "application/vnd.kafka.json.v1+json",
            Format::Avro => "application/vnd.kafka.avro.v1+json",
        }
    }
}

/// A key or value.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Raw bytes, only valid with [`Format::Binary`].
    Binary(Bytes),
    /// A JSON value, valid with [`Format::Json`] and [`Format::Avro`].
    Json(Value),
}

impl Payload {
    pub fn matches(&self, format: Format) -> bool {
        matches!(
            (self, format),
            (Payload::Binary(_), Format::Binary) | (Payload::Json(_), Format::Json | Format::Avro)
        )
    }

    pub(crate) fn to_wire(&self) -> Value {
        match self {
            Payload::Binary(bytes) => Value::String(STANDARD.encode(bytes)),
            Payload::Json(value) => value.clone(),
        }
    }

    pub(crate) fn from_wire(value: Value, format: Format) -> Result<Option<Self>> {
        match (value, format) {
            (Value::Null, _) => Ok(None),
            (Value::String(encoded), Format::Binary) => {
                let bytes = STANDARD.decode(encoded.as_bytes()).map_err(|err| {
                    Error::Decode(serde::de::Error::custom(format!(
                        "invalid base64 payload: {}",
                        err
                    )))
                })?;
                Ok(Some(Payload::Binary(Bytes::from(bytes))))
            }
            (other, Format::Binary) => Err(Error::Decode(serde::de::Error::custom(format!(
                "expected a base64 string for a binary payload, got {}",
                other
            )))),
            (value, _) => Ok(Some(Payload::Json(value))),
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Payload::Binary(bytes) => Some(bytes),
            Payload::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Binary(_) => None,
        }
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Binary(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Payload {
    fn from(bytes: &'static [u8]) -> Self {
        Payload::Binary(Bytes::from_static(bytes))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

/// Common consumed message format.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub topic: String,
    pub key: Option<Payload>,
    pub value: Option<Payload>,
    pub partition: i32,
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    key: Value,
    #[serde(default)]
    value: Value,
    partition: i32,
    offset: i64,
}

impl Message {
    /// Decode a consumer read response body.
    pub(crate) fn decode_batch(topic: &str, format: Format, body: Value) -> Result<Vec<Message>> {
        let raw: Vec<RawMessage> = serde_json::from_value(body).map_err(Error::Decode)?;
        raw.into_iter()
            .map(|msg| {
                Ok(Message {
                    topic: topic.to_string(),
                    key: Payload::from_wire(msg.key, format)?,
                    value: Payload::from_wire(msg.value, format)?,
                    partition: msg.partition,
                    offset: msg.offset,
                })
            })
            .collect()
    }
}
