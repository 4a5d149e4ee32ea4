//! Producing records through the proxy.
//!
//! Records are sent either to a topic, leaving partition choice to the
//! proxy or to an explicit per-record `partition`, or to one partition
//! endpoint. A single request carries every record and gets back one offset
//! entry per record, in order.
//!
//! ### Example
//! ```ignore
//! let request = ProduceRequest::new(Format::Binary)
//!     .record(Record::new(&b"Value 1"[..]).with_key(&b"Tester"[..]))
//!     .record(Record::new(&b"Value 2"[..]).with_partition(1));
//!
//! let response = client.topic("purchases").produce(&request).await?;
//! for offset in response.offsets {
//!     println!("{:?}", offset);
//! }
//! ```

use reqwest::Method;
use serde_derive::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{
    client::{decode, Client},
    error::{Error, ResponseError, Result},
    message::{Format, Payload},
    schema::Schema,
};

/// One outgoing record.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub key: Option<Payload>,
    pub value: Payload,
    pub partition: Option<i32>,
}

impl Record {
    pub fn new(value: impl Into<Payload>) -> Self {
        Self {
            key: None,
            value: value.into(),
            partition: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<Payload>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Target partition. Ignored when producing to a partition endpoint.
    pub fn with_partition(mut self, partition: i32) -> Self {
        self.partition = Some(partition);
        self
    }

    fn to_wire(&self, include_partition: bool) -> Value {
        let mut record = Map::new();
        if let Some(key) = &self.key {
            record.insert("key".to_string(), key.to_wire());
        }
        record.insert("value".to_string(), self.value.to_wire());
        if include_partition {
            if let Some(partition) = self.partition {
                record.insert("partition".to_string(), Value::from(partition));
            }
        }
        Value::Object(record)
    }
}

/// A batch of records in one embedded format.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProduceRequest {
    format: Format,
    records: Vec<Record>,
    key_schema: Option<Schema>,
    value_schema: Option<Schema>,
}

impl ProduceRequest {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    pub fn records(mut self, records: impl IntoIterator<Item = Record>) -> Self {
        self.records.extend(records);
        self
    }

    /// Avro only.
    pub fn key_schema(mut self, schema: impl Into<Schema>) -> Self {
        self.key_schema = Some(schema.into());
        self
    }

    /// Avro only, and required there.
    pub fn value_schema(mut self, schema: impl Into<Schema>) -> Self {
        self.value_schema = Some(schema.into());
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check the request and build its JSON body.
    pub(crate) fn to_body(&self, include_partition: bool) -> Result<Value> {
        if self.records.is_empty() {
            return Err(Error::ArgError("No records to produce".to_string()));
        }

        for (index, record) in self.records.iter().enumerate() {
            let key_ok = record.key.as_ref().map_or(true, |key| key.matches(self.format));
            if !key_ok || !record.value.matches(self.format) {
                return Err(Error::ArgError(format!(
                    "Record {} does not match the {:?} format",
                    index, self.format
                )));
            }
        }

        let mut body = Map::new();
        match self.format {
            Format::Avro => {
                let value_schema = self.value_schema.as_ref().ok_or_else(|| {
                    Error::ArgError("Avro records need a value schema".to_string())
                })?;
                let has_keys = self.records.iter().any(|record| record.key.is_some());
                match &self.key_schema {
                    Some(key_schema) => key_schema.write_to("key", &mut body),
                    None if has_keys => {
                        return Err(Error::ArgError(
                            "Avro records with keys need a key schema".to_string(),
                        ))
                    }
                    None => {}
                }
                value_schema.write_to("value", &mut body);
            }
            _ => {
                if self.key_schema.is_some() || self.value_schema.is_some() {
                    return Err(Error::ArgError(format!(
                        "Schemas are only used with the Avro format, not {:?}",
                        self.format
                    )));
                }
            }
        }

        let records = self
            .records
            .iter()
            .map(|record| record.to_wire(include_partition))
            .collect();
        body.insert("records".to_string(), Value::Array(records));

        Ok(Value::Object(body))
    }
}

/// Where each record landed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProduceResponse {
    pub key_schema_id: Option<i64>,
    pub value_schema_id: Option<i64>,
    pub offsets: Vec<RecordOffset>,
}

impl ProduceResponse {
    /// Records the proxy failed to write, with their index in the request.
    pub fn failures(&self) -> impl Iterator<Item = (usize, ResponseError)> + '_ {
        self.offsets
            .iter()
            .enumerate()
            .filter_map(|(index, offset)| offset.as_error().map(|err| (index, err)))
    }
}

/// Outcome for a single record. Failed records carry `error_code` and
/// `error` instead of an offset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordOffset {
    pub partition: Option<i32>,
    pub offset: Option<i64>,
    pub error_code: Option<i64>,
    pub error: Option<String>,
}

impl RecordOffset {
    pub fn as_error(&self) -> Option<ResponseError> {
        let code = self.error_code?;
        Some(ResponseError::new(
            code,
            self.error.clone().unwrap_or_default(),
        ))
    }
}

/// Send `request` to `path`, a topic or partition endpoint.
#[instrument(level = "debug", skip(client, request), fields(records = request.len()))]
pub(crate) async fn produce(
    client: &Client,
    path: &str,
    request: &ProduceRequest,
    include_partition: bool,
) -> Result<ProduceResponse> {
    let body = request.to_body(include_partition)?;
    tracing::debug!(
        "Producing {} {:?} records to {}",
        request.len(),
        request.format,
        path
    );
    let value = client
        .request(
            Method::POST,
            path,
            Some(&body),
            Some(request.format.content_type()),
        )
        .await?;
    let response: ProduceResponse = decode(value)?;

    for (index, err) in response.failures() {
        tracing::warn!("Record {} was not produced to {}: {}", index, path, err);
    }

    Ok(response)
}
