//! # kafka-rest
//! Rust client for the Kafka REST Proxy HTTP API.
//!
//! This crate talks to a REST proxy, never to Kafka brokers directly. Every
//! operation is one HTTP round trip: the request is built from the
//! operation's method, path and body, and the response is classified into
//! either the decoded JSON body or a typed [`Error`](prelude::Error).
//!
//! ## Goals
//! - Easy to understand code
//! - Leverage best in class libraries such as Tokio, Reqwest and Serde to do the heavy lifting
//! - Surface every proxy error with its code, so nothing needs to be looked up twice
//! - Leave retry and backoff decisions to the caller
//!
//! ## Table of contents
//! - [Getting started](#getting-started)
//!     - [Topics](#topics)
//!     - [Producing](#producing)
//!     - [Consuming](#consuming)
//!     - [Errors](#errors)
//! - [Resources](#resources)
//!
//! ## Getting started
//! Include the following snippet in your `Cargo.toml` dependencies:
//! ```toml
//! kafka-rest = "0.1"
//! ```
//!
//! Start with a [`ClientBuilder`](prelude::ClientBuilder). It can also be
//! configured from the `KAFKA_REST_URL`, `KAFKA_REST_USERNAME` and
//! `KAFKA_REST_PASSWORD` environment variables.
//!
//! ### Topics
//! ```ignore
//! let client = kafka_rest::prelude::ClientBuilder::new("http://localhost:8082").build()?;
//!
//! for topic in client.topics().await? {
//!     let metadata = topic.metadata().await?;
//!     println!("{} has {} partitions", metadata.name, metadata.partitions.len());
//! }
//! let brokers = client.brokers().await?;
//! ```
//!
//! ### Producing
//! A [`ProduceRequest`](prelude::ProduceRequest) holds records in one embedded
//! format and is sent to a topic or to a single partition.
//! ```ignore
//! use kafka_rest::prelude::*;
//!
//! let request = ProduceRequest::new(Format::Json)
//!     .record(Record::new(serde_json::json!({"foo": "bar"})));
//! let response = client.topic("purchases").partition(0).produce(&request).await?;
//! ```
//!
//! ### Consuming
//! Consumers live on the proxy. Create one in a group, read, commit, destroy.
//! ```ignore
//! let consumer = client
//!     .consumer("my-group")
//!     .create(ConsumerConfig::new(Format::Binary))
//!     .await?;
//! let messages = consumer.read("purchases").await?;
//! consumer.commit().await?;
//! consumer.destroy().await?;
//! ```
//!
//! ### Errors
//! Errors reported by the proxy carry its `error_code`, mapped onto a
//! [`ResponseErrorKind`](prelude::ResponseErrorKind). The code is always part
//! of the rendered message.
//! ```ignore
//! match client.topic("missing").metadata().await {
//!     Err(Error::Response(err)) if err.kind == ResponseErrorKind::TopicNotFound => {
//!         // "Topic not found (error code 40401)"
//!         println!("{}", err);
//!     }
//!     other => println!("{:?}", other),
//! }
//! ```
//!
//! ## Resources
//! - [REST Proxy API reference](https://docs.confluent.io/platform/current/kafka-rest/api.html)

mod classify;
mod client;
mod client_builder;
mod consumer;
mod error;
mod message;
mod network;
mod partition;
mod producer;
mod schema;
mod topic;

const DEFAULT_ACCEPT_HEADER: &str = "application/vnd.kafka.v1+json";
const DEFAULT_CONTENT_TYPE_HEADER: &str = "application/json";

pub mod prelude {
    //! Main export of various structures and methods
    pub use crate::classify::classify;
    pub use crate::client::Client;
    pub use crate::client_builder::ClientBuilder;
    pub use crate::consumer::{
        CommittedOffset, Consumer, ConsumerConfig, ConsumerGroup, OffsetReset,
    };
    pub use crate::error::{Error, ResponseError, ResponseErrorKind, Result};
    pub use crate::message::{Format, Message, Payload};
    pub use crate::network::{Credentials, HttpRequest, HttpResponse, HttpTransport, Transport};
    pub use crate::partition::{Partition, PartitionMetadata, Replica};
    pub use crate::producer::{ProduceRequest, ProduceResponse, Record, RecordOffset};
    pub use crate::schema::Schema;
    pub use crate::topic::{Topic, TopicMetadata};

    pub use async_trait::async_trait;
    pub use bytes;
    pub use reqwest::{Method, StatusCode};
}
