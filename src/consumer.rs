//! Consumer instances managed by the proxy.
//!
//! The proxy keeps consumer state on its side. A client creates an instance
//! inside a group, reads from topics through it, commits the offsets it has
//! read so far and finally deletes it. Every follow-up request goes to the
//! endpoint the client was configured with.
//!
//! ### Example
//! ```ignore
//! let consumer = client
//!     .consumer("my-group")
//!     .create(ConsumerConfig::new(Format::Binary).auto_offset_reset(OffsetReset::Smallest))
//!     .await?;
//!
//! for message in consumer.read("purchases").await? {
//!     println!("{:?}", message);
//! }
//! consumer.commit().await?;
//! consumer.destroy().await?;
//! ```

use reqwest::Method;
use serde::Serializer;
use serde_derive::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    client::{decode, segment, Client},
    error::{Error, Result},
    message::{Format, Message},
};

/// Where a new consumer starts when the group has no committed offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetReset {
    Smallest,
    Largest,
}

/// Settings for a new consumer instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ConsumerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub format: Format,
    #[serde(
        rename = "auto.offset.reset",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_offset_reset: Option<OffsetReset>,
    #[serde(
        rename = "auto.commit.enable",
        skip_serializing_if = "Option::is_none",
        serialize_with = "bool_as_string"
    )]
    pub auto_commit_enable: Option<bool>,
}

// the proxy reads consumer properties as strings
fn bool_as_string<S: Serializer>(
    value: &Option<bool>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(value) => serializer.serialize_str(if *value { "true" } else { "false" }),
        None => serializer.serialize_none(),
    }
}

impl ConsumerConfig {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    /// Instance name. The proxy generates one when absent.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn auto_offset_reset(mut self, reset: OffsetReset) -> Self {
        self.auto_offset_reset = Some(reset);
        self
    }

    pub fn auto_commit_enable(mut self, enable: bool) -> Self {
        self.auto_commit_enable = Some(enable);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct CreatedInstance {
    instance_id: String,
    base_uri: String,
}

/// Offsets committed for one topic partition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommittedOffset {
    pub topic: String,
    pub partition: i32,
    pub consumed: i64,
    pub committed: i64,
}

/// Handle to a consumer group.
#[derive(Clone, Debug)]
pub struct ConsumerGroup {
    client: Client,
    group: String,
}

impl ConsumerGroup {
    pub(crate) fn new(client: Client, group: String) -> Self {
        Self { client, group }
    }

    pub fn name(&self) -> &str {
        &self.group
    }

    /// Create a consumer instance in this group.
    #[instrument(level = "debug", skip(self, config), fields(group = %self.group))]
    pub async fn create(&self, config: ConsumerConfig) -> Result<Consumer> {
        let body =
            serde_json::to_value(&config).map_err(|err| Error::ArgError(err.to_string()))?;
        let value = self
            .client
            .request(
                Method::POST,
                &format!("/consumers/{}", segment(&self.group)),
                Some(&body),
                None,
            )
            .await?;
        let created: CreatedInstance = decode(value)?;
        tracing::info!(
            "Created consumer {} in group {}",
            created.instance_id,
            self.group
        );

        Ok(Consumer {
            client: self.client.clone(),
            group: self.group.clone(),
            instance_id: created.instance_id,
            base_uri: created.base_uri,
            format: config.format,
        })
    }
}

/// A consumer instance living on the proxy.
#[derive(Clone, Debug)]
pub struct Consumer {
    client: Client,
    group: String,
    instance_id: String,
    base_uri: String,
    format: Format,
}

impl Consumer {
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// URI of the instance as reported by the proxy.
    ///
    /// Requests for this instance are sent to the client's endpoint, not to
    /// this URI. Behind a load balancer, build a client for this URI so the
    /// requests reach the proxy node that holds the instance.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn format(&self) -> Format {
        self.format
    }

    fn path(&self) -> String {
        format!(
            "/consumers/{}/instances/{}",
            segment(&self.group),
            segment(&self.instance_id)
        )
    }

    /// Fetch the next batch of messages from `topic`.
    #[instrument(
        level = "debug",
        skip(self),
        fields(group = %self.group, instance = %self.instance_id)
    )]
    pub async fn read(&self, topic: &str) -> Result<Vec<Message>> {
        let value = self
            .client
            .request_accepting(
                Method::GET,
                &format!("{}/topics/{}", self.path(), segment(topic)),
                None,
                None,
                self.format.content_type(),
            )
            .await?;
        let messages = Message::decode_batch(topic, self.format, value)?;
        tracing::debug!("Read {} messages from {}", messages.len(), topic);
        Ok(messages)
    }

    /// Commit the offsets of everything read so far.
    #[instrument(
        level = "debug",
        skip(self),
        fields(group = %self.group, instance = %self.instance_id)
    )]
    pub async fn commit(&self) -> Result<Vec<CommittedOffset>> {
        let value = self
            .client
            .request(Method::POST, &format!("{}/offsets", self.path()), None, None)
            .await?;
        decode(value)
    }

    /// Delete the instance on the proxy.
    #[instrument(
        level = "debug",
        skip(self),
        fields(group = %self.group, instance = %self.instance_id)
    )]
    pub async fn destroy(self) -> Result<()> {
        self.client
            .request(Method::DELETE, &self.path(), None, None)
            .await?;
        tracing::info!(
            "Deleted consumer {} in group {}",
            self.instance_id,
            self.group
        );
        Ok(())
    }
}
