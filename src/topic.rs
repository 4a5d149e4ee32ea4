//! Topic metadata and producing to a topic.

use serde_derive::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{
    client::{segment, Client},
    error::Result,
    partition::{Partition, PartitionMetadata},
    producer::{self, ProduceRequest, ProduceResponse},
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicMetadata {
    pub name: String,
    #[serde(default)]
    pub configs: Map<String, Value>,
    #[serde(default)]
    pub partitions: Vec<PartitionMetadata>,
}

/// Handle to a topic.
#[derive(Clone, Debug)]
pub struct Topic {
    client: Client,
    name: String,
}

impl Topic {
    pub(crate) fn new(client: Client, name: String) -> Self {
        Self { client, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn path(&self) -> String {
        format!("/topics/{}", segment(&self.name))
    }

    #[instrument(level = "debug", skip(self), fields(topic = %self.name))]
    pub async fn metadata(&self) -> Result<TopicMetadata> {
        self.client.get(&self.path()).await
    }

    #[instrument(level = "debug", skip(self), fields(topic = %self.name))]
    pub async fn partitions(&self) -> Result<Vec<PartitionMetadata>> {
        self.client
            .get(&format!("{}/partitions", self.path()))
            .await
    }

    /// Handle to one partition. Does not check that it exists.
    pub fn partition(&self, id: i32) -> Partition {
        Partition::new(self.clone(), id)
    }

    pub async fn produce(&self, request: &ProduceRequest) -> Result<ProduceResponse> {
        producer::produce(&self.client, &self.path(), request, true).await
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

impl PartialEq for Topic {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.client.endpoint() == other.client.endpoint()
    }
}
