use serde_derive::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::Result,
    producer::{self, ProduceRequest, ProduceResponse},
    topic::Topic,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionMetadata {
    pub partition: i32,
    pub leader: i32,
    #[serde(default)]
    pub replicas: Vec<Replica>,
}

impl PartitionMetadata {
    /// Replicas currently in sync with the leader.
    pub fn in_sync_replicas(&self) -> impl Iterator<Item = &Replica> {
        self.replicas.iter().filter(|replica| replica.in_sync)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Replica {
    pub broker: i32,
    pub leader: bool,
    pub in_sync: bool,
}

/// Handle to one partition of a topic.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    topic: Topic,
    id: i32,
}

impl Partition {
    pub(crate) fn new(topic: Topic, id: i32) -> Self {
        Self { topic, id }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    fn path(&self) -> String {
        format!("{}/partitions/{}", self.topic.path(), self.id)
    }

    #[instrument(
        level = "debug",
        skip(self),
        fields(topic = %self.topic.name(), partition = self.id)
    )]
    pub async fn metadata(&self) -> Result<PartitionMetadata> {
        self.topic.client().get(&self.path()).await
    }

    /// Produce every record to this partition. Per-record partitions are
    /// not sent.
    pub async fn produce(&self, request: &ProduceRequest) -> Result<ProduceResponse> {
        producer::produce(self.topic.client(), &self.path(), request, false).await
    }
}
