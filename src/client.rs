//! Client for one REST proxy endpoint.

use std::borrow::Cow;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::{
    classify::classify,
    client_builder::ClientBuilder,
    consumer::ConsumerGroup,
    error::{Error, Result},
    network::{Credentials, HttpRequest, Transport},
    topic::Topic,
    DEFAULT_ACCEPT_HEADER, DEFAULT_CONTENT_TYPE_HEADER,
};

#[derive(Debug, Deserialize)]
struct BrokerList {
    brokers: Vec<i32>,
}

/// Entry point to the REST proxy.
///
/// Cloning is cheap; clones share the same transport.
///
/// ### Example
/// ```ignore
/// let client = kafka_rest::prelude::Client::builder("http://localhost:8082")
///     .credentials("alice", "secret")
///     .build()?;
///
/// for topic in client.topics().await? {
///     println!("{}", topic.name());
/// }
/// println!("brokers: {:?}", client.brokers().await?);
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    endpoint: Url,
    username: Option<String>,
    password: Option<String>,
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn builder(endpoint: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(endpoint)
    }

    pub(crate) fn from_parts(
        endpoint: Url,
        username: Option<String>,
        password: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            endpoint,
            username,
            password,
            transport,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Handle to a topic. Does not check that it exists.
    pub fn topic(&self, name: impl Into<String>) -> Topic {
        Topic::new(self.clone(), name.into())
    }

    /// Every topic known to the proxy.
    pub async fn topics(&self) -> Result<Vec<Topic>> {
        let names: Vec<String> = self.get("/topics").await?;
        Ok(names.into_iter().map(|name| self.topic(name)).collect())
    }

    /// Ids of the brokers in the cluster.
    pub async fn brokers(&self) -> Result<Vec<i32>> {
        let list: BrokerList = self.get("/brokers").await?;
        Ok(list.brokers)
    }

    /// Handle to a consumer group. Does not create anything.
    pub fn consumer(&self, group: impl Into<String>) -> ConsumerGroup {
        ConsumerGroup::new(self.clone(), group.into())
    }

    /// Send one request and classify the response.
    ///
    /// `body` is serialized as JSON. When present it is sent with
    /// `content_type`, or `application/json` if none is given. The result is
    /// the decoded JSON body, whatever its shape.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        content_type: Option<&str>,
    ) -> Result<Value> {
        self.request_accepting(method, path, body, content_type, DEFAULT_ACCEPT_HEADER)
            .await
    }

    #[instrument(level = "debug", name = "rest-request", skip(self, body, content_type, accept))]
    pub(crate) async fn request_accepting(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        content_type: Option<&str>,
        accept: &str,
    ) -> Result<Value> {
        if ![Method::GET, Method::POST, Method::PUT, Method::DELETE].contains(&method) {
            return Err(Error::ArgError(format!(
                "Unsupported request method {}",
                method
            )));
        }

        let (content_type, body) = match body {
            Some(body) => {
                let bytes = serde_json::to_vec(body).map_err(|err| {
                    Error::ArgError(format!("Could not serialize request body: {}", err))
                })?;
                tracing::trace!("Request body {}", body);
                (
                    Some(content_type.unwrap_or(DEFAULT_CONTENT_TYPE_HEADER).to_string()),
                    Some(Bytes::from(bytes)),
                )
            }
            None => (None, None),
        };

        let request = HttpRequest {
            method,
            path: path.to_string(),
            accept: accept.to_string(),
            content_type,
            body,
            credentials: self.credentials(),
        };

        tracing::debug!("Sending {} {}", request.method, request.path);
        let response = self.transport.send(request).await?;

        classify(response.status, &response.body, self.username()).map_err(|err| {
            tracing::warn!("Request to {} failed: {}", path, err);
            err
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.request(Method::GET, path, None, None).await?;
        decode(value)
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}

/// Escape a topic, group or instance name for use as one path segment.
pub(crate) fn segment(name: &str) -> Cow<'_, str> {
    urlencoding::encode(name)
}

/// Interpret a classified body as `T`.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(Error::Decode)
}
