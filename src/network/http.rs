use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use tracing::instrument;

use crate::error::{Error, Result};

use super::{HttpRequest, HttpResponse, Transport};

/// HTTP(S) transport to one REST proxy endpoint.
///
/// Wraps a single `reqwest::Client`, which is cheap to clone and shares
/// its connections between clones. TLS is used when the endpoint scheme is
/// `https`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport for `endpoint`.
    ///
    /// `timeout` is handed to the HTTP client as is.
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| Error::ArgError(err.to_string()))?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path)
            .map_err(|err| Error::ArgError(format!("Invalid path {}: {}", path, err)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(
        level = "trace",
        skip(self, request),
        fields(method = %request.method, path = %request.path)
    )]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.url(&request.path)?;

        let mut builder = self
            .client
            .request(request.method, url)
            .header(ACCEPT, request.accept);

        if let Some(credentials) = request.credentials {
            builder = builder.basic_auth(credentials.username, Some(credentials.password));
        }

        if let Some(body) = request.body {
            if let Some(content_type) = request.content_type {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::trace!("Received {} with {} bytes", status, body.len());

        Ok(HttpResponse { status, body })
    }
}
