use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use crate::{
    client::Client,
    error::{Error, Result},
    network::{HttpTransport, Transport},
};

const KAFKA_REST_URL: &str = "KAFKA_REST_URL";
const KAFKA_REST_USERNAME: &str = "KAFKA_REST_USERNAME";
const KAFKA_REST_PASSWORD: &str = "KAFKA_REST_PASSWORD";

/// Configure a [`Client`].
///
/// ### Example
/// ```rust
/// use std::time::Duration;
///
/// let client = kafka_rest::prelude::ClientBuilder::new("http://localhost:8082")
///     .credentials("alice", "secret")
///     .timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
///
/// assert_eq!(client.username(), Some("alice"));
/// ```
#[derive(Clone, Debug)]
pub struct ClientBuilder {
    endpoint: String,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Start a client builder. To complete, use the [`build`](Self::build) method.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: None,
            password: None,
            timeout: None,
            transport: None,
        }
    }

    /// Read the configuration from the environment.
    ///
    /// `KAFKA_REST_URL` is required, `KAFKA_REST_USERNAME` and
    /// `KAFKA_REST_PASSWORD` are optional.
    pub fn from_env() -> Result<Self> {
        let endpoint = env::var(KAFKA_REST_URL)
            .map_err(|_| Error::ArgError(format!("{} is not set", KAFKA_REST_URL)))?;
        let mut builder = Self::new(endpoint);
        builder.username = env::var(KAFKA_REST_USERNAME).ok();
        builder.password = env::var(KAFKA_REST_PASSWORD).ok();
        Ok(builder)
    }

    /// Basic-auth credentials sent with every request.
    pub fn credentials(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username(username).password(password)
    }

    /// The username alone is only used to word authentication errors.
    /// Basic auth is sent once a password is set as well.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Request timeout enforced by the HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send requests through `transport` instead of the default HTTP one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<Client> {
        let endpoint = Url::parse(&self.endpoint).map_err(|err| {
            Error::ArgError(format!("Invalid endpoint {}: {}", self.endpoint, err))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::ArgError(format!(
                "Unsupported scheme {} for endpoint {}",
                endpoint.scheme(),
                self.endpoint
            )));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(endpoint.clone(), self.timeout)?),
        };

        tracing::debug!("Configured REST proxy client for {}", endpoint);
        Ok(Client::from_parts(
            endpoint,
            self.username,
            self.password,
            transport,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_invalid_endpoints() {
        for endpoint in ["not a url", "ftp://localhost:8082", ""] {
            let res = ClientBuilder::new(endpoint).build();
            assert!(matches!(res, Err(Error::ArgError(_))), "{}", endpoint);
        }
    }

    #[test]
    fn accepts_http_and_https() {
        for endpoint in ["http://localhost:8082", "https://proxy.example.com"] {
            let client = ClientBuilder::new(endpoint).build().unwrap();
            let scheme = &endpoint[..endpoint.find(':').unwrap()];
            assert_eq!(client.endpoint().scheme(), scheme);
            assert_eq!(client.username(), None);
        }
    }
}
