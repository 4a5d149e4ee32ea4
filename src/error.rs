//! Error types returned by the client.
//!
//! Every failed request ends up as one [`Error`]. Errors reported by the
//! proxy itself carry a proxy-specific `error_code`, which is mapped onto a
//! [`ResponseErrorKind`] through a fixed table. Codes the table does not know
//! resolve to [`ResponseErrorKind::Generic`].
//!
//! The rendered message of a response error always ends with
//! `(error code <code>)`, so printing the error is enough to look the
//! condition up.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Connectivity or transport failure, surfaced as reported by the HTTP client.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The body was not valid JSON where JSON was required.
    #[error("Invalid JSON in response: {0}")]
    MalformedResponse(String),

    /// The proxy answered with `403 Forbidden`.
    ///
    /// `code` is the HTTP status code, not a proxy error code.
    #[error("{message} (error code {code})")]
    Unauthorized { code: u16, message: String },

    /// An error reported by the proxy in the response body.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// The body was valid JSON but not in the shape the caller expected.
    #[error("Unexpected response shape: {0}")]
    Decode(#[source] serde_json::Error),

    /// Invalid configuration or request arguments.
    #[error("Invalid argument: {0}")]
    ArgError(String),
}

impl Error {
    /// The numeric code attached to the error, if any.
    pub fn code(&self) -> Option<i64> {
        match self {
            Error::Unauthorized { code, .. } => Some(i64::from(*code)),
            Error::Response(err) => Some(err.code),
            _ => None,
        }
    }

    /// The classified proxy error, if this is one.
    pub fn response_error(&self) -> Option<&ResponseError> {
        match self {
            Error::Response(err) => Some(err),
            _ => None,
        }
    }
}

/// Known error conditions reported by the REST proxy.
///
/// The discriminants are the proxy's `error_code` values.
/// See also [REST Proxy errors].
///
/// [REST Proxy errors]: https://docs.confluent.io/platform/current/kafka-rest/api.html#errors
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
pub enum ResponseErrorKind {
    /// Any code not listed below.
    Generic = -1,
    /// The requested topic does not exist.
    TopicNotFound = 40401,
    /// The requested partition does not exist.
    PartitionNotFound = 40402,
    /// The request was well formed but semantically invalid.
    UnprocessableEntity = 422,
    /// The proxy failed talking to Zookeeper.
    ZookeeperError = 50001,
    /// Kafka returned an error.
    KafkaError = 50002,
    /// Kafka returned an error that may succeed if retried.
    RetriableKafkaError = 50003,
    /// No SSL endpoint is configured on the broker.
    SslEndpointError = 50101,
}

impl ResponseErrorKind {
    /// Resolve a proxy error code. Unknown codes map to [`Self::Generic`].
    pub fn from_code(code: i64) -> Self {
        FromPrimitive::from_i64(code).unwrap_or(ResponseErrorKind::Generic)
    }
}

/// An error reported by the proxy, as `error_code` and `message`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (error code {code})")]
pub struct ResponseError {
    pub kind: ResponseErrorKind,
    pub code: i64,
    pub message: String,
}

impl ResponseError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            kind: ResponseErrorKind::from_code(code),
            code,
            message: message.into(),
        }
    }

    /// Whether the proxy flagged the failure as worth retrying.
    ///
    /// The client never retries on its own.
    pub fn is_retriable(&self) -> bool {
        self.kind == ResponseErrorKind::RetriableKafkaError
    }
}
