//! Sending requests to the REST proxy.
//!
//! # Network Module
//!
//! The REST proxy speaks JSON over HTTP. Every operation is a single request
//! answered by a single response; nothing is pipelined, pooled by us or
//! retried. The [`Transport`] trait is the seam between the client and the
//! HTTP stack: it takes a fully described [`HttpRequest`] and hands back the
//! status and raw body, without looking at either.
//!
//! [`HttpTransport`] is the default implementation on top of `reqwest`.
//! Anything else that can answer an [`HttpRequest`] (a test double, a proxy
//! with custom TLS) can be plugged into the
//! [`ClientBuilder`](crate::prelude::ClientBuilder).
use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Method, StatusCode};

use crate::error::Result;

pub mod http;

pub use http::HttpTransport;

/// Static basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A request ready to be sent.
///
/// `path` is relative to the endpoint the transport was built for.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub accept: String,
    pub content_type: Option<String>,
    pub body: Option<Bytes>,
    pub credentials: Option<Credentials>,
}

/// What came back: the status and the body, untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

#[async_trait]
pub trait Transport: Debug + Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
