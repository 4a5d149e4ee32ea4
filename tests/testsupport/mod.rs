use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kafka_rest::prelude::{
    bytes::Bytes, Client, ClientBuilder, Error, HttpRequest, HttpResponse, StatusCode, Transport,
};

const KAFKA_REST_URL: &str = "KAFKA_REST_URL";
#[allow(dead_code)]
const KAFKA_TOPIC: &str = "KAFKA_TOPIC";

/// Transport that records every request and answers with canned responses
/// in order.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: Bytes::from(body.to_string()),
        });
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn last_body(&self) -> serde_json::Value {
        let body = self.last_request().body.expect("request had no body");
        serde_json::from_slice(&body).unwrap()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            Error::ArgError(format!(
                "no canned response for {} {}",
                request.method, request.path
            ))
        })
    }
}

#[allow(dead_code)]
pub fn client(transport: &Arc<MockTransport>) -> Client {
    ClientBuilder::new("http://localhost:8082")
        .transport(transport.clone())
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn client_with_credentials(transport: &Arc<MockTransport>) -> Client {
    ClientBuilder::new("http://localhost:8082")
        .credentials("alice", "secret")
        .transport(transport.clone())
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn get_proxy_url() -> Result<(bool, String), Error> {
    let url = match env::var(KAFKA_REST_URL) {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("Skipping test because no {} is set", KAFKA_REST_URL);
            return Ok((true, "".to_string()));
        }
    };
    Ok((false, url))
}

#[allow(dead_code)]
pub fn get_proxy_url_and_topic() -> Result<(bool, String, String), Error> {
    let (skip, url) = get_proxy_url()?;
    if skip {
        return Ok((skip, "".to_string(), "".to_string()));
    }
    let topic = match env::var(KAFKA_TOPIC) {
        Ok(topic) => topic,
        Err(_) => {
            tracing::warn!("Skipping test because no {} is set", KAFKA_TOPIC);
            return Ok((true, "".to_string(), "".to_string()));
        }
    };
    Ok((false, url, topic))
}
