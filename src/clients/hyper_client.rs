use async_trait::async_trait;

use hyper::{body::HttpBody, client::HttpConnector, Body, Client, Request as HttpRequest};
use hyper_tls::HttpsConnector;

use crate::clients::request_builder;
use crate::clients::{ApnsClient, MAX_RESPONSE_SIZE};
use crate::error::ApnsError;
use crate::message::{ApnsRequest, SendResult};

/// An async client for delivering notifications to APNs.
///
/// This client is thread-safe. Clones of this client will share the same
/// underlying resources, so cloning is a cheap and effective method to
/// provide access to the client.
///
/// This client is [`hyper`](https://crates.io/crates/hyper) based in
/// HTTP/2-only mode, and will only work in Tokio contexts.
#[derive(Clone)]
pub struct HyperApnsClient {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl Default for HyperApnsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Client<HttpsConnector<HttpConnector>>> for HyperApnsClient {
    /// Creates a new client from a custom hyper HTTP client.
    fn from(client: Client<HttpsConnector<HttpConnector>>) -> Self {
        Self { client }
    }
}

impl HyperApnsClient {
    /// Creates a new client in HTTP/2-only mode, which APNs requires.
    pub fn new() -> Self {
        Self {
            client: Client::builder().http2_only(true).build(HttpsConnector::new()),
        }
    }
}

#[async_trait]
impl ApnsClient for HyperApnsClient {
    /// Sends a notification. Never times out.
    async fn send(&self, message: ApnsRequest) -> Result<SendResult, ApnsError> {
        trace!("Message: {:?}", message);

        let apns_id = message.apns_id.clone();
        let device_token = message.device_token.clone();

        let request: HttpRequest<Body> = request_builder::build_request(message)?;

        debug!("Request: {:?}", request);

        let response = self.client.request(request).await?;

        trace!("Response: {:?}", response);

        // APNs echoes the notification id; prefer its word over ours.
        let apns_id = response
            .headers()
            .get("apns-id")
            .and_then(|id| id.to_str().ok())
            .map(|id| id.to_string())
            .unwrap_or(apns_id);

        let response_status = response.status();
        trace!("Response status: {}", response_status);

        let mut chunks = response.into_body();
        let mut body = Vec::new();
        while let Some(chunk) = chunks.data().await {
            body.extend(&chunk?);
            if body.len() > MAX_RESPONSE_SIZE {
                return Err(ApnsError::ResponseTooLarge);
            }
        }
        trace!("Body: {:?}", body);

        trace!("Body text: {:?}", std::str::from_utf8(&body));

        request_builder::parse_response(response_status, body)?;

        Ok(SendResult {
            apns_id,
            device_token,
        })
    }
}
