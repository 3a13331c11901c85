use async_trait::async_trait;
use hyper::{body::HttpBody, client::HttpConnector, Body, Client, Request as HttpRequest};
use hyper_rustls::HttpsConnector;

use crate::{
    clients::{request_builder, ApnsClient, MAX_RESPONSE_SIZE},
    error::ApnsError,
    message::{ApnsRequest, SendResult},
};

/// An async client for delivering notifications to APNs using rustls for
/// TLS.
///
/// This client is thread-safe. Clones of this client will share the same
/// underlying resources, so cloning is a cheap and effective method to
/// provide access to the client.
///
/// This client is [`hyper`](https://crates.io/crates/hyper) based with
/// [`rustls`](https://crates.io/crates/rustls) for TLS, and will only work
/// in Tokio contexts. This variant is ideal for docker/musl builds that
/// don't require native-tls.
#[derive(Clone)]
pub struct HyperRustlsApnsClient {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl Default for HyperRustlsApnsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Client<HttpsConnector<HttpConnector>>> for HyperRustlsApnsClient {
    /// Creates a new client from a custom hyper HTTP client with rustls
    /// connector.
    fn from(client: Client<HttpsConnector<HttpConnector>>) -> Self {
        Self { client }
    }
}

impl HyperRustlsApnsClient {
    /// Creates a new client with rustls for TLS, in HTTP/2-only mode as
    /// APNs requires.
    pub fn new() -> Self {
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_only()
            .enable_http2()
            .build();

        Self {
            client: Client::builder().http2_only(true).build(https),
        }
    }
}

#[async_trait]
impl ApnsClient for HyperRustlsApnsClient {
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
