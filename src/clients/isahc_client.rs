use async_trait::async_trait;
use futures_lite::AsyncReadExt;
use isahc::config::{Configurable, VersionNegotiation};
use isahc::HttpClient;

use crate::clients::request_builder;
use crate::clients::{ApnsClient, MAX_RESPONSE_SIZE};
use crate::error::ApnsError;
use crate::message::{ApnsRequest, SendResult};

/// An async client for delivering notifications to APNs. This client is
/// expensive to create, and should be reused where calls share a scope.
///
/// This client is thread-safe. Clones of this client will share the same
/// underlying resources, so cloning is a cheap and effective method to
/// provide access to the client.
///
/// This client is built on [`isahc`](https://crates.io/crates/isahc), and
/// will therefore work on any async executor.
#[derive(Clone)]
pub struct IsahcApnsClient {
    client: HttpClient,
}

impl Default for IsahcApnsClient {
    fn default() -> Self {
        Self::new().unwrap()
    }
}

impl From<HttpClient> for IsahcApnsClient {
    /// Creates a new client from a custom Isahc HTTP client.
    fn from(client: HttpClient) -> Self {
        Self { client }
    }
}

impl IsahcApnsClient {
    /// Creates a new client negotiating HTTP/2, which APNs requires.
    /// Can fail under resource depletion.
    pub fn new() -> Result<Self, ApnsError> {
        Ok(Self {
            client: HttpClient::builder()
                .version_negotiation(VersionNegotiation::http2())
                .build()?,
        })
    }
}

#[async_trait]
impl ApnsClient for IsahcApnsClient {
    /// Sends a notification. Never times out.
    async fn send(&self, message: ApnsRequest) -> Result<SendResult, ApnsError> {
        trace!("Message: {:?}", message);

        let apns_id = message.apns_id.clone();
        let device_token = message.device_token.clone();

        let request = request_builder::build_request::<isahc::AsyncBody>(message)?;

        trace!("Request: {:?}", request);

        let response = self.client.send_async(request).await?;

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

        let mut body = Vec::new();
        if response
            .into_body()
            .take(MAX_RESPONSE_SIZE as u64 + 1)
            .read_to_end(&mut body)
            .await?
            > MAX_RESPONSE_SIZE
        {
            return Err(ApnsError::ResponseTooLarge);
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
