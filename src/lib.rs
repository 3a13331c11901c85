//! # apns-push
//!
//! A client for the Apple Push Notification service (APNs) over HTTP/2,
//! authenticating with token-based provider authentication: requests carry
//! a bearer JWT signed with the ES256 auth key from the Apple developer
//! portal, instead of a client TLS certificate.
//!
//! The crate covers payload construction with the 4096 byte cap enforced
//! before anything touches the network, provider token signing with an
//! optional cache seam, per-device and bulk delivery over a shared
//! connection, and a typed error for every documented APNs rejection
//! reason.
//!
//! # Example
//!
//! ```no_run
//! use apns_push::{ApnsProvider, Notification, SendOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut builder = ApnsProvider::builder("67WPQ2V9W5", "S8KJ3L2M4N");
//!     builder.set_auth_key_file("AuthKey_S8KJ3L2M4N.p8");
//!     builder.set_default_topic("com.example.app");
//!     let provider = builder.build()?;
//!
//!     let mut notification = Notification::builder();
//!     notification.set_alert("Hello from Rust");
//!     notification.set_badge(1);
//!
//!     let result = provider
//!         .send_message("<device token>", &notification.build(), SendOptions::default())
//!         .await?;
//!
//!     println!("accepted as {}", result.apns_id);
//!     Ok(())
//! }
//! ```
//!
//! Bulk sends sign one token and open one connection for the whole batch,
//! and report per-device outcomes instead of stopping at the first
//! rejection:
//!
//! ```no_run
//! # use apns_push::{ApnsError, ApnsProvider, Notification, SendOptions};
//! # async fn example(provider: ApnsProvider, notification: Notification) {
//! let tokens = vec!["token a", "token b", "token c"];
//!
//! match provider
//!     .send_bulk_message(&tokens, &notification, SendOptions::default())
//!     .await
//! {
//!     Ok(_) => println!("everything delivered"),
//!     Err(ApnsError::PartialBulkMessage { rejected, .. }) => {
//!         for rejection in rejected {
//!             println!("{}: {}", rejection.device_token, rejection.reason);
//!         }
//!     }
//!     Err(e) => println!("batch failed: {}", e),
//! }
//! # }
//! ```

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

mod auth;
pub mod clients;
mod error;
mod message;
mod payload;
mod provider;

pub use crate::auth::{
    validate_private_key, wrap_private_key, AuthKey, MemoryTokenCache, NoCache, TokenCache,
    TokenSigner,
};
pub use crate::clients::ApnsClient;
pub use crate::error::{ApnsError, BulkRejection, ErrorBody};
pub use crate::message::{
    ApnsRequest, Endpoint, Notification, NotificationBuilder, PushType, SendOptions, SendResult,
    PRODUCTION_HOST, SANDBOX_HOST,
};
pub use crate::payload::{serialize_payload, MAX_PAYLOAD_SIZE};
pub use crate::provider::{ApnsProvider, ApnsProviderBuilder};

#[cfg(feature = "hyper-client")]
pub use crate::clients::hyper_client::HyperApnsClient;

#[cfg(all(feature = "hyper-rustls-client", not(feature = "hyper-client")))]
pub use crate::clients::hyper_rustls_client::HyperRustlsApnsClient;

#[cfg(not(any(feature = "hyper-client", feature = "hyper-rustls-client")))]
pub use crate::clients::isahc_client::IsahcApnsClient;
