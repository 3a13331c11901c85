//! Contains implementations of APNs transports.
//!
//! [`request_builder`] contains the functions used to build and interpret
//! the HTTP messages. This module should be consumed by each client, by
//! using [`http`]'s flexible api.

use async_trait::async_trait;

use crate::error::ApnsError;
use crate::message::{ApnsRequest, SendResult};

pub mod request_builder;

#[cfg(feature = "hyper-client")]
pub mod hyper_client;

#[cfg(all(feature = "hyper-rustls-client", not(feature = "hyper-client")))]
pub mod hyper_rustls_client;

#[cfg(not(any(feature = "hyper-client", feature = "hyper-rustls-client")))]
pub mod isahc_client;

/// An APNs error body is a short JSON object; anything past this limit is
/// not a response worth reading.
pub const MAX_RESPONSE_SIZE: usize = 4096;

/// One logical connection to APNs. Delivers a prepared request and
/// interprets the response into a [`SendResult`] or a typed error.
///
/// The bundled implementations hold a connection pool internally, so a
/// single client can carry a whole bulk send over one HTTP/2 connection.
#[async_trait]
pub trait ApnsClient: Send + Sync {
    /// Delivers one notification, reading the response to completion.
    async fn send(&self, message: ApnsRequest) -> Result<SendResult, ApnsError>;
}
