use std::{convert::From, error::Error, fmt, io::Error as IoError};

use http::Error as HttpError;

/// The JSON body APNs attaches to a non-200 response. The timestamp is
/// only present for `Unregistered` (HTTP 410) and tells when APNs last
/// confirmed the token was gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.timestamp {
            Some(ts) => write!(f, "{} (as of {})", self.reason, ts),
            None => write!(f, "{}", self.reason),
        }
    }
}

/// A single failed delivery inside a bulk send.
#[derive(Debug)]
pub struct BulkRejection {
    /// The device token the notification was addressed to.
    pub device_token: String,
    /// Why APNs (or this library) rejected it.
    pub reason: ApnsError,
}

#[derive(Debug)]
pub enum ApnsError {
    /// An unknown error happened while signing or sending the notification
    Unspecified,
    /// The client is missing required configuration, such as a topic or a
    /// readable auth key
    ImproperlyConfigured(String),
    /// The auth key is not a recognizable PEM private key
    InvalidKey,
    /// The push type is not one APNs defines
    InvalidPushType(String),
    /// Signing the provider token failed
    Signing(String),
    /// The request target or headers could not be assembled into a valid
    /// request
    InvalidUri,
    /// Corrupted response data
    InvalidResponse,
    /// The response body exceeded the read limit
    ResponseTooLarge,
    /// Error in reading a file
    Io(IoError),
    /// Some notifications in a bulk send were rejected while others were
    /// accepted
    PartialBulkMessage {
        /// Device tokens APNs accepted a notification for.
        accepted: Vec<String>,
        /// Every rejected device token with its own failure reason.
        rejected: Vec<BulkRejection>,
    },

    /// The collapse identifier exceeds the maximum allowed size
    BadCollapseId,
    /// The specified device token was bad. Verify that the request contains
    /// a valid token and that the token matches the environment
    BadDeviceToken,
    /// The apns-expiration value is bad
    BadExpirationDate,
    /// The apns-id value is bad
    BadMessageId,
    /// The apns-priority value is bad
    BadPriority,
    /// The apns-topic was invalid
    BadTopic,
    /// The device token does not match the specified topic
    DeviceTokenNotForTopic,
    /// One or more headers were repeated
    DuplicateHeaders,
    /// Idle time out
    IdleTimeout,
    /// The device token is not specified in the request path
    MissingDeviceToken,
    /// The apns-topic header of the request was not specified and was
    /// required
    MissingTopic,
    /// The message payload was empty
    PayloadEmpty,
    /// The message payload exceeds the 4096 byte limit
    PayloadTooLarge,
    /// Pushing to this topic is not allowed
    TopicDisallowed,
    /// The certificate was bad
    BadCertificate,
    /// The client certificate was for the wrong environment
    BadCertificateEnvironment,
    /// The provider token is stale and a new token should be generated
    ExpiredProviderToken,
    /// The specified action is not allowed
    Forbidden,
    /// The provider token is not valid or the token signature could not be
    /// verified
    InvalidProviderToken,
    /// The Authorization header was missing or no provider token was
    /// specified
    MissingProviderToken,
    /// The request contained a bad :path value
    BadPath,
    /// The specified :method was not POST
    MethodNotAllowed,
    /// The device token is inactive for the specified topic
    Unregistered,
    /// The provider token is being updated too often
    TooManyProviderTokenUpdates,
    /// Too many requests were made consecutively to the same device token
    TooManyRequests,
    /// An internal server error occurred
    InternalServerError,
    /// The service is unavailable
    ServiceUnavailable,
    /// The server is shutting down
    Shutdown,
    /// APNs reported a reason this library does not recognize, or the error
    /// body could not be interpreted
    Other(String),
}

impl ApnsError {
    /// Maps a `reason` string from an APNs error body to the matching error.
    /// The lookup is case-sensitive; anything undocumented lands in `Other`.
    pub fn from_reason(reason: &str) -> ApnsError {
        match reason {
            "BadCollapseId" => ApnsError::BadCollapseId,
            "BadDeviceToken" => ApnsError::BadDeviceToken,
            "BadExpirationDate" => ApnsError::BadExpirationDate,
            "BadMessageId" => ApnsError::BadMessageId,
            "BadPriority" => ApnsError::BadPriority,
            "BadTopic" => ApnsError::BadTopic,
            "DeviceTokenNotForTopic" => ApnsError::DeviceTokenNotForTopic,
            "DuplicateHeaders" => ApnsError::DuplicateHeaders,
            "IdleTimeout" => ApnsError::IdleTimeout,
            "MissingDeviceToken" => ApnsError::MissingDeviceToken,
            "MissingTopic" => ApnsError::MissingTopic,
            "PayloadEmpty" => ApnsError::PayloadEmpty,
            "PayloadTooLarge" => ApnsError::PayloadTooLarge,
            "TopicDisallowed" => ApnsError::TopicDisallowed,
            "BadCertificate" => ApnsError::BadCertificate,
            "BadCertificateEnvironment" => ApnsError::BadCertificateEnvironment,
            "ExpiredProviderToken" => ApnsError::ExpiredProviderToken,
            "Forbidden" => ApnsError::Forbidden,
            "InvalidProviderToken" => ApnsError::InvalidProviderToken,
            "MissingProviderToken" => ApnsError::MissingProviderToken,
            "BadPath" => ApnsError::BadPath,
            "MethodNotAllowed" => ApnsError::MethodNotAllowed,
            "Unregistered" => ApnsError::Unregistered,
            "TooManyProviderTokenUpdates" => ApnsError::TooManyProviderTokenUpdates,
            "TooManyRequests" => ApnsError::TooManyRequests,
            "InternalServerError" => ApnsError::InternalServerError,
            "ServiceUnavailable" => ApnsError::ServiceUnavailable,
            "Shutdown" => ApnsError::Shutdown,
            other => ApnsError::Other(other.to_string()),
        }
    }

    pub fn short_description(&self) -> &'static str {
        match *self {
            ApnsError::Unspecified => "unspecified",
            ApnsError::ImproperlyConfigured(_) => "improperly_configured",
            ApnsError::InvalidKey => "invalid_key",
            ApnsError::InvalidPushType(_) => "invalid_push_type",
            ApnsError::Signing(_) => "signing_failed",
            ApnsError::InvalidUri => "invalid_uri",
            ApnsError::InvalidResponse => "invalid_response",
            ApnsError::ResponseTooLarge => "response_too_large",
            ApnsError::Io(_) => "io_error",
            ApnsError::PartialBulkMessage { .. } => "partial_bulk_message",
            ApnsError::BadCollapseId => "bad_collapse_id",
            ApnsError::BadDeviceToken => "bad_device_token",
            ApnsError::BadExpirationDate => "bad_expiration_date",
            ApnsError::BadMessageId => "bad_message_id",
            ApnsError::BadPriority => "bad_priority",
            ApnsError::BadTopic => "bad_topic",
            ApnsError::DeviceTokenNotForTopic => "device_token_not_for_topic",
            ApnsError::DuplicateHeaders => "duplicate_headers",
            ApnsError::IdleTimeout => "idle_timeout",
            ApnsError::MissingDeviceToken => "missing_device_token",
            ApnsError::MissingTopic => "missing_topic",
            ApnsError::PayloadEmpty => "payload_empty",
            ApnsError::PayloadTooLarge => "payload_too_large",
            ApnsError::TopicDisallowed => "topic_disallowed",
            ApnsError::BadCertificate => "bad_certificate",
            ApnsError::BadCertificateEnvironment => "bad_certificate_environment",
            ApnsError::ExpiredProviderToken => "expired_provider_token",
            ApnsError::Forbidden => "forbidden",
            ApnsError::InvalidProviderToken => "invalid_provider_token",
            ApnsError::MissingProviderToken => "missing_provider_token",
            ApnsError::BadPath => "bad_path",
            ApnsError::MethodNotAllowed => "method_not_allowed",
            ApnsError::Unregistered => "unregistered",
            ApnsError::TooManyProviderTokenUpdates => "too_many_provider_token_updates",
            ApnsError::TooManyRequests => "too_many_requests",
            ApnsError::InternalServerError => "internal_server_error",
            ApnsError::ServiceUnavailable => "service_unavailable",
            ApnsError::Shutdown => "shutdown",
            ApnsError::Other(_) => "other",
        }
    }
}

impl Error for ApnsError {}

impl From<serde_json::Error> for ApnsError {
    fn from(_: serde_json::Error) -> ApnsError {
        ApnsError::InvalidResponse
    }
}

impl From<HttpError> for ApnsError {
    fn from(_: HttpError) -> ApnsError {
        ApnsError::InvalidUri
    }
}

impl From<IoError> for ApnsError {
    fn from(err: IoError) -> ApnsError {
        ApnsError::Io(err)
    }
}

impl From<jwt_simple::Error> for ApnsError {
    fn from(err: jwt_simple::Error) -> ApnsError {
        ApnsError::Signing(err.to_string())
    }
}

#[cfg(any(feature = "hyper-client", feature = "hyper-rustls-client"))]
impl From<hyper::Error> for ApnsError {
    fn from(_: hyper::Error) -> Self {
        Self::Unspecified
    }
}

#[cfg(feature = "isahc-client")]
impl From<isahc::Error> for ApnsError {
    fn from(_: isahc::Error) -> Self {
        Self::Unspecified
    }
}

impl fmt::Display for ApnsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApnsError::Unspecified => write!(f, "unspecified error"),
            ApnsError::ImproperlyConfigured(msg) => write!(f, "improperly configured: {}", msg),
            ApnsError::InvalidKey => write!(f, "the auth key provided is not valid"),
            ApnsError::InvalidPushType(t) => write!(f, "{} is not a valid push type", t),
            ApnsError::Signing(msg) => write!(f, "signing the provider token failed: {}", msg),
            ApnsError::InvalidUri => write!(f, "invalid uri provided"),
            ApnsError::InvalidResponse => write!(f, "could not parse response data"),
            ApnsError::ResponseTooLarge => write!(f, "response data too large"),
            ApnsError::Io(err) => write!(f, "i/o error: {}", err),
            ApnsError::PartialBulkMessage { accepted, rejected } => write!(
                f,
                "{} of {} notifications were rejected",
                rejected.len(),
                accepted.len() + rejected.len()
            ),
            ApnsError::BadCollapseId => {
                write!(f, "the collapse identifier exceeds the maximum allowed size")
            }
            ApnsError::BadDeviceToken => write!(
                f,
                "the device token is invalid or does not match the environment"
            ),
            ApnsError::BadExpirationDate => write!(f, "the apns-expiration value is bad"),
            ApnsError::BadMessageId => write!(f, "the apns-id value is bad"),
            ApnsError::BadPriority => write!(f, "the apns-priority value is bad"),
            ApnsError::BadTopic => write!(f, "the apns-topic was invalid"),
            ApnsError::DeviceTokenNotForTopic => {
                write!(f, "the device token does not match the specified topic")
            }
            ApnsError::DuplicateHeaders => write!(f, "one or more headers were repeated"),
            ApnsError::IdleTimeout => write!(f, "idle time out"),
            ApnsError::MissingDeviceToken => {
                write!(f, "the device token is not specified in the request path")
            }
            ApnsError::MissingTopic => write!(f, "the apns-topic header was required but missing"),
            ApnsError::PayloadEmpty => write!(f, "the message payload was empty"),
            ApnsError::PayloadTooLarge => {
                write!(f, "the message payload exceeds the 4096 byte limit")
            }
            ApnsError::TopicDisallowed => write!(f, "pushing to this topic is not allowed"),
            ApnsError::BadCertificate => write!(f, "the certificate was bad"),
            ApnsError::BadCertificateEnvironment => {
                write!(f, "the client certificate was for the wrong environment")
            }
            ApnsError::ExpiredProviderToken => {
                write!(f, "the provider token is stale and a new token should be generated")
            }
            ApnsError::Forbidden => write!(f, "the specified action is not allowed"),
            ApnsError::InvalidProviderToken => {
                write!(f, "the provider token is not valid or its signature could not be verified")
            }
            ApnsError::MissingProviderToken => {
                write!(f, "the authorization header was missing or carried no provider token")
            }
            ApnsError::BadPath => write!(f, "the request contained a bad :path value"),
            ApnsError::MethodNotAllowed => write!(f, "the specified :method was not POST"),
            ApnsError::Unregistered => {
                write!(f, "the device token is inactive for the specified topic")
            }
            ApnsError::TooManyProviderTokenUpdates => {
                write!(f, "the provider token is being updated too often")
            }
            ApnsError::TooManyRequests => write!(
                f,
                "too many requests were made consecutively to the same device token"
            ),
            ApnsError::InternalServerError => write!(f, "an internal server error occurred"),
            ApnsError::ServiceUnavailable => write!(f, "the service is unavailable"),
            ApnsError::Shutdown => write!(f, "the server is shutting down"),
            ApnsError::Other(reason) => write!(f, "apns rejected the request: {}", reason),
        }
    }
}
