//! Functions used to build and interpret APNs push requests.
//! This module can be used to build custom clients.

use http::header::{AUTHORIZATION, CONTENT_LENGTH};
use http::{Request, StatusCode};

use crate::error::{ApnsError, ErrorBody};
use crate::message::ApnsRequest;

/// Builds the HTTP/2 request to send to APNs.
///
/// This function is generic over the request body, this means that you can
/// swap out client implementations even if they use different body types.
pub fn build_request<T>(message: ApnsRequest) -> Result<Request<T>, ApnsError>
where
    T: From<Vec<u8>>,
{
    let uri = format!(
        "https://{}/3/device/{}",
        message.endpoint.host(),
        message.device_token
    );

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("apns-id", message.apns_id.as_str())
        .header("apns-expiration", message.expiration.to_string())
        .header("apns-priority", message.priority.to_string())
        .header("apns-topic", message.topic.as_str())
        .header("apns-push-type", message.push_type.to_string())
        .header(AUTHORIZATION, format!("bearer {}", message.auth_token))
        .header(CONTENT_LENGTH, message.payload.len().to_string());

    if let Some(ref collapse_id) = message.collapse_id {
        builder = builder.header("apns-collapse-id", collapse_id.as_str());
    }

    Ok(builder.body(message.payload.into())?)
}

/// Interprets a response from APNs, returning `Err` if the notification
/// was rejected.
///
/// Rejections carry a JSON body whose `reason` selects the error; a body
/// that cannot be interpreted falls back to [`ApnsError::Other`] rather
/// than masking the rejection behind a parse error.
pub fn parse_response(response_status: StatusCode, body: Vec<u8>) -> Result<(), ApnsError> {
    if response_status.is_success() {
        return Ok(());
    }

    match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(error_body) => Err(ApnsError::from_reason(&error_body.reason)),
        Err(_) => Err(ApnsError::Other(
            String::from_utf8(body).unwrap_or_else(|_| "-".into()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use http::Uri;

    use crate::clients::request_builder::*;
    use crate::error::ApnsError;
    use crate::message::{ApnsRequest, Endpoint, PushType};

    fn message(endpoint: Endpoint) -> ApnsRequest {
        ApnsRequest {
            endpoint,
            device_token: "e2c48ad32cbafcb4f6e2ed98ab2f12e3".to_string(),
            payload: br#"{"aps":{"alert":"Hi"}}"#.to_vec(),
            topic: "com.example.app".to_string(),
            push_type: PushType::Alert,
            apns_id: "8bb14c32-214b-4b2b-a4a1-fa1c0b9b82a3".to_string(),
            expiration: 1_700_000_000,
            priority: 10,
            collapse_id: None,
            auth_token: "signed.provider.token".to_string(),
        }
    }

    #[test]
    fn builds_a_correct_request_for_production() {
        let request = build_request::<Vec<u8>>(message(Endpoint::Production)).unwrap();

        let expected_uri: Uri = "https://api.push.apple.com:443/3/device/e2c48ad32cbafcb4f6e2ed98ab2f12e3"
            .parse()
            .unwrap();

        assert_eq!("POST", request.method());
        assert_eq!(expected_uri.host(), request.uri().host());
        assert_eq!(
            "/3/device/e2c48ad32cbafcb4f6e2ed98ab2f12e3",
            request.uri().path()
        );

        let headers = request.headers();
        assert_eq!("com.example.app", headers.get("apns-topic").unwrap());
        assert_eq!("alert", headers.get("apns-push-type").unwrap());
        assert_eq!("10", headers.get("apns-priority").unwrap());
        assert_eq!("1700000000", headers.get("apns-expiration").unwrap());
        assert_eq!(
            "8bb14c32-214b-4b2b-a4a1-fa1c0b9b82a3",
            headers.get("apns-id").unwrap()
        );
        assert_eq!(
            "bearer signed.provider.token",
            headers.get("authorization").unwrap()
        );
        assert_eq!("22", headers.get("content-length").unwrap());
        assert!(headers.get("apns-collapse-id").is_none());

        assert_eq!(br#"{"aps":{"alert":"Hi"}}"#.to_vec(), *request.body());
    }

    #[test]
    fn sandbox_requests_target_the_development_host() {
        let request = build_request::<Vec<u8>>(message(Endpoint::Sandbox)).unwrap();

        assert_eq!(
            Some("api.development.push.apple.com"),
            request.uri().host()
        );
    }

    #[test]
    fn collapse_id_is_forwarded_when_present() {
        let mut message = message(Endpoint::Production);
        message.collapse_id = Some("score-update".to_string());

        let request = build_request::<Vec<u8>>(message).unwrap();

        assert_eq!(
            "score-update",
            request.headers().get("apns-collapse-id").unwrap()
        );
    }

    #[test]
    fn parses_a_successful_response_correctly() {
        assert!(matches!(parse_response(StatusCode::OK, vec![]), Ok(())));
    }

    #[test]
    fn parses_a_bad_device_token_rejection_correctly() {
        let body = br#"{"reason":"BadDeviceToken"}"#.to_vec();

        assert!(matches!(
            parse_response(StatusCode::BAD_REQUEST, body),
            Err(ApnsError::BadDeviceToken)
        ));
    }

    #[test]
    fn parses_an_unregistered_rejection_with_timestamp_correctly() {
        let body = br#"{"reason":"Unregistered","timestamp":1693939393}"#.to_vec();

        assert!(matches!(
            parse_response(StatusCode::GONE, body),
            Err(ApnsError::Unregistered)
        ));
    }

    #[test]
    fn parses_an_expired_token_rejection_correctly() {
        let body = br#"{"reason":"ExpiredProviderToken"}"#.to_vec();

        assert!(matches!(
            parse_response(StatusCode::FORBIDDEN, body),
            Err(ApnsError::ExpiredProviderToken)
        ));
    }

    #[test]
    fn an_unrecognized_reason_maps_to_other() {
        let body = br#"{"reason":"SomeFutureReason"}"#.to_vec();

        match parse_response(StatusCode::BAD_REQUEST, body) {
            Err(ApnsError::Other(reason)) => assert_eq!("SomeFutureReason", reason),
            other => panic!("expected Other, got {:?}", other),
        }
    }

    #[test]
    fn a_garbage_error_body_maps_to_other_instead_of_crashing() {
        let body = b"not json at all".to_vec();

        match parse_response(StatusCode::INTERNAL_SERVER_ERROR, body) {
            Err(ApnsError::Other(raw)) => assert_eq!("not json at all", raw),
            other => panic!("expected Other, got {:?}", other),
        }
    }
}
