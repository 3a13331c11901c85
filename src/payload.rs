//! Builds the canonical APNs JSON body from a [`Notification`].
//!
//! Keys serialize in lexicographic order with no whitespace, so the same
//! notification always produces byte-identical output and the size check
//! below measures exactly what goes on the wire.

use serde_json::{Map, Value};

use crate::{error::ApnsError, message::Notification};

/// APNs rejects payloads above this many bytes (VoIP pushes excepted).
pub const MAX_PAYLOAD_SIZE: usize = 4096;

/// Serializes the notification into the final request body, failing with
/// `PayloadTooLarge` when the result exceeds [`MAX_PAYLOAD_SIZE`].
pub fn serialize_payload(notification: &Notification) -> Result<Vec<u8>, ApnsError> {
    let mut root = Map::new();
    root.insert("aps".to_string(), aps_dictionary(notification));

    // Custom keys live next to aps; on a collision the custom value wins.
    for (key, value) in &notification.extra {
        root.insert(key.clone(), value.clone());
    }

    let payload = serde_json::to_vec(&Value::Object(root))?;

    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(ApnsError::PayloadTooLarge);
    }

    Ok(payload)
}

fn aps_dictionary(notification: &Notification) -> Value {
    let mut aps = Map::new();

    if let Some(alert) = alert_value(notification) {
        aps.insert("alert".to_string(), alert);
    }

    if let Some(badge) = notification.badge {
        aps.insert("badge".to_string(), badge.into());
    }

    if let Some(ref sound) = notification.sound {
        aps.insert("sound".to_string(), Value::String(sound.clone()));
    }

    if let Some(ref category) = notification.category {
        aps.insert("category".to_string(), Value::String(category.clone()));
    }

    // Binary presence markers: emit 1 or leave the key out entirely.
    if notification.content_available {
        aps.insert("content-available".to_string(), 1.into());
    }

    if notification.mutable_content {
        aps.insert("mutable-content".to_string(), 1.into());
    }

    Value::Object(aps)
}

/// A plain string alert, unless any localization field is set, in which
/// case the alert is coerced into its structured dictionary form with the
/// original text as `body`.
fn alert_value(notification: &Notification) -> Option<Value> {
    let localized = notification.action_loc_key.is_some()
        || notification.loc_key.is_some()
        || !notification.loc_args.is_empty();

    if !localized {
        return notification.alert.clone().map(Value::String);
    }

    let mut alert = Map::new();

    match notification.alert {
        Some(ref body) if !body.is_empty() => {
            alert.insert("body".to_string(), Value::String(body.clone()));
        }
        _ => {}
    }

    if let Some(ref key) = notification.action_loc_key {
        alert.insert("action-loc-key".to_string(), Value::String(key.clone()));
    }

    if let Some(ref key) = notification.loc_key {
        alert.insert("loc-key".to_string(), Value::String(key.clone()));
    }

    if !notification.loc_args.is_empty() {
        let args = notification.loc_args.iter().cloned().map(Value::String).collect();
        alert.insert("loc-args".to_string(), Value::Array(args));
    }

    Some(Value::Object(alert))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Notification;

    #[test]
    fn serializes_with_sorted_keys_and_no_whitespace() {
        let mut builder = Notification::builder();
        builder.set_alert("Hi");
        builder.set_badge(1);
        builder.set_sound("chime");
        builder.set_extra("zebra", 1);
        builder.set_extra("apple", 2);

        let payload = serialize_payload(&builder.build()).unwrap();

        assert_eq!(
            r#"{"apple":2,"aps":{"alert":"Hi","badge":1,"sound":"chime"},"zebra":1}"#,
            String::from_utf8(payload).unwrap()
        );
    }

    #[test]
    fn serialization_is_deterministic() {
        let mut builder = Notification::builder();
        builder.set_alert("Same thing twice");
        builder.set_category("news");
        builder.set_extra("b", "2");
        builder.set_extra("a", "1");
        let notification = builder.build();

        assert_eq!(
            serialize_payload(&notification).unwrap(),
            serialize_payload(&notification).unwrap()
        );
    }

    #[test]
    fn localization_keys_coerce_the_alert_into_a_dictionary() {
        let mut builder = Notification::builder();
        builder.set_alert("Hello");
        builder.set_loc_key("GAME_INVITE");
        builder.set_loc_args(vec!["Jenna", "Frank"]);
        builder.set_action_loc_key("PLAY");

        let payload = serialize_payload(&builder.build()).unwrap();

        assert_eq!(
            concat!(
                r#"{"aps":{"alert":{"action-loc-key":"PLAY","body":"Hello","#,
                r#""loc-args":["Jenna","Frank"],"loc-key":"GAME_INVITE"}}}"#
            ),
            String::from_utf8(payload).unwrap()
        );
    }

    #[test]
    fn localization_without_alert_text_omits_the_body() {
        let mut builder = Notification::builder();
        builder.set_loc_key("WAKE_UP");

        let payload = serialize_payload(&builder.build()).unwrap();

        assert_eq!(
            r#"{"aps":{"alert":{"loc-key":"WAKE_UP"}}}"#,
            String::from_utf8(payload).unwrap()
        );
    }

    #[test]
    fn presence_markers_are_one_or_absent() {
        let mut builder = Notification::builder();
        builder.set_content_available();
        builder.set_mutable_content();

        let marked = serialize_payload(&builder.build()).unwrap();
        assert_eq!(
            r#"{"aps":{"content-available":1,"mutable-content":1}}"#,
            String::from_utf8(marked).unwrap()
        );

        let unmarked = serialize_payload(&Notification::default()).unwrap();
        assert_eq!(r#"{"aps":{}}"#, String::from_utf8(unmarked).unwrap());
    }

    #[test]
    fn payload_at_the_size_limit_passes_and_one_byte_over_fails() {
        let mut builder = Notification::builder();
        builder.set_alert("");
        let base = serialize_payload(&builder.build()).unwrap().len();

        let mut builder = Notification::builder();
        builder.set_alert("x".repeat(MAX_PAYLOAD_SIZE - base));
        let payload = serialize_payload(&builder.build()).unwrap();
        assert_eq!(MAX_PAYLOAD_SIZE, payload.len());

        let mut builder = Notification::builder();
        builder.set_alert("x".repeat(MAX_PAYLOAD_SIZE - base + 1));
        assert!(matches!(
            serialize_payload(&builder.build()),
            Err(ApnsError::PayloadTooLarge)
        ));
    }
}
