use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ApnsError;

pub const PRODUCTION_HOST: &str = "api.push.apple.com:443";
pub const SANDBOX_HOST: &str = "api.development.push.apple.com:443";

/// The APNs environment to talk to. Tokens are registered per environment,
/// so a sandbox token pushed through production fails with `BadDeviceToken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Production,
    Sandbox,
}

impl Endpoint {
    pub fn host(&self) -> &'static str {
        match self {
            Endpoint::Production => PRODUCTION_HOST,
            Endpoint::Sandbox => SANDBOX_HOST,
        }
    }
}

/// The `apns-push-type` header value, telling APNs how the notification is
/// delivered and displayed on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushType {
    Alert,
    Background,
    Voip,
    Complication,
    Fileprovider,
    Mdm,
}

impl Default for PushType {
    fn default() -> Self {
        PushType::Alert
    }
}

impl fmt::Display for PushType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            PushType::Alert => "alert",
            PushType::Background => "background",
            PushType::Voip => "voip",
            PushType::Complication => "complication",
            PushType::Fileprovider => "fileprovider",
            PushType::Mdm => "mdm",
        };

        f.write_str(s)
    }
}

impl FromStr for PushType {
    type Err = ApnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alert" => Ok(PushType::Alert),
            "background" => Ok(PushType::Background),
            "voip" => Ok(PushType::Voip),
            "complication" => Ok(PushType::Complication),
            "fileprovider" => Ok(PushType::Fileprovider),
            "mdm" => Ok(PushType::Mdm),
            other => Err(ApnsError::InvalidPushType(other.to_string())),
        }
    }
}

/// The logical content of a notification, before it is serialized into the
/// `aps` payload. Construct with [`NotificationBuilder`].
#[derive(Debug, Clone, Default)]
pub struct Notification {
    /// The alert text, or the `body` of the structured alert when any of
    /// the localization keys are set.
    pub alert: Option<String>,
    /// The number shown on the app icon.
    pub badge: Option<u32>,
    /// Name of a sound file in the app bundle.
    pub sound: Option<String>,
    /// The notification category for actionable notifications.
    pub category: Option<String>,
    /// Wake the app in the background without alerting the user.
    pub content_available: bool,
    /// Let a notification service extension modify the payload on device.
    pub mutable_content: bool,
    /// Localization key for the action button title.
    pub action_loc_key: Option<String>,
    /// Localization key for the alert body.
    pub loc_key: Option<String>,
    /// Substitution arguments for `loc_key`.
    pub loc_args: Vec<String>,
    /// Custom top-level keys delivered alongside `aps`.
    pub extra: BTreeMap<String, Value>,
}

impl Notification {
    pub fn builder() -> NotificationBuilder {
        NotificationBuilder::new()
    }
}

/// The main class for assembling a notification's content.
#[derive(Debug, Default)]
pub struct NotificationBuilder {
    notification: Notification,
}

impl NotificationBuilder {
    pub fn new() -> NotificationBuilder {
        NotificationBuilder {
            notification: Notification::default(),
        }
    }

    /// The alert text shown to the user.
    pub fn set_alert<S: Into<String>>(&mut self, alert: S) {
        self.notification.alert = Some(alert.into());
    }

    pub fn set_badge(&mut self, badge: u32) {
        self.notification.badge = Some(badge);
    }

    pub fn set_sound<S: Into<String>>(&mut self, sound: S) {
        self.notification.sound = Some(sound.into());
    }

    pub fn set_category<S: Into<String>>(&mut self, category: S) {
        self.notification.category = Some(category.into());
    }

    /// Deliver silently and wake the app in the background.
    pub fn set_content_available(&mut self) {
        self.notification.content_available = true;
    }

    /// Allow a notification service extension to rewrite the payload.
    pub fn set_mutable_content(&mut self) {
        self.notification.mutable_content = true;
    }

    /// Setting any localization key coerces the alert into its structured
    /// dictionary form when the payload is built.
    pub fn set_action_loc_key<S: Into<String>>(&mut self, key: S) {
        self.notification.action_loc_key = Some(key.into());
    }

    pub fn set_loc_key<S: Into<String>>(&mut self, key: S) {
        self.notification.loc_key = Some(key.into());
    }

    pub fn set_loc_args<S: Into<String>>(&mut self, args: Vec<S>) {
        self.notification.loc_args = args.into_iter().map(|a| a.into()).collect();
    }

    /// Add a custom top-level key next to `aps`. On a key collision the
    /// custom value wins.
    pub fn set_extra<S, V>(&mut self, key: S, value: V)
    where
        S: Into<String>,
        V: Into<Value>,
    {
        self.notification.extra.insert(key.into(), value.into());
    }

    pub fn build(self) -> Notification {
        self.notification
    }
}

/// Per-send parameters. A fresh default value is expected for every send;
/// unset fields fall back to the provider's configuration or the APNs
/// defaults documented on [`crate::ApnsProvider::send_message`].
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Target topic. Takes precedence over `bundle_id` and the provider's
    /// default topic.
    pub topic: Option<String>,
    /// Bundle id used as the topic when `topic` is unset.
    pub bundle_id: Option<String>,
    /// The `apns-push-type` header. Defaults to `alert`.
    pub push_type: Option<PushType>,
    /// Epoch seconds after which APNs discards the notification.
    pub expiration: Option<u64>,
    /// Delivery priority, 10 for immediate and 5 for power-efficient.
    pub priority: Option<u32>,
    /// Caller-chosen `apns-id`. A v4 UUID is generated when unset.
    pub apns_id: Option<String>,
    /// Collapse identifier for replacing a previous notification.
    pub collapse_id: Option<String>,
    /// A pre-signed provider token, bypassing the signer and cache.
    pub auth_token: Option<String>,
}

/// Everything a transport needs to deliver one notification: the resolved
/// target, serialized payload and request headers.
#[derive(Debug)]
pub struct ApnsRequest {
    pub endpoint: Endpoint,
    pub device_token: String,
    /// Canonical payload bytes, already validated against the size cap.
    pub payload: Vec<u8>,
    pub topic: String,
    pub push_type: PushType,
    pub apns_id: String,
    /// Epoch seconds after which delivery is abandoned.
    pub expiration: u64,
    pub priority: u32,
    pub collapse_id: Option<String>,
    /// The signed provider token for the `authorization` header.
    pub auth_token: String,
}

/// The outcome of an accepted (HTTP 200) notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    /// The `apns-id` identifying the notification, echoed by APNs or
    /// generated locally.
    pub apns_id: String,
    /// The device token the notification was delivered to.
    pub device_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_type_round_trips_its_wire_form() {
        for s in ["alert", "background", "voip", "complication", "fileprovider", "mdm"] {
            let push_type: PushType = s.parse().unwrap();
            assert_eq!(s, push_type.to_string());
        }
    }

    #[test]
    fn unknown_push_type_is_rejected() {
        match "liveactivity".parse::<PushType>() {
            Err(ApnsError::InvalidPushType(t)) => assert_eq!("liveactivity", t),
            other => panic!("expected InvalidPushType, got {:?}", other),
        }
    }

    #[test]
    fn endpoints_resolve_to_apple_hosts() {
        assert_eq!("api.push.apple.com:443", Endpoint::Production.host());
        assert_eq!("api.development.push.apple.com:443", Endpoint::Sandbox.host());
    }

    #[test]
    fn builder_collects_notification_fields() {
        let mut builder = Notification::builder();
        builder.set_alert("You have mail");
        builder.set_badge(3);
        builder.set_sound("default");
        builder.set_content_available();
        builder.set_extra("thread", "inbox");

        let notification = builder.build();

        assert_eq!(Some("You have mail".to_string()), notification.alert);
        assert_eq!(Some(3), notification.badge);
        assert_eq!(Some("default".to_string()), notification.sound);
        assert!(notification.content_available);
        assert!(!notification.mutable_content);
        assert_eq!(
            Some(&serde_json::Value::from("inbox")),
            notification.extra.get("thread")
        );
    }
}
