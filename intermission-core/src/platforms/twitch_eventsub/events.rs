// File: src/platforms/twitch_eventsub/events.rs

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use intermission_common::models::SessionInfo;

use crate::Error;

/// Subscription metadata as it appears in notification and revocation payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionData {
    pub id: String,
    #[serde(rename = "type")]
    pub sub_type: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub condition: Value,
}

/// `payload` of a "notification" frame: `{ "subscription": { ... }, "event": { ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct EventSubNotificationEnvelope {
    pub subscription: SubscriptionData,
    #[serde(default)]
    pub event: Value,
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    metadata: RawMetadata,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    message_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    session: SessionBody,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    id: Option<String>,
    keepalive_timeout_seconds: Option<u64>,
    reconnect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RevocationPayload {
    subscription: SubscriptionData,
}

/// One inbound text frame, classified by `metadata.message_type`.
#[derive(Debug, Clone)]
pub enum EventSubFrame {
    Welcome(SessionInfo),
    Keepalive,
    Notification(EventSubNotificationEnvelope),
    Revocation(SubscriptionData),
    Reconnect { reconnect_url: Option<String> },
    Unknown(Option<String>),
}

impl EventSubFrame {
    pub fn message_type(&self) -> &str {
        match self {
            EventSubFrame::Welcome(_) => "session_welcome",
            EventSubFrame::Keepalive => "session_keepalive",
            EventSubFrame::Notification(_) => "notification",
            EventSubFrame::Revocation(_) => "revocation",
            EventSubFrame::Reconnect { .. } => "session_reconnect",
            EventSubFrame::Unknown(t) => t.as_deref().unwrap_or("<missing>"),
        }
    }
}

/// Parses a text frame. Bad JSON is `Error::Json`; a recognised type with a broken
/// payload is `Error::Protocol`.
pub fn parse_frame(text: &str) -> Result<EventSubFrame, Error> {
    let raw: RawFrame = serde_json::from_str(text)?;

    let frame = match raw.metadata.message_type.as_deref() {
        Some("session_welcome") => {
            let body = session_body(raw.payload, "session_welcome")?;
            let session_id = body
                .id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| Error::Protocol("session_welcome without session.id".into()))?;
            let secs = body.keepalive_timeout_seconds.ok_or_else(|| {
                Error::Protocol("session_welcome without keepalive_timeout_seconds".into())
            })?;
            EventSubFrame::Welcome(SessionInfo {
                session_id,
                keepalive_timeout: Duration::from_secs(secs),
            })
        }
        Some("session_keepalive") => EventSubFrame::Keepalive,
        Some("notification") => {
            let env: EventSubNotificationEnvelope = serde_json::from_value(raw.payload)
                .map_err(|e| Error::Protocol(format!("bad notification payload: {e}")))?;
            EventSubFrame::Notification(env)
        }
        Some("revocation") => {
            let rev: RevocationPayload = serde_json::from_value(raw.payload)
                .map_err(|e| Error::Protocol(format!("bad revocation payload: {e}")))?;
            EventSubFrame::Revocation(rev.subscription)
        }
        Some("session_reconnect") => {
            let reconnect_url = session_body(raw.payload, "session_reconnect")
                .ok()
                .and_then(|b| b.reconnect_url);
            EventSubFrame::Reconnect { reconnect_url }
        }
        other => EventSubFrame::Unknown(other.map(str::to_string)),
    };
    Ok(frame)
}

fn session_body(payload: Value, what: &str) -> Result<SessionBody, Error> {
    serde_json::from_value::<SessionPayload>(payload)
        .map(|p| p.session)
        .map_err(|e| Error::Protocol(format!("bad {what} payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn welcome_carries_session_and_keepalive() {
        let txt = json!({
            "metadata": { "message_id": "m1", "message_type": "session_welcome" },
            "payload": { "session": { "id": "abc", "status": "connected", "keepalive_timeout_seconds": 30 } }
        })
        .to_string();

        match parse_frame(&txt).unwrap() {
            EventSubFrame::Welcome(info) => {
                assert_eq!(info.session_id, "abc");
                assert_eq!(info.keepalive_timeout, Duration::from_secs(30));
            }
            other => panic!("expected welcome, got {other:?}"),
        }
    }

    #[test]
    fn welcome_without_id_is_protocol_error() {
        let txt = json!({
            "metadata": { "message_type": "session_welcome" },
            "payload": { "session": { "keepalive_timeout_seconds": 10 } }
        })
        .to_string();
        assert!(matches!(parse_frame(&txt), Err(Error::Protocol(_))));
    }

    #[test]
    fn welcome_without_keepalive_is_protocol_error() {
        let txt = json!({
            "metadata": { "message_type": "session_welcome" },
            "payload": { "session": { "id": "abc" } }
        })
        .to_string();
        match parse_frame(&txt) {
            Err(Error::Protocol(msg)) => assert!(msg.contains("keepalive_timeout_seconds")),
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn notification_keeps_event_raw() {
        let txt = json!({
            "metadata": { "message_type": "notification" },
            "payload": {
                "subscription": { "id": "sub-1", "type": "channel.chat.message", "version": "1" },
                "event": { "chatter_user_login": "viewer", "message": { "text": "$joke" } }
            }
        })
        .to_string();

        let EventSubFrame::Notification(env) = parse_frame(&txt).unwrap() else {
            panic!("expected notification");
        };
        assert_eq!(env.subscription.sub_type, "channel.chat.message");
        assert_eq!(env.event["message"]["text"], "$joke");
    }

    #[test]
    fn other_types_classify() {
        let keepalive = json!({ "metadata": { "message_type": "session_keepalive" }, "payload": {} });
        assert!(matches!(parse_frame(&keepalive.to_string()).unwrap(), EventSubFrame::Keepalive));

        let revoked = json!({
            "metadata": { "message_type": "revocation" },
            "payload": { "subscription": { "id": "sub-9", "type": "channel.chat.message", "status": "authorization_revoked" } }
        });
        let EventSubFrame::Revocation(sub) = parse_frame(&revoked.to_string()).unwrap() else {
            panic!("expected revocation");
        };
        assert_eq!(sub.status, "authorization_revoked");

        let reconnect = json!({
            "metadata": { "message_type": "session_reconnect" },
            "payload": { "session": { "id": "x", "reconnect_url": "wss://elsewhere" } }
        });
        assert!(matches!(
            parse_frame(&reconnect.to_string()).unwrap(),
            EventSubFrame::Reconnect { reconnect_url: Some(u) } if u == "wss://elsewhere"
        ));

        let odd = json!({ "metadata": { "message_type": "something_new" } });
        assert_eq!(parse_frame(&odd.to_string()).unwrap().message_type(), "something_new");
    }

    #[test]
    fn garbage_is_json_error() {
        assert!(matches!(parse_frame("not json"), Err(Error::Json(_))));
    }
}
