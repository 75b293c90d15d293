// Protocol module: wire messages, identifiers and error codes

pub mod error_codes;
pub mod messages;
pub mod types;

pub use error_codes::ErrorCode;

pub use types::{ClientId, Role, RoomId, SignalKind, SignalPayload};

pub use messages::{ClientMessage, ServerMessage, STATUS_LEFT, STATUS_STOPPED, STATUS_WAITING};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_find_partner_parses_without_data() {
        let message: ClientMessage =
            serde_json::from_str(r#"{"type":"find-partner"}"#).expect("valid frame");
        assert!(matches!(message, ClientMessage::FindPartner));
    }

    #[test]
    fn test_signal_offer_parses() {
        let room = Uuid::new_v4();
        let raw = json!({
            "type": "signal",
            "data": {
                "room": room,
                "payload": { "type": "offer", "sdp": "v=0\r\n" }
            }
        });
        let message: ClientMessage = serde_json::from_value(raw).expect("valid signal frame");
        match message {
            ClientMessage::Signal { room: parsed, payload } => {
                assert_eq!(parsed, room);
                assert_eq!(payload.kind, SignalKind::SessionOffer);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_ice_candidate_keeps_opaque_body() {
        let candidate = json!({
            "candidate": "candidate:1 1 UDP 2122252543 192.0.2.1 54400 typ host",
            "sdpMid": "0",
            "sdpMLineIndex": 0
        });
        let payload: SignalPayload =
            serde_json::from_value(json!({ "type": "ice", "candidate": candidate.clone() }))
                .expect("candidate payload");
        assert_eq!(payload.kind, SignalKind::NetworkCandidate);
        assert_eq!(payload, SignalPayload::candidate(candidate.clone()));

        let reencoded = serde_json::to_value(&payload).unwrap();
        assert_eq!(reencoded["candidate"], candidate);
        assert_eq!(reencoded["type"], "ice");
    }

    #[test]
    fn test_signal_body_is_not_validated() {
        let raw = json!({ "type": "offer", "sdp": null, "renegotiation": { "epoch": 3 } });
        let payload: SignalPayload = serde_json::from_value(raw.clone()).expect("any body");
        assert_eq!(payload.kind, SignalKind::SessionOffer);
        assert_eq!(payload.body["sdp"], serde_json::Value::Null);
        assert_eq!(serde_json::to_value(&payload).unwrap(), raw);

        let bare: SignalPayload = serde_json::from_value(json!({ "type": "chat" })).unwrap();
        assert!(bare.body.is_empty());
    }

    #[test]
    fn test_leave_room_accepts_missing_room() {
        let message: ClientMessage =
            serde_json::from_str(r#"{"type":"leave-room","data":{}}"#).expect("valid frame");
        assert!(matches!(message, ClientMessage::LeaveRoom { room: None }));
    }

    #[test]
    fn test_matched_serializes_role_in_lowercase() {
        let room = Uuid::new_v4();
        let value = serde_json::to_value(ServerMessage::Matched {
            room,
            role: Role::Initiator,
        })
        .unwrap();
        assert_eq!(value["type"], "matched");
        assert_eq!(value["data"]["role"], "initiator");
        assert_eq!(value["data"]["room"], json!(room));
    }

    #[test]
    fn test_peer_left_serializes_as_bare_tag() {
        let value = serde_json::to_value(ServerMessage::PeerLeft).unwrap();
        assert_eq!(value, json!({ "type": "peer-left" }));
    }

    #[test]
    fn test_unknown_signal_kind_is_rejected() {
        let result: Result<SignalPayload, _> =
            serde_json::from_value(json!({ "type": "renegotiate", "sdp": "" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_role_counterpart() {
        assert_eq!(Role::Initiator.counterpart(), Role::Responder);
        assert_eq!(Role::Responder.counterpart(), Role::Initiator);
    }
}
