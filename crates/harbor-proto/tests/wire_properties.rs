//! Property tests for the wire envelope.
//!
//! Encoding any well-formed frame and decoding the line back must yield an
//! equivalent value, and the event payload must keep its structural wire
//! shape for arbitrary content.

#![allow(clippy::unwrap_used)]

use harbor_proto::{
    ChannelEvent, ErrorCode, ErrorResponse, EventData, SystemKind,
    wire::{AckResult, ClientFrame, ClientRequest, RequestId, ResponseBody, SendEventRequest,
           ServerFrame, ServerPush},
};
use proptest::prelude::*;
use uuid::Uuid;

fn arb_event_data() -> impl Strategy<Value = EventData> {
    prop_oneof![
        "\\PC{0,64}".prop_map(|message| EventData::Message { message }),
        prop_oneof![Just(SystemKind::Login), Just(SystemKind::Logout)]
            .prop_map(|system| EventData::System { system }),
    ]
}

fn arb_event() -> impl Strategy<Value = ChannelEvent> {
    ("[a-z0-9-]{1,16}", "[a-z]{1,12}", "\\PC{1,16}", 0i64..=4_102_444_800_000, arb_event_data())
        .prop_map(|(id, channel, user, time, data)| ChannelEvent { id, channel, user, time, data })
}

proptest! {
    #[test]
    fn event_payload_keeps_structural_shape(data in arb_event_data()) {
        let json = serde_json::to_value(&data).unwrap();
        match data {
            EventData::Message { .. } => prop_assert!(json.get("message").is_some()),
            EventData::System { .. } => prop_assert!(json.get("system").is_some()),
        }
    }

    #[test]
    fn client_frame_round_trip(id in any::<u64>(), event in arb_event()) {
        let frame = ClientFrame {
            id: RequestId(id),
            request: ClientRequest::SendEvent(SendEventRequest {
                channel: event.channel.clone(),
                user: harbor_proto::User { name: event.user.clone(), session_id: Uuid::nil() },
                data: event.data.clone(),
            }),
        };
        let decoded = ClientFrame::decode(&frame.encode_line().unwrap()).unwrap();
        prop_assert_eq!(decoded, frame);
    }

    #[test]
    fn server_frame_round_trip(id in any::<u64>(), event in arb_event()) {
        let frames = [
            ServerFrame::Ack {
                id: RequestId(id),
                result: AckResult::Ok(ResponseBody::Event(event.clone())),
            },
            ServerFrame::Ack {
                id: RequestId(id),
                result: AckResult::Err(ErrorResponse::new(ErrorCode::MaxUsers)),
            },
            ServerFrame::Push { push: ServerPush::ChannelEvent(event) },
        ];
        for frame in frames {
            let decoded = ServerFrame::decode(&frame.encode_line().unwrap()).unwrap();
            prop_assert_eq!(decoded, frame);
        }
    }
}
