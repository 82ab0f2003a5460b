// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::action::{timestamp_from_ms, NewAction};
use serde_json::json;
use yare::parameterized;

fn queued(kind: ActionKind, payload: serde_json::Value) -> Action {
    Action::from_new(
        ActionId::new(17),
        &NewAction::new(kind, payload),
        timestamp_from_ms(1_700_000_000_000),
    )
}

#[parameterized(
    checklist = { ActionKind::ChecklistProgress, "offline-checklist-progress" },
    production = { ActionKind::ProductionEvent, "offline-production-event" },
    shortage = { ActionKind::ShortageReport, "offline-shortage-report" },
)]
fn submit_targets_kind_bucket(kind: ActionKind, bucket: &str) {
    let ClientMessage::Submit {
        action_id,
        kind: k,
        bucket: b,
        ..
    } = ClientMessage::submit(&queued(kind, json!({})));

    assert_eq!(action_id, ActionId::new(17));
    assert_eq!(k, kind);
    assert_eq!(b, bucket);
}

#[test]
fn submit_forwards_payload_verbatim() {
    let payload = json!({"item": "feijão", "qty": 3, "nested": {"ok": true}});
    let msg = ClientMessage::submit(&queued(ActionKind::ShortageReport, payload.clone()));

    let wire: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
    assert_eq!(wire["type"], "submit");
    assert_eq!(wire["action_id"], 17);
    assert_eq!(wire["kind"], "shortage-report");
    assert_eq!(wire["bucket"], "offline-shortage-report");
    assert_eq!(wire["payload"], payload);
}

#[test]
fn client_message_parses_back() {
    let msg = ClientMessage::submit(&queued(ActionKind::ProductionEvent, json!({"item": "pão"})));
    let parsed = ClientMessage::from_json(&msg.to_json().unwrap()).unwrap();
    assert_eq!(parsed, msg);
}

#[parameterized(
    accepted = { r#"{"type":"accepted","action_id":4}"#, ServerMessage::accepted(ActionId::new(4)) },
    rejected = { r#"{"type":"rejected","action_id":4,"reason":"quota"}"#, ServerMessage::rejected(ActionId::new(4), "quota") },
    error = { r#"{"type":"error","message":"boom"}"#, ServerMessage::error("boom") },
)]
fn server_message_from_wire(raw: &str, expected: ServerMessage) {
    assert_eq!(ServerMessage::from_json(raw).unwrap(), expected);
}

#[test]
fn unknown_server_message_is_an_error() {
    assert!(ServerMessage::from_json(r#"{"type":"snapshot"}"#).is_err());
    assert!(ServerMessage::from_json(r#"{"type":"pong","id":1}"#).is_err());
    assert!(ServerMessage::from_json("not json").is_err());
}
