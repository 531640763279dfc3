//! Wire payload normalization.
//!
//! Backend rows and realtime frames spell fields several ways; everything is
//! folded into domain records here so the reconciler and projector only ever
//! see canonical shapes.

use crate::domain::entities::{CaseRecord, ChannelEvent, EventVerb};
use crate::domain::value_objects::{Actor, CaseKey, CaseStatus, Collection};
use serde_json::Value;

/// Case number aliases in precedence order. `casenum` is canonical; the
/// others are legacy spellings older backend builds still emit.
const CASE_KEY_ALIASES: [&str; 3] = ["casenum", "case_number", "number"];

/// One snapshot row into a domain record. Rows without a usable key yield
/// `None`; the caller skips them.
pub fn record_from_row(collection: Collection, row: &Value) -> Option<CaseRecord> {
    let key = key_from_row(collection, row)?;
    let status = row
        .get("status")
        .and_then(Value::as_str)
        .map(CaseStatus::parse)
        .unwrap_or_else(|| default_status(collection));
    Some(CaseRecord::new(key, status, row.clone()))
}

/// One realtime frame into a domain event. Auth frames, unknown streams, and
/// unknown verbs all yield `None`; the channel drops them silently.
pub fn event_from_frame(frame: &Value) -> Option<ChannelEvent> {
    let stream = frame.get("type").and_then(Value::as_str)?;
    if stream != "case" && stream != "ping" {
        return None;
    }

    let raw_verb = frame
        .get("event")
        .or_else(|| frame.get("action"))
        .and_then(Value::as_str)?;
    let verb = parse_verb(raw_verb)?;

    let actor = frame
        .get("actor")
        .or_else(|| frame.get("user"))
        .or_else(|| frame.get("username"))
        .and_then(Value::as_str)
        .and_then(|name| Actor::new(name.to_string()).ok());

    // The key collection only decides which fields name the key; both claim
    // collections share the case-number aliases.
    let key_collection = if stream == "ping" {
        Collection::ReviewedClaims
    } else {
        Collection::ActiveClaims
    };

    let body = record_value(stream, frame);
    let key = body
        .and_then(|row| key_from_row(key_collection, row))
        .or_else(|| bare_key(stream, frame))?;

    let record = match verb {
        EventVerb::Create | EventVerb::Update => {
            let row = body?;
            let mut record = record_from_row(key_collection, row)?;
            // The backend's "complete" action frames omit the status field.
            if raw_verb.eq_ignore_ascii_case("complete") && row.get("status").is_none() {
                record.status = CaseStatus::Complete;
            }
            Some(record)
        }
        EventVerb::Delete | EventVerb::BeginReview | EventVerb::EndReview => None,
    };

    Some(ChannelEvent {
        stream: stream.to_string(),
        verb,
        actor,
        key,
        record,
    })
}

/// Verb aliasing on top of the canonical set: the backend broadcasts its
/// action names (`claim`, `complete`, `unclaim`, `unping`) on older builds.
fn parse_verb(raw: &str) -> Option<EventVerb> {
    EventVerb::parse(raw).or_else(|| match raw.trim().to_ascii_lowercase().as_str() {
        "claim" => Some(EventVerb::Create),
        "complete" => Some(EventVerb::Update),
        "unclaim" | "unping" => Some(EventVerb::Delete),
        _ => None,
    })
}

fn key_from_row(collection: Collection, row: &Value) -> Option<CaseKey> {
    let raw = match collection {
        // Reviewed claims are keyed by their backend row id; one case can be
        // reviewed more than once.
        Collection::ReviewedClaims => id_string(row.get("id")?)?,
        Collection::ActiveClaims | Collection::CompletedClaims => CASE_KEY_ALIASES
            .iter()
            .find_map(|alias| row.get(alias).and_then(id_string))?,
    };
    CaseKey::new(raw).ok()
}

/// Key fields carried directly on the frame when no record body is present
/// (delete and review frames).
fn bare_key(stream: &str, frame: &Value) -> Option<CaseKey> {
    let raw = match stream {
        "ping" => id_string(frame.get("pingId").or_else(|| frame.get("id"))?)?,
        _ => CASE_KEY_ALIASES
            .iter()
            .find_map(|alias| frame.get(alias).and_then(id_string))?,
    };
    CaseKey::new(raw).ok()
}

fn record_value<'a>(stream: &str, frame: &'a Value) -> Option<&'a Value> {
    let body = match stream {
        "ping" => frame.get("ping"),
        _ => frame
            .get("case")
            .or_else(|| frame.get("data"))
            .or_else(|| frame.get("record")),
    };
    body.filter(|v| v.is_object())
}

/// Key values arrive as strings or bare numbers depending on the backend
/// build.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn default_status(collection: Collection) -> CaseStatus {
    match collection {
        Collection::ActiveClaims => CaseStatus::Active,
        Collection::CompletedClaims => CaseStatus::Complete,
        Collection::ReviewedClaims => CaseStatus::Unpinged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_key_wins_over_aliases() {
        let row = json!({"casenum": "C100", "case_number": "C999", "status": "active"});
        let record = record_from_row(Collection::ActiveClaims, &row).unwrap();
        assert_eq!(record.key.as_str(), "C100");
    }

    #[test]
    fn test_legacy_aliases_are_checked_in_order() {
        let row = json!({"number": "C300", "case_number": "C200"});
        let record = record_from_row(Collection::ActiveClaims, &row).unwrap();
        assert_eq!(record.key.as_str(), "C200");
        assert_eq!(record.status, CaseStatus::Active);
    }

    #[test]
    fn test_reviewed_claims_are_keyed_by_row_id() {
        let row = json!({"id": 17, "casenum": "C118", "status": "pingedhigh"});
        let record = record_from_row(Collection::ReviewedClaims, &row).unwrap();
        assert_eq!(record.key.as_str(), "17");
        assert_eq!(record.status, CaseStatus::PingedHigh);
    }

    #[test]
    fn test_row_without_a_key_is_skipped() {
        let row = json!({"status": "active", "username": "bob"});
        assert!(record_from_row(Collection::ActiveClaims, &row).is_none());
    }

    #[test]
    fn test_numeric_case_numbers_are_accepted() {
        let row = json!({"casenum": 118, "status": "active"});
        let record = record_from_row(Collection::ActiveClaims, &row).unwrap();
        assert_eq!(record.key.as_str(), "118");

        let frame = json!({"type": "case", "event": "delete", "casenum": 118});
        let event = event_from_frame(&frame).unwrap();
        assert_eq!(event.key.as_str(), "118");
    }

    #[test]
    fn test_case_create_frame_becomes_an_event_with_record() {
        let frame = json!({
            "type": "case",
            "event": "create",
            "user": "bob",
            "case": {"casenum": "C100", "status": "active", "username": "bob"}
        });
        let event = event_from_frame(&frame).unwrap();
        assert_eq!(event.stream, "case");
        assert_eq!(event.verb, EventVerb::Create);
        assert_eq!(event.actor.unwrap().as_str(), "bob");
        assert_eq!(event.key.as_str(), "C100");
        assert_eq!(event.record.unwrap().status, CaseStatus::Active);
    }

    #[test]
    fn test_ping_delete_frame_carries_only_the_id() {
        let frame = json!({"type": "ping", "event": "delete", "pingId": 17});
        let event = event_from_frame(&frame).unwrap();
        assert_eq!(event.verb, EventVerb::Delete);
        assert_eq!(event.key.as_str(), "17");
        assert!(event.record.is_none());
    }

    #[test]
    fn test_begin_review_frame_has_key_but_no_record() {
        let frame = json!({
            "type": "ping",
            "event": "begin-review",
            "user": "lead1",
            "pingId": "17"
        });
        let event = event_from_frame(&frame).unwrap();
        assert_eq!(event.verb, EventVerb::BeginReview);
        assert_eq!(event.actor.unwrap().as_str(), "lead1");
        assert!(event.record.is_none());
    }

    #[test]
    fn test_backend_action_names_are_aliased() {
        let frame = json!({
            "type": "case",
            "action": "complete",
            "user": "alice",
            "data": {"casenum": "C100"}
        });
        let event = event_from_frame(&frame).unwrap();
        assert_eq!(event.verb, EventVerb::Update);
        assert_eq!(event.record.unwrap().status, CaseStatus::Complete);
    }

    #[test]
    fn test_auth_and_unknown_frames_are_dropped() {
        assert!(event_from_frame(&json!({"type": "auth", "status": "success"})).is_none());
        assert!(event_from_frame(&json!({"type": "chat", "event": "create"})).is_none());
        assert!(event_from_frame(&json!({"type": "case", "event": "archive", "casenum": "C1"}))
            .is_none());
    }
}
