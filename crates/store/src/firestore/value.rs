//! Encoding between domain types and Firestore's REST value representation.
//!
//! Firestore documents arrive as `{"name": ..., "fields": {...}}` where
//! every field value is wrapped in a type tag (`stringValue`,
//! `timestampValue`, `integerValue`, `arrayValue`, `mapValue`). These
//! helpers keep that wrapping in one place.

use cardsmith_core::types::Timestamp;
use cardsmith_core::{Flashcard, FlashcardSet, FlashcardSetSummary};
use chrono::{DateTime, SecondsFormat};
use serde_json::{json, Map, Value};

use crate::user::UserRecord;

pub fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

pub fn integer_value(i: i64) -> Value {
    // Firestore integers ride as strings in JSON.
    json!({ "integerValue": i.to_string() })
}

pub fn timestamp_value(t: &Timestamp) -> Value {
    json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::Micros, true) })
}

pub fn as_string(fields: &Value, name: &str) -> Option<String> {
    fields
        .get(name)?
        .get("stringValue")?
        .as_str()
        .map(String::from)
}

pub fn as_timestamp(fields: &Value, name: &str) -> Option<Timestamp> {
    let raw = fields.get(name)?.get("timestampValue")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&chrono::Utc))
}

pub fn as_integer(fields: &Value, name: &str) -> Option<i64> {
    fields.get(name)?.get("integerValue")?.as_str()?.parse().ok()
}

/// The trailing path segment of a document `name` is its id.
pub fn doc_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

/// Encode a flashcard-set document body (`fields` map only; the id lives in
/// the document name).
pub fn encode_set_fields(title: &str, created_at: &Timestamp, cards: &[Flashcard]) -> Value {
    let card_values: Vec<Value> = cards
        .iter()
        .map(|card| {
            json!({
                "mapValue": {
                    "fields": {
                        "question": string_value(&card.question),
                        "answer": string_value(&card.answer),
                    }
                }
            })
        })
        .collect();

    json!({
        "title": string_value(title),
        "created_at": timestamp_value(created_at),
        "card_count": integer_value(cards.len() as i64),
        "cards": { "arrayValue": { "values": card_values } },
    })
}

/// Decode a flashcard-set document. Cards missing either side are dropped,
/// mirroring the validation contract: partial cards never surface.
pub fn decode_set(doc: &Value, owner_id: &str) -> Option<FlashcardSet> {
    let name = doc.get("name")?.as_str()?;
    let fields = doc.get("fields")?;

    let cards = fields
        .get("cards")
        .and_then(|c| c.get("arrayValue"))
        .and_then(|a| a.get("values"))
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| {
                    let card_fields = v.get("mapValue")?.get("fields")?;
                    Some(Flashcard::new(
                        as_string(card_fields, "question")?,
                        as_string(card_fields, "answer")?,
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    Some(FlashcardSet {
        id: doc_id(name),
        owner_id: owner_id.to_string(),
        title: as_string(fields, "title")?,
        created_at: as_timestamp(fields, "created_at")?,
        cards,
    })
}

/// Decode a listing projection (no cards fetched; the count rides as its
/// own field).
pub fn decode_summary(doc: &Value) -> Option<FlashcardSetSummary> {
    let name = doc.get("name")?.as_str()?;
    let fields = doc.get("fields")?;
    Some(FlashcardSetSummary {
        id: doc_id(name),
        title: as_string(fields, "title")?,
        card_count: as_integer(fields, "card_count").unwrap_or(0) as usize,
        created_at: as_timestamp(fields, "created_at")?,
    })
}

/// Encode a user document body.
pub fn encode_user_fields(user: &UserRecord) -> Value {
    let mut fields = Map::new();
    fields.insert("email".into(), string_value(&user.email));
    fields.insert("display_name".into(), string_value(&user.display_name));
    fields.insert("password_hash".into(), string_value(&user.password_hash));
    fields.insert("created_at".into(), timestamp_value(&user.created_at));
    if let Some(last_login) = &user.last_login {
        fields.insert("last_login".into(), timestamp_value(last_login));
    }
    Value::Object(fields)
}

/// Decode a user document.
pub fn decode_user(doc: &Value) -> Option<UserRecord> {
    let name = doc.get("name")?.as_str()?;
    let fields = doc.get("fields")?;
    Some(UserRecord {
        id: doc_id(name),
        email: as_string(fields, "email")?,
        display_name: as_string(fields, "display_name")?,
        password_hash: as_string(fields, "password_hash")?,
        created_at: as_timestamp(fields, "created_at")?,
        last_login: as_timestamp(fields, "last_login"),
    })
}
