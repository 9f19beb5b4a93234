use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Client-local identifier for an entity that has not been submitted yet.
/// Never sent to the server as an id; the server assigns the permanent one.
pub fn draft_id() -> String {
    format!("draft-{}", Uuid::now_v7().simple())
}

pub fn is_draft_id(id: &str) -> bool {
    id.starts_with("draft-")
}
