use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::game::state::GameState;

// ── Stored document ────────────────────────────────────────────────

/// Top-level keys owned by `StoredDocument` itself.
const KNOWN_FIELDS: &[&str] = &[
    "resources",
    "resourcesPerSecond",
    "totalCollected",
    "playTime",
    "totalClicks",
    "upgrades",
    "achievements",
    "lastUpdated",
    "createdAt",
];

/// What sits in the save file and what `/api/load` returns: the game state
/// plus whichever server timestamp was last written. Top-level keys this
/// build does not know are carried in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    #[serde(flatten)]
    pub state: GameState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredDocument {
    /// Every top-level entry of `raw` that is not a known field.
    pub fn unknown_fields(raw: &Value) -> Map<String, Value> {
        raw.as_object()
            .map(|obj| {
                obj.iter()
                    .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ── Responses (Server → Client) ────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub status: String,
    /// The document exactly as stored, including `lastUpdated`.
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadFailure {
    pub error: String,
    pub fallback_data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFailure {
    pub error: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Minimal stub sent alongside a failed load. Not a full state; clients
/// reconcile it like any other partial document.
pub fn load_fallback_data() -> Value {
    json!({
        "resources": 0,
        "upgrades": { "autoDrone": { "level": 0 } }
    })
}

/// Current time in ISO-8601, as stamped on stored documents.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::reconcile;

    #[test]
    fn stored_document_flattens_state() {
        let doc = StoredDocument {
            state: GameState::default(),
            last_updated: Some("2025-01-01T00:00:00.000Z".to_string()),
            created_at: None,
            extra: Map::new(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["resources"], 0.0);
        assert_eq!(json["lastUpdated"], "2025-01-01T00:00:00.000Z");
        assert!(json.get("createdAt").is_none());
        assert!(json.get("state").is_none());
    }

    #[test]
    fn unknown_fields_skip_known_keys() {
        let raw = json!({
            "resources": 4,
            "lastUpdated": "2025-01-01T00:00:00.000Z",
            "prestige": 3,
            "settings": { "sound": false }
        });
        let extra = StoredDocument::unknown_fields(&raw);
        assert_eq!(extra.len(), 2);
        assert_eq!(extra["prestige"], 3);
        assert_eq!(extra["settings"]["sound"], false);

        let doc = StoredDocument {
            state: reconcile(&raw),
            last_updated: None,
            created_at: None,
            extra,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["prestige"], 3);
        assert_eq!(json["resources"], 4.0);
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn fallback_reconciles_to_defaults() {
        assert_eq!(reconcile(&load_fallback_data()), GameState::default());
    }

    #[test]
    fn timestamps_parse_as_rfc3339() {
        let stamp = timestamp_now();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
        assert!(stamp.ends_with('Z'));
    }
}
