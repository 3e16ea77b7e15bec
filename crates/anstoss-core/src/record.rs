//! Datensätze, die von der Speichergrenze verwaltet werden.
//!
//! Die Gewichtstabelle ([`Suggestion`]) ist die einzige Quelle für aktuelle
//! Gewichte. [`FeedbackEvent`] und [`ImprovementRecord`] sind reine
//! Audit-Logs, die nur angehängt und nie zurückgelesen werden, um Gewichte zu
//! rekonstruieren.

use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Untere Grenze für Gewichte.
pub const WEIGHT_MIN: f64 = -1.0;
/// Obere Grenze für Gewichte.
pub const WEIGHT_MAX: f64 = 1.0;

const FALLBACK_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

const SEED_POOL: [(&str, &str); 3] = [
    (
        "SUG-1",
        "Try a 25-minute focused study sprint, then 5-minute break.",
    ),
    ("SUG-2", "Plan tomorrow's top 3 tasks tonight."),
    (
        "SUG-3",
        "If stuck, switch to an easier sub-task for 10 minutes.",
    ),
];

/// Ein Vorschlag samt Präferenzgewicht in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "suggestion_id")]
    pub id: String,
    pub text: String,
    pub weight: f64,
}

impl Suggestion {
    pub fn new(id: impl Into<String>, text: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            weight,
        }
    }
}

/// Reaktion eines Nutzers auf einen Vorschlag (`+1` angenommen, `-1` abgelehnt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub timestamp: String,
    pub suggestion_id: String,
    pub user_context_text: String,
    pub suggestion_text: String,
    pub reward: i32,
}

/// Protokoll einer Gewichtsänderung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementRecord {
    pub timestamp: String,
    pub suggestion_id: String,
    pub previous_weight: f64,
    pub reward: i32,
    pub new_weight: f64,
}

/// Start-Pool beim ersten Zugriff, alle Gewichte bei `0.0`.
#[must_use]
pub fn default_suggestions() -> Vec<Suggestion> {
    SEED_POOL
        .iter()
        .map(|(id, text)| Suggestion::new(*id, *text, 0.0))
        .collect()
}

/// Aktueller Zeitpunkt als RFC-3339-Zeitstempel (UTC).
#[must_use]
pub fn iso8601_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| FALLBACK_TIMESTAMP.to_string())
}
