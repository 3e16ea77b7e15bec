#![warn(clippy::unwrap_used, clippy::expect_used)]

//! Kern-Typen und Traits für anstoss.
//!
//! Enthält das Datenmodell (Vorschläge, Feedback- und Verbesserungs-Einträge),
//! den [`WeightStore`] als Speichergrenze sowie das [`Policy`]-Trait, über das
//! Auswahlstrategien angebunden werden.

use rand::RngCore;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod record;
pub mod store;

pub use error::{Result, StorageError};
pub use record::{
    default_suggestions, iso8601_now, FeedbackEvent, ImprovementRecord, Suggestion, WEIGHT_MAX,
    WEIGHT_MIN,
};
pub use store::{FileStore, MemoryStore, StoreConfig, WeightStore};

/// Art der Auswahl, die zu einem Vorschlag geführt hat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Zufällige Auswahl, unabhängig vom Gewicht.
    Explore,
    /// Vorschlag mit dem höchsten Gewicht.
    Exploit,
}

impl Strategy {
    /// Kurze, menschenlesbare Begründung.
    #[must_use]
    pub fn why(self) -> &'static str {
        match self {
            Strategy::Explore => "explore ε",
            Strategy::Exploit => "exploit max weight",
        }
    }
}

/// Ergebnis einer Auswahl: eine Momentaufnahme des Vorschlags zum Zeitpunkt
/// der Auswahl. Spätere Gewichts-Updates ändern diese Kopie nicht.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub strategy: Strategy,
}

/// Auswahlstrategie über einer geordneten Vorschlagstabelle.
pub trait Policy {
    /// Wählt genau einen Vorschlag oder `None`, wenn die Tabelle leer ist.
    fn select<'a>(
        &self,
        table: &'a [Suggestion],
        rng: &mut dyn RngCore,
    ) -> Option<(&'a Suggestion, Strategy)>;
}
