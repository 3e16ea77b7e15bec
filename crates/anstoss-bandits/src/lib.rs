//! ε-greedy-Auswahl eines Vorschlags aus der Gewichtstabelle.
//!
//! [`EpsilonGreedy`] implementiert das [`Policy`]-Trait aus `anstoss-core`:
//! Mit Wahrscheinlichkeit `epsilon` wird gleichverteilt ein beliebiger
//! Vorschlag gezogen, sonst der Vorschlag mit dem höchsten Gewicht. Bei
//! Gleichstand gewinnt der erste in Tabellenreihenfolge, damit die Auswahl bei
//! fester Tabelle und festem Zufallswert reproduzierbar bleibt.

use anstoss_core::{Choice, Policy, Result, Strategy, Suggestion, WeightStore};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng, RngCore};
use tracing::debug;

/// Standardwert für die Explorationswahrscheinlichkeit.
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Einfache ε-greedy Policy über der Vorschlagstabelle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl EpsilonGreedy {
    /// `epsilon` wird auf `[0.0, 1.0]` begrenzt; nicht-endliche Werte fallen
    /// auf [`DEFAULT_EPSILON`] zurück.
    #[must_use]
    pub fn new(epsilon: f64) -> Self {
        let epsilon = if epsilon.is_finite() {
            epsilon.clamp(0.0, 1.0)
        } else {
            DEFAULT_EPSILON
        };
        Self { epsilon }
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Policy for EpsilonGreedy {
    fn select<'a>(
        &self,
        table: &'a [Suggestion],
        rng: &mut dyn RngCore,
    ) -> Option<(&'a Suggestion, Strategy)> {
        if table.is_empty() {
            return None;
        }
        let draw: f64 = rng.gen();
        if draw < self.epsilon {
            table.choose(rng).map(|s| (s, Strategy::Explore))
        } else {
            first_max(table).map(|s| (s, Strategy::Exploit))
        }
    }
}

/// Erster Eintrag mit maximalem Gewicht.
fn first_max(table: &[Suggestion]) -> Option<&Suggestion> {
    table.iter().fold(None, |best, candidate| match best {
        Some(b) if b.weight >= candidate.weight => Some(b),
        _ => Some(candidate),
    })
}

/// Lädt die aktuelle Tabelle und wählt mit ε-greedy einen Vorschlag.
///
/// Eine leere Tabelle ergibt `Ok(None)`; Speicherfehler werden unverändert
/// weitergereicht.
pub fn choose_suggestion<S>(store: &S, epsilon: f64) -> Result<Option<Choice>>
where
    S: WeightStore + ?Sized,
{
    choose_suggestion_with(store, &EpsilonGreedy::new(epsilon), &mut thread_rng())
}

/// Wie [`choose_suggestion`], aber mit beliebiger Policy und Zufallsquelle.
pub fn choose_suggestion_with<S, P>(
    store: &S,
    policy: &P,
    rng: &mut dyn RngCore,
) -> Result<Option<Choice>>
where
    S: WeightStore + ?Sized,
    P: Policy + ?Sized,
{
    let table = store.load_weights()?;
    let Some((suggestion, strategy)) = policy.select(&table, rng) else {
        debug!("suggestion pool is empty");
        return Ok(None);
    };
    debug!(
        suggestion_id = %suggestion.id,
        weight = suggestion.weight,
        why = strategy.why(),
        "selected suggestion"
    );
    Ok(Some(Choice {
        suggestion: suggestion.clone(),
        strategy,
    }))
}
