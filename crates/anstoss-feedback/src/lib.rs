#![warn(clippy::unwrap_used, clippy::expect_used)]

//! Feedback recording and bounded weight tuning.
//!
//! Every accepted or rejected suggestion is appended to the feedback log via
//! [`record_feedback`]. [`WeightTuner`] then moves the suggestion's weight by
//! `alpha * reward`, saturating at `[-1.0, 1.0]`, rewrites the full table and
//! appends exactly one [`ImprovementRecord`]. The logs are audit trails only;
//! the weight table stays the single source of truth.

use anstoss_core::{
    FeedbackEvent, ImprovementRecord, Result, WeightStore, WEIGHT_MAX, WEIGHT_MIN,
};
use tracing::{debug, info};

pub mod analysis;

pub use analysis::{aggregate_by_suggestion, summarize, FeedbackStatistics};

/// Default learning rate.
pub const DEFAULT_ALPHA: f64 = 0.1;

/// Saturate a weight at the table bounds.
#[must_use]
pub fn clamp_weight(value: f64) -> f64 {
    value.clamp(WEIGHT_MIN, WEIGHT_MAX)
}

/// Applies one reward observation to one suggestion's weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTuner {
    alpha: f64,
}

impl Default for WeightTuner {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl WeightTuner {
    /// Create a tuner with the given learning rate.
    ///
    /// A non-finite `alpha` falls back to [`DEFAULT_ALPHA`] so every update
    /// stays a finite, clamped value.
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_finite() {
            alpha
        } else {
            DEFAULT_ALPHA
        };
        Self { alpha }
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// `clamp(previous + alpha * reward)`. Rewards outside `{-1, +1}` are
    /// applied the same way.
    #[must_use]
    pub fn next_weight(&self, previous: f64, reward: i32) -> f64 {
        clamp_weight(previous + self.alpha * f64::from(reward))
    }

    /// Load the table, update `suggestion_id`, save the full table and log the
    /// change.
    ///
    /// Returns `Ok(None)` without touching the table or logs when the id is
    /// not in the table.
    pub fn update_weight<S>(
        &self,
        store: &S,
        suggestion_id: &str,
        reward: i32,
    ) -> Result<Option<ImprovementRecord>>
    where
        S: WeightStore + ?Sized,
    {
        let mut table = store.load_weights()?;
        let Some(entry) = table.iter_mut().find(|s| s.id == suggestion_id) else {
            debug!(suggestion_id, reward, "ignoring reward for unknown suggestion");
            return Ok(None);
        };

        let previous_weight = entry.weight;
        let new_weight = self.next_weight(previous_weight, reward);
        entry.weight = new_weight;

        store.save_weights(&table)?;
        let record = store.log_improvement(suggestion_id, previous_weight, reward, new_weight)?;
        info!(
            suggestion_id,
            previous_weight,
            reward,
            new_weight,
            alpha = self.alpha,
            "updated suggestion weight"
        );
        Ok(Some(record))
    }
}

/// Shorthand for `WeightTuner::new(alpha).update_weight(..)`.
pub fn update_weight<S>(
    store: &S,
    suggestion_id: &str,
    reward: i32,
    alpha: f64,
) -> Result<Option<ImprovementRecord>>
where
    S: WeightStore + ?Sized,
{
    WeightTuner::new(alpha).update_weight(store, suggestion_id, reward)
}

/// Append one feedback event for a user decision.
pub fn record_feedback<S>(
    store: &S,
    suggestion_id: &str,
    user_context_text: &str,
    suggestion_text: &str,
    reward: i32,
) -> Result<FeedbackEvent>
where
    S: WeightStore + ?Sized,
{
    let event = store.log_feedback(suggestion_id, user_context_text, suggestion_text, reward)?;
    debug!(suggestion_id, reward, "recorded feedback");
    Ok(event)
}
