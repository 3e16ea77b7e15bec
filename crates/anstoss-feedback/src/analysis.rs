//! Read-only statistics over the feedback log.
//!
//! Nothing here feeds back into weights; it only summarizes what users did.

use anstoss_core::FeedbackEvent;
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics aggregated from feedback events.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FeedbackStatistics {
    /// Total number of events (accepted + rejected).
    pub total: usize,
    /// Events with a positive reward.
    pub accepted: usize,
    pub rejected: usize,
    pub total_reward: i64,
}

impl FeedbackStatistics {
    fn observe(&mut self, event: &FeedbackEvent) {
        self.total += 1;
        if event.reward > 0 {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
        self.total_reward += i64::from(event.reward);
    }

    /// Share of accepted events (0.0 to 1.0).
    #[must_use]
    pub fn acceptance_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.accepted as f64 / self.total as f64
        }
    }

    #[must_use]
    pub fn rejection_rate(&self) -> f64 {
        debug_assert!(
            self.accepted + self.rejected == self.total,
            "FeedbackStatistics totals are inconsistent"
        );
        if self.total == 0 {
            return 0.0;
        }
        1.0 - self.acceptance_rate()
    }

    #[must_use]
    pub fn average_reward(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.total_reward as f64 / self.total as f64
        }
    }
}

/// Summarize the whole log.
#[must_use]
pub fn summarize(events: &[FeedbackEvent]) -> FeedbackStatistics {
    let mut stats = FeedbackStatistics::default();
    for event in events {
        stats.observe(event);
    }
    stats
}

/// Statistics per suggestion id, ordered by id.
#[must_use]
pub fn aggregate_by_suggestion(events: &[FeedbackEvent]) -> BTreeMap<String, FeedbackStatistics> {
    let mut stats: BTreeMap<String, FeedbackStatistics> = BTreeMap::new();
    for event in events {
        stats
            .entry(event.suggestion_id.clone())
            .or_default()
            .observe(event);
    }
    stats
}
