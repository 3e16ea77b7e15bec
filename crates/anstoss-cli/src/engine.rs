//! Orchestration of selection and learning over one store.
//!
//! Mirrors the interactive flow: pick a suggestion, then on accept or reject
//! log the feedback first and update the weight second.

use anstoss_bandits::{choose_suggestion_with, EpsilonGreedy};
use anstoss_core::{
    Choice, FeedbackEvent, ImprovementRecord, Result, Suggestion, WeightStore,
};
use anstoss_feedback::{
    aggregate_by_suggestion, record_feedback, summarize, FeedbackStatistics, WeightTuner,
};
use serde::Serialize;
use std::collections::BTreeMap;

pub const ACCEPT: i32 = 1;
pub const REJECT: i32 = -1;

/// Aggregated view over the table and both logs.
#[derive(Debug, Serialize)]
pub struct EngineStats {
    pub templates: usize,
    pub improvements: usize,
    pub feedback: FeedbackStatistics,
    pub by_suggestion: BTreeMap<String, FeedbackStatistics>,
}

#[derive(Debug)]
pub struct Engine<S> {
    store: S,
    policy: EpsilonGreedy,
    tuner: WeightTuner,
}

impl<S: WeightStore> Engine<S> {
    pub fn new(store: S, epsilon: f64, alpha: f64) -> Self {
        Self {
            store,
            policy: EpsilonGreedy::new(epsilon),
            tuner: WeightTuner::new(alpha),
        }
    }

    pub fn choose_suggestion(&self) -> Result<Option<Choice>> {
        choose_suggestion_with(&self.store, &self.policy, &mut rand::thread_rng())
    }

    pub fn record_feedback(
        &self,
        suggestion_id: &str,
        context_text: &str,
        suggestion_text: &str,
        reward: i32,
    ) -> Result<FeedbackEvent> {
        record_feedback(&self.store, suggestion_id, context_text, suggestion_text, reward)
    }

    pub fn update_weight(
        &self,
        suggestion_id: &str,
        reward: i32,
    ) -> Result<Option<ImprovementRecord>> {
        self.tuner.update_weight(&self.store, suggestion_id, reward)
    }

    /// Log feedback for a previously returned snapshot and learn from it.
    pub fn respond(
        &self,
        suggestion: &Suggestion,
        context_text: &str,
        reward: i32,
    ) -> Result<Option<ImprovementRecord>> {
        self.record_feedback(&suggestion.id, context_text, &suggestion.text, reward)?;
        self.update_weight(&suggestion.id, reward)
    }

    /// Like [`Engine::respond`], but only an id is known. The text snapshot is
    /// taken from the current table and is empty for unknown ids.
    pub fn respond_to_id(
        &self,
        suggestion_id: &str,
        context_text: &str,
        reward: i32,
    ) -> Result<Option<ImprovementRecord>> {
        let snapshot = self
            .store
            .load_weights()?
            .into_iter()
            .find(|s| s.id == suggestion_id)
            .unwrap_or_else(|| Suggestion::new(suggestion_id, "", 0.0));
        self.respond(&snapshot, context_text, reward)
    }

    pub fn get_weight_table(&self) -> Result<Vec<Suggestion>> {
        self.store.load_weights()
    }

    pub fn get_feedback_log(&self) -> Result<Vec<FeedbackEvent>> {
        self.store.load_feedback()
    }

    pub fn get_improvement_log(&self) -> Result<Vec<ImprovementRecord>> {
        self.store.load_improvements()
    }

    pub fn stats(&self) -> Result<EngineStats> {
        let feedback = self.store.load_feedback()?;
        Ok(EngineStats {
            templates: self.store.load_weights()?.len(),
            improvements: self.store.load_improvements()?.len(),
            feedback: summarize(&feedback),
            by_suggestion: aggregate_by_suggestion(&feedback),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anstoss_core::MemoryStore;

    fn engine() -> Engine<MemoryStore> {
        Engine::new(MemoryStore::new(), 0.0, 0.1)
    }

    fn weight(engine: &Engine<MemoryStore>, id: &str) -> f64 {
        engine
            .get_weight_table()
            .unwrap()
            .into_iter()
            .find(|s| s.id == id)
            .unwrap()
            .weight
    }

    #[test]
    fn accepted_suggestion_wins_the_exploit_step() {
        let engine = engine();
        let first = engine.choose_suggestion().unwrap().unwrap();
        assert_eq!(first.suggestion.id, "SUG-1");

        engine.respond(&first.suggestion, "too tired", REJECT).unwrap();
        let table = engine.get_weight_table().unwrap();
        engine.respond(&table[2], "stuck on homework", ACCEPT).unwrap();

        let next = engine.choose_suggestion().unwrap().unwrap();
        assert_eq!(next.suggestion.id, "SUG-3");
    }

    #[test]
    fn engine_selects_with_its_configured_policy() {
        let store = MemoryStore::with_table(vec![
            Suggestion::new("A", "alpha", 0.5),
            Suggestion::new("B", "beta", 0.9),
        ]);
        let greedy = Engine::new(store, 0.0, 0.1);
        for _ in 0..50 {
            let choice = greedy.choose_suggestion().unwrap().unwrap();
            assert_eq!(choice.suggestion.id, "B");
            assert_eq!(choice.strategy, anstoss_core::Strategy::Exploit);
        }

        let explorer = Engine::new(MemoryStore::new(), 1.0, 0.1);
        for _ in 0..50 {
            let choice = explorer.choose_suggestion().unwrap().unwrap();
            assert_eq!(choice.strategy, anstoss_core::Strategy::Explore);
        }
    }

    #[test]
    fn respond_logs_feedback_then_improvement() {
        let engine = engine();
        let choice = engine.choose_suggestion().unwrap().unwrap();

        let record = engine
            .respond(&choice.suggestion, "studied 20 mins", ACCEPT)
            .unwrap()
            .unwrap();

        let feedback = engine.get_feedback_log().unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].suggestion_text, choice.suggestion.text);
        assert_eq!(feedback[0].reward, ACCEPT);
        assert_eq!(engine.get_improvement_log().unwrap(), vec![record.clone()]);
        assert!((weight(&engine, "SUG-1") - record.new_weight).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_id_still_logs_feedback_but_not_improvement() {
        let engine = engine();

        let result = engine.respond_to_id("SUG-404", "ctx", REJECT).unwrap();

        assert!(result.is_none());
        let feedback = engine.get_feedback_log().unwrap();
        assert_eq!(feedback.len(), 1);
        assert!(feedback[0].suggestion_text.is_empty());
        assert!(engine.get_improvement_log().unwrap().is_empty());
    }

    #[test]
    fn stats_reflect_both_logs() {
        let engine = engine();
        engine.respond_to_id("SUG-1", "", ACCEPT).unwrap();
        engine.respond_to_id("SUG-1", "", REJECT).unwrap();
        engine.respond_to_id("SUG-2", "", ACCEPT).unwrap();

        let stats = engine.stats().unwrap();

        assert_eq!(stats.templates, 3);
        assert_eq!(stats.improvements, 3);
        assert_eq!(stats.feedback.total, 3);
        assert_eq!(stats.feedback.accepted, 2);
        assert_eq!(stats.by_suggestion["SUG-1"].total, 2);
        assert!((weight(&engine, "SUG-1") - 0.0).abs() < f64::EPSILON);
    }
}
