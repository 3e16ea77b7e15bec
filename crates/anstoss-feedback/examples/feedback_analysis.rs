//! Example simulating a short suggestion session and summarizing the feedback.
//!
//! A simulated user always accepts the "plan tomorrow" suggestion and rejects
//! everything else. After a few rounds the accepted suggestion dominates the
//! exploit step.
//!
//! Run with: cargo run -p anstoss-feedback --example feedback_analysis

use anstoss_core::{MemoryStore, WeightStore};
use anstoss_feedback::{aggregate_by_suggestion, record_feedback, WeightTuner};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== anstoss: feedback session ===\n");

    let store = MemoryStore::new();
    let tuner = WeightTuner::default();
    let table = store.load_weights()?;

    for round in 0..12 {
        let suggestion = &table[round % table.len()];
        let reward = if suggestion.id == "SUG-2" { 1 } else { -1 };
        record_feedback(
            &store,
            &suggestion.id,
            "simulated evening session",
            &suggestion.text,
            reward,
        )?;
        tuner.update_weight(&store, &suggestion.id, reward)?;
    }

    println!("📈 Statistics by suggestion:");
    let feedback = store.load_feedback()?;
    for (id, stats) in aggregate_by_suggestion(&feedback) {
        println!(
            "  {} → accepted: {}/{} ({:.1}%), avg reward: {:.2}",
            id,
            stats.accepted,
            stats.total,
            stats.acceptance_rate() * 100.0,
            stats.average_reward()
        );
    }
    println!();

    println!("⚖️  Weights after session:");
    for suggestion in store.load_weights()? {
        println!("  {:>6}  {:+.2}  {}", suggestion.id, suggestion.weight, suggestion.text);
    }
    println!();

    println!(
        "📝 {} weight changes recorded.",
        store.load_improvements()?.len()
    );

    Ok(())
}
