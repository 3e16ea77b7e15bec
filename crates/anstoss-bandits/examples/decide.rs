use std::env;

use anstoss_bandits::{choose_suggestion, DEFAULT_EPSILON};
use anstoss_core::{iso8601_now, Choice, FileStore, StoreConfig};
use serde::Serialize;

#[derive(Serialize)]
struct SelectionRecord {
    ts: String,
    policy: String,
    epsilon: f64,
    choice: Option<Choice>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "data".to_string());
    let epsilon = match args.next() {
        Some(raw) => raw.parse::<f64>()?,
        None => DEFAULT_EPSILON,
    };

    let store = FileStore::new(StoreConfig::new(root));
    let choice = choose_suggestion(&store, epsilon)?;

    let record = SelectionRecord {
        ts: iso8601_now(),
        policy: "anstoss-bandits/epsilon-greedy".to_string(),
        epsilon,
        choice,
    };

    serde_json::to_writer_pretty(std::io::stdout(), &record)?;
    println!();

    Ok(())
}
