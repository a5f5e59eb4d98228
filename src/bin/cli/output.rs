use std::collections::HashMap;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use deckwise::dto::{DeletedDto, ReviewOutcomeDto};
use deckwise::models::{CardIdentity, ReviewState};
use deckwise::scheduler::ReviewPreview;
use deckwise::{Deck, DeckProgress};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// When true, print minimal output (just hashes or counts)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn format_due(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Truncates front text for table cells
fn short(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Prints a fingerprinted deck
pub fn print_deck(deck: &Deck, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            println!("{}", deck.content_hash());
            if config.quiet {
                return;
            }
            let max_id = deck.cards().iter().map(|c| c.card_identity.as_str().len()).max().unwrap_or(8);
            println!("{:<4}  {:<width$}  FRONT", "#", "IDENTITY", width = max_id);
            for card in deck.cards() {
                println!(
                    "{:<4}  {:<width$}  {}",
                    card.ordinal,
                    card.card_identity,
                    short(&card.card.front, 60),
                    width = max_id
                );
            }
        }
        OutputFormat::Json => print_json(deck),
    }
}

/// Prints the outcome of a recorded review
pub fn print_review_outcome(outcome: &ReviewOutcomeDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", outcome.bucket);
                return;
            }
            let state = &outcome.state;
            println!("Card:        {}", outcome.card_identity);
            println!("Bucket:      {}", outcome.bucket);
            println!("Repetitions: {}", state.get_repetitions());
            println!("Ease:        {:.2}", state.get_ease_factor());
            println!("Interval:    {}d", state.get_interval_days());
            println!("Next review: {}", format_due(state.get_next_review_at()));
        }
        OutputFormat::Json => print_json(outcome),
    }
}

/// Prints the outcome of each review button
pub fn print_previews(previews: &[ReviewPreview], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            for preview in previews {
                if config.quiet {
                    println!("{} {}d", preview.button.as_str(), preview.interval_days);
                    continue;
                }
                println!(
                    "{:<6} (q={})  {:>5}d  {}",
                    preview.button.as_str(),
                    preview.quality,
                    preview.interval_days,
                    format_due(preview.next_review_at)
                );
            }
        }
        OutputFormat::Json => print_json(previews),
    }
}

/// Prints the progress view of a deck
pub fn print_deck_progress(progress: &DeckProgress, config: &OutputConfig) {
    let counts = &progress.counts;
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", counts.due);
                return;
            }
            println!("{:<4}  {:<9}  {:<3}  {:<16}  FRONT", "#", "BUCKET", "DUE", "NEXT REVIEW");
            for card in &progress.cards {
                let next = card
                    .state
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |s| format_due(s.get_next_review_at()));
                println!(
                    "{:<4}  {:<9}  {:<3}  {:<16}  {}",
                    card.ordinal,
                    card.bucket.as_str(),
                    if card.due { "yes" } else { "" },
                    next,
                    short(&card.front, 50)
                );
            }
            println!();
            println!(
                "new {}  learning {}  review {}  mastered {}  |  due {}",
                counts.new, counts.learning, counts.review, counts.mastered, counts.due
            );
        }
        OutputFormat::Json => print_json(progress),
    }
}

/// Prints stored states keyed by card identity
pub fn print_states(states: &HashMap<CardIdentity, ReviewState>, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if states.is_empty() {
                if !config.quiet {
                    println!("No stored progress for these cards.");
                }
                return;
            }
            let mut ids: Vec<&CardIdentity> = states.keys().collect();
            ids.sort();
            for id in ids {
                let state = &states[id];
                if config.quiet {
                    println!("{}", id);
                    continue;
                }
                println!(
                    "{}  {:<9}  reps {:<3}  ease {:.2}  next {}",
                    id,
                    state.bucket().as_str(),
                    state.get_repetitions(),
                    state.get_ease_factor(),
                    format_due(state.get_next_review_at())
                );
            }
        }
        OutputFormat::Json => print_json(states),
    }
}

/// Prints a deletion count
pub fn print_deleted(deleted: &DeletedDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", deleted.deleted);
            } else {
                println!("Deleted {} progress rows.", deleted.deleted);
            }
        }
        OutputFormat::Json => print_json(deleted),
    }
}
