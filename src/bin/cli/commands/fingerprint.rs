use std::path::PathBuf;

use clap::Args;
use deckwise::Deck;

use super::read_deck_file;
use crate::output::{self, OutputConfig};

#[derive(Args, Debug)]
pub struct FingerprintArgs {
    /// JSON file with the generated cards
    #[clap(long)]
    pub file: PathBuf,
}

/// Fingerprints a deck file without contacting the server
pub fn execute(args: FingerprintArgs, config: &OutputConfig) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_deck_file(&args.file)?;
    let deck = Deck::from_json(&raw)?;
    output::print_deck(&deck, config);
    Ok(())
}
