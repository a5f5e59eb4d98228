use std::path::PathBuf;

use clap::Args;
use deckwise::Deck;
use deckwise::models::CardIdentity;

use super::read_deck_file;
use crate::client::DeckwiseClient;
use crate::output::{self, OutputConfig};

#[derive(Args, Debug)]
pub struct ProgressArgs {
    #[clap(long)]
    pub user: String,
    /// JSON file with the generated cards
    #[clap(long)]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct StatesArgs {
    #[clap(long)]
    pub user: String,
    /// Card identity to look up; repeat for several cards
    #[clap(long = "card", required = true)]
    pub cards: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    #[clap(long)]
    pub user: String,
    /// JSON file with the generated cards
    #[clap(long)]
    pub file: PathBuf,
}

/// Shows the user's progress on a deck file
pub async fn execute_progress(
    client: &DeckwiseClient,
    args: ProgressArgs,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_deck_file(&args.file)?;
    let progress = client.deck_progress(&args.user, raw).await?;
    output::print_deck_progress(&progress, config);
    Ok(())
}

/// Shows the stored states of specific cards
pub async fn execute_states(
    client: &DeckwiseClient,
    args: StatesArgs,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let cards: Vec<CardIdentity> = args.cards.into_iter().map(CardIdentity::new).collect();
    let states = client.load_states(&args.user, &cards).await?;
    output::print_states(&states, config);
    Ok(())
}

/// Deletes the user's progress on every card of a deck file
///
/// Identities are computed locally, so a deck can be reset without the server
/// seeing its content.
pub async fn execute_reset(
    client: &DeckwiseClient,
    args: ResetArgs,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let deck = Deck::from_json(&read_deck_file(&args.file)?)?;
    let deleted = client.delete_states(&args.user, deck.identities()).await?;
    output::print_deleted(&deleted, config);
    Ok(())
}
