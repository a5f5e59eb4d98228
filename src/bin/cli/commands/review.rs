use clap::Args;
use deckwise::models::{CardIdentity, ContentFingerprint};

use crate::client::DeckwiseClient;
use crate::output::{self, OutputConfig};

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// The user who reviewed the card
    #[clap(long)]
    pub user: String,
    /// Card identity, as printed by `fingerprint`
    #[clap(long)]
    pub card: String,
    /// Content hash of the deck the card was shown in
    #[clap(long)]
    pub hash: String,
    /// Recall quality (0-5)
    #[clap(long, allow_negative_numbers = true)]
    pub quality: i32,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[clap(long)]
    pub user: String,
    #[clap(long)]
    pub card: String,
    #[clap(long)]
    pub hash: String,
}

/// Records a review on the server
pub async fn execute_review(
    client: &DeckwiseClient,
    args: ReviewArgs,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = client
        .record_review(
            &args.user,
            CardIdentity::new(args.card),
            ContentFingerprint::new(args.hash),
            args.quality,
        )
        .await?;
    output::print_review_outcome(&outcome, config);
    Ok(())
}

/// Shows the interval each review button would give
pub async fn execute_preview(
    client: &DeckwiseClient,
    args: PreviewArgs,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let previews = client
        .preview_review(&args.user, &CardIdentity::new(args.card), &ContentFingerprint::new(args.hash))
        .await?;
    output::print_previews(&previews, config);
    Ok(())
}
