//! Validation boundary between generated card JSON and the progress core.
//!
//! Card generators return loosely shaped JSON. Everything downstream works on
//! [`Flashcard`] values whose front text is known to be non-empty, so this is
//! the only place that has to deal with missing or oddly named fields.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::ProgressError;
use crate::identity;
use crate::models::{CardIdentity, ContentFingerprint, Difficulty, Flashcard};

const FRONT_KEYS: [&str; 3] = ["front", "question", "term"];
const BACK_KEYS: [&str; 3] = ["back", "answer", "definition"];
const LIST_KEYS: [&str; 2] = ["flashcards", "cards"];

/// Normalizes raw generated cards into validated flashcards
///
/// Accepts an array of card objects, or an object wrapping one under
/// `flashcards` or `cards`. Elements without usable front text are dropped.
///
/// ### Errors
///
/// Returns `InvalidArgument` if `raw` is null, has no card list, or no card
/// survives validation.
pub fn normalize_cards(raw: &Value) -> Result<Vec<Flashcard>, ProgressError> {
    let items = card_list(raw)?;

    let mut cards = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_object().and_then(normalize_card) {
            Some(card) => cards.push(card),
            None => warn!(index, "Dropping generated card without front text"),
        }
    }

    if cards.is_empty() {
        return Err(ProgressError::invalid("deck contains no cards with front text"));
    }

    debug!(kept = cards.len(), received = items.len(), "Normalized generated cards");
    Ok(cards)
}

fn card_list(raw: &Value) -> Result<&Vec<Value>, ProgressError> {
    match raw {
        Value::Null => Err(ProgressError::invalid("card list is null")),
        Value::Array(items) => Ok(items),
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or_else(|| ProgressError::invalid("expected a `flashcards` or `cards` array")),
        _ => Err(ProgressError::invalid("card list must be an array")),
    }
}

fn normalize_card(map: &Map<String, Value>) -> Option<Flashcard> {
    let front = first_text(map, &FRONT_KEYS)?;
    let back = first_text(map, &BACK_KEYS).unwrap_or_default();

    Some(Flashcard {
        front,
        back,
        hint: first_text(map, &["hint"]),
        difficulty: map.get("difficulty").and_then(Value::as_str).and_then(Difficulty::parse),
        category: first_text(map, &["category"]),
    })
}

/// First non-empty trimmed string found under any of `keys`
fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// A card placed in a deck
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckCard {
    pub card_identity: CardIdentity,
    pub ordinal: usize,
    #[serde(flatten)]
    pub card: Flashcard,
}

/// An ordered deck together with its content fingerprint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deck {
    content_hash: ContentFingerprint,
    cards: Vec<DeckCard>,
}

impl Deck {
    /// Builds a deck, assigning ordinals and identities in the given order
    pub fn new(cards: Vec<Flashcard>) -> Self {
        let content_hash = {
            let fronts: Vec<&str> = cards.iter().map(|c| c.front.as_str()).collect();
            identity::fingerprint(&fronts)
        };

        let cards = cards
            .into_iter()
            .enumerate()
            .map(|(ordinal, card)| DeckCard {
                card_identity: identity::card_identity(&card.front, ordinal),
                ordinal,
                card,
            })
            .collect();

        Self { content_hash, cards }
    }

    /// Normalizes raw generated cards and builds the deck
    pub fn from_json(raw: &Value) -> Result<Self, ProgressError> {
        Ok(Self::new(normalize_cards(raw)?))
    }

    pub fn content_hash(&self) -> &ContentFingerprint {
        &self.content_hash
    }

    pub fn cards(&self) -> &[DeckCard] {
        &self.cards
    }

    pub fn identities(&self) -> Vec<CardIdentity> {
        self.cards.iter().map(|c| c.card_identity.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
