pub mod fingerprint;
pub mod progress;
pub mod review;

use std::path::Path;

use serde_json::Value;

/// Reads a deck file holding generated cards as JSON
pub fn read_deck_file(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse {} as JSON: {}", path.display(), e))?;
    Ok(value)
}
