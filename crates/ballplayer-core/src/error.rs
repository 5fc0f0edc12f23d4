// Errors surfaced by the season pipeline.
//
// Only identity resolution fails loudly. Missing optional tables and sparse
// numeric fields degrade to "contributes nothing" / zero inside the modules
// that read them.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("player not found: {player_id}")]
    PlayerNotFound { player_id: String },
}
