//! # Error Types Module
//!
//! Error types shared by the catalog, favorites, callback and add-recipe
//! components. Every [`BotError`] is resolved into a reply inside the event
//! that produced it; none of them are fatal to the process.

use crate::recipe::RecipeId;

/// Failures of the injected key-value store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored data could not be encoded or decoded
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    /// The stored value under this key could not be read at startup
    #[error("refusing to overwrite unreadable stored value {0:?}")]
    Unreadable(&'static str),
}

/// Domain errors surfaced by bot operations
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// The recipe no longer exists (possibly deleted by the admin)
    #[error("recipe {0} not found")]
    NotFound(RecipeId),
    /// A non-admin user attempted an admin-only action
    #[error("user {0} is not authorized for this action")]
    Unauthorized(u64),
    /// A callback token that the bot could not have produced
    #[error("malformed callback token: {0:?}")]
    MalformedToken(String),
    /// The add-recipe flow reached completion with a missing field
    #[error("submission is missing required field: {0}")]
    ValidationFailure(&'static str),
    /// Every recipe id up to `u32::MAX` has been handed out
    #[error("no recipe ids left")]
    IdsExhausted,
    /// Wrong kind of input for the current add-recipe step
    #[error("unexpected input for the current step")]
    InvalidStepInput,
    /// Persisting state failed
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl BotError {
    /// Localization key of the reply shown to the user, if any.
    ///
    /// Malformed tokens are ignored silently, so they have no reply.
    pub fn reply_key(&self) -> Option<&'static str> {
        match self {
            BotError::NotFound(_) => Some("recipe-not-found"),
            BotError::Unauthorized(_) => Some("not-authorized"),
            BotError::MalformedToken(_) => None,
            BotError::ValidationFailure(_) => Some("add-incomplete"),
            BotError::IdsExhausted => Some("error-storage"),
            BotError::InvalidStepInput => Some("add-photo-invalid"),
            BotError::Persistence(_) => Some("error-storage"),
        }
    }
}
