//! Error types for deck and category operations.
//!
//! Routine misuse (re-adding a present card, removing an absent one, a
//! redundant `set`) is reported through `bool`/`usize` return values, not
//! through this type. `DeckError` covers contract violations, reads of
//! event components that did not change, and persistence failures.

use thiserror::Error;

use crate::cards::CardId;

/// Errors that can occur in deck operations.
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("category {category} cannot contain card {card}")]
    NotAdmitted { category: String, card: CardId },

    #[error("{0} did not change")]
    Unchanged(&'static str),

    #[error("no category named {0}")]
    UnknownCategory(String),

    #[error("a category named {0} already exists")]
    DuplicateCategory(String),

    #[error("card {0} is not in the deck")]
    CardNotFound(CardId),

    #[error("line {line}: unknown card id {id}")]
    UnknownCard { line: usize, id: String },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid date format {0:?}")]
    DateFormat(String),

    #[error("invalid category specification: {0}")]
    InvalidSpec(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_admitted_message() {
        let err = DeckError::NotAdmitted {
            category: "Lands".to_string(),
            card: CardId::new("bolt"),
        };
        assert_eq!(err.to_string(), "category Lands cannot contain card bolt");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DeckError = io.into();
        assert!(matches!(err, DeckError::Io(_)));
    }
}
