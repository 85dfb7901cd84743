//! Error types for building crosswords and validating their fills.

use thiserror::Error;

use crate::SlotId;

/// Errors raised while constructing a crossword or validating an assignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("structure has no rows")]
    EmptyStructure,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid template character '{found}' at row {row}, column {col}")]
    InvalidTemplateCell { row: usize, col: usize, found: char },

    #[error("slot {slot_id} has no word assigned")]
    IncompleteAssignment { slot_id: SlotId },

    #[error("word assigned to slot {slot_id} violates a constraint")]
    InconsistentAssignment { slot_id: SlotId },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
