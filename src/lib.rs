//! A crossword construction engine.
//!
//! Filling a crossword is treated as a constraint satisfaction problem: every slot needs a word of
//! the right length, crossing slots have to agree on their shared letter, and no word can be used
//! twice. The [`Filler`] prunes candidates with node and arc consistency (AC-3), then runs a
//! backtracking search ordered by the minimum-remaining-values, degree and least-constraining-value
//! heuristics.
//!
//! Reading structure and word files, and rendering the result, are left to the caller; the engine
//! works on an in-memory [`Structure`] and [`WordList`] and hands back a [`Solution`].

use std::fmt::{Debug, Formatter};

pub mod arc_consistency;
pub mod assignment;
pub mod domains;
pub mod error;
pub mod fill;
pub mod grid;
pub mod solution;
pub mod structure;
pub mod words;

pub use arc_consistency::{ArcConsistencyFailure, ArcConsistencyResult, ArcConsistencySuccess};
pub use assignment::Assignment;
pub use domains::Domains;
pub use error::{Error, Result};
pub use fill::{find_fill, find_fill_with_options, FillFailure, FillOptions, FillSuccess, Filler, Statistics};
pub use grid::{Crossing, Grid, Slot};
pub use solution::Solution;
pub use structure::Structure;
pub use words::{Word, WordList};

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// The shortest run of fillable cells that counts as a slot, unless configured otherwise.
pub const MIN_SLOT_LENGTH: usize = 2;

/// An identifier for a given slot, based on its index in the Grid's `slots` field.
pub type SlotId = usize;

/// An identifier for a given word, based on its index in the `WordList`.
pub type WordId = usize;

/// Zero-indexed `(row, col)` coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Across,
    Down,
}

/// A grid paired with the word list used to fill it. Both are read-only during a fill.
#[derive(Clone)]
pub struct Crossword {
    pub grid: Grid,
    pub words: WordList,
}

impl Crossword {
    pub fn new(structure: Structure, words: WordList) -> Crossword {
        Crossword { grid: Grid::new(structure), words }
    }

    pub fn with_min_slot_length(structure: Structure, words: WordList, min_slot_length: usize) -> Crossword {
        Crossword { grid: Grid::with_min_slot_length(structure, min_slot_length), words }
    }

    /// Build a crossword from a string template (see [`Structure::from_template`]) and a list of
    /// words.
    pub fn from_template<I>(template: &str, words: I) -> Result<Crossword>
        where
            I: IntoIterator,
            I::Item: AsRef<str>,
    {
        Ok(Crossword::new(Structure::from_template(template)?, WordList::new(words)))
    }

    pub fn slot_count(&self) -> usize {
        self.grid.slot_count()
    }
}

impl Debug for Crossword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crossword")
            .field("grid", &self.grid)
            .field("words", &self.words)
            .finish()
    }
}
