use crate::assignment::Assignment;
use crate::error::{Error, Result};
use crate::{Crossword, SlotId, WordId};

/// A complete, validated fill: one word per slot, plus the letters it puts in each cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    choices: Vec<WordId>,
    words: Vec<String>,
    letters: Vec<Vec<Option<char>>>,
}

impl Solution {
    /// Check that `assignment` gives every slot of `crossword` a word and breaks no constraint,
    /// and capture the result.
    pub fn new(crossword: &Crossword, assignment: &Assignment) -> Result<Solution> {
        let grid = &crossword.grid;

        if assignment.slot_count() > grid.slot_count() {
            return Err(Error::InconsistentAssignment { slot_id: grid.slot_count() });
        }

        let mut choices = Vec::with_capacity(grid.slot_count());
        for slot_id in 0..grid.slot_count() {
            let word_id = (slot_id < assignment.slot_count())
                .then(|| assignment.get(slot_id))
                .flatten()
                .ok_or(Error::IncompleteAssignment { slot_id })?;
            choices.push(word_id);
        }

        if let Some(slot_id) = assignment.first_inconsistent_slot(grid, &crossword.words) {
            return Err(Error::InconsistentAssignment { slot_id });
        }

        let structure = grid.structure();
        let mut letters = vec![vec![None; structure.width()]; structure.height()];
        for (slot, &word_id) in grid.slots().iter().zip(&choices) {
            for (cell_idx, &letter) in crossword.words.get(word_id).chars.iter().enumerate() {
                let (row, col) = slot.cell(cell_idx);
                letters[row][col] = Some(letter);
            }
        }

        Ok(Solution {
            words: choices.iter().map(|&word_id| crossword.words.get(word_id).string.clone()).collect(),
            choices,
            letters,
        })
    }

    /// Number of slots filled.
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn word(&self, slot_id: SlotId) -> &str {
        &self.words[slot_id]
    }

    pub fn word_id(&self, slot_id: SlotId) -> WordId {
        self.choices[slot_id]
    }

    /// `(slot, word id)` pairs in slot order.
    pub fn choices(&self) -> impl Iterator<Item = (SlotId, WordId)> + '_ {
        self.choices.iter().copied().enumerate()
    }

    /// `(slot, word)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &str)> {
        self.words.iter().map(String::as_str).enumerate()
    }

    /// Rows of cells, each holding its letter, or `None` for blocked cells.
    pub fn letter_grid(&self) -> &[Vec<Option<char>>] {
        &self.letters
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::Solution;
    use crate::assignment::Assignment;
    use crate::error::Error;
    use crate::Crossword;

    /// ___
    /// _#_
    /// ___
    fn ring() -> Crossword {
        Crossword::from_template(
            "
            ___
            _#_
            ___
            ",
            ["top", "tab", "pat", "bat"],
        ).unwrap()
    }

    #[test]
    fn test_solution_from_complete_assignment() {
        let crossword = ring();
        let mut assignment = Assignment::new(crossword.slot_count());
        for (slot_id, word_id) in [(0, 0), (1, 1), (2, 2), (3, 3)] {
            assignment.insert(slot_id, word_id);
        }

        let solution = Solution::new(&crossword, &assignment).unwrap();

        assert_eq!(solution.len(), 4);
        assert_eq!(solution.word(2), "PAT");
        assert_eq!(solution.word_id(3), 3);
        assert_eq!(solution.iter().map(|(_, word)| word).collect::<Vec<_>>(), vec!["TOP", "TAB", "PAT", "BAT"]);
        assert_eq!(solution.choices().collect::<Vec<_>>(), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert_eq!(solution.letter_grid(), &[
            vec![Some('T'), Some('O'), Some('P')],
            vec![Some('A'), None, Some('A')],
            vec![Some('B'), Some('A'), Some('T')],
        ]);
    }

    #[test]
    fn test_partial_assignment_is_rejected() {
        let crossword = ring();
        let mut assignment = Assignment::new(crossword.slot_count());
        assignment.insert(0, 0);
        assignment.insert(1, 1);

        assert_matches!(
            Solution::new(&crossword, &assignment),
            Err(Error::IncompleteAssignment { slot_id: 2 })
        );
        assert_matches!(
            Solution::new(&crossword, &Assignment::new(2)),
            Err(Error::IncompleteAssignment { slot_id: 0 })
        );
    }

    #[test]
    fn test_inconsistent_assignment_is_rejected() {
        let crossword = ring();
        let mut assignment = Assignment::new(crossword.slot_count());
        for (slot_id, word_id) in [(0, 0), (1, 1), (2, 2), (3, 0)] {
            assignment.insert(slot_id, word_id);
        }

        assert_matches!(
            Solution::new(&crossword, &assignment),
            Err(Error::InconsistentAssignment { slot_id: 0 })
        );
    }
}
