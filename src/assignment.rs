use crate::grid::Grid;
use crate::words::WordList;
use crate::{SlotId, WordId};

/// A partial mapping from slots to chosen words, indexed by slot id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    words: Vec<Option<WordId>>,
    assigned_count: usize,
}

impl Assignment {
    /// An empty assignment for a grid with `slot_count` slots.
    pub fn new(slot_count: usize) -> Assignment {
        Assignment {
            words: vec![None; slot_count],
            assigned_count: 0,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.words.len()
    }

    /// Number of slots with a word.
    pub fn len(&self) -> usize {
        self.assigned_count
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.words[slot_id]
    }

    pub fn is_assigned(&self, slot_id: SlotId) -> bool {
        self.words[slot_id].is_some()
    }

    /// Assign a word to a slot, returning the word it replaces.
    pub fn insert(&mut self, slot_id: SlotId, word_id: WordId) -> Option<WordId> {
        let previous = self.words[slot_id].replace(word_id);
        if previous.is_none() {
            self.assigned_count += 1;
        }
        previous
    }

    pub fn remove(&mut self, slot_id: SlotId) -> Option<WordId> {
        let previous = self.words[slot_id].take();
        if previous.is_some() {
            self.assigned_count -= 1;
        }
        previous
    }

    /// Whether some slot other than `except` already uses `word_id`.
    pub fn uses_word(&self, word_id: WordId, except: Option<SlotId>) -> bool {
        self.iter().any(|(slot_id, assigned)| assigned == word_id && Some(slot_id) != except)
    }

    /// Assigned `(slot, word)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, WordId)> + '_ {
        self.words.iter().enumerate().filter_map(|(slot_id, word_id)| word_id.map(|word_id| (slot_id, word_id)))
    }

    pub fn unassigned(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.words.iter().enumerate().filter(|(_, word_id)| word_id.is_none()).map(|(slot_id, _)| slot_id)
    }

    /// Every slot has a word.
    pub fn is_complete(&self) -> bool {
        self.assigned_count == self.words.len()
    }

    /// Whether the word assigned to `slot_id` fits its slot, differs from every other assigned
    /// word, and agrees with every assigned crossing slot. An unassigned slot is trivially fine.
    pub fn is_slot_consistent(&self, grid: &Grid, words: &WordList, slot_id: SlotId) -> bool {
        let word_id = match self.words[slot_id] {
            Some(word_id) => word_id,
            None => return true,
        };
        let word = words.get(word_id);

        if word.len() != grid.slot(slot_id).length {
            return false;
        }

        if self.uses_word(word_id, Some(slot_id)) {
            return false;
        }

        grid.neighbors(slot_id).iter().all(|&neighbor| {
            match (self.words[neighbor], grid.overlap(slot_id, neighbor)) {
                (Some(neighbor_word_id), Some((k, l))) => {
                    word.chars.get(k) == words.get(neighbor_word_id).chars.get(l)
                }
                _ => true,
            }
        })
    }

    /// The first assigned slot that breaks a constraint, if any.
    pub fn first_inconsistent_slot(&self, grid: &Grid, words: &WordList) -> Option<SlotId> {
        self.iter()
            .map(|(slot_id, _)| slot_id)
            .find(|&slot_id| !self.is_slot_consistent(grid, words, slot_id))
    }

    /// All assigned words are distinct, have their slot's length, and agree at every crossing
    /// between assigned slots.
    pub fn is_consistent(&self, grid: &Grid, words: &WordList) -> bool {
        self.first_inconsistent_slot(grid, words).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::Assignment;
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
            ["top", "tab", "pat", "bat", "tap", "toppings"],
        ).unwrap()
    }

    #[test]
    fn test_insert_and_remove() {
        let mut assignment = Assignment::new(3);
        assert!(assignment.is_empty());

        assert_eq!(assignment.insert(1, 4), None);
        assert_eq!(assignment.insert(1, 5), Some(4));
        assert_eq!(assignment.len(), 1);
        assert!(assignment.is_assigned(1));
        assert_eq!(assignment.unassigned().collect::<Vec<_>>(), vec![0, 2]);

        assert_eq!(assignment.remove(1), Some(5));
        assert_eq!(assignment.remove(1), None);
        assert!(assignment.is_empty());
        assert!(!assignment.is_complete());
    }

    #[test]
    fn test_consistent_assignment() {
        let crossword = ring();
        // Slots: 0 top across, 1 left down, 2 right down, 3 bottom across.
        let mut assignment = Assignment::new(crossword.slot_count());
        assignment.insert(0, 0); // TOP
        assignment.insert(1, 1); // TAB
        assignment.insert(2, 2); // PAT

        assert!(assignment.is_consistent(&crossword.grid, &crossword.words));
        assert!(!assignment.is_complete());

        assignment.insert(3, 3); // BAT
        assert!(assignment.is_consistent(&crossword.grid, &crossword.words));
        assert!(assignment.is_complete());
    }

    #[test]
    fn test_mismatched_crossing_is_inconsistent() {
        let crossword = ring();
        let mut assignment = Assignment::new(crossword.slot_count());
        assignment.insert(0, 0); // TOP
        assignment.insert(2, 1); // TAB, but the right column has to start with P

        assert!(!assignment.is_consistent(&crossword.grid, &crossword.words));
        assert_eq!(assignment.first_inconsistent_slot(&crossword.grid, &crossword.words), Some(0));
    }

    #[test]
    fn test_repeated_word_is_inconsistent() {
        let crossword = ring();
        let mut assignment = Assignment::new(crossword.slot_count());
        assignment.insert(0, 3); // BAT
        assignment.insert(3, 3); // BAT again, with no crossing between them

        assert!(!assignment.is_consistent(&crossword.grid, &crossword.words));
        assert!(assignment.uses_word(3, Some(0)));
        assert!(!assignment.uses_word(0, None));
    }

    #[test]
    fn test_wrong_length_is_inconsistent() {
        let crossword = ring();
        let mut assignment = Assignment::new(crossword.slot_count());
        assignment.insert(1, 5); // TOPPINGS

        assert!(!assignment.is_slot_consistent(&crossword.grid, &crossword.words, 1));
        assert!(assignment.is_slot_consistent(&crossword.grid, &crossword.words, 0), "unassigned");
    }
}
