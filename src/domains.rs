use bit_set::BitSet;

use crate::grid::Grid;
use crate::words::WordList;
use crate::{SlotId, WordId};

/// The live set of candidate words for every slot, as bit sets over word ids.
///
/// Domains only ever lose words while constraints are being enforced. Search undoes its own
/// pruning by restoring a clone taken before the branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    word_count: usize,
    options: Vec<BitSet>,
}

impl Domains {
    /// Start every slot off with the full word list.
    pub fn new(slot_count: usize, word_count: usize) -> Domains {
        let mut full = BitSet::with_capacity(word_count);
        for word_id in 0..word_count {
            full.insert(word_id);
        }

        Domains {
            word_count,
            options: vec![full; slot_count],
        }
    }

    pub fn for_crossword(grid: &Grid, words: &WordList) -> Domains {
        Domains::new(grid.slot_count(), words.len())
    }

    /// Remove any word whose length differs from its slot's length. Running this more than once
    /// has no further effect.
    pub fn restrict_by_length(&mut self, grid: &Grid, words: &WordList) {
        for slot in grid.slots() {
            self.retain(slot.id, |word_id| words.get(word_id).len() == slot.length);
        }
    }

    pub fn slot_count(&self) -> usize {
        self.options.len()
    }

    pub fn get(&self, slot_id: SlotId) -> &BitSet {
        &self.options[slot_id]
    }

    pub fn len(&self, slot_id: SlotId) -> usize {
        self.options[slot_id].len()
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.options[slot_id].is_empty()
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.options[slot_id].contains(word_id)
    }

    /// Candidate word ids for a slot, in ascending order.
    pub fn iter(&self, slot_id: SlotId) -> impl Iterator<Item = WordId> + '_ {
        self.options[slot_id].iter()
    }

    /// Remove a word from a slot's domain, returning whether it was present.
    pub fn remove(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        self.options[slot_id].remove(word_id)
    }

    /// Keep only the words for which `keep` returns true, returning how many were removed.
    pub fn retain<F>(&mut self, slot_id: SlotId, mut keep: F) -> usize
        where
            F: FnMut(WordId) -> bool,
    {
        let removed: Vec<WordId> = self.options[slot_id].iter().filter(|&word_id| !keep(word_id)).collect();
        for &word_id in &removed {
            self.options[slot_id].remove(word_id);
        }
        removed.len()
    }

    /// Narrow a slot's domain to a single word, if that word is still a candidate. Returns whether
    /// the word was a candidate.
    pub fn assign_single(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        if !self.options[slot_id].contains(word_id) {
            return false;
        }
        let mut single = BitSet::with_capacity(self.word_count);
        single.insert(word_id);
        self.options[slot_id] = single;
        true
    }

    /// Sum of all domain sizes.
    pub fn total_len(&self) -> usize {
        self.options.iter().map(BitSet::len).sum()
    }

    /// Domain sizes indexed by slot id.
    pub fn sizes(&self) -> Vec<usize> {
        self.options.iter().map(BitSet::len).collect()
    }

    /// The first slot whose domain is empty, if any.
    pub fn first_empty(&self) -> Option<SlotId> {
        self.options.iter().position(BitSet::is_empty)
    }
}
