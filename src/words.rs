use std::collections::HashSet;
use std::fmt::{Debug, Formatter};

use smallvec::SmallVec;

use crate::{WordId, MAX_SLOT_LENGTH};

/// A candidate word, with its characters broken out so that individual positions can be compared
/// cheaply during constraint propagation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word {
    pub string: String,
    pub chars: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    fn new(string: String) -> Word {
        let chars = string.chars().collect();
        Word { string, chars }
    }

    /// Length in characters, which is what slot lengths are measured in.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// The shared, read-only list of candidate words. A word's id is its index in this list.
///
/// Words are trimmed and uppercased on the way in; blank entries are dropped and duplicates keep
/// their first position, so ids follow input order.
#[derive(Clone, Default)]
pub struct WordList {
    words: Vec<Word>,
}

impl WordList {
    pub fn new<I>(words: I) -> WordList
        where
            I: IntoIterator,
            I::Item: AsRef<str>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut list = vec![];

        for word in words {
            let normalized = word.as_ref().trim().to_uppercase();
            if normalized.is_empty() || seen.contains(&normalized) {
                continue;
            }
            seen.insert(normalized.clone());
            list.push(Word::new(normalized));
        }

        WordList { words: list }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    /// Look up the id of a word, normalizing it the same way the list was built.
    pub fn find(&self, word: &str) -> Option<WordId> {
        let normalized = word.trim().to_uppercase();
        self.words.iter().position(|candidate| candidate.string == normalized)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WordId, &Word)> {
        self.words.iter().enumerate()
    }
}

impl Debug for WordList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordList")
            .field("words", &format_args!("({} entries)", self.words.len()))
            .finish()
    }
}
