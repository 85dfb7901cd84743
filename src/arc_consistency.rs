//! Arc consistency (AC-3) over the crossing constraints between slots.
//!
//! An arc `(x, y)` is consistent when every word left in x's domain agrees, at the crossing cell,
//! with at least one other word left in y's domain. Crossing slots can never hold the same word,
//! so a word only finds support in a different word.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, trace};

use crate::domains::Domains;
use crate::grid::Grid;
use crate::words::WordList;
use crate::SlotId;

/// Worklist of arcs still to be revised. An arc already waiting is not queued a second time.
#[derive(Debug, Default)]
struct ConsistencyQueue {
    queue: VecDeque<(SlotId, SlotId)>,
    queued: HashSet<(SlotId, SlotId)>,
}

impl ConsistencyQueue {
    fn with_initial_queue<Items>(items: Items) -> ConsistencyQueue
        where
            Items: IntoIterator<Item = (SlotId, SlotId)>
    {
        let mut queue = ConsistencyQueue::default();
        for (x, y) in items {
            queue.enqueue(x, y);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<(SlotId, SlotId)> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, x: SlotId, y: SlotId) {
        if x != y && self.queued.insert((x, y)) {
            self.queue.push_back((x, y));
        }
    }
}

/// Results from a call to `enforce_arc_consistency`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// Number of arcs revised.
    pub revisions: usize,
    /// Number of words removed across all domains.
    pub removals: usize,
}

/// The slot whose domain was emptied, proving the current domains have no solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub slot_id: SlotId,
    pub revisions: usize,
    pub removals: usize,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Make `x` arc consistent with `y`, removing every word from x's domain that has no compatible
/// word in y's domain. Returns whether anything was removed. Slots that don't cross impose no
/// constraint on each other, so nothing is removed for them.
///
/// This also enforces distinctness: a word in x only counts as supported by a *different* word in
/// y. If the only word in y with the right letter at the crossing is the same word, it is removed
/// from x.
pub fn revise(grid: &Grid, words: &WordList, domains: &mut Domains, x: SlotId, y: SlotId) -> bool {
    revise_impl(grid, words, domains, x, y) > 0
}

fn revise_impl(grid: &Grid, words: &WordList, domains: &mut Domains, x: SlotId, y: SlotId) -> usize {
    let (k, l) = match grid.overlap(x, y) {
        Some(overlap) => overlap,
        None => return 0,
    };

    // How many of y's words place each letter at the crossing cell?
    let mut letter_counts: HashMap<char, usize> = HashMap::new();
    for word_id in domains.iter(y) {
        if let Some(&letter) = words.get(word_id).chars.get(l) {
            *letter_counts.entry(letter).or_insert(0) += 1;
        }
    }

    let y_domain = domains.get(y).clone();
    let removed = domains.retain(x, |word_id| {
        let word = words.get(word_id);
        let letter = match word.chars.get(k) {
            Some(&letter) => letter,
            None => return false,
        };

        // The word itself doesn't count as support, since it can't fill both slots.
        let supporting = letter_counts.get(&letter).copied().unwrap_or(0);
        let self_support = y_domain.contains(word_id) && word.chars.get(l) == Some(&letter);

        supporting > usize::from(self_support)
    });

    if removed > 0 {
        trace!("revise({}, {}) removed {} words", x, y, removed);
    }

    removed
}

/// Enforce arc consistency across the grid.
///
/// If `arcs` is `None`, the worklist starts with every ordered pair of crossing slots; otherwise it
/// starts with the given arcs. Revising an arc `(x, y)` that shrinks x requeues `(z, x)` for every
/// other neighbor z of x. Fails as soon as any domain is emptied.
pub fn enforce_arc_consistency(
    grid: &Grid,
    words: &WordList,
    domains: &mut Domains,
    arcs: Option<&[(SlotId, SlotId)]>,
) -> ArcConsistencyResult {
    let mut queue = match arcs {
        Some(arcs) => ConsistencyQueue::with_initial_queue(arcs.iter().copied()),
        None => ConsistencyQueue::with_initial_queue(grid.arcs()),
    };

    let mut revisions = 0;
    let mut removals = 0;

    while let Some((x, y)) = queue.pop_front() {
        revisions += 1;
        let removed = revise_impl(grid, words, domains, x, y);
        if removed == 0 {
            continue;
        }
        removals += removed;

        if domains.is_empty(x) {
            debug!(
                "Arc consistency emptied slot {} after {} revisions ({} words removed)",
                x, revisions, removals,
            );
            return Err(ArcConsistencyFailure { slot_id: x, revisions, removals });
        }

        for &z in grid.neighbors(x) {
            if z != y {
                queue.enqueue(z, x);
            }
        }
    }

    debug!("Arc consistency reached after {} revisions ({} words removed)", revisions, removals);

    Ok(ArcConsistencySuccess { revisions, removals })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::{enforce_arc_consistency, revise, ArcConsistencyFailure};
    use crate::domains::Domains;
    use crate::Crossword;

    /// ___
    /// _##
    /// _##
    fn corner(words: &[&str]) -> (Crossword, Domains) {
        let crossword = Crossword::from_template("___\n_##\n_##", words).unwrap();
        let mut domains = Domains::for_crossword(&crossword.grid, &crossword.words);
        domains.restrict_by_length(&crossword.grid, &crossword.words);
        (crossword, domains)
    }

    fn remaining(crossword: &Crossword, domains: &Domains, slot_id: usize) -> Vec<String> {
        domains.iter(slot_id).map(|word_id| crossword.words.get(word_id).string.clone()).collect()
    }

    #[test]
    fn test_revise_removes_unsupported_words() {
        let (crossword, mut domains) = corner(&["cat", "car", "dog", "emu"]);
        domains.retain(1, |word_id| word_id != 2);

        assert!(revise(&crossword.grid, &crossword.words, &mut domains, 0, 1));
        assert_eq!(remaining(&crossword, &domains, 0), vec!["CAT", "CAR"]);
        assert_eq!(remaining(&crossword, &domains, 1), vec!["CAT", "CAR", "EMU"], "only x is revised");

        assert!(!revise(&crossword.grid, &crossword.words, &mut domains, 0, 1), "second pass is a no-op");
    }

    #[test]
    fn test_revise_does_not_count_the_word_as_its_own_support() {
        let (crossword, mut domains) = corner(&["cat", "dog", "dig"]);

        assert!(revise(&crossword.grid, &crossword.words, &mut domains, 0, 1));
        assert_eq!(remaining(&crossword, &domains, 0), vec!["DOG", "DIG"]);
    }

    #[test]
    fn test_revise_ignores_slots_that_dont_cross() {
        let crossword = Crossword::from_template("___#___", ["abc", "xyz"]).unwrap();
        let mut domains = Domains::for_crossword(&crossword.grid, &crossword.words);

        assert!(!revise(&crossword.grid, &crossword.words, &mut domains, 0, 1));
        assert_eq!(domains.sizes(), vec![2, 2]);
    }

    #[test]
    fn test_ac3_prunes_words_without_a_crossing_partner() {
        let (crossword, mut domains) = corner(&["cat", "car", "dog"]);

        let result = enforce_arc_consistency(&crossword.grid, &crossword.words, &mut domains, None);

        assert_matches!(result, Ok(_));
        assert_eq!(remaining(&crossword, &domains, 0), vec!["CAT", "CAR"]);
        assert_eq!(remaining(&crossword, &domains, 1), vec!["CAT", "CAR"]);
    }

    #[test]
    fn test_ac3_reports_emptied_domain() {
        let (crossword, mut domains) = corner(&["cat", "dog"]);

        let result = enforce_arc_consistency(&crossword.grid, &crossword.words, &mut domains, None);

        assert_matches!(result, Err(ArcConsistencyFailure { slot_id: 0, .. }));
        assert!(domains.is_empty(0));
    }

    #[test]
    fn test_ac3_propagates_through_chains() {
        // The top-left across slot only fits "ABC", which forces the left down slot to "AXE", which
        // forces the bottom across slot to start with "E".
        let crossword = Crossword::from_template(
            "
            ___
            _##
            ___
            ",
            ["abc", "axe", "ewe", "own", "oaf", "zzz"],
        ).unwrap();
        let mut domains = Domains::for_crossword(&crossword.grid, &crossword.words);
        domains.restrict_by_length(&crossword.grid, &crossword.words);
        domains.retain(0, |word_id| word_id == 0);

        let arcs = [(1, 0)];
        let result = enforce_arc_consistency(&crossword.grid, &crossword.words, &mut domains, Some(&arcs));

        assert_matches!(result, Ok(_));
        assert_eq!(remaining(&crossword, &domains, 1), vec!["AXE"]);
        assert_eq!(remaining(&crossword, &domains, 2), vec!["EWE"]);
    }

    #[test]
    fn test_ac3_only_shrinks_domains() {
        let crossword = Crossword::from_template(
            "
            ____
            _#_#
            ____
            ",
            ["mast", "mite", "tame", "edit", "stem", "aim", "mat", "tee", "ape"],
        ).unwrap();
        let mut domains = Domains::for_crossword(&crossword.grid, &crossword.words);
        domains.restrict_by_length(&crossword.grid, &crossword.words);
        let before = domains.clone();

        let _ = enforce_arc_consistency(&crossword.grid, &crossword.words, &mut domains, None);

        for slot_id in 0..crossword.slot_count() {
            assert!(domains.len(slot_id) <= before.len(slot_id));
            assert!(domains.iter(slot_id).all(|word_id| before.contains(slot_id, word_id)));
        }
    }
}
