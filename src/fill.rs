use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use instant::{Duration, Instant};
use log::{debug, info, trace};
use thiserror::Error;

use crate::arc_consistency::{self, ArcConsistencyResult};
use crate::assignment::Assignment;
use crate::domains::Domains;
use crate::error::Error;
use crate::solution::Solution;
use crate::{Crossword, SlotId, WordId};

/// Knobs for a single fill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillOptions {
    /// Re-establish arc consistency around each slot as it's assigned, instead of only before the
    /// search starts.
    pub inference: bool,

    /// Give up after this many tentative assignments.
    pub step_limit: Option<u64>,

    /// Give up once the fill has been running this long. The clock starts when `solve` is called,
    /// or when the filler is created if `backtrack` is driven directly, and is only checked before
    /// each tentative assignment. Node and arc consistency before the search always run to the end.
    pub time_limit: Option<Duration>,
}

impl FillOptions {
    pub fn new() -> FillOptions {
        FillOptions::default()
    }

    pub fn with_inference(mut self, inference: bool) -> FillOptions {
        self.inference = inference;
        self
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> FillOptions {
        self.step_limit = Some(step_limit);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> FillOptions {
        self.time_limit = Some(time_limit);
        self
    }
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Tentative assignments tried during search.
    pub states: u64,
    /// Tentative assignments that were undone, either because they broke a constraint, because
    /// inference emptied a domain, or because nothing below them could be filled.
    pub backtracks: u64,
    /// Arcs revised by arc consistency.
    pub revisions: u64,
    /// Words removed from domains by node and arc consistency.
    pub removals: u64,
    pub duration: Duration,
}

/// A struct representing the results of a fill operation.
#[derive(Debug, Clone)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub solution: Solution,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FillFailure {
    /// No assignment satisfies every constraint, whether that was proven by pruning or by
    /// exhausting the search.
    #[error("no fill satisfies every constraint")]
    Unsatisfiable,

    #[error("gave up after {steps} steps")]
    StepLimitExceeded { steps: u64 },

    #[error("gave up after {elapsed:?}")]
    TimeLimitExceeded { elapsed: Duration },

    #[error("fill failed validation: {0}")]
    InvalidSolution(#[from] Error),
}

/// Backtracking search over one crossword.
///
/// The filler owns the domains and statistics for its crossword. `solve` runs the whole pipeline;
/// the individual steps are public so callers can drive or inspect them.
pub struct Filler<'a> {
    crossword: &'a Crossword,
    options: FillOptions,
    domains: Domains,
    statistics: Statistics,
    start: Instant,
}

impl<'a> Filler<'a> {
    pub fn new(crossword: &'a Crossword) -> Filler<'a> {
        Filler::with_options(crossword, FillOptions::default())
    }

    pub fn with_options(crossword: &'a Crossword, options: FillOptions) -> Filler<'a> {
        Filler {
            crossword,
            options,
            domains: Domains::for_crossword(&crossword.grid, &crossword.words),
            statistics: Statistics::default(),
            start: Instant::now(),
        }
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn domains_mut(&mut self) -> &mut Domains {
        &mut self.domains
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Remove every word whose length doesn't match its slot.
    pub fn enforce_node_consistency(&mut self) {
        let before = self.domains.total_len();
        self.domains.restrict_by_length(&self.crossword.grid, &self.crossword.words);
        let removed = before - self.domains.total_len();
        self.statistics.removals += removed as u64;

        debug!("Node consistency removed {} candidates, {} remain", removed, self.domains.total_len());
    }

    /// Make slot `x` arc consistent with slot `y`. Returns whether x's domain changed.
    ///
    /// Besides agreeing at the crossing cell, a word in x needs a *different* supporting word in
    /// y, since crossing slots can't hold the same word. See [`arc_consistency::revise`].
    pub fn revise(&mut self, x: SlotId, y: SlotId) -> bool {
        let before = self.domains.len(x);
        let revised = arc_consistency::revise(&self.crossword.grid, &self.crossword.words, &mut self.domains, x, y);
        self.statistics.revisions += 1;
        self.statistics.removals += (before - self.domains.len(x)) as u64;
        revised
    }

    /// Run AC-3 from the given arcs, or from every crossing if `arcs` is `None`.
    pub fn ac3(&mut self, arcs: Option<&[(SlotId, SlotId)]>) -> ArcConsistencyResult {
        let result = arc_consistency::enforce_arc_consistency(
            &self.crossword.grid,
            &self.crossword.words,
            &mut self.domains,
            arcs,
        );

        let (revisions, removals) = match &result {
            Ok(success) => (success.revisions, success.removals),
            Err(failure) => (failure.revisions, failure.removals),
        };
        self.statistics.revisions += revisions as u64;
        self.statistics.removals += removals as u64;

        result
    }

    pub fn assignment_complete(&self, assignment: &Assignment) -> bool {
        assignment.slot_count() == self.crossword.slot_count() && assignment.is_complete()
    }

    pub fn consistent(&self, assignment: &Assignment) -> bool {
        assignment.is_consistent(&self.crossword.grid, &self.crossword.words)
    }

    /// Choose the unassigned slot with the fewest remaining candidates. Ties go to the slot with
    /// the most neighbors, then to the lowest slot id.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<SlotId> {
        assignment.unassigned().min_by_key(|&slot_id| {
            (self.domains.len(slot_id), Reverse(self.crossword.grid.degree(slot_id)), slot_id)
        })
    }

    /// Candidates for `slot_id` that no other slot is using, ordered so that the words ruling out
    /// the fewest options in unassigned neighboring slots come first. Ties keep word list order.
    pub fn order_domain_values(&self, slot_id: SlotId, assignment: &Assignment) -> Vec<WordId> {
        let grid = &self.crossword.grid;
        let words = &self.crossword.words;

        let used: HashSet<WordId> = assignment.iter()
            .filter(|&(other_slot_id, _)| other_slot_id != slot_id)
            .map(|(_, word_id)| word_id)
            .collect();

        // For each unassigned neighbor, how many of its candidates place each letter in the
        // crossing cell?
        struct NeighborLetters {
            slot_id: SlotId,
            cell: usize,
            other_cell: usize,
            letter_counts: HashMap<char, usize>,
        }
        let neighbors: Vec<NeighborLetters> = grid.neighbors(slot_id).iter()
            .filter(|&&neighbor| !assignment.is_assigned(neighbor))
            .filter_map(|&neighbor| {
                let (cell, other_cell) = grid.overlap(slot_id, neighbor)?;
                let mut letter_counts: HashMap<char, usize> = HashMap::new();
                for word_id in self.domains.iter(neighbor) {
                    if let Some(&letter) = words.get(word_id).chars.get(other_cell) {
                        *letter_counts.entry(letter).or_insert(0) += 1;
                    }
                }
                Some(NeighborLetters { slot_id: neighbor, cell, other_cell, letter_counts })
            })
            .collect();

        let mut ranked: Vec<(usize, WordId)> = self.domains.iter(slot_id)
            .filter(|word_id| !used.contains(word_id))
            .map(|word_id| {
                let word = words.get(word_id);
                let eliminated: usize = neighbors.iter().map(|neighbor| {
                    let letter = word.chars.get(neighbor.cell);
                    let compatible = letter
                        .and_then(|letter| neighbor.letter_counts.get(letter))
                        .copied()
                        .unwrap_or(0);
                    // The same word can't go in the neighbor either.
                    let compatible_self = letter.is_some()
                        && self.domains.contains(neighbor.slot_id, word_id)
                        && word.chars.get(neighbor.other_cell) == letter;

                    self.domains.len(neighbor.slot_id) - compatible + usize::from(compatible_self)
                }).sum();

                (eliminated, word_id)
            })
            .collect();

        ranked.sort_unstable();
        ranked.into_iter().map(|(_, word_id)| word_id).collect()
    }

    /// Extend `assignment` to a complete, consistent assignment if one exists within the current
    /// domains. Returns `Ok(None)` when the search space is exhausted, and an error only when a
    /// step or time budget runs out.
    ///
    /// # Panics
    ///
    /// If `assignment` wasn't made for this crossword's slot count.
    pub fn backtrack(&mut self, mut assignment: Assignment) -> Result<Option<Assignment>, FillFailure> {
        assert_eq!(
            assignment.slot_count(),
            self.crossword.slot_count(),
            "assignment covers {} slots but the crossword has {}",
            assignment.slot_count(),
            self.crossword.slot_count(),
        );

        if self.backtrack_impl(&mut assignment)? {
            Ok(Some(assignment))
        } else {
            Ok(None)
        }
    }

    fn backtrack_impl(&mut self, assignment: &mut Assignment) -> Result<bool, FillFailure> {
        if self.assignment_complete(assignment) {
            return Ok(true);
        }

        let slot_id = match self.select_unassigned_variable(assignment) {
            Some(slot_id) => slot_id,
            None => return Ok(false),
        };

        for word_id in self.order_domain_values(slot_id, assignment) {
            self.check_budget()?;
            self.statistics.states += 1;

            assignment.insert(slot_id, word_id);
            trace!(
                "Trying {} in slot {} ({} of {} slots assigned)",
                self.crossword.words.get(word_id).string,
                slot_id,
                assignment.len(),
                assignment.slot_count(),
            );

            if assignment.is_slot_consistent(&self.crossword.grid, &self.crossword.words, slot_id) {
                // Any pruning done while exploring this choice is rolled back together with the
                // choice itself.
                let saved_domains = if self.options.inference {
                    Some(self.domains.clone())
                } else {
                    None
                };

                let viable = saved_domains.is_none() || self.infer(slot_id, word_id, assignment);
                if viable && self.backtrack_impl(assignment)? {
                    return Ok(true);
                }

                if let Some(saved_domains) = saved_domains {
                    self.domains = saved_domains;
                }
            }

            assignment.remove(slot_id);
            self.statistics.backtracks += 1;
        }

        trace!("Slot {} exhausted its candidates, backtracking", slot_id);

        Ok(false)
    }

    /// Narrow the assigned slot to its word and propagate that into its unassigned neighbors.
    fn infer(&mut self, slot_id: SlotId, word_id: WordId, assignment: &Assignment) -> bool {
        if !self.domains.assign_single(slot_id, word_id) {
            return false;
        }

        let arcs: Vec<(SlotId, SlotId)> = self.crossword.grid.neighbors(slot_id).iter()
            .filter(|&&neighbor| !assignment.is_assigned(neighbor))
            .map(|&neighbor| (neighbor, slot_id))
            .collect();

        self.ac3(Some(&arcs)).is_ok()
    }

    fn check_budget(&self) -> Result<(), FillFailure> {
        if let Some(step_limit) = self.options.step_limit {
            if self.statistics.states >= step_limit {
                return Err(FillFailure::StepLimitExceeded { steps: self.statistics.states });
            }
        }

        if let Some(time_limit) = self.options.time_limit {
            let elapsed = self.start.elapsed();
            if elapsed >= time_limit {
                return Err(FillFailure::TimeLimitExceeded { elapsed });
            }
        }

        Ok(())
    }

    /// Enforce node and arc consistency, then search for a fill.
    ///
    /// If pruning empties any slot, this reports `Unsatisfiable` without searching. Domains and
    /// statistics carry over if the same filler is solved again, but `duration` and the time budget
    /// only cover the latest call.
    pub fn solve(&mut self) -> Result<FillSuccess, FillFailure> {
        info!(
            "Filling {} slots from {} words",
            self.crossword.slot_count(),
            self.crossword.words.len(),
        );

        self.start = Instant::now();
        let result = self.solve_impl();
        self.statistics.duration = self.start.elapsed();

        match &result {
            Ok(_) => info!("Found a fill: {:?}", self.statistics),
            Err(failure) => info!("No fill ({}): {:?}", failure, self.statistics),
        }

        result.map(|solution| FillSuccess { statistics: self.statistics.clone(), solution })
    }

    fn solve_impl(&mut self) -> Result<Solution, FillFailure> {
        self.enforce_node_consistency();
        if let Some(slot_id) = self.domains.first_empty() {
            debug!("Slot {} has no words of length {}", slot_id, self.crossword.grid.slot(slot_id).length);
            return Err(FillFailure::Unsatisfiable);
        }

        if self.ac3(None).is_err() {
            return Err(FillFailure::Unsatisfiable);
        }

        match self.backtrack(Assignment::new(self.crossword.slot_count()))? {
            Some(assignment) => Ok(Solution::new(self.crossword, &assignment)?),
            None => Err(FillFailure::Unsatisfiable),
        }
    }
}

/// Search for a valid fill for the given crossword with default options.
pub fn find_fill(crossword: &Crossword) -> Result<FillSuccess, FillFailure> {
    Filler::new(crossword).solve()
}

pub fn find_fill_with_options(crossword: &Crossword, options: FillOptions) -> Result<FillSuccess, FillFailure> {
    Filler::with_options(crossword, options).solve()
}
