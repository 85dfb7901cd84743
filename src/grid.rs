use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use smallvec::{smallvec, SmallVec};

use crate::structure::Structure;
use crate::{Direction, GridCoord, SlotId, MAX_SLOT_LENGTH, MIN_SLOT_LENGTH};

/// A crossing between one slot and another, referencing the other slot's id and the location of
/// the intersection within the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// A run of fillable cells in one direction that needs a word.
#[derive(Clone)]
pub struct Slot {
    pub id: SlotId,
    pub start_cell: GridCoord,
    pub direction: Direction,
    pub length: usize,
    pub crossings: SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>,
}

impl Slot {
    /// The `(row, col)` of the cell at position `cell_idx` within this slot.
    pub fn cell(&self, cell_idx: usize) -> GridCoord {
        step(self.start_cell, self.direction, cell_idx)
    }

    /// Generate the coords for each cell of this slot.
    pub fn cell_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(move |cell_idx| self.cell(cell_idx))
    }
}

/// Slots are identified by their geometry; the id and crossings follow from it.
impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.start_cell == other.start_cell
            && self.direction == other.direction
            && self.length == other.length
    }
}

impl Eq for Slot {}

impl Debug for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("id", &self.id)
            .field("start_cell", &self.start_cell)
            .field("direction", &self.direction)
            .field("length", &self.length)
            .finish()
    }
}

fn step((row, col): GridCoord, direction: Direction, offset: usize) -> GridCoord {
    match direction {
        Direction::Across => (row, col + offset),
        Direction::Down => (row + offset, col),
    }
}

/// The static geometry of a crossword: its slots, which of them cross, and where.
///
/// Overlaps are stored sparsely, keyed by the unordered pair of slot ids with the smaller id first,
/// so a grid with many slots doesn't pay for every non-crossing pair.
#[derive(Clone)]
pub struct Grid {
    structure: Structure,
    min_slot_length: usize,
    slots: Vec<Slot>,
    neighbors: Vec<SmallVec<[SlotId; MAX_SLOT_LENGTH]>>,
    overlaps: HashMap<(SlotId, SlotId), (usize, usize)>,
}

impl Grid {
    pub fn new(structure: Structure) -> Grid {
        Grid::with_min_slot_length(structure, MIN_SLOT_LENGTH)
    }

    /// Derive slots from `structure`, ignoring runs shorter than `min_slot_length` (at least 1).
    ///
    /// Cells are scanned row-major, and at each cell an across slot is created before a down slot;
    /// slot ids follow that order.
    pub fn with_min_slot_length(structure: Structure, min_slot_length: usize) -> Grid {
        let min_slot_length = min_slot_length.max(1);
        let mut slots: Vec<Slot> = vec![];

        for row in 0..structure.height() {
            for col in 0..structure.width() {
                if !structure.is_fillable((row, col)) {
                    continue;
                }

                for direction in [Direction::Across, Direction::Down] {
                    let starts_run = match direction {
                        Direction::Across => col == 0 || !structure.is_fillable((row, col - 1)),
                        Direction::Down => row == 0 || !structure.is_fillable((row - 1, col)),
                    };
                    if !starts_run {
                        continue;
                    }

                    let length = (0..)
                        .take_while(|&offset| structure.is_fillable(step((row, col), direction, offset)))
                        .count();

                    if length >= min_slot_length {
                        slots.push(Slot {
                            id: slots.len(),
                            start_cell: (row, col),
                            direction,
                            length,
                            crossings: smallvec![],
                        });
                    }
                }
            }
        }

        // Build a map from cell location to (slot id, cell index within slot), which we can then
        // use to calculate crossings.
        let mut slots_by_cell: HashMap<GridCoord, SmallVec<[(SlotId, usize); 2]>> = HashMap::new();
        for slot in &slots {
            for (cell_idx, loc) in slot.cell_coords().enumerate() {
                slots_by_cell.entry(loc).or_default().push((slot.id, cell_idx));
            }
        }

        let mut neighbors: Vec<SmallVec<[SlotId; MAX_SLOT_LENGTH]>> =
            slots.iter().map(|_| smallvec![]).collect();
        let mut overlaps: HashMap<(SlotId, SlotId), (usize, usize)> = HashMap::new();

        for slot in &mut slots {
            slot.crossings = (0..slot.length).map(|cell_idx| {
                slots_by_cell[&step(slot.start_cell, slot.direction, cell_idx)]
                    .iter()
                    .find(|&&(other_slot_id, _)| other_slot_id != slot.id)
                    .map(|&(other_slot_id, other_slot_cell)| Crossing { other_slot_id, other_slot_cell })
            }).collect();

            for (cell_idx, crossing) in slot.crossings.iter().enumerate() {
                if let Some(crossing) = crossing {
                    neighbors[slot.id].push(crossing.other_slot_id);
                    if slot.id < crossing.other_slot_id {
                        overlaps.insert(
                            (slot.id, crossing.other_slot_id),
                            (cell_idx, crossing.other_slot_cell),
                        );
                    }
                }
            }
        }

        for slot_neighbors in &mut neighbors {
            slot_neighbors.sort_unstable();
        }

        Grid { structure, min_slot_length, slots, neighbors, overlaps }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn min_slot_length(&self) -> usize {
        self.min_slot_length
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        &self.slots[slot_id]
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slots sharing a cell with `slot_id`, in ascending id order.
    pub fn neighbors(&self, slot_id: SlotId) -> &[SlotId] {
        &self.neighbors[slot_id]
    }

    pub fn degree(&self, slot_id: SlotId) -> usize {
        self.neighbors[slot_id].len()
    }

    /// If `x` and `y` cross, return `(k, l)` such that character `k` of x's word must equal
    /// character `l` of y's word. Non-crossing pairs (including a slot with itself) give `None`.
    pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<(usize, usize)> {
        if x < y {
            self.overlaps.get(&(x, y)).copied()
        } else {
            self.overlaps.get(&(y, x)).map(|&(l, k)| (k, l))
        }
    }

    /// Every ordered pair of distinct slots that cross, in ascending order.
    pub fn arcs(&self) -> impl Iterator<Item = (SlotId, SlotId)> + '_ {
        self.slots.iter().flat_map(move |slot| {
            self.neighbors(slot.id).iter().map(move |&other_slot_id| (slot.id, other_slot_id))
        })
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.structure.width())
            .field("height", &self.structure.height())
            .field("slots", &self.slots)
            .field("overlaps", &format_args!("({} entries)", self.overlaps.len()))
            .finish()
    }
}
