//! This module defines the `Tape` struct: a sparse, infinitely extensible
//! single-track memory addressed by integer cell index, with one movable
//! read/write head.

use crate::types::{Direction, BLANK_SYMBOL};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// A sparse, unbounded single-track tape.
///
/// Cells are stored in a map from cell index to symbol; any index not present
/// reads as [`BLANK_SYMBOL`]. Writing the blank symbol to a cell removes it
/// from the map, so blank cells never appear when the tape is enumerated.
/// All operations are total.
#[derive(Debug, Clone, Default)]
pub struct Tape {
    cells: BTreeMap<i64, char>,
    head_position: i64,
    // Distinct non-blank symbols, recomputed on demand after a value-changing write.
    alphabet: RefCell<Option<BTreeSet<char>>>,
}

impl Tape {
    /// Creates an empty tape with the head at cell 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the symbol under the head.
    pub fn read(&self) -> char {
        self.read_at(self.head_position)
    }

    /// Reads the symbol at an arbitrary cell index.
    pub fn read_at(&self, index: i64) -> char {
        self.cells.get(&index).copied().unwrap_or(BLANK_SYMBOL)
    }

    /// Writes a symbol under the head.
    pub fn write(&mut self, symbol: char) {
        self.write_at(self.head_position, symbol);
    }

    /// Writes a symbol at an arbitrary cell index.
    ///
    /// Writing [`BLANK_SYMBOL`] erases the cell. The alphabet cache is only
    /// invalidated when the cell's value actually changes.
    pub fn write_at(&mut self, index: i64, symbol: char) {
        let changed = if symbol == BLANK_SYMBOL {
            self.cells.remove(&index).is_some()
        } else {
            self.cells.insert(index, symbol) != Some(symbol)
        };

        if changed {
            self.alphabet.replace(None);
        }
    }

    /// Moves the head one cell in the given direction. `Stay` is a no-op.
    pub fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.head_position -= 1,
            Direction::Right => self.head_position += 1,
            Direction::Stay => {}
        }
    }

    pub fn move_left(&mut self) {
        self.move_head(Direction::Left);
    }

    pub fn move_right(&mut self) {
        self.move_head(Direction::Right);
    }

    /// Jumps the head to the leftmost populated cell. No-op on an empty tape.
    pub fn move_to_left_most(&mut self) {
        if let Some((&index, _)) = self.cells.iter().next() {
            self.head_position = index;
        }
    }

    /// Jumps the head to the rightmost populated cell. No-op on an empty tape.
    pub fn move_to_right_most(&mut self) {
        if let Some((&index, _)) = self.cells.iter().next_back() {
            self.head_position = index;
        }
    }

    pub fn head_position(&self) -> i64 {
        self.head_position
    }

    pub fn set_head_position(&mut self, index: i64) {
        self.head_position = index;
    }

    /// The set of distinct non-blank symbols currently on the tape.
    ///
    /// Lazily recomputed: the result is cached until a write changes some
    /// cell's value.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.alphabet
            .borrow_mut()
            .get_or_insert_with(|| self.cells.values().copied().collect())
            .clone()
    }

    /// The minimum and maximum populated cell indices, or `(0, 0)` if the
    /// tape is empty.
    pub fn used_range(&self) -> (i64, i64) {
        match (self.cells.keys().next(), self.cells.keys().next_back()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => (0, 0),
        }
    }

    /// The number of populated (non-blank) cells.
    pub fn non_blank_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterates over populated cells in index order.
    pub fn cells(&self) -> impl Iterator<Item = (i64, char)> + '_ {
        self.cells.iter().map(|(&i, &s)| (i, s))
    }

    /// Populates the tape from a string, one symbol per cell starting at
    /// index 0, and rewinds the head to 0. Blank characters erase their cell.
    pub fn load_str(&mut self, content: &str) {
        self.cells.clear();
        self.alphabet.replace(None);
        self.head_position = 0;
        for (i, c) in content.chars().enumerate() {
            self.write_at(i as i64, c);
        }
    }
}
