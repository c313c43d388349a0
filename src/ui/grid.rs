//! Screen geometry of the clue grid.
//!
//! Drawing and mouse hit-testing both go through [`GridLayout`], so a click
//! always maps back to the cell that was drawn under it.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use std::iter;

use crate::game::board::{CATEGORY_COUNT, CLUES_PER_CATEGORY};

/// Rows given to the category title strip
pub const HEADER_HEIGHT: u16 = 3;

#[derive(Debug, Clone)]
pub struct GridLayout {
    headers: Vec<Rect>,
    // cells[clue][category]
    cells: Vec<Vec<Rect>>,
}

impl GridLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                iter::once(Constraint::Length(HEADER_HEIGHT)).chain(
                    (0..CLUES_PER_CATEGORY).map(|_| Constraint::Ratio(1, CLUES_PER_CATEGORY as u32)),
                ),
            )
            .split(area);

        let columns = |row: Rect| -> Vec<Rect> {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints((0..CATEGORY_COUNT).map(|_| Constraint::Ratio(1, CATEGORY_COUNT as u32)))
                .split(row)
                .to_vec()
        };

        Self {
            headers: columns(rows[0]),
            cells: rows[1..].iter().map(|&row| columns(row)).collect(),
        }
    }

    pub fn header(&self, category: usize) -> Option<Rect> {
        self.headers.get(category).copied()
    }

    pub fn cell(&self, category: usize, clue: usize) -> Option<Rect> {
        self.cells.get(clue)?.get(category).copied()
    }

    /// `(category, clue)` of the cell under a terminal position
    pub fn hit_test(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        let position = Position::new(column, row);
        self.cells.iter().enumerate().find_map(|(clue, rects)| {
            rects
                .iter()
                .position(|rect| rect.contains(position))
                .map(|category| (category, clue))
        })
    }
}
