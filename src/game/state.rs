use std::collections::{HashSet, VecDeque};

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Board dimensions. Movement wraps around every edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: i32::from(width.max(1)),
            height: i32::from(height.max(1)),
        }
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// One step from `pos` in `direction`, re-entering from the opposite edge
    pub fn step(&self, pos: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(
            (pos.x + dx).rem_euclid(self.width),
            (pos.y + dy).rem_euclid(self.height),
        )
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }
}

/// Outcome of a single snake move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The head moved onto a free cell
    Moved(Position),
    /// The head would have landed on the body; nothing changed
    Collided(Position),
}

/// The snake in the game
///
/// `body` runs tail-first, head-last. `occupied` mirrors it so membership
/// checks stay O(1); both are only mutated together in `advance`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    occupied: HashSet<Position>,
    heading: Direction,
    pending_growth: bool,
    grid: Grid,
}

impl Snake {
    /// A one-cell snake at `head`
    pub fn new(head: Position, heading: Direction, grid: Grid) -> Self {
        Self::from_cells([head], heading, grid)
    }

    /// Builds a snake from cells listed tail-first. Duplicate cells are dropped.
    pub fn from_cells(
        cells: impl IntoIterator<Item = Position>,
        heading: Direction,
        grid: Grid,
    ) -> Self {
        let mut body = VecDeque::new();
        let mut occupied = HashSet::new();
        for cell in cells {
            if occupied.insert(cell) {
                body.push_back(cell);
            }
        }
        if body.is_empty() {
            let center = grid.center();
            body.push_back(center);
            occupied.insert(center);
        }

        Self {
            body,
            occupied,
            heading,
            pending_growth: false,
            grid,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        // body is never empty
        self.body[self.body.len() - 1]
    }

    /// Get the tail position
    #[cfg(test)]
    pub(crate) fn tail(&self) -> Position {
        self.body[0]
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    #[cfg(test)]
    pub(crate) fn has_pending_growth(&self) -> bool {
        self.pending_growth
    }

    /// Body cells from tail to head
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// Check if the snake occupies `pos` (head included)
    pub fn contains(&self, pos: Position) -> bool {
        self.occupied.contains(&pos)
    }

    /// Turn towards `direction` unless that would reverse onto the neck
    pub fn change_direction(&mut self, direction: Direction) {
        if !self.heading.is_opposite(direction) {
            self.heading = direction;
        }
    }

    /// Mark the snake to grow by one cell on its next move
    pub fn grow(&mut self) {
        self.pending_growth = true;
    }

    /// Move one cell along the current heading, wrapping at the edges
    pub fn advance(&mut self) -> Advance {
        let new_head = self.grid.step(self.head(), self.heading);

        // The tail still counts: it has not moved out of the way yet.
        if self.occupied.contains(&new_head) {
            return Advance::Collided(new_head);
        }

        self.body.push_back(new_head);
        self.occupied.insert(new_head);

        if self.pending_growth {
            self.pending_growth = false;
        } else if let Some(tail) = self.body.pop_front() {
            self.occupied.remove(&tail);
        }

        Advance::Moved(new_head)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; kept alongside `len`
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
