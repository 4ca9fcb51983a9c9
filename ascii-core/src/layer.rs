//! Character grids, mask/content layers and their composition.
//!
//! A [`Composition`] is an ordered stack of [`Layer`]s. Resolving a cell
//! scans the stack from the first layer pushed to the last:
//!
//! - a [`Layer::Mask`] set at the cell renders the content layer paired
//!   with it and stops;
//! - a [`Layer::Content`] holding a non-blank character renders it and
//!   stops (this is how a stylized layer shows texture that spilled past
//!   its own mask);
//! - if nothing claims the cell it renders blank.
//!
//! Earlier layers win. The generator always pushes the tree silhouette
//! first, so the tree is drawn in front of grass added afterwards.

use crate::error::{GenerationError, Result};
use std::ops::{Index, IndexMut};

/// Character of an empty cell.
pub const BLANK: char = ' ';
/// Character the rasterizer writes for cells inside the silhouette.
pub const FILLED: char = '*';

/// Fixed-size row-major grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Builds a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(row, col));
            }
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Cell at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Cell at a signed offset from `(row, col)`, or `None` outside the grid.
    pub fn get_offset(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<&T> {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        self.get(r, c)
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
        }
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rows && col < self.cols, "cell out of bounds");
        &self.cells[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rows && col < self.cols, "cell out of bounds");
        &mut self.cells[row * self.cols + col]
    }
}

impl Grid<char> {
    pub fn blank(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, BLANK)
    }

    /// Mask marking every non-blank cell.
    pub fn coverage(&self) -> Grid<bool> {
        self.map(|&c| c != BLANK)
    }

    pub fn count_filled(&self) -> usize {
        self.cells.iter().filter(|&&c| c != BLANK).count()
    }

    /// One `String` per row.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.rows).map(|r| self.row(r).iter().collect())
    }

    /// Parses newline-separated rows; short rows are padded with blanks.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
        let cols = lines.iter().map(Vec::len).max().unwrap_or(0);
        Self::from_fn(lines.len(), cols, |r, c| {
            lines[r].get(c).copied().unwrap_or(BLANK)
        })
    }
}

impl Grid<bool> {
    pub fn empty_mask(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, false)
    }
}

/// One entry of a composition stack. The kind is fixed when the layer is
/// pushed, never inspected per cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Mask(Grid<bool>),
    Content(Grid<char>),
}

impl Layer {
    pub fn size(&self) -> (usize, usize) {
        match self {
            Layer::Mask(g) => g.size(),
            Layer::Content(g) => g.size(),
        }
    }
}

/// Ordered layer stack, resolved with first-pushed precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    size: (usize, usize),
    layers: Vec<Layer>,
}

impl Composition {
    pub fn new(size: (usize, usize)) -> Self {
        Self {
            size,
            layers: Vec::with_capacity(4),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn check_size(&self, actual: (usize, usize)) -> Result<()> {
        if actual != self.size {
            return Err(GenerationError::Configuration(format!(
                "layer size {actual:?} does not match composition size {:?}",
                self.size
            )));
        }
        Ok(())
    }

    /// Pushes a mask together with the content it reveals.
    pub fn push_pair(&mut self, mask: Grid<bool>, content: Grid<char>) -> Result<()> {
        self.check_size(mask.size())?;
        self.check_size(content.size())?;
        self.layers.push(Layer::Mask(mask));
        self.layers.push(Layer::Content(content));
        Ok(())
    }

    /// Pushes a content layer without a mask; its non-blank cells render as-is.
    pub fn push_content(&mut self, content: Grid<char>) -> Result<()> {
        self.check_size(content.size())?;
        self.layers.push(Layer::Content(content));
        Ok(())
    }

    /// Visible character at `(row, col)`.
    pub fn resolve(&self, row: usize, col: usize) -> char {
        for (i, layer) in self.layers.iter().enumerate() {
            match layer {
                Layer::Mask(mask) => {
                    if mask.get(row, col) == Some(&true) {
                        // push_pair guarantees a content layer follows every mask
                        if let Some(Layer::Content(content)) = self.layers.get(i + 1) {
                            return content.get(row, col).copied().unwrap_or(BLANK);
                        }
                    }
                }
                Layer::Content(content) => match content.get(row, col) {
                    Some(&c) if c != BLANK => return c,
                    _ => {}
                },
            }
        }
        BLANK
    }

    /// Resolves every cell into a single character grid.
    pub fn flatten(&self) -> Grid<char> {
        let (rows, cols) = self.size;
        Grid::from_fn(rows, cols, |r, c| self.resolve(r, c))
    }
}
