//! Ground texture: a smoothed random height profile and the grass layer
//! built on top of it.

use crate::{
    config::GrassConfig,
    error::Result,
    layer::{BLANK, Grid},
};
use rand::{Rng, RngCore, seq::IndexedRandom};

pub const DEFAULT_SMOOTHING_ITERATIONS: usize = 10;

/// Random height profile brought closer together by repeated averaging.
///
/// Seeds `length` integers uniformly from `0..=maximum`, then runs
/// `iterations` passes in which every value becomes the mean of itself
/// and its two predecessors. Indices wrap, so column 0 averages with the
/// last two columns. Each pass reads only the previous pass.
pub fn get_wave(length: usize, maximum: u32, iterations: usize, rng: &mut dyn RngCore) -> Vec<f64> {
    let mut wave: Vec<f64> = (0..length)
        .map(|_| f64::from(rng.random_range(0..=maximum)))
        .collect();

    let n = length as isize;
    for _ in 0..iterations {
        let at = |i: isize| wave[i.rem_euclid(n) as usize];
        let smoothed: Vec<f64> = (0..n).map(|i| (at(i - 2) + at(i - 1) + at(i)) / 3.0).collect();
        wave = smoothed;
    }

    wave
}

/// Builds the grass mask and content for a grid of `size`.
///
/// Column `c` is covered from the bottom row upward for
/// `heights[c]` rows (truncated, capped at the grid height); each covered
/// cell gets a character picked at random from `chars`.
pub fn grass_layers(
    size: (usize, usize),
    heights: &[f64],
    chars: &[char],
    rng: &mut dyn RngCore,
) -> (Grid<bool>, Grid<char>) {
    let (rows, cols) = size;
    let mut mask = Grid::empty_mask(rows, cols);
    let mut layer = Grid::blank(rows, cols);

    for (col, &height) in heights.iter().enumerate().take(cols) {
        let height = (height.max(0.0) as usize).min(rows);
        for k in 0..height {
            let row = rows - 1 - k;
            layer.set(row, col, chars.choose(rng).copied().unwrap_or(BLANK));
            mask.set(row, col, true);
        }
    }

    (mask, layer)
}

/// Generates a fresh height profile and the grass layers for it.
pub fn grass(
    size: (usize, usize),
    cfg: &GrassConfig,
    rng: &mut dyn RngCore,
) -> Result<(Grid<bool>, Grid<char>)> {
    cfg.validate()?;
    let heights = get_wave(size.1, cfg.max_height, cfg.iterations, rng);
    Ok(grass_layers(size, &heights, &cfg.chars, rng))
}
