use crate::error::{GenerationError, Result};
use crate::ground::DEFAULT_SMOOTHING_ITERATIONS;
use serde::{Deserialize, Serialize};

/// Generation parameters shared by every phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output grid size as `(rows, cols)`.
    pub size: (usize, usize),
    /// Branches thinner than this stop growing children.
    pub minimum_node_thickness: f64,
    /// Deepest generation allowed to branch further.
    pub max_depth: usize,
    /// Reject shaping output whose offset count differs from the child count.
    pub enforce_offset_count: bool,
    /// Seed for the generator's random source; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Ground texture added beneath the tree.
    pub grass: Option<GrassConfig>,
}

/// Parameters of the grass layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassConfig {
    /// Upper bound of the seeded column heights.
    pub max_height: u32,
    /// Characters picked at random for grass cells.
    pub chars: Vec<char>,
    /// Smoothing passes over the height profile.
    pub iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: (30, 60),
            minimum_node_thickness: 0.1,
            max_depth: 256,
            enforce_offset_count: false,
            seed: None,
            grass: None,
        }
    }
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            max_height: 3,
            chars: vec![',', '.', '\'', '"'],
            iterations: DEFAULT_SMOOTHING_ITERATIONS,
        }
    }
}

impl Config {
    pub fn rows(&self) -> usize {
        self.size.0
    }

    pub fn cols(&self) -> usize {
        self.size.1
    }

    /// Checks everything that would otherwise fail midway through generation.
    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = self.size;
        if rows == 0 || cols == 0 {
            return Err(GenerationError::Configuration(format!(
                "grid size must be positive, got {rows}x{cols}"
            )));
        }
        if !self.minimum_node_thickness.is_finite() || self.minimum_node_thickness < 0.0 {
            return Err(GenerationError::Configuration(format!(
                "minimum node thickness must be a non-negative number, got {}",
                self.minimum_node_thickness
            )));
        }
        if self.max_depth == 0 {
            return Err(GenerationError::Configuration(
                "max depth must be at least 1".into(),
            ));
        }
        if let Some(grass) = &self.grass {
            grass.validate()?;
        }
        Ok(())
    }
}

impl GrassConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chars.is_empty() {
            return Err(GenerationError::Configuration(
                "grass needs at least one character".into(),
            ));
        }
        Ok(())
    }
}
