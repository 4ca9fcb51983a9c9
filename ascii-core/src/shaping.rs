//! Shaping functions that decide how a tree branches, and the named
//! presets built from them.

use crate::substitution::{Phase, outline_phases, shrub_phases};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// The five operations that drive branch generation.
///
/// Every call receives the generator's random source; implementations
/// should draw all randomness from it so that a fixed seed reproduces the
/// same tree. Implementations are expected to shrink thickness on every
/// generation, otherwise growth only stops at `Config::max_depth`.
pub trait Shaping {
    /// Number of children grown from a node of the given thickness.
    fn number_of_children(&self, thickness: f64, rng: &mut dyn RngCore) -> usize;

    /// Angular offsets of the children relative to the parent's orientation.
    ///
    /// One child is grown per returned offset. The sequence is expected to
    /// hold `count` entries; see `Config::enforce_offset_count`.
    fn children_orientation_offsets(
        &self,
        count: usize,
        thickness: f64,
        rng: &mut dyn RngCore,
    ) -> Vec<f64>;

    /// Thickness of each child of a node with `count` children.
    fn child_thickness(&self, count: usize, thickness: f64, rng: &mut dyn RngCore) -> f64;

    /// Distance from a node to each of its children.
    fn child_distance(&self, thickness: f64, rng: &mut dyn RngCore) -> f64;

    /// Left and right offsets of the silhouette from the branch centreline.
    fn silhouette_points_distance(&self, thickness: f64, rng: &mut dyn RngCore) -> (f64, f64);
}

impl<S: Shaping + ?Sized> Shaping for Box<S> {
    fn number_of_children(&self, thickness: f64, rng: &mut dyn RngCore) -> usize {
        (**self).number_of_children(thickness, rng)
    }

    fn children_orientation_offsets(
        &self,
        count: usize,
        thickness: f64,
        rng: &mut dyn RngCore,
    ) -> Vec<f64> {
        (**self).children_orientation_offsets(count, thickness, rng)
    }

    fn child_thickness(&self, count: usize, thickness: f64, rng: &mut dyn RngCore) -> f64 {
        (**self).child_thickness(count, thickness, rng)
    }

    fn child_distance(&self, thickness: f64, rng: &mut dyn RngCore) -> f64 {
        (**self).child_distance(thickness, rng)
    }

    fn silhouette_points_distance(&self, thickness: f64, rng: &mut dyn RngCore) -> (f64, f64) {
        (**self).silhouette_points_distance(thickness, rng)
    }
}

/// Offsets spread evenly across `[-spread, spread]`, starting from `+spread`.
/// A single child (or none) grows straight ahead.
fn fan(count: usize, spread: f64) -> Vec<f64> {
    if count <= 1 {
        return vec![0.0];
    }
    let step = spread * 2.0 / (count - 1) as f64;
    (0..count).map(|i| spread - step * i as f64).collect()
}

/// Broad, sparse crown; the classic profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oak;

impl Shaping for Oak {
    fn number_of_children(&self, thickness: f64, _rng: &mut dyn RngCore) -> usize {
        (1.7 / thickness) as usize
    }

    fn children_orientation_offsets(
        &self,
        count: usize,
        _thickness: f64,
        _rng: &mut dyn RngCore,
    ) -> Vec<f64> {
        fan(count, PI / 5.0)
    }

    fn child_thickness(&self, _count: usize, thickness: f64, rng: &mut dyn RngCore) -> f64 {
        thickness * rng.random_range(0.55..0.7)
    }

    fn child_distance(&self, thickness: f64, rng: &mut dyn RngCore) -> f64 {
        thickness * rng.random_range(0.5..1.0)
    }

    fn silhouette_points_distance(&self, thickness: f64, rng: &mut dyn RngCore) -> (f64, f64) {
        (
            thickness / 2.0 * rng.random_range(0.6..0.8),
            thickness / 2.0 * rng.random_range(0.6..0.8),
        )
    }
}

/// Dense, low bush that forks three ways while thick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shrub;

impl Shaping for Shrub {
    fn number_of_children(&self, thickness: f64, _rng: &mut dyn RngCore) -> usize {
        if thickness > 0.3 { 3 } else { 2 }
    }

    fn children_orientation_offsets(
        &self,
        count: usize,
        _thickness: f64,
        rng: &mut dyn RngCore,
    ) -> Vec<f64> {
        let jitter = rng.random_range(-0.1..0.1);
        fan(count, PI / 3.0).into_iter().map(|o| o + jitter).collect()
    }

    fn child_thickness(&self, _count: usize, thickness: f64, rng: &mut dyn RngCore) -> f64 {
        thickness * rng.random_range(0.45..0.6)
    }

    fn child_distance(&self, thickness: f64, rng: &mut dyn RngCore) -> f64 {
        thickness * rng.random_range(0.3..0.5)
    }

    fn silhouette_points_distance(&self, thickness: f64, rng: &mut dyn RngCore) -> (f64, f64) {
        (
            thickness / 2.0 * rng.random_range(0.7..0.9),
            thickness / 2.0 * rng.random_range(0.7..0.9),
        )
    }
}

/// Named shaping profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Oak,
    Shrub,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Oak, Preset::Shrub];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Oak => "oak",
            Preset::Shrub => "shrub",
        }
    }

    pub fn shaping(&self) -> Box<dyn Shaping> {
        match self {
            Preset::Oak => Box::new(Oak),
            Preset::Shrub => Box::new(Shrub),
        }
    }

    /// Thickness below which the preset stops branching.
    pub fn minimum_node_thickness(&self) -> f64 {
        match self {
            Preset::Oak => 0.1,
            Preset::Shrub => 0.08,
        }
    }

    /// Texture phases applied to the preset's raster.
    pub fn phases(&self) -> Vec<Phase> {
        match self {
            Preset::Oak => outline_phases(),
            Preset::Shrub => shrub_phases(),
        }
    }

    /// All preset names joined with `" / "`, for prompts and help text.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(Preset::name)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| format!("unknown preset {s:?}, expected one of {}", Self::names()))
    }
}
