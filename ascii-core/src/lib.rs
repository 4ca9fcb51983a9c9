//! Procedural ASCII-art tree generation library.
//!
//! Main components:
//! - [`geometry`]: points and the ray-casting containment test.
//! - [`tree`]: branch nodes stored in an index arena.
//! - [`shaping`]: the shaping functions that drive branching, and presets.
//! - [`config`]: generation and grass configuration.
//! - [`phases`]: growth, silhouette, raster and texture phases.
//! - [`substitution`]: 3x3 neighbourhood pattern rewriting.
//! - [`layer`]: character grids, mask/content layers and composition.
//! - [`ground`]: smoothed height profiles and the grass layer.
//! - [`generator`]: [`AsciiTree`], which runs the phases end to end.
//! - [`export`]: plain-text output.
//! - [`error`]: the crate error type.
//! - [`types`]: shared type aliases and IDs.

pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod geometry;
pub mod ground;
pub mod layer;
pub mod phases;
pub mod shaping;
pub mod substitution;
pub mod tree;
pub mod types;

pub use config::{Config, GrassConfig};
pub use error::{GenerationError, Result};
pub use generator::{AsciiTree, Rendering};
pub use shaping::{Preset, Shaping};
