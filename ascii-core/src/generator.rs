//! The end-to-end tree renderer.

use crate::{
    config::{Config, GrassConfig},
    error::Result,
    geometry::Polygon,
    ground,
    layer::{Composition, Grid},
    phases::{growth_phase, raster_phase, silhouette_phase, texture_phase},
    shaping::{Preset, Shaping},
    substitution::Phase,
    tree::Tree,
};
use rand::{SeedableRng, rngs::StdRng};

/// Generates ASCII trees from a set of shaping functions.
///
/// Holds the shaping, the texture phases, the configuration and a single
/// random source. Every shaping call, texture replacement and grass cell
/// draws from that source, so a seeded generator reproduces its output.
pub struct AsciiTree {
    shaping: Box<dyn Shaping>,
    phases: Vec<Phase>,
    config: Config,
    rng: StdRng,
}

/// Everything produced by one [`AsciiTree::generate`] call.
#[derive(Debug, Clone)]
pub struct Rendering {
    pub tree: Tree,
    pub silhouette: Polygon,
    /// Raw silhouette raster before texturing.
    pub raster: Grid<char>,
    /// Tree layers first, then any ground layers.
    pub composition: Composition,
}

impl AsciiTree {
    /// ### Errors
    /// [`crate::error::GenerationError::Configuration`] if `config` fails
    /// [`Config::validate`].
    pub fn new(
        shaping: impl Shaping + 'static,
        phases: Vec<Phase>,
        config: Config,
    ) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            shaping: Box::new(shaping),
            phases,
            config,
            rng,
        })
    }

    /// Generator for a named preset; the preset's minimum thickness
    /// replaces the one in `config`.
    pub fn from_preset(preset: Preset, config: Config) -> Result<Self> {
        let config = Config {
            minimum_node_thickness: preset.minimum_node_thickness(),
            ..config
        };
        Self::new(preset.shaping(), preset.phases(), config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Grows, traces, rasterizes and textures a new tree.
    ///
    /// The composition starts with the silhouette mask (the untextured
    /// coverage) paired with the textured raster; grass from
    /// `Config::grass` is pushed after it.
    pub fn generate(&mut self) -> Result<Rendering> {
        let mut tree = Tree::default();
        growth_phase(&mut tree, &*self.shaping, &self.config, &mut self.rng)?;

        let silhouette = silhouette_phase(&tree, &*self.shaping, &mut self.rng);
        let raster = raster_phase(&silhouette, self.config.size)?;
        let mask = raster.coverage();
        let picture = texture_phase(raster.clone(), &self.phases, &mut self.rng);

        let mut composition = Composition::new(self.config.size);
        composition.push_pair(mask, picture)?;

        let mut rendering = Rendering {
            tree,
            silhouette,
            raster,
            composition,
        };
        if let Some(grass) = self.config.grass.clone() {
            self.grass(&mut rendering, &grass)?;
        }
        Ok(rendering)
    }

    /// Pushes a grass layer pair onto an existing rendering, beneath
    /// everything already there.
    pub fn grass(&mut self, rendering: &mut Rendering, cfg: &GrassConfig) -> Result<()> {
        let (mask, layer) = ground::grass(self.config.size, cfg, &mut self.rng)?;
        rendering.composition.push_pair(mask, layer)
    }
}

impl Rendering {
    /// The final character grid.
    pub fn picture(&self) -> Grid<char> {
        self.composition.flatten()
    }

    /// The final picture as text, one line per row.
    pub fn to_text(&self) -> String {
        self.picture().lines().map(|l| l + "\n").collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::layer::{BLANK, Layer};
    use crate::substitution::Rule;
    use rand::RngCore;

    struct ThreeLevels;

    impl Shaping for ThreeLevels {
        fn number_of_children(&self, _t: f64, _rng: &mut dyn RngCore) -> usize {
            1
        }
        fn children_orientation_offsets(&self, _n: usize, _t: f64, _rng: &mut dyn RngCore) -> Vec<f64> {
            vec![0.0]
        }
        fn child_thickness(&self, _n: usize, t: f64, _rng: &mut dyn RngCore) -> f64 {
            t * 0.5
        }
        fn child_distance(&self, _t: f64, _rng: &mut dyn RngCore) -> f64 {
            1.0
        }
        fn silhouette_points_distance(&self, t: f64, _rng: &mut dyn RngCore) -> (f64, f64) {
            (t / 2.0, t / 2.0)
        }
    }

    fn seeded(size: (usize, usize)) -> Config {
        Config {
            size,
            seed: Some(1234),
            ..Config::default()
        }
    }

    #[test]
    fn three_level_stalk_renders() {
        let cfg = Config {
            minimum_node_thickness: 0.2,
            ..seeded((20, 20))
        };
        let mut trees = AsciiTree::new(ThreeLevels, Vec::new(), cfg).unwrap();
        let r = trees.generate().unwrap();

        assert_eq!(r.tree.len(), 4);
        assert_eq!(r.silhouette.len(), 8);
        assert!(r.raster.count_filled() > 0);
        // no phases: the picture is the raw raster
        assert_eq!(r.picture(), r.raster);
    }

    #[test]
    fn invalid_size_fails_before_generation() {
        let err = AsciiTree::new(ThreeLevels, Vec::new(), seeded((0, 20)))
            .err()
            .unwrap();
        assert!(matches!(err, GenerationError::Configuration(_)));
    }

    #[test]
    fn same_seed_same_picture() {
        let mut a = AsciiTree::from_preset(Preset::Oak, seeded((30, 50))).unwrap();
        let mut b = AsciiTree::from_preset(Preset::Oak, seeded((30, 50))).unwrap();
        assert_eq!(a.generate().unwrap().to_text(), b.generate().unwrap().to_text());
    }

    #[test]
    fn oak_produces_a_textured_tree() {
        let mut trees = AsciiTree::from_preset(Preset::Oak, seeded((30, 50))).unwrap();
        assert_eq!(trees.config().minimum_node_thickness, 0.1);

        let r = trees.generate().unwrap();
        assert!(r.tree.len() > 1);
        assert_eq!(r.silhouette.len(), 2 * r.tree.len());

        let picture = r.picture();
        assert_eq!(picture.size(), (30, 50));
        assert!(picture.count_filled() > 0);
        // the outline phase rewrites every boundary star
        assert!(picture.iter().all(|&c| c != '*'));
    }

    #[test]
    fn silhouette_is_drawn_in_front_of_grass() {
        let cfg = Config {
            minimum_node_thickness: 0.2,
            grass: Some(GrassConfig {
                max_height: 40,
                chars: vec!['g'],
                iterations: 0,
            }),
            ..seeded((20, 20))
        };
        let phases = vec![Phase::new(vec![Rule::new("aaaa*aaaa", 'T').unwrap()])];
        let mut trees = AsciiTree::new(ThreeLevels, phases, cfg).unwrap();
        let r = trees.generate().unwrap();

        assert_eq!(r.composition.len(), 4);
        assert!(matches!(r.composition.layers()[0], Layer::Mask(_)));

        let picture = r.picture();
        for row in 0..20 {
            for col in 0..20 {
                let covered_by_tree = r.raster[(row, col)] != BLANK;
                if covered_by_tree {
                    assert_eq!(picture[(row, col)], 'T');
                }
            }
        }
        assert!(picture.iter().any(|&c| c == 'g'));
    }

    #[test]
    fn grass_can_be_added_after_generation() {
        let mut trees = AsciiTree::from_preset(Preset::Shrub, seeded((12, 30))).unwrap();
        let mut r = trees.generate().unwrap();
        assert_eq!(r.composition.len(), 2);

        trees.grass(&mut r, &GrassConfig::default()).unwrap();
        assert_eq!(r.composition.len(), 4);
        assert_eq!(r.to_text().lines().count(), 12);
    }
}
