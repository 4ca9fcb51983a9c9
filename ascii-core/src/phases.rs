//! High-level generation phases for the tree renderer.
//!
//! A rendering runs these in order:
//! 1. [`growth_phase`]: unfolds the branch structure from the root using
//!    the caller's [`Shaping`] functions.
//! 2. [`silhouette_phase`]: walks the tree depth-first into an outline
//!    polygon.
//! 3. [`raster_phase`]: fills a character grid with the cells whose
//!    normalized coordinates fall inside the outline.
//! 4. [`texture_phase`]: rewrites the raster with the substitution phases.

use crate::{
    config::Config,
    error::{GenerationError, Result},
    geometry::{Point, Polygon, bounds},
    layer::{BLANK, FILLED, Grid},
    shaping::Shaping,
    substitution::{Phase, apply_phases},
    tree::Tree,
    types::NodeId,
};
use rand::RngCore;
use std::f64::consts::FRAC_PI_2;

/// Grows the whole tree below its root.
///
/// For a node at least `cfg.minimum_node_thickness` thick:
///
/// 1. Ask the shaping for the child count and the orientation offsets.
/// 2. For every offset, in order, ask for the child's thickness and
///    distance, place the child at
///    `parent.position.moved(distance, parent.orientation + offset)`
///    with orientation `parent.orientation + offset`, and grow it fully
///    before moving on to the next offset.
///
/// Thinner nodes are leaves. The offsets sequence decides how many
/// children are grown; a length different from the child count is only
/// an error when `cfg.enforce_offset_count` is set.
///
/// ### Parameters
/// - `tree` - Tree whose root is already in place; children are appended.
/// - `shaping` - The five shaping functions.
/// - `cfg` - Minimum thickness, depth limit and contract strictness.
/// - `rng` - Random source handed to every shaping call.
///
/// ### Errors
/// - [`GenerationError::RecursionLimit`] if a node at `cfg.max_depth`
///   would still branch.
/// - [`GenerationError::ShapeContractViolation`] in strict mode.
pub fn growth_phase(
    tree: &mut Tree,
    shaping: &dyn Shaping,
    cfg: &Config,
    rng: &mut dyn RngCore,
) -> Result<()> {
    grow(tree, Tree::ROOT, shaping, cfg, rng)?;
    tracing::debug!(
        nodes = tree.len(),
        leaves = tree.leaf_count(),
        height = tree.height(),
        "branches grown"
    );
    Ok(())
}

fn grow(
    tree: &mut Tree,
    id: NodeId,
    shaping: &dyn Shaping,
    cfg: &Config,
    rng: &mut dyn RngCore,
) -> Result<()> {
    let (position, thickness, orientation, depth) = {
        let n = &tree.nodes[id];
        (n.position, n.thickness, n.orientation, n.depth)
    };

    // Leaf: branch too thin to split further.
    if thickness < cfg.minimum_node_thickness {
        return Ok(());
    }
    if depth >= cfg.max_depth {
        return Err(GenerationError::RecursionLimit {
            limit: cfg.max_depth,
        });
    }

    let count = shaping.number_of_children(thickness, rng);
    let offsets = shaping.children_orientation_offsets(count, thickness, rng);

    if offsets.len() != count {
        if cfg.enforce_offset_count {
            return Err(GenerationError::ShapeContractViolation {
                depth,
                expected: count,
                actual: offsets.len(),
            });
        }
        tracing::debug!(
            depth,
            expected = count,
            actual = offsets.len(),
            "offset count differs from child count; growing one child per offset"
        );
    }

    for offset in offsets {
        let child_thickness = shaping.child_thickness(count, thickness, rng);
        let distance = shaping.child_distance(thickness, rng);
        let child_orientation = orientation + offset;

        let child = tree.add_child(
            id,
            position.moved(distance, child_orientation),
            child_thickness,
            child_orientation,
        );
        grow(tree, child, shaping, cfg, rng)?;
    }

    Ok(())
}

/// Traces the outline of the tree as a polygon.
///
/// Depth-first from the root: each node contributes a left point at
/// `orientation + pi/2`, then the points of all its children in order,
/// then a right point at `orientation - pi/2`, using the offsets from
/// [`Shaping::silhouette_points_distance`]. The result always holds two
/// points per node. It only traces a clean outline when the shaping lays
/// children out in angular order.
pub fn silhouette_phase(tree: &Tree, shaping: &dyn Shaping, rng: &mut dyn RngCore) -> Polygon {
    let mut silhouette = Vec::with_capacity(tree.len() * 2);
    if !tree.is_empty() {
        trace(tree, Tree::ROOT, shaping, rng, &mut silhouette);
    }
    tracing::debug!(points = silhouette.len(), "silhouette traced");
    silhouette
}

fn trace(
    tree: &Tree,
    id: NodeId,
    shaping: &dyn Shaping,
    rng: &mut dyn RngCore,
    out: &mut Polygon,
) {
    let node = &tree.nodes[id];
    let (left, right) = shaping.silhouette_points_distance(node.thickness, rng);

    out.push(node.position.moved(left, node.orientation + FRAC_PI_2));
    for &child in &node.children {
        trace(tree, child, shaping, rng, out);
    }
    out.push(node.position.moved(right, node.orientation - FRAC_PI_2));
}

/// Rasterizes the silhouette onto a `size = (rows, cols)` grid.
///
/// The silhouette's bounding box is stretched over the grid: cell
/// `(x, y)` samples the tree-space point
/// `((x / rows) * x_range + x_min, (y / cols) * y_range + y_min)` and is
/// set to [`FILLED`] when that point lies inside the silhouette. Rows
/// follow tree x, columns follow tree y.
///
/// ### Errors
/// - [`GenerationError::Configuration`] for a zero dimension.
/// - [`GenerationError::EmptySilhouette`] for an empty polygon.
/// - [`GenerationError::InvalidGeometry`] if any point is not finite.
pub fn raster_phase(silhouette: &[Point], size: (usize, usize)) -> Result<Grid<char>> {
    let (rows, cols) = size;
    if rows == 0 || cols == 0 {
        return Err(GenerationError::Configuration(format!(
            "grid size must be positive, got {rows}x{cols}"
        )));
    }
    if let Some(p) = silhouette.iter().find(|p| !p.is_finite()) {
        return Err(GenerationError::InvalidGeometry(format!(
            "silhouette point {p} is not finite"
        )));
    }
    let (min, max) = bounds(silhouette).ok_or(GenerationError::EmptySilhouette)?;
    let x_range = max.x - min.x;
    let y_range = max.y - min.y;

    let picture = Grid::from_fn(rows, cols, |x, y| {
        let adjusted_x = (x as f64 / rows as f64) * x_range + min.x;
        let adjusted_y = (y as f64 / cols as f64) * y_range + min.y;

        if Point::new(adjusted_x, adjusted_y).is_within_polygon(silhouette) {
            FILLED
        } else {
            BLANK
        }
    });

    tracing::debug!(rows, cols, covered = picture.count_filled(), "silhouette rasterized");
    Ok(picture)
}

/// Applies the texture phases to a raster.
pub fn texture_phase(raster: Grid<char>, phases: &[Phase], rng: &mut dyn RngCore) -> Grid<char> {
    apply_phases(raster, phases, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::BranchNode;
    use rand::{SeedableRng, rngs::StdRng};
    use std::f64::consts::PI;

    /// One child per node, halving thickness, unit distance, half-thickness outline.
    struct Stalk;

    impl Shaping for Stalk {
        fn number_of_children(&self, _t: f64, _rng: &mut dyn RngCore) -> usize {
            1
        }
        fn children_orientation_offsets(&self, n: usize, _t: f64, _rng: &mut dyn RngCore) -> Vec<f64> {
            vec![0.0; n]
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

    /// Forks in two and asks for three offsets; thickness never shrinks.
    struct Liar;

    impl Shaping for Liar {
        fn number_of_children(&self, _t: f64, _rng: &mut dyn RngCore) -> usize {
            2
        }
        fn children_orientation_offsets(&self, _n: usize, _t: f64, _rng: &mut dyn RngCore) -> Vec<f64> {
            vec![-0.5, 0.0, 0.5]
        }
        fn child_thickness(&self, _n: usize, t: f64, _rng: &mut dyn RngCore) -> f64 {
            t * 0.4
        }
        fn child_distance(&self, _t: f64, _rng: &mut dyn RngCore) -> f64 {
            1.0
        }
        fn silhouette_points_distance(&self, t: f64, _rng: &mut dyn RngCore) -> (f64, f64) {
            (t, t)
        }
    }

    struct Immortal;

    impl Shaping for Immortal {
        fn number_of_children(&self, _t: f64, _rng: &mut dyn RngCore) -> usize {
            1
        }
        fn children_orientation_offsets(&self, _n: usize, _t: f64, _rng: &mut dyn RngCore) -> Vec<f64> {
            vec![0.0]
        }
        fn child_thickness(&self, _n: usize, t: f64, _rng: &mut dyn RngCore) -> f64 {
            t
        }
        fn child_distance(&self, _t: f64, _rng: &mut dyn RngCore) -> f64 {
            1.0
        }
        fn silhouette_points_distance(&self, _t: f64, _rng: &mut dyn RngCore) -> (f64, f64) {
            (1.0, 1.0)
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    fn cfg(min: f64) -> Config {
        Config {
            minimum_node_thickness: min,
            ..Config::default()
        }
    }

    #[test]
    fn growth_stops_below_minimum_thickness() {
        let mut tree = Tree::default();
        growth_phase(&mut tree, &Stalk, &cfg(0.2), &mut rng()).unwrap();

        // 1.0 -> 0.5 -> 0.25 -> 0.125 (leaf)
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.height(), 3);
        let tip = &tree.nodes[3];
        assert_eq!(tip.thickness, 0.125);
        assert!(tip.is_leaf());
        assert!((tip.position.x + 3.0).abs() < 1e-12);
        assert!(tip.position.y.abs() < 1e-12);
        assert_eq!(tip.orientation, PI);
    }

    #[test]
    fn thin_root_stays_alone() {
        let mut tree = Tree::default();
        growth_phase(&mut tree, &Stalk, &cfg(2.0), &mut rng()).unwrap();
        assert_eq!(tree.len(), 1);

        let silhouette = silhouette_phase(&tree, &Stalk, &mut rng());
        assert_eq!(silhouette.len(), 2);
    }

    #[test]
    fn silhouette_has_two_points_per_node() {
        let mut tree = Tree::default();
        growth_phase(&mut tree, &Liar, &cfg(0.1), &mut rng()).unwrap();
        let silhouette = silhouette_phase(&tree, &Liar, &mut rng());
        assert_eq!(silhouette.len(), 2 * tree.len());
    }

    #[test]
    fn silhouette_is_left_children_right() {
        let mut tree = Tree::default();
        growth_phase(&mut tree, &Stalk, &cfg(0.6), &mut rng()).unwrap();
        assert_eq!(tree.len(), 2);

        let s = silhouette_phase(&tree, &Stalk, &mut rng());
        // root faces -x, so its left side is -y and its right side is +y
        assert!((s[0].y + 0.5).abs() < 1e-12);
        assert!((s[1].y + 0.25).abs() < 1e-12);
        assert!((s[2].y - 0.25).abs() < 1e-12);
        assert!((s[3].y - 0.5).abs() < 1e-12);
        assert!((s[1].x + 1.0).abs() < 1e-12);
    }

    #[test]
    fn permissive_mode_grows_one_child_per_offset() {
        let mut tree = Tree::default();
        growth_phase(&mut tree, &Liar, &cfg(0.5), &mut rng()).unwrap();
        assert_eq!(tree.root().children.len(), 3);
    }

    #[test]
    fn strict_mode_rejects_offset_mismatch() {
        let mut tree = Tree::default();
        let strict = Config {
            enforce_offset_count: true,
            ..cfg(0.5)
        };
        let err = growth_phase(&mut tree, &Liar, &strict, &mut rng()).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::ShapeContractViolation {
                depth: 0,
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn non_shrinking_thickness_hits_depth_limit() {
        let mut tree = Tree::default();
        let limited = Config {
            max_depth: 16,
            ..cfg(0.5)
        };
        let err = growth_phase(&mut tree, &Immortal, &limited, &mut rng()).unwrap_err();
        assert!(matches!(err, GenerationError::RecursionLimit { limit: 16 }));
    }

    #[test]
    fn raster_marks_stalk_interior() {
        let mut tree = Tree::default();
        growth_phase(&mut tree, &Stalk, &cfg(0.2), &mut rng()).unwrap();
        let silhouette = silhouette_phase(&tree, &Stalk, &mut rng());
        let raster = raster_phase(&silhouette, (20, 20)).unwrap();

        // x spans [-3, 0] over rows, y spans [-0.5, 0.5] over columns
        assert_eq!(raster[(15, 10)], FILLED);
        assert_eq!(raster[(0, 0)], BLANK);
        assert!(raster.count_filled() > 0);
    }

    #[test]
    fn raster_is_idempotent() {
        let mut tree = Tree::new(BranchNode::default());
        growth_phase(&mut tree, &Liar, &cfg(0.1), &mut rng()).unwrap();
        let silhouette = silhouette_phase(&tree, &Liar, &mut rng());
        let a = raster_phase(&silhouette, (24, 40)).unwrap();
        let b = raster_phase(&silhouette, (24, 40)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn raster_rejects_bad_input() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        assert!(matches!(
            raster_phase(&square, (0, 5)),
            Err(GenerationError::Configuration(_))
        ));
        assert!(matches!(
            raster_phase(&[], (5, 5)),
            Err(GenerationError::EmptySilhouette)
        ));
        let mut broken = square.clone();
        broken[2].x = f64::INFINITY;
        assert!(matches!(
            raster_phase(&broken, (5, 5)),
            Err(GenerationError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn raster_fills_square_interior() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        let raster = raster_phase(&square, (4, 4)).unwrap();
        // samples land on 0..=3 on both axes; row x = 0 lies on the edge
        // x = 0, which is not strictly left of it
        assert_eq!(raster.lines().collect::<Vec<_>>(), vec!["    ", "****", "****", "****"]);
    }
}
