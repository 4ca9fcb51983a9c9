//! Neighbourhood pattern substitution over character grids.
//!
//! Each cell's 3x3 neighbourhood is read as nine characters in row-major
//! order (row above, own row, row below; left to right), with cells past
//! the grid edge read as [`BLANK`]. A [`Rule`] matches when every pattern
//! character is either the [`WILDCARD`] or equal to the neighbourhood
//! character at that position. A [`Phase`] tries its rules in order and
//! commits to the first match; unmatched cells are copied through.
//!
//! Phases run one after another, each reading the complete output of the
//! previous one, so later phases react to texture laid down earlier.

use crate::{
    error::{GenerationError, Result},
    layer::{BLANK, Grid},
};
use rand::{RngCore, seq::IndexedRandom};
use std::fmt;
use std::str::FromStr;

/// Pattern character that matches anything.
pub const WILDCARD: char = 'a';

pub type Neighbourhood = [char; 9];

/// Nine-character neighbourhood template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern([char; 9]);

impl Pattern {
    pub fn matches(&self, neighbourhood: &Neighbourhood) -> bool {
        self.0
            .iter()
            .zip(neighbourhood)
            .all(|(&p, &n)| p == WILDCARD || p == n)
    }
}

impl FromStr for Pattern {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        let cells: [char; 9] =
            chars
                .try_into()
                .map_err(|_| GenerationError::InvalidPattern {
                    pattern: s.to_string(),
                    reason: "expected exactly 9 characters",
                })?;
        Ok(Pattern(cells))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// Produces the character written for a matched cell. Evaluated afresh
/// for every match, so random replacements vary cell to cell.
pub enum Replacement {
    Char(char),
    /// Uniform pick from a non-empty alphabet.
    OneOf(Vec<char>),
    Custom(Box<dyn Fn(&mut dyn RngCore) -> char>),
}

impl Replacement {
    pub fn produce(&self, rng: &mut dyn RngCore) -> char {
        match self {
            Replacement::Char(c) => *c,
            Replacement::OneOf(chars) => chars.choose(rng).copied().unwrap_or(BLANK),
            Replacement::Custom(f) => f(rng),
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Replacement::OneOf(chars) => f.debug_tuple("OneOf").field(chars).finish(),
            Replacement::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<char> for Replacement {
    fn from(c: char) -> Self {
        Replacement::Char(c)
    }
}

#[derive(Debug)]
pub struct Rule {
    pub pattern: Pattern,
    pub replacement: Replacement,
}

impl Rule {
    /// Builds a rule from a nine-character pattern.
    ///
    /// ### Errors
    /// [`GenerationError::InvalidPattern`] if the pattern is not nine
    /// characters long or a [`Replacement::OneOf`] alphabet is empty.
    pub fn new(pattern: &str, replacement: impl Into<Replacement>) -> Result<Self> {
        let replacement = replacement.into();
        if let Replacement::OneOf(chars) = &replacement
            && chars.is_empty()
        {
            return Err(GenerationError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "replacement alphabet is empty",
            });
        }
        Ok(Self {
            pattern: pattern.parse()?,
            replacement,
        })
    }
}

/// Ordered rules applied in one full pass over the grid.
#[derive(Debug, Default)]
pub struct Phase {
    pub rules: Vec<Rule>,
}

impl Phase {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// First rule matching the neighbourhood, if any.
    pub fn find(&self, neighbourhood: &Neighbourhood) -> Option<&Rule> {
        self.rules.iter().find(|r| r.pattern.matches(neighbourhood))
    }
}

/// Reads the 3x3 neighbourhood of `(row, col)`, blank past the edges.
pub fn neighbourhood(grid: &Grid<char>, row: usize, col: usize) -> Neighbourhood {
    let mut out = [BLANK; 9];
    let mut k = 0;
    for dr in -1..=1 {
        for dc in -1..=1 {
            out[k] = grid.get_offset(row, col, dr, dc).copied().unwrap_or(BLANK);
            k += 1;
        }
    }
    out
}

/// Runs one phase over `input`, returning the rewritten grid.
pub fn apply_phase(input: &Grid<char>, phase: &Phase, rng: &mut dyn RngCore) -> Grid<char> {
    let mut replaced = 0usize;
    let output = Grid::from_fn(input.rows(), input.cols(), |row, col| {
        match phase.find(&neighbourhood(input, row, col)) {
            Some(rule) => {
                replaced += 1;
                rule.replacement.produce(&mut *rng)
            }
            None => input[(row, col)],
        }
    });
    tracing::trace!(rules = phase.rules.len(), replaced, "substitution phase applied");
    output
}

/// Runs every phase in order, each on the previous phase's output.
/// No phases leaves the grid unchanged.
pub fn apply_phases(input: Grid<char>, phases: &[Phase], rng: &mut dyn RngCore) -> Grid<char> {
    phases
        .iter()
        .fold(input, |grid, phase| apply_phase(&grid, phase, &mut *rng))
}

fn rules(specs: Vec<(&str, Replacement)>) -> Phase {
    Phase::new(
        specs
            .into_iter()
            .filter_map(|(p, r)| Rule::new(p, r).ok())
            .collect(),
    )
}

/// Foliage fill followed by an outline keyed on which side is open.
pub fn outline_phases() -> Vec<Phase> {
    vec![
        rules(vec![(
            "*********",
            Replacement::OneOf(vec!['@', '&', '%', '#']),
        )]),
        rules(vec![
            ("a aa*aaaa", '^'.into()),
            ("aaa *aaaa", '('.into()),
            ("aaaa* aaa", ')'.into()),
            ("aaaa*aa a", '_'.into()),
            ("aaaa*aaaa", '.'.into()),
        ]),
    ]
}

/// Dense fill with a knobbly rim.
pub fn shrub_phases() -> Vec<Phase> {
    vec![
        rules(vec![(
            "*********",
            Replacement::OneOf(vec!['#', '%', '&']),
        )]),
        rules(vec![(
            "aaaa*aaaa",
            Replacement::OneOf(vec!['o', 'O', '0']),
        )]),
    ]
}
