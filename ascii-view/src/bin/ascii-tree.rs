//! Command-line ASCII tree generator.
//!
//! Grows a tree from a named preset, writes it to a text file and echoes
//! it to the terminal. A preset or size not given on the command line is
//! asked for on stdin.
//!
//! ## Usage
//!
//! ```text
//! ascii-tree --preset oak --size 30,60 --seed 7 --grass
//! ascii-tree --config tree.json --output out.txt --quiet
//! ascii-tree            # prompts for preset and size
//! ```

use anyhow::{Context, Result, bail};
use ascii_core::{AsciiTree, Config, GrassConfig, Preset, export};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ascii-tree", about = "Generate an ASCII-art tree")]
struct Args {
    /// Tree kind (oak / shrub).
    #[arg(long)]
    preset: Option<Preset>,

    /// Output size as `rows,cols`.
    #[arg(long, value_parser = parse_size)]
    size: Option<(usize, usize)>,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Add a grass layer at the bottom.
    #[arg(long)]
    grass: bool,

    /// Maximum grass height (implies --grass).
    #[arg(long)]
    grass_height: Option<u32>,

    /// JSON file with a `Config`; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file; defaults to `trees/tree-<unix seconds>.txt`.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Do not echo the tree to the terminal.
    #[arg(long, short)]
    quiet: bool,
}

/// Parses `"rows, cols"`.
fn parse_size(s: &str) -> Result<(usize, usize), String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [rows, cols] = parts.as_slice() else {
        return Err(format!("expected 'rows, cols', got {s:?}"));
    };
    let rows = rows
        .parse()
        .map_err(|e| format!("invalid row count {rows:?}: {e}"))?;
    let cols = cols
        .parse()
        .map_err(|e| format!("invalid column count {cols:?}: {e}"))?;
    Ok((rows, cols))
}

fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("no input for {message:?}");
    }
    Ok(line.trim().to_string())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ascii_core=info,ascii_view=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut cfg = load_config(args.config.as_ref())?;
    let mut stdin = io::stdin().lock();

    let preset = match args.preset {
        Some(p) => p,
        None => prompt(&mut stdin, &format!("Select tree kind ({}): ", Preset::names()))?
            .parse()
            .map_err(anyhow::Error::msg)?,
    };

    if let Some(size) = args.size {
        cfg.size = size;
    } else if args.config.is_none() {
        let answer = prompt(&mut stdin, "Select output size in the form 'rows, cols': ")?;
        cfg.size = parse_size(&answer).map_err(anyhow::Error::msg)?;
    }

    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if args.grass || args.grass_height.is_some() {
        let mut grass = cfg.grass.take().unwrap_or_else(GrassConfig::default);
        if let Some(h) = args.grass_height {
            grass.max_height = h;
        }
        cfg.grass = Some(grass);
    }

    tracing::info!(preset = %preset, rows = cfg.rows(), cols = cfg.cols(), seed = ?cfg.seed, "generating tree");

    let rendering = AsciiTree::from_preset(preset, cfg)?
        .generate()
        .context("tree generation failed")?;
    let path = export::export(&rendering.picture(), args.output.as_deref(), !args.quiet)?;

    tracing::info!(path = %path.display(), nodes = rendering.tree.len(), "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_accepts_spaces() {
        assert_eq!(parse_size("30, 60"), Ok((30, 60)));
        assert_eq!(parse_size("4,5"), Ok((4, 5)));
    }

    #[test]
    fn size_rejects_malformed_input() {
        assert!(parse_size("30").is_err());
        assert!(parse_size("1,2,3").is_err());
        assert!(parse_size("-1, 4").is_err());
        assert!(parse_size("a, b").is_err());
    }

    #[test]
    fn prompt_reads_one_trimmed_line() {
        let mut input = io::Cursor::new("  oak \n20, 40\n");
        assert_eq!(prompt(&mut input, "").unwrap(), "oak");
        assert_eq!(prompt(&mut input, "").unwrap(), "20, 40");
        assert!(prompt(&mut input, "").is_err());
    }

    #[test]
    fn args_parse_flags() {
        let args = Args::try_parse_from([
            "ascii-tree",
            "--preset",
            "shrub",
            "--size",
            "10,20",
            "--seed",
            "3",
            "--grass-height",
            "4",
            "-q",
        ])
        .unwrap();
        assert_eq!(args.preset, Some(Preset::Shrub));
        assert_eq!(args.size, Some((10, 20)));
        assert_eq!(args.seed, Some(3));
        assert_eq!(args.grass_height, Some(4));
        assert!(args.quiet);
    }
}
