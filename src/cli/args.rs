//! Command-line arguments for the `lz4kd` binary.
//!
//! [`Args`] is the raw clap surface; [`Args::plan`] validates flag
//! combinations and resolves them into a [`Plan`] the binary executes.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{NB_WORKERS_DEFAULT, NB_WORKERS_MAX};

/// Environment variable overriding the default worker count.
pub const ENV_NBWORKERS: &str = "LZ4KD_NBWORKERS";

#[derive(Parser, Debug)]
#[command(name = "lz4kd", version)]
#[command(about = "Decode raw LZ4 blocks and LZ4 legacy frames.", long_about = None)]
pub struct Args {
    /// Compressed input (`-` for stdin).
    pub input: String,

    /// Output file (`-` for stdout).
    #[arg(short = 'o', long, default_value = "-")]
    pub output: String,

    /// Decoded size of a raw block (capacity for --partial).
    #[arg(long)]
    pub size: Option<usize>,

    /// Input is an LZ4 legacy frame stream.
    #[arg(long, conflicts_with_all = ["size", "dict", "partial", "fast", "in_place"])]
    pub legacy: bool,

    /// External dictionary preceding the block's output.
    #[arg(short = 'D', long)]
    pub dict: Option<PathBuf>,

    /// Stop after this many decoded bytes.
    #[arg(long, conflicts_with_all = ["fast", "in_place"])]
    pub partial: Option<usize>,

    /// Trust the block to end exactly at --size; reports bytes consumed.
    #[arg(long, conflicts_with = "in_place")]
    pub fast: bool,

    /// Decode inside a single buffer holding the compressed block at its tail.
    #[arg(long, conflicts_with = "dict")]
    pub in_place: bool,

    /// Worker threads for legacy frames.
    #[arg(short = 'T', long = "workers")]
    pub workers: Option<usize>,

    /// Expected xxh32 (hex) of the decoded bytes.
    #[arg(long, value_parser = parse_hex32)]
    pub xxh32: Option<u32>,

    /// More messages (repeatable).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Fewer messages (repeatable).
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,
}

/// How a raw block is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Safe,
    Partial(usize),
    Fast,
    InPlace,
}

/// Validated work description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Legacy { workers: usize },
    Block { size: usize, kind: BlockKind, dict: Option<PathBuf> },
}

fn parse_hex32(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid xxh32 value {s:?}: {e}"))
}

/// Worker count from `-T`, else the environment, else the compiled default.
fn resolve_workers(flag: Option<usize>, env: Option<String>) -> Result<usize, String> {
    let n = match (flag, env) {
        (Some(n), _) => n,
        (None, Some(v)) => v
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("{ENV_NBWORKERS}={v:?} is not a number"))?,
        (None, None) => NB_WORKERS_DEFAULT,
    };
    if n > NB_WORKERS_MAX {
        return Err(format!("too many workers: {n} (max {NB_WORKERS_MAX})"));
    }
    Ok(n.max(1))
}

impl Args {
    /// Display level after `-v` / `-q` adjustments, clamped to 0..=4.
    pub fn display_level(&self) -> u32 {
        (2 + i32::from(self.verbose) - i32::from(self.quiet)).clamp(0, 4) as u32
    }

    /// Resolve the flags into a [`Plan`].
    pub fn plan(&self) -> Result<Plan, String> {
        if self.legacy {
            let workers = resolve_workers(self.workers, std::env::var(ENV_NBWORKERS).ok())?;
            return Ok(Plan::Legacy { workers });
        }

        let size = self
            .size
            .ok_or_else(|| "--size is required to decode a raw block (or pass --legacy)".to_string())?;
        let kind = match (self.partial, self.fast, self.in_place) {
            (Some(n), false, false) => BlockKind::Partial(n),
            (None, true, false) => BlockKind::Fast,
            (None, false, true) => BlockKind::InPlace,
            (None, false, false) => BlockKind::Safe,
            _ => return Err("--partial, --fast and --in-place are mutually exclusive".to_string()),
        };
        Ok(Plan::Block { size, kind, dict: self.dict.clone() })
    }
}
