use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use icicle::{Packing, ValueMode};
use serde::Deserialize;

/// Explore a hierarchy as an animated treemap or sunburst in the terminal
#[derive(Parser, Debug)]
#[command(name = "icicle")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Click to zoom in, Esc to zoom out, +/- to change depth, q to quit.")]
pub struct Cli {
    /// JSON trace with labels, parents and optional ids, values, text
    pub trace: PathBuf,

    /// Partition family (overrides the trace file)
    #[arg(short, long, value_enum)]
    pub family: Option<Family>,

    /// Tiling algorithm for treemaps (overrides the trace file)
    #[arg(short, long, value_enum)]
    pub packing: Option<PackingKind>,

    /// How values aggregate (overrides the trace file)
    #[arg(long, value_enum)]
    pub value_mode: Option<ValueModeKind>,

    /// Levels shown at once, including the entry
    #[arg(short = 'd', long)]
    pub max_depth: Option<usize>,

    /// Id of the initial entry
    #[arg(short, long)]
    pub level: Option<String>,

    /// Gap between treemap siblings, in cells
    #[arg(long, default_value_t = 0.0)]
    pub pad: f64,

    /// Transition duration in milliseconds (0 disables animation)
    #[arg(long, default_value_t = 750)]
    pub duration_ms: u64,

    /// Where to write the debug log
    #[arg(long, default_value = "icicle.log")]
    pub log_file: PathBuf,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Treemap,
    Sunburst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackingKind {
    Squarify,
    Binary,
    Slice,
    Dice,
    SliceDice,
    DiceSlice,
}

impl From<PackingKind> for Packing {
    fn from(kind: PackingKind) -> Self {
        match kind {
            PackingKind::Squarify => Packing::default(),
            PackingKind::Binary => Packing::Binary,
            PackingKind::Slice => Packing::Slice,
            PackingKind::Dice => Packing::Dice,
            PackingKind::SliceDice => Packing::SliceDice,
            PackingKind::DiceSlice => Packing::DiceSlice,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
pub enum ValueModeKind {
    #[serde(rename = "remainder")]
    Remainder,
    #[serde(rename = "total")]
    Total,
    #[serde(rename = "leaves")]
    Leaves,
    #[serde(rename = "branches")]
    Branches,
    #[serde(rename = "leaves+branches")]
    #[value(name = "leaves+branches")]
    LeavesAndBranches,
}

impl From<ValueModeKind> for ValueMode {
    fn from(kind: ValueModeKind) -> Self {
        match kind {
            ValueModeKind::Remainder => ValueMode::Remainder,
            ValueModeKind::Total => ValueMode::Total,
            ValueModeKind::Leaves => ValueMode::CountLeaves,
            ValueModeKind::Branches => ValueMode::CountBranches,
            ValueModeKind::LeavesAndBranches => ValueMode::CountLeavesAndBranches,
        }
    }
}
