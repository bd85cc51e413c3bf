//! Shared types and enums used across RASTERDIFF.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How matched pairs are reported.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// One histogram per pair; the first unreadable pair aborts the run
    Individual,
    /// One histogram over every pair's samples; unreadable pairs are skipped
    Overall,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunMode::Individual => "Individual",
            RunMode::Overall => "Overall",
        };
        write!(f, "{}", s)
    }
}
