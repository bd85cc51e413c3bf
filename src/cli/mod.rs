//! Command Line Interface (CLI) layer for RASTERDIFF.
//!
//! This module defines argument parsing (`args`) and the orchestration logic
//! (`runner`). Every argument defaults to the fixed comparison layout, so running
//! the binary without flags reproduces it.
//!
//! If you are embedding RASTERDIFF into another application, prefer using the
//! high-level `rasterdiff::api` module instead of calling the CLI code.
pub mod args;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
