//! chartdocs library surface.
//!
//! The binary in `main.rs` is a thin shell over [`cli`] (input loading and
//! normalization), [`orchestrator`] (install, run, decide), and [`actions`]
//! (the minimal GitHub Actions workflow-command surface).

pub mod actions;
pub mod cli;
pub mod orchestrator;
