// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for extracting pose landmarks.
//!
//! This module contains the command-line interface logic, including argument parsing
//! and the `extract` command implementation.

// Modules
/// CLI arguments.
pub mod args;

/// Extraction command.
pub mod extract;
