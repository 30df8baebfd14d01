// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Visualization helpers for annotated results.

/// RGB marker colors.
pub mod color;

pub use color::Color;
