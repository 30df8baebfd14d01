// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Pose Landmark Extraction Library
//!
//! Extracts the 33 body landmarks of the single person in a still image,
//! draws them onto a copy of the image colored by body zone, and exports the
//! landmarks as CSV and the annotation as PNG.
//!
//! ## Features
//!
//! - **ONNX Runtime** - Runs the lite, full or heavy pose landmark model through `ort`
//! - **Zone Classification** - Every landmark index maps to head, mid-body, lower body or feet
//! - **Annotation** - One filled marker per landmark, red/green/blue/magenta by zone
//! - **Exports** - `x,y,z,v` CSV and annotated PNG named after the source image
//! - **Tagged Failures** - not-found, no-subject, processing and export faults are distinct
//! - **Injected Logging** - Library code writes to a caller-supplied [`LogSink`]
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use pose_landmarks::{extract_static_pose, write_landmarks_csv, write_annotated_png};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Detection threshold, tracking threshold, model complexity (0, 1 or 2)
//!     let output = extract_static_pose("person.jpg", 0.5, 0.5, 1)?;
//!
//!     println!("nose at ({:.3}, {:.3})", output.landmarks[0].x, output.landmarks[0].y);
//!
//!     write_landmarks_csv(&output.landmarks, "person.jpg", "runs/pose")?;
//!     write_annotated_png(&output.annotated, "person.jpg", "runs/pose")?;
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Extract with defaults (full model from ./models, output to runs/pose)
//! pose-landmarks extract --source person.jpg
//!
//! # Heavy model, stricter detection, CSV only
//! pose-landmarks extract -s person.jpg --model-complexity 2 --min-detection-confidence 0.7 --no-png
//! ```
//!
//! **CLI Options:**
//!
//! | Option | Short | Description | Default |
//! |--------|-------|-------------|---------|
//! | `--source` | `-s` | Image to process | required |
//! | `--output` | `-o` | Output directory | `runs/pose` |
//! | `--model-dir` | | Directory holding `pose_landmark_*.onnx` | `models` |
//! | `--min-detection-confidence` | | Minimum pose presence score | `0.5` |
//! | `--min-tracking-confidence` | | Tracking threshold (no effect on single images) | `0.5` |
//! | `--model-complexity` | | `0`/`lite`, `1`/`full`, `2`/`heavy` | `full` |
//! | `--radius` | | Marker radius in pixels, `0`-`1024` | `5` |
//! | `--no-csv` | | Skip the CSV export | `false` |
//! | `--no-png` | | Skip the PNG export | `false` |
//!
//! ## Landmark Zones
//!
//! | Zone | Indices | Marker color |
//! |------|---------|--------------|
//! | Head | 0-10 | red |
//! | Mid body | 11-22 | green |
//! | Lower body | 23-28 | blue |
//! | Feet | 29-32 | magenta |
//!
//! ## Custom Sources
//!
//! Anything implementing [`LandmarkSource`] can replace the ONNX model, for
//! example to re-annotate landmarks read back from a CSV file:
//!
//! ```no_run
//! use std::sync::Arc;
//! use pose_landmarks::{
//!     DetectionConfig, FixedSource, LandmarkSequence, PoseExtractor, SilentLog, read_landmarks_csv,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let landmarks = LandmarkSequence::new(read_landmarks_csv("runs/pose/person.csv")?)?;
//! let extractor = PoseExtractor::new(DetectionConfig::default()).with_log(Arc::new(SilentLog));
//! let output = extractor.extract_with(&mut FixedSource::new(landmarks), "person.jpg")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`pipeline`] | [`PoseExtractor`] and [`extract_static_pose`] |
//! | [`landmark`] | [`Landmark`], [`PoseLandmark`] and [`LandmarkSequence`] |
//! | [`zone`] | [`Zone`] classification by landmark index |
//! | [`annotate`] | Marker drawing |
//! | [`io`] | CSV and PNG exports |
//! | [`model`] | [`PoseModel`], the ONNX landmark source |
//! | [`inference`] | [`DetectionConfig`] |
//! | [`error`] | Error types ([`PoseError`], [`FailureKind`], [`Result`]) |
//! | [`logging`] | [`LogSink`] and its console, memory and silent sinks |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `coreml` | Apple `CoreML` (macOS/iOS) |
//!
//! ## License
//!
//! This project is licensed under [AGPL-3.0](https://ultralytics.com/license).

// Modules
pub mod annotate;
pub mod cli;
pub mod complexity;
pub mod error;
pub mod inference;
pub mod io;
pub mod landmark;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod postprocessing;
pub mod preprocessing;
pub mod source;
pub mod visualizer;
pub mod zone;

// Re-export main types for convenience
pub use annotate::{AnnotationStyle, MARKER_RADIUS, annotate_landmarks, annotate_pose};
pub use complexity::ModelComplexity;
pub use error::{FailureKind, PoseError, Result};
pub use inference::DetectionConfig;
pub use io::{
    ExportReport, Exporter, read_landmarks_csv, write_annotated_png, write_landmarks_csv,
};
pub use landmark::{LANDMARK_COUNT, Landmark, LandmarkSequence, PoseLandmark};
pub use logging::{ConsoleLog, Level, LogSink, MemoryLog, SilentLog};
pub use model::PoseModel;
pub use pipeline::{PoseExtractor, PoseOutput, extract_static_pose};
pub use source::{FixedSource, LandmarkSource, load_rgb_image};
pub use zone::{Zone, zone_for_index};

// Re-export preprocessing utilities
pub use preprocessing::{PreprocessResult, preprocess_image};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
