// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Saving extraction results: landmark CSV files and annotated PNG images.
//!
//! Both files are named after the source image's basename with its extension
//! replaced, so `photos/jump.jpg` exported to `out/` gives `out/jump.csv` and
//! `out/jump.png`. The output directory is created on demand.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbImage;

use crate::error::{PoseError, Result};
use crate::landmark::Landmark;
use crate::logging::{ConsoleLog, LogSink};
use crate::pipeline::PoseOutput;
use crate::{error, verbose};

/// Header line of the landmark CSV format.
pub const CSV_HEADER: &str = "x,y,z,v";

/// Build `<output_dir>/<image stem>.<ext>`.
///
/// # Errors
///
/// Returns [`PoseError::ExportError`] if `image_path` has no file name.
pub fn output_path<P: AsRef<Path>, Q: AsRef<Path>>(
    image_path: P,
    output_dir: Q,
    ext: &str,
) -> Result<PathBuf> {
    let image_path = image_path.as_ref();
    let stem = image_path.file_stem().ok_or_else(|| {
        PoseError::ExportError(format!("No file name in {}", image_path.display()))
    })?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(ext);
    Ok(output_dir.as_ref().join(name))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        PoseError::IoError(format!("Failed to create directory {}: {e}", dir.display()))
    })
}

/// Write landmarks as CSV: a `x,y,z,v` header, then one row per landmark.
///
/// Values use the shortest decimal text that reads back to the same `f32`.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_landmarks_csv<P: AsRef<Path>, Q: AsRef<Path>>(
    landmarks: &[Landmark],
    image_path: P,
    output_dir: Q,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    let path = output_path(image_path, output_dir, "csv")?;
    ensure_dir(output_dir)?;

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{CSV_HEADER}")?;
    for lm in landmarks {
        writeln!(writer, "{},{},{},{}", lm.x, lm.y, lm.z, lm.visibility)?;
    }
    writer.flush()?;

    Ok(path)
}

/// Read a landmark CSV written by [`write_landmarks_csv`].
///
/// # Errors
///
/// Returns [`PoseError::ExportError`] for a missing header, a row without
/// exactly four fields, or a field that is not a number.
pub fn read_landmarks_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Landmark>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    match lines.next().transpose()? {
        Some(header) if header.trim() == CSV_HEADER => {}
        other => {
            return Err(PoseError::ExportError(format!(
                "{}: expected header '{CSV_HEADER}', found {other:?}",
                path.display()
            )));
        }
    }

    let mut landmarks = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = i + 2;
        let values = line
            .split(',')
            .map(|field| {
                field.trim().parse::<f32>().map_err(|e| {
                    PoseError::ExportError(format!(
                        "{}:{row}: invalid value '{field}': {e}",
                        path.display()
                    ))
                })
            })
            .collect::<Result<Vec<f32>>>()?;

        let &[x, y, z, v] = values.as_slice() else {
            return Err(PoseError::ExportError(format!(
                "{}:{row}: expected 4 fields, found {}",
                path.display(),
                values.len()
            )));
        };
        landmarks.push(Landmark::new(x, y, z, v));
    }

    Ok(landmarks)
}

/// Save an annotated image as PNG.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or encoding fails.
pub fn write_annotated_png<P: AsRef<Path>, Q: AsRef<Path>>(
    image: &RgbImage,
    image_path: P,
    output_dir: Q,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    let path = output_path(image_path, output_dir, "png")?;
    ensure_dir(output_dir)?;

    image
        .save_with_format(&path, image::ImageFormat::Png)
        .map_err(|e| PoseError::ExportError(format!("Failed to save {}: {e}", path.display())))?;

    Ok(path)
}

/// Outcome of [`Exporter::export_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportReport {
    /// The CSV file was written.
    pub csv: bool,
    /// The PNG file was written.
    pub png: bool,
}

impl ExportReport {
    /// Both exports succeeded.
    #[must_use]
    pub const fn all_ok(&self) -> bool {
        self.csv && self.png
    }
}

/// Writes results to a fixed output directory, logging instead of returning errors.
#[derive(Clone)]
pub struct Exporter {
    output_dir: PathBuf,
    log: Arc<dyn LogSink>,
}

impl Exporter {
    /// Create an exporter for `output_dir`.
    #[must_use]
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            log: ConsoleLog::shared(false),
        }
    }

    /// Replace the log sink.
    #[must_use]
    pub fn with_log(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    /// Get the output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the landmark CSV. Returns `false` (and logs why) on failure.
    pub fn export_csv<P: AsRef<Path>>(&self, landmarks: &[Landmark], image_path: P) -> bool {
        let image_path = image_path.as_ref();
        self.finish(
            "landmarks",
            image_path,
            write_landmarks_csv(landmarks, image_path, &self.output_dir),
        )
    }

    /// Write the annotated PNG. Returns `false` (and logs why) on failure.
    pub fn export_png<P: AsRef<Path>>(&self, image: &RgbImage, image_path: P) -> bool {
        let image_path = image_path.as_ref();
        self.finish(
            "annotated image",
            image_path,
            write_annotated_png(image, image_path, &self.output_dir),
        )
    }

    /// Write both files. A failure of one does not stop the other.
    pub fn export_all<P: AsRef<Path>>(&self, output: &PoseOutput, image_path: P) -> ExportReport {
        let image_path = image_path.as_ref();
        ExportReport {
            csv: self.export_csv(&output.landmarks, image_path),
            png: self.export_png(&output.annotated, image_path),
        }
    }

    fn finish(&self, what: &str, image_path: &Path, result: Result<PathBuf>) -> bool {
        match result {
            Ok(path) => {
                verbose!(self.log, "Saved {what} to {}", path.display());
                true
            }
            Err(e) => {
                error!(
                    self.log,
                    "Failed to export {what} for {}: {e}",
                    image_path.display()
                );
                false
            }
        }
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("output_dir", &self.output_dir)
            .finish_non_exhaustive()
    }
}
