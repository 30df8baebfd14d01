// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::Path;
use std::sync::Arc;

use crate::annotate::AnnotationStyle;
use crate::cli::args::ExtractArgs;
use crate::error::Result;
use crate::inference::DetectionConfig;
use crate::io::Exporter;
use crate::logging::{ConsoleLog, LogSink};
use crate::pipeline::{PoseExtractor, PoseOutput};
use crate::source::{LandmarkSource, is_image_path};
use crate::{VERSION, info, section, success, verbose, warn};

/// Run pose extraction with the ONNX landmark model and export the results.
///
/// Returns `true` when extraction succeeded and every requested file was written.
pub fn run_extract(args: &ExtractArgs) -> bool {
    let log = ConsoleLog::shared(args.verbose);
    let extractor = build_extractor(args, log.clone());
    print_header(args, extractor.config(), &log);

    let result = extractor.extract(&args.source);
    finish(args, result, &log)
}

/// Same as [`run_extract`] but with a caller-supplied landmark source.
pub fn run_extract_with<S>(args: &ExtractArgs, source: &mut S, log: Arc<dyn LogSink>) -> bool
where
    S: LandmarkSource + ?Sized,
{
    let extractor = build_extractor(args, log.clone());
    print_header(args, extractor.config(), &log);

    let result = extractor.extract_with(source, &args.source);
    finish(args, result, &log)
}

fn build_extractor(args: &ExtractArgs, log: Arc<dyn LogSink>) -> PoseExtractor {
    let config = DetectionConfig::new()
        .with_min_detection_confidence(args.min_detection_confidence)
        .with_min_tracking_confidence(args.min_tracking_confidence)
        .with_model_complexity(args.model_complexity)
        .with_model_dir(&args.model_dir)
        .with_threads(args.threads);

    PoseExtractor::new(config)
        .with_style(AnnotationStyle::default().with_radius(args.radius))
        .with_log(log)
}

fn print_header(args: &ExtractArgs, config: &DetectionConfig, log: &Arc<dyn LogSink>) {
    section!(log, "pose-landmarks {VERSION}");
    verbose!(
        log,
        "model: {} ({}), min_detection_confidence={}, min_tracking_confidence={}",
        config.model_complexity,
        config.model_path().display(),
        config.min_detection_confidence,
        config.min_tracking_confidence
    );
    if !is_image_path(Path::new(&args.source)) {
        warn!(
            log,
            "'{}' does not have a known image extension, trying to decode anyway",
            args.source
        );
    }
}

fn finish(args: &ExtractArgs, result: Result<PoseOutput>, log: &Arc<dyn LogSink>) -> bool {
    // The extractor has already logged the failure with its context.
    let Ok(output) = result else {
        return false;
    };

    info!(
        log,
        "{}: {}x{} {}",
        args.source,
        output.annotated.width(),
        output.annotated.height(),
        format_zone_counts(&output)
    );

    let exporter = Exporter::new(&args.output).with_log(log.clone());
    let mut ok = true;
    if !args.no_csv {
        ok &= exporter.export_csv(&output.landmarks, &args.source);
    }
    if !args.no_png {
        ok &= exporter.export_png(&output.annotated, &args.source);
    }

    if ok && !(args.no_csv && args.no_png) {
        success!(log, "Results saved to {}", exporter.output_dir().display());
    }
    ok
}

/// Summarize in-frame landmarks per zone (e.g. "11/11 head, 12/12 mid_body, ...").
#[must_use]
pub fn format_zone_counts(output: &PoseOutput) -> String {
    output
        .in_frame_counts()
        .iter()
        .map(|(zone, count)| format!("{count}/{} {zone}", zone.len()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{Cli, Commands};
    use crate::landmark::{LANDMARK_COUNT, Landmark, LandmarkSequence};
    use crate::logging::{Level, MemoryLog};
    use crate::source::FixedSource;
    use clap::Parser;
    use image::RgbImage;

    fn parse(extra: &[&str]) -> ExtractArgs {
        let mut argv = vec!["app", "extract"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Extract(args) => args,
        }
    }

    fn standing() -> LandmarkSequence {
        LandmarkSequence::new(vec![Landmark::new(0.5, 0.5, 0.0, 1.0); LANDMARK_COUNT]).unwrap()
    }

    #[test]
    fn test_format_zone_counts() {
        let mut points = standing().into_vec();
        points[30] = Landmark::new(0.5, -0.2, 0.0, 0.1);
        let output = PoseOutput {
            landmarks: LandmarkSequence::new(points).unwrap(),
            annotated: RgbImage::new(1, 1),
        };
        assert_eq!(
            format_zone_counts(&output),
            "11/11 head, 12/12 mid_body, 6/6 lower_body, 3/4 feet"
        );
    }

    #[test]
    fn test_run_extract_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("person.png");
        RgbImage::new(40, 30).save(&image_path).unwrap();
        let out = dir.path().join("out");

        let args = parse(&[
            "-s",
            image_path.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ]);
        let log = Arc::new(MemoryLog::new());
        let mut source = FixedSource::new(standing());

        assert!(run_extract_with(&args, &mut source, log.clone()));
        assert!(out.join("person.csv").is_file());
        assert!(out.join("person.png").is_file());
        assert!(log.contains(Level::Success, "Results saved"));
    }

    #[test]
    fn test_run_extract_respects_skip_flags() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("person.png");
        RgbImage::new(8, 8).save(&image_path).unwrap();
        let out = dir.path().join("out");

        let args = parse(&[
            "-s",
            image_path.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--no-png",
        ]);
        let log = Arc::new(MemoryLog::new());

        assert!(run_extract_with(&args, &mut FixedSource::new(standing()), log));
        assert!(out.join("person.csv").is_file());
        assert!(!out.join("person.png").exists());
    }

    #[test]
    fn test_run_extract_failures() {
        let log = Arc::new(MemoryLog::new());
        let args = parse(&["-s", "missing/person.jpg"]);
        assert!(!run_extract_with(&args, &mut FixedSource::new(standing()), log.clone()));
        assert!(log.contains(Level::Error, "missing/person.jpg"));

        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("empty.png");
        RgbImage::new(8, 8).save(&image_path).unwrap();
        let args = parse(&["-s", image_path.to_str().unwrap()]);
        assert!(!run_extract_with(&args, &mut FixedSource::empty(), log.clone()));
        assert!(log.contains(Level::Warn, "no pose detected"));
    }
}
