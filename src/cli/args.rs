// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::{Args, Parser, Subcommand};

use crate::annotate::{MARKER_RADIUS, MAX_MARKER_RADIUS};
use crate::complexity::ModelComplexity;
use crate::inference::DEFAULT_MODEL_DIR;

/// Default directory for exported CSV and PNG files.
pub const DEFAULT_OUTPUT_DIR: &str = "runs/pose";

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Extract Options:
    --source, -s <IMAGE>                Image to process
    --output, -o <DIR>                  Output directory [default: runs/pose]
    --model-dir <DIR>                   Directory holding pose_landmark_*.onnx [default: models]
    --min-detection-confidence <CONF>   Minimum pose presence score [default: 0.5]
    --min-tracking-confidence <CONF>    Tracking threshold, unused for single images [default: 0.5]
    --model-complexity <LEVEL>          Landmark model: 0/lite, 1/full, 2/heavy [default: full]
    --radius <PX>                       Marker radius in pixels, 0-1024 [default: 5]
    --no-csv                            Skip the landmark CSV
    --no-png                            Skip the annotated PNG
    --threads <N>                       ONNX Runtime intra-op threads, 0 = auto [default: 0]
    --verbose <BOOL>                    Show verbose output [default: true]

Examples:
    pose-landmarks extract --source person.jpg
    pose-landmarks extract -s person.jpg -o out --model-complexity 2
    pose-landmarks extract -s person.jpg --min-detection-confidence 0.7 --no-png"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract pose landmarks from a single image
    Extract(ExtractArgs),
}

/// Arguments for the extract command.
#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractArgs {
    /// Image to process
    #[arg(short, long)]
    pub source: String,

    /// Output directory for the CSV and PNG files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: String,

    /// Directory holding the landmark models
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: String,

    /// Minimum pose presence score for a detection to count
    #[arg(long, default_value_t = 0.5)]
    pub min_detection_confidence: f32,

    /// Minimum tracking confidence (validated, no effect on single images)
    #[arg(long, default_value_t = 0.5)]
    pub min_tracking_confidence: f32,

    /// Landmark model variant (0 = lite, 1 = full, 2 = heavy)
    #[arg(long, default_value_t = ModelComplexity::Full)]
    pub model_complexity: ModelComplexity,

    /// Marker radius in pixels
    #[arg(
        long,
        default_value_t = MARKER_RADIUS,
        value_parser = clap::value_parser!(i32).range(0..=i64::from(MAX_MARKER_RADIUS))
    )]
    pub radius: i32,

    /// Do not write the landmark CSV
    #[arg(long, default_value_t = false)]
    pub no_csv: bool,

    /// Do not write the annotated PNG
    #[arg(long, default_value_t = false)]
    pub no_png: bool,

    /// Intra-op threads for ONNX Runtime (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_args_defaults() {
        let args = Cli::parse_from(["app", "extract", "--source", "person.jpg"]);
        match args.command {
            Commands::Extract(extract_args) => {
                assert_eq!(extract_args.source, "person.jpg");
                assert_eq!(extract_args.output, DEFAULT_OUTPUT_DIR);
                assert_eq!(extract_args.model_dir, DEFAULT_MODEL_DIR);
                assert!((extract_args.min_detection_confidence - 0.5).abs() < f32::EPSILON);
                assert!((extract_args.min_tracking_confidence - 0.5).abs() < f32::EPSILON);
                assert_eq!(extract_args.model_complexity, ModelComplexity::Full);
                assert_eq!(extract_args.radius, 5);
                assert!(!extract_args.no_csv);
                assert!(!extract_args.no_png);
                assert!(extract_args.verbose);
            }
        }
    }

    #[test]
    fn test_extract_args_custom() {
        let args = Cli::parse_from([
            "app",
            "extract",
            "-s",
            "shot.png",
            "-o",
            "out",
            "--model-complexity",
            "heavy",
            "--min-detection-confidence",
            "0.8",
            "--radius",
            "3",
            "--no-png",
            "--verbose",
            "false",
        ]);
        match args.command {
            Commands::Extract(extract_args) => {
                assert_eq!(extract_args.source, "shot.png");
                assert_eq!(extract_args.output, "out");
                assert_eq!(extract_args.model_complexity, ModelComplexity::Heavy);
                assert!((extract_args.min_detection_confidence - 0.8).abs() < f32::EPSILON);
                assert_eq!(extract_args.radius, 3);
                assert!(extract_args.no_png);
                assert!(!extract_args.no_csv);
                assert!(!extract_args.verbose);
            }
        }
    }

    #[test]
    fn test_source_required() {
        assert!(Cli::try_parse_from(["app", "extract"]).is_err());
    }

    #[test]
    fn test_radius_out_of_range_rejected() {
        for radius in ["2147483647", "1025", "-1"] {
            assert!(
                Cli::try_parse_from(["app", "extract", "-s", "a.jpg", "--radius", radius]).is_err(),
                "radius {radius} accepted"
            );
        }
        let args = Cli::parse_from(["app", "extract", "-s", "a.jpg", "--radius", "1024"]);
        match args.command {
            Commands::Extract(extract_args) => assert_eq!(extract_args.radius, MAX_MARKER_RADIUS),
        }
    }

    #[test]
    fn test_bad_complexity_rejected() {
        assert!(
            Cli::try_parse_from(["app", "extract", "-s", "a.jpg", "--model-complexity", "3"])
                .is_err()
        );
    }
}
