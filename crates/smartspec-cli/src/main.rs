//! smartspec CLI - bounding-box analysis of local CAD files
//!
//! Prints the same `analysis` JSON object the HTTP endpoint returns.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smartspec_geometry::{AnalysisReport, EstimatorConfig, Extractor, Format};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smartspec")]
#[command(about = "Estimate volume and surface area of CAD files", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a STEP, DXF, STL or DWG file
    Analyze {
        /// Path to the CAD file
        file: PathBuf,
        /// Format override (step, stp, dxf, stl, dwg); default from the file extension
        #[arg(short, long)]
        format: Option<String>,
        /// Estimator config TOML (fill_fraction, min_height_clamp)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List the recognized file extensions
    Formats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            file,
            format,
            config,
            pretty,
        } => {
            let report = analyze_file(&file, format.as_deref(), config.as_deref())?;
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", json);
        }
        Commands::Formats => {
            print!("{}", formats_table());
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn analyze_file(
    path: &Path,
    format: Option<&str>,
    config: Option<&Path>,
) -> Result<AnalysisReport> {
    let format = match format {
        Some(name) => Format::from_extension(name)?,
        None => {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("Invalid file name: {}", path.display()))?;
            Format::from_file_name(name)?
        }
    };

    let extractor = match config {
        Some(path) => Extractor::with_config(load_config(path)?)?,
        None => Extractor::new(),
    };

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let extraction = extractor.analyze(&bytes, format);

    let mut report = AnalysisReport::from(&extraction.estimate);
    if let Some(name) = path.file_name() {
        report = report.with_file_name(name.to_string_lossy());
    }
    Ok(report)
}

fn load_config(path: &Path) -> Result<EstimatorConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn formats_table() -> String {
    Format::ALL
        .iter()
        .map(|format| format!("{:<5} {}\n", format.name(), format.extensions().join(", ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: &str =
        "#1=CARTESIAN_POINT('',(0.,0.,0.));\n#2=CARTESIAN_POINT('',(10.,5.,2.));\n";

    #[test]
    fn test_analyze_step_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bracket.stp");
        std::fs::write(&path, STEP).unwrap();

        let report = analyze_file(&path, None, None).unwrap();
        assert_eq!(report.volume, 100.0);
        assert_eq!(report.surface_area, 160.0);
        assert_eq!(report.file_name.as_deref(), Some("bracket.stp"));
    }

    #[test]
    fn test_format_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bracket.txt");
        std::fs::write(&path, STEP).unwrap();

        assert!(analyze_file(&path, None, None).is_err());
        let report = analyze_file(&path, Some("step"), None).unwrap();
        assert_eq!(report.volume, 100.0);
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bracket.step");
        let config = dir.path().join("estimator.toml");
        std::fs::write(&path, STEP).unwrap();
        std::fs::write(&config, "fill_fraction = 0.5\n").unwrap();

        let report = analyze_file(&path, None, Some(&config)).unwrap();
        assert_eq!(report.volume, 50.0);
        assert_eq!(report.surface_area, 160.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bracket.step");
        let config = dir.path().join("estimator.toml");
        std::fs::write(&path, STEP).unwrap();
        std::fs::write(&config, "fill_fraction = 0.0\n").unwrap();

        assert!(analyze_file(&path, None, Some(&config)).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = analyze_file(Path::new("/nonexistent/part.stl"), None, None).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_formats_table() {
        let table = formats_table();
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("step, stp"));
        assert!(table.contains("dwg"));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["smartspec", "-v", "analyze", "a.dxf", "--pretty"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(
            cli.command,
            Commands::Analyze { pretty: true, .. }
        ));
    }
}
