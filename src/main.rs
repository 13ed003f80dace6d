use argh::FromArgs;
use hash_occupancy_plots::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

/// Plot bucket occupancy histograms of hash quality test output against the Poisson expectation
#[derive(FromArgs, Debug)]
pub struct Args {
    /// directory holding the <ALG>.meta.json and counts file pairs
    #[argh(positional)]
    results_dir: PathBuf,

    /// highest occupancy level (k) to display (default: largest observed)
    #[argh(option)]
    max_k: Option<u32>,

    /// also write a combined chart comparing all algorithms
    #[argh(switch)]
    overlay: bool,

    /// use a logarithmic y-axis
    #[argh(switch)]
    logy: bool,

    /// do not draw the Poisson expectation on per-algorithm charts
    #[argh(switch)]
    no_poisson: bool,

    /// plot raw bucket counts instead of fractions on the overlay chart
    #[argh(switch)]
    no_normalize: bool,

    /// do not print per-algorithm occupancy tables
    #[argh(switch, short = 'q')]
    quiet: bool,
}

impl From<Args> for RunSettings {
    fn from(args: Args) -> Self {
        RunSettings {
            results_dir: args.results_dir,
            max_k: args.max_k,
            overlay: args.overlay,
            quiet: args.quiet,
            plot: PlotOptions {
                log_y: args.logy,
                show_poisson: !args.no_poisson,
                normalize_overlay: !args.no_normalize,
            },
        }
    }
}

/// Status reported when a run fails.
const FAILURE_STATUS: u8 = 1;

/// Console message and process status for a finished run.
fn outcome(result: &Result<PathBuf, DriverError>) -> (String, u8) {
    match result {
        Ok(plots_dir) => (format!("✅ Plots written to {}", plots_dir.display()), 0),
        Err(e) => (format!("Error: {}", e), FAILURE_STATUS),
    }
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();
    let settings = RunSettings::from(args);

    println!("Starting occupancy analysis:");
    println!("Results directory: {}", settings.results_dir.display());
    match settings.max_k {
        Some(max_k) => println!("Max k: {}", max_k),
        None => println!("Max k: largest observed"),
    }
    println!(
        "Y-axis: {}",
        if settings.plot.log_y { "logarithmic" } else { "linear" }
    );

    let (message, status) = outcome(&run(&settings));
    if status == 0 {
        println!("{message}");
    } else {
        eprintln!("{message}");
    }
    ExitCode::from(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_fails_with_its_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("no-such-run");

        let (message, status) = outcome(&run(&RunSettings::new(&missing)));

        assert_eq!(status, FAILURE_STATUS);
        assert!(message.starts_with("Error: "));
        assert!(message.contains("no-such-run"));
    }

    #[test]
    fn length_mismatch_fails_the_process() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("short.meta.json"),
            r#"{"algorithm": "short", "numBuckets": 5, "numInputs": 4,
                "countsFile": "short.bin"}"#,
        )
        .unwrap();
        fs::write(temp_dir.path().join("short.bin"), [1u8, 0, 0, 0].repeat(4)).unwrap();

        let (message, status) = outcome(&run(&RunSettings::new(temp_dir.path())));

        assert_eq!(status, FAILURE_STATUS);
        assert!(message.contains("short.bin"));
    }

    #[test]
    fn success_reports_plots_directory() {
        let plots_dir = PathBuf::from("results").join("plots");

        let (message, status) = outcome(&Ok(plots_dir.clone()));

        assert_eq!(status, 0);
        assert_eq!(message, format!("✅ Plots written to {}", plots_dir.display()));
    }

    #[test]
    fn command_line_maps_onto_settings() {
        let args = Args::from_args(&["hash-occupancy-plots"], &["run", "--max-k", "40", "--logy"])
            .unwrap();
        let settings = RunSettings::from(args);

        assert_eq!(settings.results_dir, PathBuf::from("run"));
        assert_eq!(settings.max_k, Some(40));
        assert!(settings.plot.log_y);
        assert!(!settings.overlay);
        assert!(settings.plot.show_poisson);
    }
}
