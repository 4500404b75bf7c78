// GlucosePlotter - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing (including the legacy -if / -of spellings)
// 2. Optional config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. Running the pipeline and mapping failures to exit codes

use clap::Parser;
use glucose_plotter::app::{output, pipeline};
use glucose_plotter::platform::config::{self, AppConfig};
use glucose_plotter::util::{self, error::display_chain};
use std::ffi::OsString;
use std::path::PathBuf;

/// GlucosePlotter - chart a glucose-monitor export.
///
/// Reads glucose readings and carbohydrate records from an export file and
/// writes a wide PNG line chart of glucose over time.
#[derive(Parser, Debug)]
#[command(name = "glucose-plotter", version, about)]
struct Cli {
    /// Glucose data file in CSV (also accepted as -if).
    #[arg(short = 'i', long = "input-file")]
    input_file: Option<PathBuf>,

    /// Glucose graph in PNG (also accepted as -of).
    /// Defaults to <input minus extension>_<DDMMYYHHMM>.png.
    #[arg(short = 'o', long = "output-file")]
    output_file: Option<PathBuf>,

    /// Plot carbohydrate ingests as vertical lines.
    #[arg(long = "ingest")]
    ingest: bool,

    /// Read chart and logging settings from this config.toml.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Rewrite the two-letter short options into their long forms.
///
/// clap short options are single characters, so `-if <path>`,
/// `-if=<path>` and `-if<path>` are mapped before parsing. Arguments after
/// `--` are left untouched.
fn normalise_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    const ALIASES: &[(&str, &str)] = &[("-if", "--input-file"), ("-of", "--output-file")];

    let mut options_done = false;
    args.into_iter()
        .map(|arg| {
            if options_done {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                options_done = true;
                return arg;
            }
            for (short, long) in ALIASES {
                if text == *short {
                    return OsString::from(*long);
                }
                if let Some(rest) = text.strip_prefix(short) {
                    // `-if=data.csv` and `-ifdata.csv` both carry the value.
                    let value = rest.strip_prefix('=').unwrap_or(rest);
                    return OsString::from(format!("{long}={value}"));
                }
            }
            arg
        })
        .collect()
}

/// Report a fatal pipeline error and exit with status 1.
fn fail(err: &util::error::GlucosePlotError) -> ! {
    tracing::debug!(error = ?err, "Glucose plot failed");
    eprintln!("Error: {}", display_chain(err));
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse_from(normalise_args(std::env::args_os()));

    // Config is read before logging starts because it may set the level.
    let (app_config, config_warnings) = match cli.config.as_deref() {
        Some(path) => match config::load_config(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error: {}", display_chain(&e));
                std::process::exit(1);
            }
        },
        None => (AppConfig::default(), Vec::new()),
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        ingest = cli.ingest,
        "GlucosePlotter starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config validation warning");
    }

    let Some(input) = cli.input_file else {
        println!("Please, provide a datafile\n");
        std::process::exit(1);
    };
    let output_path = output::resolve_output_path(&input, cli.output_file.as_deref());

    println!("Parsing file: {}", input.display());
    let data = pipeline::load(&input).unwrap_or_else(|e| fail(&e));
    println!(
        "Data file contains: {} measurements",
        data.measurements.len()
    );

    println!("Exporting plot to: {}", output_path.display());
    if let Err(e) = pipeline::render(&data, cli.ingest, &app_config.chart, &output_path) {
        fail(&e);
    }
}
