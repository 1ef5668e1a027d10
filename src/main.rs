//! rpngrid - Evaluate a grid of postfix cell expressions

mod config;
mod logging;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rpngrid_core::{Document, OutputFormat};
use rpngrid_engine::engine::EvalOptions;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "rpngrid",
    version,
    about = "Evaluate a grid of postfix (RPN) cell expressions.",
    after_help = "Input: a '<columns> <rows>' line, then one cell per line in row-major order.\n\
                  Cells hold numbers or postfix expressions such as 'A1 B2 / 2 +'."
)]
struct Args {
    /// Sheet file to evaluate (reads stdin when omitted or '-')
    file: Option<PathBuf>,

    /// Write results to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output layout: text or csv
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Decimal places printed for each value
    #[arg(long)]
    precision: Option<usize>,

    /// Longest dependency chain allowed before aborting
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_depth: Option<u64>,

    /// Evaluate one postfix expression against the sheet and print its value
    #[arg(short, long, value_name = "EXPR")]
    command: Option<String>,

    /// Read settings from this TOML file instead of the user config
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long)]
    no_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse()
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let (mut settings, warnings) = if args.no_config {
        (config::Config::default(), Vec::new())
    } else {
        config::load_config(args.config.as_deref())
    };
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Some(format) = args.format {
        settings.format = format;
    }
    if let Some(precision) = args.precision {
        settings.precision = precision;
    }
    if let Some(depth) = args.max_depth {
        settings.max_depth = usize::try_from(depth).unwrap_or(usize::MAX);
    }
    debug!(?settings, "effective settings");
    let options = EvalOptions {
        max_depth: settings.max_depth,
    };

    let mut doc = load_document(args.file.as_ref(), args.command.is_some())?;

    if let Some(expression) = args.command {
        let value = doc
            .eval_command(&expression, &options)
            .with_context(|| format!("evaluating '{}'", expression))?;
        println!("{:.*}", settings.precision, value);
        return Ok(());
    }

    let values = doc.evaluate(&options)?;

    match args.output {
        Some(path) => {
            Document::export(&path, &values, settings.format, settings.precision)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            rpngrid_core::storage::write_values(
                &mut out,
                &values,
                settings.format,
                settings.precision,
            )?;
        }
    }
    Ok(())
}

/// Load the sheet from a file or stdin. In command mode without a file the
/// expression is evaluated against an empty sheet.
fn load_document(file: Option<&PathBuf>, command_mode: bool) -> Result<Document> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            Document::load(path).with_context(|| format!("loading {}", path.display()))
        }
        Some(_) => Ok(Document::from_reader(BufReader::new(io::stdin().lock()))?),
        None if command_mode => Ok(Document::new()),
        None => {
            if io::IsTerminal::is_terminal(&io::stdin()) {
                bail!("no sheet given; pass a FILE or pipe one on stdin (see --help)");
            }
            Ok(Document::from_reader(BufReader::new(io::stdin().lock()))?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_overrides() {
        let args = Args::try_parse_from([
            "rpngrid",
            "sheet.txt",
            "--format",
            "csv",
            "--precision",
            "2",
            "--max-depth",
            "8",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.file, Some(PathBuf::from("sheet.txt")));
        assert_eq!(args.format, Some(OutputFormat::Csv));
        assert_eq!(args.precision, Some(2));
        assert_eq!(args.max_depth, Some(8));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn args_reject_zero_depth() {
        assert!(Args::try_parse_from(["rpngrid", "--max-depth", "0"]).is_err());
    }

    #[test]
    fn args_reject_config_with_no_config() {
        assert!(Args::try_parse_from(["rpngrid", "--config", "a.toml", "--no-config"]).is_err());
    }
}
