use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use libjbus::application::{Translator, TranslatorConfig};
use libjbus::config::load_config;
use libjbus::Result;

/// Translate J1939 text records.
///
/// Raw `PDU` records are decoded by their PGN; typed records are re-printed.
///
/// Examples:
///   jbus_translate capture.txt                # numeric records to stdout
///   jbus_translate --labeled capture.txt      # labeled reports
///   cat capture.txt | jbus_translate -o out.txt -v
#[derive(Debug, Parser)]
#[command(name = "jbus_translate", version, about, author)]
struct Args {
    /// Input file, stdin when omitted
    input: Option<PathBuf>,

    /// Output file, stdout when omitted
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print labeled reports instead of numeric records
    #[arg(short = 'l', long = "labeled")]
    labeled: bool,

    /// Echo every input record as a comment before its translation
    #[arg(long = "echo")]
    echo: bool,

    /// Stop at the first record that cannot be translated
    #[arg(short = 's', long = "strict")]
    strict: bool,

    /// TOML file with translator settings; flags given here override it
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Increase verbosity (can be repeated: -v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).format_timestamp_millis().try_init();
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config::<TranslatorConfig>(path)?,
        None => TranslatorConfig::default(),
    };
    config.numeric &= !args.labeled;
    config.verbose |= args.echo;
    config.strict |= args.strict;

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let mut translator = Translator::new(&config)?;
    let stats = translator.translate(input, &mut output)?;
    info!(
        "{} lines, {} translated, {} pending fragments, {} skipped, {} errors",
        stats.lines, stats.translated, stats.pending, stats.skipped, stats.errors
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
