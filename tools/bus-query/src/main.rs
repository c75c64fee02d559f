use anyhow::{bail, Context, Result};
use bus_transit::prelude::*;
use clap::Parser;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "bus-query",
    author,
    version,
    about = "Answer bus network queries from a JSON request document",
    long_about = "Reads a document with routing_settings, base_requests and stat_requests, \
                  builds the bus network it declares and writes one response per stat \
                  request as a JSON array.\n\n\
                  Malformed requests are skipped with a warning on stderr."
)]
struct Args {
    /// Request document (reads stdin when omitted)
    #[arg(value_name = "INPUT", conflicts_with = "input")]
    path: Option<PathBuf>,

    /// Request document (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Response document (writes stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail when a bus passes between stops without a declared road distance
    /// instead of falling back to the straight-line distance
    #[arg(long)]
    strict_distances: bool,

    /// Pretty-print the response document
    #[arg(long)]
    pretty: bool,

    /// Verbose output (show debug messages); RUST_LOG takes precedence
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .without_time();

    tracing_subscriber::registry().with(filter).with(layer).init();
}

fn read_document(path: Option<&Path>) -> Result<Value> {
    let document = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Input file does not exist: {}", path.display());
            }
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            serde_json::from_str(&buffer).context("Failed to parse stdin")?
        }
    };

    Ok(document)
}

fn write_document(path: Option<&Path>, document: &Value, pretty: bool) -> Result<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if pretty {
        serde_json::to_writer_pretty(&mut writer, document)?;
    } else {
        serde_json::to_writer(&mut writer, document)?;
    }
    writeln!(writer)?;
    writer.flush().context("Failed to write responses")?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let input = args.path.as_deref().or(args.input.as_deref());
    let policy = if args.strict_distances {
        DistancePolicy::Strict
    } else {
        DistancePolicy::Lenient
    };

    let document = read_document(input)?;

    let mut dispatcher = Dispatcher::new(policy);
    let responses = dispatcher
        .process_document(&document)
        .context("Failed to process request document")?;
    tracing::info!(
        responses = responses.as_array().map_or(0, Vec::len),
        "processed request document"
    );

    write_document(args.output.as_deref(), &responses, args.pretty)
}
