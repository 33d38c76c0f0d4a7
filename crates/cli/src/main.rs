use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing::{info, warn};
use vmop_registry::Registry;

#[derive(Parser, Debug)]
#[command(name = "vmopctl", version, about = "Convert VM operator resources between API versions")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Yaml)]
    output: Output,

    /// Refuse inputs larger than this many bytes
    #[arg(long = "max-input-bytes", env = "VMOP_MAX_INPUT_BYTES", global = true, default_value_t = 1 << 20)]
    max_input_bytes: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Yaml, Json }

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered kinds with their hub and spoke versions
    Versions,
    /// Convert an object to another version
    Convert {
        /// Target version, e.g. "v1alpha4"
        #[arg(long = "to")]
        to: String,
        /// Input file (YAML or JSON); "-" or omitted reads stdin
        file: Option<PathBuf>,
    },
    /// Convert to a version and back, then report what did not survive
    Roundtrip {
        /// Intermediate version
        #[arg(long = "via")]
        via: String,
        /// Input file (YAML or JSON); "-" or omitted reads stdin
        file: Option<PathBuf>,
    },
    /// Print the merged multi-version CustomResourceDefinition for a kind
    Crd {
        /// Kind, e.g. "VirtualMachine"
        kind: String,
    },
}

fn init_tracing() {
    let env = std::env::var("VMOP_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}

fn read_input<R: Read>(reader: R, limit: u64) -> Result<Value> {
    let mut buf = String::new();
    reader.take(limit + 1).read_to_string(&mut buf).context("reading input")?;
    if buf.len() as u64 > limit {
        bail!("input exceeds {limit} bytes (VMOP_MAX_INPUT_BYTES)");
    }
    // YAML is a superset of JSON, so one parser covers both.
    let v: Value = serde_yaml::from_str(&buf).context("parsing input as YAML/JSON")?;
    if !v.is_object() {
        bail!("input is not an object");
    }
    Ok(v)
}

fn load(file: Option<&PathBuf>, limit: u64) -> Result<Value> {
    match file {
        Some(p) if p.as_os_str() != "-" => {
            let f = std::fs::File::open(p).with_context(|| format!("opening {}", p.display()))?;
            read_input(f, limit)
        }
        _ => read_input(std::io::stdin().lock(), limit),
    }
}

fn source_version(obj: &Value) -> Result<&str> {
    let av = obj.get("apiVersion").and_then(Value::as_str).context("input has no apiVersion")?;
    Ok(av.rsplit('/').next().unwrap_or(av))
}

fn print<T: serde::Serialize>(output: Output, v: &T) -> Result<()> {
    match output {
        Output::Yaml => print!("{}", serde_yaml::to_string(v)?),
        Output::Json => println!("{}", serde_json::to_string_pretty(v)?),
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let registry = vmop_registry::global().context("building version registry")?;

    match &cli.command {
        Commands::Versions => {
            print(cli.output, &versions(registry))?;
        }
        Commands::Convert { to, file } => {
            let obj = load(file.as_ref(), cli.max_input_bytes)?;
            let from = source_version(&obj)?;
            info!(from, to = %to, "convert invoked");
            let out = registry.convert(&obj, from, to).with_context(|| format!("converting {from} -> {to}"))?;
            print(cli.output, &out)?;
        }
        Commands::Roundtrip { via, file } => {
            let obj = load(file.as_ref(), cli.max_input_bytes)?;
            info!(via = %via, "roundtrip invoked");
            let rt = registry.roundtrip(&obj, via).with_context(|| format!("round trip via {via}"))?;
            print(cli.output, &json!({"from": rt.from, "via": rt.via, "summary": rt.summary}))?;
            if !rt.is_lossless() {
                warn!(adds = rt.summary.adds, updates = rt.summary.updates, removes = rt.summary.removes, "round trip is lossy");
                return Ok(ExitCode::from(2));
            }
        }
        Commands::Crd { kind } => {
            let crd = registry.crd(kind).with_context(|| format!("assembling CRD for {kind}"))?;
            print(cli.output, &crd)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn versions(registry: &Registry) -> Value {
    let kinds: Vec<Value> = registry
        .kinds()
        .map(|kind| {
            let hub = registry.hub_version(kind).unwrap_or_default();
            let spokes: Vec<&str> =
                registry.versions(kind).unwrap_or_default().into_iter().filter(|v| *v != hub).collect();
            json!({"kind": kind, "hub": hub, "spokes": spokes})
        })
        .collect();
    Value::Array(kinds)
}
