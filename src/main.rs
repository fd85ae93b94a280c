use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use evonode::config::Config;
use evonode::evolution::credentials::CREDENTIALS_NAME;
use evonode::evolution::http::{format_api_error, EvolutionHttpClient};
use evonode::node::host::{CredentialSource, StaticParameters};
use evonode::node::{self, node_description};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Run Evolution API node operations from the command line
#[derive(Parser, Debug)]
#[command(name = "evonode", version, about, long_about = None)]
struct Args {
    /// Resource, e.g. instances-api or messages-api
    #[arg(short, long, required_unless_present_any = ["list", "save_credentials"])]
    resource: Option<String>,

    /// Operation within the resource, e.g. sendText
    #[arg(short, long, required_unless_present_any = ["list", "save_credentials"])]
    operation: Option<String>,

    /// YAML or JSON file with parameter values
    #[arg(long)]
    params: Option<PathBuf>,

    /// Parameter as key=value; repeatable.
    /// true/false and plain integers are typed; quoted, list and map values are
    /// read as YAML; everything else stays a string
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    param: Vec<String>,

    /// Stored credentials to use
    #[arg(long, default_value = CREDENTIALS_NAME)]
    credentials: String,

    /// Override the server URL
    #[arg(long)]
    server_url: Option<String>,

    /// Override the API key
    #[arg(long)]
    api_key: Option<String>,

    /// Store the effective server URL and API key under --credentials
    #[arg(long)]
    save_credentials: bool,

    /// Print the request instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// List available operations
    #[arg(long)]
    list: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("evonode started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("evonode").join("evonode.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".evonode").join("evonode.log");
    }
    PathBuf::from("evonode.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    if args.list {
        print_operations();
        return Ok(());
    }

    let mut config = Config::load()
        .with_overrides(args.server_url.clone(), args.api_key.clone())
        .with_profile(args.credentials.clone());

    if args.save_credentials {
        config.store_effective(&args.credentials)?;
        config.save()?;
        tracing::info!("Stored credentials '{}'", args.credentials);
        eprintln!("Saved credentials '{}'", args.credentials);

        if args.resource.is_none() && args.operation.is_none() {
            return Ok(());
        }
    }

    let resource = args.resource.clone().unwrap_or_default();
    let operation = args.operation.clone().unwrap_or_default();

    let mut params = load_params(&args)?;
    params.set("resource", Value::String(resource.clone()));
    params.set("operation", Value::String(operation.clone()));

    let items = if args.dry_run {
        let result = config.get_credentials(&args.credentials).and_then(|credentials| {
            credentials.validate()?;
            node::build_request(&resource, &operation, &params, &credentials)
        });
        let prepared = result.map_err(|err| anyhow::anyhow!(format_api_error(&err)))?;
        serde_json::to_value(prepared.descriptor.redacted())?
    } else {
        let client = EvolutionHttpClient::new()?;
        match node::execute(&params, &config, &client).await {
            Ok(items) => serde_json::to_value(items)?,
            Err(err) => {
                tracing::error!("{} failed: {}", operation, err);
                return Err(anyhow::anyhow!(format_api_error(&err)));
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

/// Parameters from `--params` then `--param` overrides
fn load_params(args: &Args) -> Result<StaticParameters> {
    let mut params = StaticParameters::new();

    if let Some(path) = &args.params {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read params file {:?}", path))?;
        let document = parse_params_document(&content)
            .with_context(|| format!("Invalid params file {:?}", path))?;
        params.extend(document);
    }

    for pair in &args.param {
        let (key, value) = parse_param(pair)?;
        params.set(key, value);
    }

    Ok(params)
}

fn parse_params_document(content: &str) -> Result<Map<String, Value>> {
    if content.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_yaml::from_str::<Value>(content).context("Failed to parse YAML/JSON")? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(anyhow::anyhow!("Expected a mapping of parameters, found {}", other)),
    }
}

fn parse_param(pair: &str) -> Result<(String, Value)> {
    let (key, raw) = pair
        .split_once('=')
        .with_context(|| format!("Expected KEY=VALUE, got '{}'", pair))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow::anyhow!("Empty parameter name in '{}'", pair));
    }

    Ok((key.to_string(), parse_param_value(key, raw)))
}

/// Parameters that are identifiers, never numbers
const STRING_PARAMS: &[&str] = &["instanceName", "remoteJid", "phoneNumber", "number", "token"];

fn parse_param_value(key: &str, raw: &str) -> Value {
    if raw.starts_with(['"', '\'', '[', '{']) {
        if let Ok(value) = serde_yaml::from_str::<Value>(raw) {
            return value;
        }
    }

    if STRING_PARAMS.contains(&key) {
        return Value::String(raw.to_string());
    }

    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ if is_plain_integer(raw) => raw
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        _ => Value::String(raw.to_string()),
    }
}

/// Unsigned digits without a leading zero
fn is_plain_integer(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) && (raw == "0" || !raw.starts_with('0'))
}

fn print_operations() {
    let description = node_description();
    println!("{} - {}", description.display_name, description.description);

    for resource in &description.resources {
        println!();
        println!("{} ({})", resource.name, resource.value);
        for op in description.operations_for(&resource.value) {
            println!("  {:<20} {}", op.value, op.description);
            for field in &op.fields {
                let marker = if field.required { "*" } else { " " };
                println!("      {}{:<32} {}", marker, field.name, field.field_type);
            }
        }
    }
}
