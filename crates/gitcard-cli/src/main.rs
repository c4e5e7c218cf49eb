mod config;
mod server;

use chrono::{DateTime, Utc};
use config::{ConfigError, ServerConfig};
use gitcard::raster::{RasterError, svg_to_png};
use gitcard::{CardSnapshot, GithubClient, fetch_snapshot};
use serde::Serialize;
use std::io::Read;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "gitcard=info,gitcard_cli=info";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Config(ConfigError),
    Card(gitcard::CardError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "configuration error: {err}"),
            CliError::Card(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<gitcard::CardError> for CliError {
    fn from(value: gitcard::CardError) -> Self {
        Self::Card(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Serve,
    Fetch,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    addr: Option<SocketAddr>,
    login: Option<String>,
    snapshot: Option<String>,
    pretty: bool,
    now: Option<DateTime<Utc>>,
    render_format: RenderFormat,
    render_scale: f32,
    out: Option<String>,
}

fn usage() -> &'static str {
    "gitcard-cli\n\
\n\
USAGE:\n\
  gitcard-cli [serve] [--addr <host:port>]\n\
  gitcard-cli fetch [--login <name>] [--pretty] [--out <path>]\n\
  gitcard-cli layout [--login <name>] [--snapshot <path>|-] [--now <rfc3339>] [--pretty]\n\
  gitcard-cli render [--login <name>] [--snapshot <path>|-] [--now <rfc3339>] [--format svg|png] [--scale <n>] [--out <path>]\n\
\n\
NOTES:\n\
  - Settings are read from the environment (and a .env file): GITHUB_USERNAME, GITHUB_TOKEN,\n\
    GITHUB_API_URL, HOST, PORT, MASCOT_PATH, CACHE_CONTROL and the card color/toggle keys.\n\
  - fetch records the upstream data as a JSON snapshot; layout and render read it back with\n\
    --snapshot instead of calling the API ('-' reads stdin).\n\
  - --now fixes the reference time for the last-year contribution count.\n\
  - render prints SVG to stdout by default; PNG output defaults to writing next to the\n\
    snapshot file (or ./card.png).\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Serve,
        render_format: RenderFormat::Svg,
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "serve" => args.command = Command::Serve,
            "fetch" => args.command = Command::Fetch,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--addr" => {
                let addr = next_value(&mut it)?;
                args.addr = Some(addr.parse().map_err(|_| CliError::Usage(usage()))?);
            }
            "--login" => {
                let login = next_value(&mut it)?.trim();
                if login.is_empty() {
                    return Err(CliError::Usage(usage()));
                }
                args.login = Some(login.to_string());
            }
            "--snapshot" => args.snapshot = Some(next_value(&mut it)?.clone()),
            "--now" => {
                let now = next_value(&mut it)?;
                let parsed = DateTime::parse_from_rfc3339(now.trim())
                    .map_err(|_| CliError::Usage(usage()))?;
                args.now = Some(parsed.with_timezone(&Utc));
            }
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = next_value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            _ => return Err(CliError::Usage(usage())),
        }
    }

    Ok(args)
}

fn read_input(input: &str) -> Result<String, CliError> {
    match input {
        "-" => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        path => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    write_text(&text, out)
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_png_out_path(snapshot: Option<&str>) -> std::path::PathBuf {
    match snapshot {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension("png"),
        _ => std::path::PathBuf::from("card.png"),
    }
}

/// Loads the recorded snapshot when one is given, otherwise fetches live data.
async fn load_snapshot(args: &Args, config: &ServerConfig) -> Result<CardSnapshot, CliError> {
    if let Some(path) = args.snapshot.as_deref() {
        let text = read_input(path)?;
        return Ok(serde_json::from_str(&text)?);
    }
    let client = GithubClient::new(&config.api_base, config.token.clone())?;
    let login = args.login.as_deref().unwrap_or(&config.login);
    Ok(fetch_snapshot(&client, login).await?)
}

async fn run(args: Args) -> Result<(), CliError> {
    let mut config = ServerConfig::from_env()?;
    if let Some(addr) = args.addr {
        config.addr = addr;
    }
    if let Some(login) = args.login.as_deref() {
        config.login = login.to_string();
    }
    let now = args.now.unwrap_or_else(Utc::now);

    match args.command {
        Command::Serve => server::serve(config).await,
        Command::Fetch => {
            let snapshot = load_snapshot(&args, &config).await?;
            write_json(&snapshot, args.pretty, args.out.as_deref())
        }
        Command::Layout => {
            let snapshot = load_snapshot(&args, &config).await?;
            let mascot = config.load_mascot()?;
            let layout = snapshot.layout(&config.card, mascot.as_ref(), now)?;
            write_json(&layout, args.pretty, args.out.as_deref())
        }
        Command::Render => {
            let snapshot = load_snapshot(&args, &config).await?;
            let mascot = config.load_mascot()?;
            let svg = snapshot.render_svg(&config.card, mascot.as_ref(), now)?;
            match args.render_format {
                RenderFormat::Svg => write_text(&svg, args.out.as_deref()),
                RenderFormat::Png => {
                    let png = svg_to_png(&svg, args.render_scale)?;
                    let out = args
                        .out
                        .as_deref()
                        .map(std::path::PathBuf::from)
                        .unwrap_or_else(|| default_png_out_path(args.snapshot.as_deref()));
                    std::fs::write(&out, png)?;
                    tracing::info!(path = %out.display(), "wrote PNG");
                    Ok(())
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
