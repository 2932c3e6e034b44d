//! Subforge - subdomain permutation generator
//!
//! Reads domains from `-l` or stdin, expands them through patterns and
//! payloads and writes one candidate name per line.

use anyhow::{bail, Context};
use clap::Parser;
use std::collections::HashMap;
use std::future::Future;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use tokio::io::{AsyncBufReadExt, AsyncWrite, BufReader, BufWriter};
use tokio_util::sync::CancellationToken;

use subforge::config::{load_wordlist, resolve_payload_values};
use subforge::{Mutator, Options, PermutationConfig, SubforgeError};

/// Exit code used when the run was interrupted
const EXIT_CANCELLED: i32 = 130;

#[derive(Parser, Debug)]
#[command(name = "subforge")]
#[command(author, version, about = "Template-driven subdomain permutation generator", long_about = None)]
struct Cli {
    /// Input domains: comma-separated list or a file with one domain per line (default: stdin)
    #[arg(short, long, value_name = "DOMAINS|FILE")]
    list: Option<String>,

    /// Pattern to apply, e.g. "{{word}}-{{sub}}.{{suffix}}" (repeatable)
    #[arg(short = 'p', long = "pattern", value_name = "PATTERN")]
    patterns: Vec<String>,

    /// Payload as NAME=v1,v2 or NAME=/path/to/wordlist (repeatable)
    #[arg(long = "payload", value_name = "NAME=VALUES|FILE")]
    payloads: Vec<String>,

    /// Permutation config file (YAML, or JSON with a .json extension)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the estimated number of permutations and exit
    #[arg(long)]
    estimate: bool,

    /// Maximum number of results to write (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// Maximum output size in bytes (0 = unlimited)
    #[arg(long, value_name = "BYTES", default_value_t = 0)]
    max_size: usize,

    /// Add words and numbers found in the input subdomains to the payloads
    #[arg(long)]
    enrich: bool,

    /// Keep duplicate results
    #[arg(long)]
    no_dedupe: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(long, conflicts_with = "verbose")]
    silent: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize the library
    if let Err(e) = subforge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }
    init_logging(&cli);

    let token = CancellationToken::new();
    match shutdown_signal() {
        Ok(signal) => {
            let signal_token = token.clone();
            tokio::spawn(async move {
                signal.await;
                tracing::warn!("Shutdown signal received, stopping");
                signal_token.cancel();
            });
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install signal handlers"),
    }

    if let Err(e) = run(cli, token).await {
        match e.downcast_ref::<SubforgeError>() {
            Some(err) if err.is_cancelled() => {
                tracing::warn!("Run cancelled");
                process::exit(EXIT_CANCELLED);
            }
            Some(err) => eprintln!("{}", err.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.silent {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves on Ctrl-C or SIGTERM. Handlers are registered before this returns.
#[cfg(unix)]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    })
}

/// Resolves on Ctrl-C
#[cfg(not(unix))]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
    })
}

/// Main permutation workflow
async fn run(cli: Cli, token: CancellationToken) -> anyhow::Result<()> {
    let mut options = Options {
        domains: read_domains(cli.list.as_deref()).await?,
        patterns: cli.patterns,
        payloads: parse_payload_flags(&cli.payloads)?,
        limit: (cli.limit > 0).then_some(cli.limit),
        max_size: (cli.max_size > 0).then_some(cli.max_size),
        enrich: cli.enrich,
        dedupe: !cli.no_dedupe,
    };

    if let Some(path) = &cli.config {
        let config = PermutationConfig::load(path)?;
        if !config.patterns.is_empty() {
            options.patterns = config.patterns;
        }
        if !config.payloads.is_empty() {
            options.payloads = config.payloads;
        }
    }

    let mut mutator = Mutator::new(options)?;

    if cli.estimate {
        let count = mutator.estimate_count();
        tracing::info!("Estimated permutations (including duplicates): {}", count);
        println!("{}", count);
        return Ok(());
    }

    match &cli.output {
        Some(path) => {
            let file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            write_results(&mut mutator, &token, BufWriter::new(file)).await
        }
        None => write_results(&mut mutator, &token, BufWriter::new(tokio::io::stdout())).await,
    }
}

async fn write_results<W>(mutator: &mut Mutator, token: &CancellationToken, mut writer: W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    mutator.execute_with_writer(token, Some(&mut writer)).await?;
    Ok(())
}

/// Domains from `-l` (file or comma-separated list), or stdin when piped
async fn read_domains(list: Option<&str>) -> anyhow::Result<Vec<String>> {
    if let Some(list) = list {
        let path = Path::new(list);
        if path.is_file() {
            return Ok(load_wordlist(path)?);
        }
        return Ok(split_list(list));
    }

    if std::io::stdin().is_terminal() {
        return Ok(Vec::new());
    }

    let mut domains = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if !line.is_empty() {
            domains.push(line.to_string());
        }
    }
    Ok(domains)
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `--payload NAME=VALUES` flags; repeated names accumulate
fn parse_payload_flags(flags: &[String]) -> anyhow::Result<HashMap<String, Vec<String>>> {
    let mut payloads: HashMap<String, Vec<String>> = HashMap::new();
    for flag in flags {
        let Some((name, values)) = flag.split_once('=') else {
            bail!("invalid payload '{}': expected NAME=VALUES or NAME=FILE", flag);
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("invalid payload '{}': name is empty", flag);
        }
        payloads
            .entry(name.to_string())
            .or_default()
            .extend(resolve_payload_values(split_list(values)));
    }
    Ok(payloads)
}
