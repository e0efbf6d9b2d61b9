use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comicvine_metadata::config::{
    find_config_file, get_config, load_config, to_toml, Config, CONFIG_FILE_NAME,
};
use comicvine_metadata::models::{
    ApiSettings, IssueDetailsRequest, IssueLookupRequest, NormalizedMetadata, VolumeIssuesRequest,
};
use comicvine_metadata::sources::ComicVineSource;
use comicvine_metadata::utils::{detail_table, issues_table, HttpClient};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ComicVine Metadata - Fetch and normalize comic issue metadata from ComicVine
#[derive(Parser, Debug)]
#[command(name = "comicvine-metadata")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch and normalize comic issue metadata from ComicVine", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// ComicVine API key
    #[arg(long, global = true, env = "COMICVINE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// ComicVine API root
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Seconds to wait between page requests
    #[arg(long, global = true)]
    delay: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every issue of a volume
    #[command(alias = "v")]
    Issues {
        /// ComicVine volume id (without the 4050- prefix)
        volume_id: String,

        /// Fetch each issue's details to fill in cover and store dates
        #[arg(long)]
        enrich_dates: bool,
    },

    /// Find the issues of a volume by issue number
    #[command(alias = "l")]
    Lookup {
        /// ComicVine volume id (without the 4050- prefix)
        volume_id: String,

        /// Issue number as printed on the cover
        issue_number: String,
    },

    /// Show the full details of one issue
    #[command(alias = "i")]
    Issue {
        /// ComicVine issue id (without the 4000- prefix)
        issue_id: String,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: ./comicvine-metadata.toml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        load_config(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else {
        get_config()
    };

    init_tracing(&cli, &config);

    if let Some(config_path) = cli.config.clone().or_else(find_config_file) {
        tracing::debug!("Using config file: {}", config_path.display());
    }

    let settings = {
        let mut settings = config.api_settings();
        if let Some(api_key) = &cli.api_key {
            settings.api_key = api_key.clone();
        }
        if let Some(base_url) = &cli.base_url {
            settings = settings.base_url(base_url.clone());
        }
        if let Some(delay) = cli.delay {
            settings = settings.delay_seconds(delay);
        }
        settings
    };

    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.http.timeout());
    let client = HttpClient::with_timeouts(timeout, config.http.connect_timeout())?;
    let source = ComicVineSource::with_client(Arc::new(client));

    // The Ctrl-C listener replaces the default SIGINT exit, so stop here too
    let interrupt = source.throttle().interrupt().clone();
    tokio::select! {
        result = run_command(cli.command, &source, settings, cli.output, cli.quiet) => result,
        _ = interrupt.fired() => anyhow::bail!("Interrupted"),
    }
}

async fn run_command(
    command: Commands,
    source: &ComicVineSource,
    settings: ApiSettings,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        Commands::Issues {
            volume_id,
            enrich_dates,
        } => {
            let request = VolumeIssuesRequest::new(settings, volume_id).enrich_dates(enrich_dates);
            let records = source.get_all_issues(&request).await?;

            if !quiet {
                tracing::info!("Retrieved {} issue(s)", records.len());
            }
            output_issues(&records, output)?;
        }

        Commands::Lookup {
            volume_id,
            issue_number,
        } => {
            let request = IssueLookupRequest::new(settings, volume_id, issue_number);
            let records = source.lookup_issue(&request).await?;
            output_issues(&records, output)?;
        }

        Commands::Issue { issue_id } => {
            let request = IssueDetailsRequest::new(settings, issue_id);
            let record = source.get_issue_details(&request).await?;
            output_issue(&record, output)?;
        }

        Commands::InitConfig { path, force } => {
            let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }

            // Never write a key picked up from the environment
            let mut template = Config::default();
            template.api_keys.comicvine = None;
            std::fs::write(&path, to_toml(&template)?)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            if !quiet {
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}

/// Install the tracing subscriber; `RUST_LOG` wins over flags and config
fn init_tracing(cli: &Cli, config: &Config) {
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("comicvine_metadata={}", env_filter)),
    );

    // Logs go to stderr so JSON output on stdout stays parseable
    if config.logging.is_json() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn output_issues(records: &[NormalizedMetadata], format: OutputFormat) -> Result<()> {
    match format.resolve() {
        OutputFormat::Table => println!("{}", issues_table(records)),
        _ => println!("{}", serde_json::to_string_pretty(records)?),
    }
    Ok(())
}

fn output_issue(record: &NormalizedMetadata, format: OutputFormat) -> Result<()> {
    match format.resolve() {
        OutputFormat::Table => println!("{}", detail_table(record)),
        _ => println!("{}", serde_json::to_string_pretty(record)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_issues_command() {
        let cli = Cli::parse_from(["comicvine-metadata", "issues", "219"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        match cli.command {
            Commands::Issues {
                volume_id,
                enrich_dates,
            } => {
                assert_eq!(volume_id, "219");
                assert!(!enrich_dates);
            }
            _ => panic!("Expected Issues command"),
        }
    }

    #[test]
    fn test_cli_issues_with_options() {
        let cli = Cli::parse_from([
            "comicvine-metadata",
            "issues",
            "219",
            "--enrich-dates",
            "--delay",
            "3",
            "-o",
            "json",
            "-vv",
        ]);
        assert_eq!(cli.delay, Some(3));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Issues {
                enrich_dates: true,
                ..
            }
        ));
    }

    #[test]
    fn test_cli_issue_command() {
        let cli = Cli::parse_from([
            "comicvine-metadata",
            "--api-key",
            "abc",
            "--base-url",
            "http://localhost:1234/api",
            "issue",
            "71765",
        ]);
        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:1234/api"));
        match cli.command {
            Commands::Issue { issue_id } => assert_eq!(issue_id, "71765"),
            _ => panic!("Expected Issue command"),
        }
    }

    #[test]
    fn test_cli_lookup_command() {
        let cli = Cli::parse_from(["comicvine-metadata", "lookup", "219", "989"]);
        match cli.command {
            Commands::Lookup {
                volume_id,
                issue_number,
            } => {
                assert_eq!(volume_id, "219");
                assert_eq!(issue_number, "989");
            }
            _ => panic!("Expected Lookup command"),
        }
    }

    #[test]
    fn test_cli_init_config_command() {
        let cli = Cli::parse_from(["comicvine-metadata", "init-config", "--path", "/tmp/cv.toml"]);
        match cli.command {
            Commands::InitConfig { path, force } => {
                assert_eq!(path, Some(PathBuf::from("/tmp/cv.toml")));
                assert!(!force);
            }
            _ => panic!("Expected InitConfig command"),
        }
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["comicvine-metadata"]).is_err());
    }

    #[test]
    fn test_output_format_resolve_keeps_explicit() {
        assert_eq!(OutputFormat::Json.resolve(), OutputFormat::Json);
        assert_eq!(OutputFormat::Table.resolve(), OutputFormat::Table);
    }
}
