mod cli;

use moovprobe::{
    config,
    probe::{ProbeOutcome, Prober},
    MovieDuration,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "moovprobe=debug,moovprobe_media=trace".to_string()
        } else {
            "moovprobe=warn,moovprobe_media=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Duration {
            locators,
            json,
            verify_mvhd,
            max_boxes,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            let all_ok = rt.block_on(run_duration(
                locators,
                cli.config.as_deref(),
                json,
                verify_mvhd,
                max_boxes,
            ))?;
            if !all_ok {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("moovprobe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ProbeReport<'a> {
    locator: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    movie: Option<&'a MovieDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a ProbeOutcome> for ProbeReport<'a> {
    fn from(outcome: &'a ProbeOutcome) -> Self {
        match &outcome.result {
            Ok(movie) => Self {
                locator: &outcome.locator,
                seconds: Some(movie.seconds()),
                movie: Some(movie),
                error: None,
            },
            Err(e) => Self {
                locator: &outcome.locator,
                seconds: None,
                movie: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Returns whether every query succeeded.
async fn run_duration(
    locators: Vec<String>,
    config_path: Option<&std::path::Path>,
    json: bool,
    verify_mvhd: bool,
    max_boxes: Option<usize>,
) -> Result<bool> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override walk options from CLI if specified
    if verify_mvhd {
        config.walk.verify_movie_header = true;
    }
    if let Some(max_boxes) = max_boxes {
        if max_boxes == 0 {
            anyhow::bail!("--max-boxes must be at least 1");
        }
        config.walk.max_boxes = max_boxes;
    }

    let prober = Prober::new(&config)?;
    let outcomes = prober.probe_many(locators).await;
    let all_ok = outcomes.iter().all(|o| o.result.is_ok());

    if json {
        let reports: Vec<ProbeReport> = outcomes.iter().map(ProbeReport::from).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(movie) => println!("{}\t{:.3}", outcome.locator, movie.seconds()),
                Err(e) => eprintln!("{}\terror: {}", outcome.locator, e),
            }
        }
    }

    Ok(all_ok)
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_summary(&config::Config::default());
        }
    }

    Ok(())
}

fn print_summary(config: &config::Config) {
    println!("  HTTP timeout: {}s", config.http.timeout_secs);
    println!("  User agent: {}", config.http.user_agent);
    println!("  Extra headers: {}", config.http.headers.len());
    println!("  Max boxes: {}", config.walk.max_boxes);
    match config.walk.max_offset {
        Some(max) => println!("  Max offset: {}", max),
        None => println!("  Max offset: unlimited"),
    }
    println!("  Verify mvhd: {}", config.walk.verify_movie_header);
    println!("  Concurrency: {}", config.probe.concurrency);
}
