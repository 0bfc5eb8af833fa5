//! batch-query - rate-limited batch LLM query client
//!
//! Sends a list of prompts to a remote LLM one at a time with a fixed pause
//! between calls, records per-query latency and reports distribution
//! statistics.
//!
//! ## Features
//!
//! - Cloudflare Workers AI responder, or an offline demo responder
//! - Batch-oriented progress logging and fixed-delay pacing
//! - Failed queries are recorded, never fatal to the run
//! - Min/max/median/p95/p99/stddev and consistency analysis
//! - Text, JSON, Markdown and CSV reports
//!
//! ## Usage
//!
//! ```bash
//! # Run the built-in prompt set against Workers AI
//! export CLOUDFLARE_API_KEY=... CLOUDFLARE_ACCOUNT_ID=...
//! batch-query run --questions 10 --delay 0.5 --batch-size 5
//!
//! # Offline demo run with a JSON report
//! batch-query run --demo --format json-pretty --output report.json
//!
//! # Prompts from a file
//! batch-query run --prompts-file prompts.txt
//!
//! # List the built-in prompts
//! batch-query list --detailed
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod batch;
mod cli;
mod config;
mod http;
mod models;
mod responder;
mod utils;

use batch::{
    BatchQueryClient, LogProgress, ReportFormat, ReportRenderer, RunEnvironment, RunReport,
};
use cli::Args;
use config::{AppConfig, ConfigError, ConfigFile, EnvConfig};
use models::{load_prompts_file, PromptCategory, BUILTIN_PROMPTS};
use responder::{CloudflareResponder, DemoResponder, Responder};
use utils::{init_logger, LogLevel, Timer};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let level = args
        .log_level
        .unwrap_or_else(|| LogLevel::from_verbose(args.verbose || env.verbose.unwrap_or(false)));
    init_logger(level);

    let config_path = args.config.clone().or_else(|| env.config_file.clone());

    match args.command {
        cli::Command::Run(run_args) => {
            run_queries(run_args, config_path.as_deref(), &env).await?;
        }
        cli::Command::List(list_args) => {
            list_prompts(list_args);
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, config_path.as_deref(), &env)?;
        }
    }

    Ok(())
}

/// Layer config file, environment and command-line flags, then validate
fn resolve_config(
    mut config: AppConfig,
    env: &EnvConfig,
    args: &cli::RunArgs,
) -> Result<AppConfig, ConfigError> {
    config.apply_env(env);

    if let Some(delay) = args.delay {
        config.delay_secs = delay;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(format) = &args.format {
        config.format = format.clone();
    }
    if args.demo {
        config.demo = true;
    }

    config.validate()?;
    Ok(config)
}

/// Prompts from a file or the built-in set, truncated to `limit`
fn select_prompts(
    prompts_file: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<String>, ConfigError> {
    let mut prompts = match prompts_file {
        Some(path) => load_prompts_file(path)?,
        None => BUILTIN_PROMPTS.iter().map(|p| p.to_string()).collect(),
    };
    if let Some(limit) = limit {
        prompts.truncate(limit);
    }
    Ok(prompts)
}

/// Choose the responder named by configuration
fn build_responder(config: &AppConfig, env: &EnvConfig) -> Result<Arc<dyn Responder>> {
    if config.demo {
        info!("Demo mode enabled, responses are placeholders");
        return Ok(Arc::new(DemoResponder::new(&config.demo_responder)));
    }

    let credentials = env.credentials()?;
    let responder = CloudflareResponder::new(
        &credentials,
        &config.api_base,
        &config.model,
        config.timeout_secs,
    )
    .context("Failed to create Cloudflare responder")?;
    info!("Using Workers AI model {}", responder.model());
    Ok(Arc::new(responder))
}

async fn run_queries(
    args: cli::RunArgs,
    config_path: Option<&str>,
    env: &EnvConfig,
) -> Result<()> {
    let file = ConfigFile::load_or_default(config_path)?;
    let config = resolve_config(file.app, env, &args)?;
    let format: ReportFormat = config.format.parse()?;
    let delay = Duration::try_from_secs_f64(config.delay_secs)
        .map_err(|_| ConfigError::InvalidDelay(config.delay_secs))?;

    let prompts = select_prompts(args.prompts_file.as_deref(), args.questions)?;
    let responder = build_responder(&config, env)?;

    if prompts.is_empty() {
        warn!("No prompts to submit");
    }
    info!(
        "Processing {} questions with {}s delay between queries",
        prompts.len(),
        config.delay_secs
    );

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing with partial results");
            interrupt.cancel();
        }
    });

    let environment = RunEnvironment {
        responder: responder.name().to_string(),
        model: config.model.clone(),
        api_key_set: env.api_key.is_some(),
        account_id_set: env.account_id.is_some(),
        demo_mode: config.demo,
        delay_secs: config.delay_secs,
        batch_size: config.batch_size,
    };

    let client = BatchQueryClient::new(responder, config.system_prompt.clone())
        .with_progress(Arc::new(LogProgress))
        .with_cancellation(cancel);

    let timer = Timer::start("run");
    let results = client.submit(&prompts, delay, config.batch_size).await;
    let report = RunReport::new(environment, prompts.len(), results, timer.elapsed_secs());

    info!("{}", report.summary.format_summary());
    if report.summary.latency.count > 0 {
        info!("{}", report.summary.latency.format_summary());
    }

    let renderer = ReportRenderer::new(format).show_all(args.show_all);
    match &args.output {
        Some(path) => {
            renderer.write_to(&report, path)?;
            println!("Report written to {path}");
        }
        None => println!("{}", renderer.render(&report)?),
    }

    Ok(())
}

fn list_prompts(args: cli::ListArgs) {
    println!("\nBuilt-in Prompt Set ({} total)\n", BUILTIN_PROMPTS.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for category in PromptCategory::all() {
        let (start, end) = category.range();
        println!("\n{category}: {}", category.description());
        println!("──────────────────────────────────────────────────────────────────────");

        for n in start..=end {
            let Some(prompt) = BUILTIN_PROMPTS.get(n - 1) else {
                break;
            };
            if args.detailed {
                println!("  {n:2}. [{}] {prompt}", category.name());
            } else {
                let short: String = prompt.chars().take(66).collect();
                let ellipsis = if prompt.chars().count() > 66 { "…" } else { "" };
                println!("  {n:2}. {short}{ellipsis}");
            }
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

fn manage_config(args: cli::ConfigArgs, config_path: Option<&str>, env: &EnvConfig) -> Result<()> {
    match args.action {
        cli::ConfigAction::Show => {
            let mut config = ConfigFile::load_or_default(config_path)?.app;
            config.apply_env(env);
            let yaml = serde_yaml::to_string(&config).context("Failed to serialize config")?;
            println!("Effective Configuration:\n{yaml}");
            env.print_summary();
        }
        cli::ConfigAction::Init { path, force } => {
            if Path::new(&path).exists() && !force {
                anyhow::bail!("{path} already exists (use --force to overwrite)");
            }
            ConfigFile::example().save(&path)?;
            println!("Wrote example configuration to {path}");
        }
        cli::ConfigAction::Env => {
            config::print_env_help();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_env_and_file() {
        let file = AppConfig {
            delay_secs: 2.0,
            batch_size: 7,
            ..Default::default()
        };
        let env = EnvConfig {
            delay: Some(1.0),
            format: Some("json".to_string()),
            ..Default::default()
        };
        let args = cli::RunArgs {
            delay: Some(0.0),
            demo: true,
            ..Default::default()
        };

        let config = resolve_config(file, &env, &args).unwrap();
        assert_eq!(config.delay_secs, 0.0);
        assert_eq!(config.batch_size, 7);
        assert_eq!(config.format, "json");
        assert!(config.demo);
    }

    #[test]
    fn test_resolve_rejects_invalid_values() {
        let args = cli::RunArgs {
            batch_size: Some(0),
            ..Default::default()
        };
        assert_eq!(
            resolve_config(AppConfig::default(), &EnvConfig::default(), &args),
            Err(ConfigError::InvalidBatchSize(0))
        );

        let args = cli::RunArgs {
            delay: Some(-0.5),
            ..Default::default()
        };
        assert_eq!(
            resolve_config(AppConfig::default(), &EnvConfig::default(), &args),
            Err(ConfigError::InvalidDelay(-0.5))
        );
    }

    #[test]
    fn test_flag_overrides_invalid_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch-query.yaml");
        std::fs::write(&path, "app:\n  batch_size: 0\n").unwrap();
        let file = ConfigFile::load_or_default(path.to_str()).unwrap();

        let args = cli::RunArgs {
            batch_size: Some(5),
            ..Default::default()
        };
        let config = resolve_config(file.app.clone(), &EnvConfig::default(), &args).unwrap();
        assert_eq!(config.batch_size, 5);

        assert_eq!(
            resolve_config(file.app, &EnvConfig::default(), &cli::RunArgs::default()),
            Err(ConfigError::InvalidBatchSize(0))
        );
    }

    #[test]
    fn test_select_builtin_prompts() {
        let all = select_prompts(None, None).unwrap();
        assert_eq!(all.len(), BUILTIN_PROMPTS.len());

        let limited = select_prompts(None, Some(5)).unwrap();
        assert_eq!(limited.len(), 5);
        assert_eq!(limited[0], BUILTIN_PROMPTS[0]);

        let over = select_prompts(None, Some(1000)).unwrap();
        assert_eq!(over.len(), BUILTIN_PROMPTS.len());
    }

    #[test]
    fn test_live_mode_requires_credentials() {
        let config = AppConfig::default();
        let err = build_responder(&config, &EnvConfig::default()).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_demo_mode_needs_no_credentials() {
        let config = AppConfig {
            demo: true,
            ..Default::default()
        };
        let responder = build_responder(&config, &EnvConfig::default()).unwrap();
        assert_eq!(responder.name(), "demo");
    }

    #[test]
    fn test_live_mode_builds_cloudflare_responder() {
        let env = EnvConfig {
            api_key: Some("k".to_string()),
            account_id: Some("a".to_string()),
            ..Default::default()
        };
        let responder = build_responder(&AppConfig::default(), &env).unwrap();
        assert_eq!(responder.name(), "cloudflare");
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_run_end_to_end() {
        let config = AppConfig {
            demo: true,
            ..Default::default()
        };
        let responder = build_responder(&config, &EnvConfig::default()).unwrap();
        let prompts = select_prompts(None, Some(4)).unwrap();

        let results = BatchQueryClient::new(responder, config.system_prompt.clone())
            .submit(&prompts, Duration::from_millis(10), 2)
            .await;
        let environment = RunEnvironment {
            responder: "demo".to_string(),
            model: config.model.clone(),
            api_key_set: false,
            account_id_set: false,
            demo_mode: true,
            delay_secs: 0.01,
            batch_size: 2,
        };
        let report = RunReport::new(environment, prompts.len(), results, 1.0);

        assert_eq!(report.summary.successful, 4);
        assert!(!report.cancelled);
        assert!(report.summary.latency.min >= 100.0);
        assert!(report.summary.latency.max <= 151.0);
    }
}
