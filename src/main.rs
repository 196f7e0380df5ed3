mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use sert_reestr_sweep::{
    config::Config,
    error::{self, SweepError},
    registry::{DocumentId, DocumentOutcome, RegistryClient},
    storage::{OutputSinks, ValidLine},
    sweep::{BatchRunner, DocumentChecker, ExpiryValidator},
    utils,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sert_reestr_sweep=info,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Scan {
            total,
            batch_size,
            base_url,
            valid_out,
            errors_out,
            quiet,
        } => {
            let mut config = config;
            if let Some(total) = total {
                config.sweep.total_documents = total;
            }
            if let Some(batch_size) = batch_size {
                config.sweep.batch_size = batch_size;
            }
            if let Some(base_url) = base_url {
                config.registry.base_url = base_url;
            }
            if let Some(path) = valid_out {
                config.output.valid_path = path;
            }
            if let Some(path) = errors_out {
                config.output.errors_path = path;
            }
            run_scan(&config, quiet).await
        }

        Commands::Check { id } => {
            info!("Checking document {}", id);
            check_document(&config, DocumentId(id)).await
        }

        Commands::Config { format } => show_config(&config, &format),
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn build_checker(config: &Config) -> error::Result<DocumentChecker<RegistryClient>> {
    let client = RegistryClient::new(&config.registry)?;
    Ok(DocumentChecker::new(
        client,
        ExpiryValidator::new(config.sweep.date_format.clone()),
        config.registry.base_url.clone(),
        config.registry.id_width,
    )?)
}

async fn run_scan(config: &Config, quiet: bool) -> error::Result<()> {
    config.validate()?;

    let mut sinks = OutputSinks::create(&config.output.valid_path, &config.output.errors_path)?;
    let runner = BatchRunner::new(
        build_checker(config)?,
        config.sweep.total_documents,
        config.sweep.batch_size,
        utils::sweep_progress_bar(config.sweep.total_documents, quiet),
    );

    println!(
        "{}",
        format!(
            "Sweeping {} documents from {}",
            config.sweep.total_documents, config.registry.base_url
        )
        .cyan()
    );

    let summary = runner.run(&mut sinks).await?;
    summary.print_summary();
    Ok(())
}

async fn check_document(config: &Config, id: DocumentId) -> error::Result<()> {
    let checker = build_checker(config)?;

    match checker.check(id).await {
        DocumentOutcome::Valid(document) => {
            println!("{}", ValidLine::new(1, document).to_string().green());
        }
        DocumentOutcome::NotApplicable => {
            println!(
                "{} {}",
                checker.url_for(id),
                "is expired or carries no expiration date".yellow()
            );
        }
        DocumentOutcome::Failed { message } => {
            println!("{}", utils::format_error_announcement(&message));
        }
    }
    Ok(())
}

fn show_config(config: &Config, format: &str) -> error::Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        "table" => {
            println!("{}", "=== Sweep Configuration ===".cyan().bold());
            println!("  Base URL:        {}", config.registry.base_url);
            println!("  Id width:        {}", config.registry.id_width);
            println!(
                "  Timeout:         {}",
                config
                    .registry
                    .timeout_secs
                    .map(|s| format!("{}s", s))
                    .unwrap_or_else(|| "client default".to_string())
            );
            println!("  Total documents: {}", config.sweep.total_documents);
            println!("  Batch size:      {}", config.sweep.batch_size);
            println!("  Date format:     {}", config.sweep.date_format);
            println!("  Valid log:       {}", config.output.valid_path);
            println!("  Errors log:      {}", config.output.errors_path);
        }
        other => {
            return Err(SweepError::InvalidInput(format!("Unknown format: {}", other)));
        }
    }
    Ok(())
}
