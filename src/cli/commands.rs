use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sert-sweep")]
#[command(about = "Sweeps the sert-reestr.net certificate registry for documents that are still valid")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (extension optional)
    #[arg(short, long, global = true, default_value = "config/default")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sweep the identifier range and log valid documents and errors
    Scan {
        /// Number of identifiers to check, starting at 0
        #[arg(short, long)]
        total: Option<u32>,

        /// Documents fetched concurrently per batch
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Detail page URL prefix the zero-padded id is appended to
        #[arg(long)]
        base_url: Option<String>,

        /// Valid documents log
        #[arg(long)]
        valid_out: Option<String>,

        /// Errors log
        #[arg(long)]
        errors_out: Option<String>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Check a single document and print its outcome
    Check {
        /// Document identifier
        id: u32,
    },

    /// Show the effective configuration
    Config {
        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_overrides() {
        let cli = Cli::parse_from([
            "sert-sweep",
            "scan",
            "--total",
            "250",
            "-b",
            "50",
            "--quiet",
        ]);
        match cli.command {
            Commands::Scan { total, batch_size, quiet, base_url, .. } => {
                assert_eq!(total, Some(250));
                assert_eq!(batch_size, Some(50));
                assert!(quiet);
                assert_eq!(base_url, None);
            }
            _ => panic!("expected scan"),
        }
        assert_eq!(cli.config, "config/default");
    }

    #[test]
    fn test_parse_check_with_global_config() {
        let cli = Cli::parse_from(["sert-sweep", "check", "1234", "--config", "local.toml"]);
        assert!(matches!(cli.command, Commands::Check { id: 1234 }));
        assert_eq!(cli.config, "local.toml");
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
