//! formcheck server and CLI
//!
//! Verifies a candidate document against a reference template, either as a
//! one-shot command or over HTTP.
//!
//! # Usage
//!
//! ## CLI Mode
//! ```bash
//! formcheck-server verify --template template.pdf --candidate resume.docx
//! formcheck-server field-map --template template.png --output field_map.json
//! formcheck-server export --report report.json --output report.pdf
//! ```
//!
//! ## Server Mode
//! ```bash
//! formcheck-server --config config.json serve --port 8080
//! ```

mod cli;
mod config;
mod error;
mod logging;
mod server;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use formcheck::{Config, VerificationMode, Verifier, VerifierConfig};
use tracing::info;

#[derive(Parser)]
#[command(name = "formcheck-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verify documents against a reference template", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, global = true, env = config::CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Fields,
    Headings,
}

impl From<ModeArg> for VerificationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Fields => VerificationMode::Fields,
            ModeArg::Headings => VerificationMode::Headings,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, short, default_value = "8080", env = "FORMCHECK_PORT")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1", env = "FORMCHECK_HOST")]
        host: String,

        /// Largest accepted request body in megabytes
        #[arg(long, default_value = "25")]
        max_upload_mb: usize,

        /// Override the configured verification mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Verify a candidate document and print the report as JSON
    Verify {
        /// Reference template document
        #[arg(long)]
        template: PathBuf,

        /// Candidate document (resume)
        #[arg(long, alias = "resume")]
        candidate: PathBuf,

        /// Override the configured verification mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
    /// Render a JSON report as PDF
    Export {
        /// JSON report produced by `verify`
        #[arg(long)]
        report: PathBuf,

        /// Destination PDF file
        #[arg(long)]
        output: PathBuf,

        /// Report title
        #[arg(long)]
        title: Option<String>,
    },
    /// Derive a field map from a template and write it as JSON
    FieldMap {
        /// Template document
        #[arg(long)]
        template: PathBuf,

        /// Destination JSON file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn build_verifier(config: &Config, mode: Option<ModeArg>) -> Verifier {
    let mut verifier_config = VerifierConfig::from_config(config);
    if let Some(mode) = mode {
        verifier_config.mode = mode.into();
    }
    Verifier::from_config(Arc::new(verifier_config))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    logging::init_tracing(cli.log_json)?;

    let load_config = || config::load_verifier_config(cli.config.as_deref());

    match cli.command {
        Commands::Serve {
            port,
            host,
            max_upload_mb,
            mode,
        } => {
            let verifier = build_verifier(&load_config()?, mode);
            let server_config = config::ServerConfig {
                host,
                port,
                max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            };

            info!(
                "Starting formcheck server v{} on {}:{}",
                env!("CARGO_PKG_VERSION"),
                server_config.host,
                server_config.port
            );
            server::run_server(server_config, verifier).await?;
        }
        Commands::Verify {
            template,
            candidate,
            mode,
            pretty,
        } => {
            let verifier = build_verifier(&load_config()?, mode);
            tokio::task::spawn_blocking(move || {
                cli::run_verify(&verifier, &template, &candidate, pretty)
            })
            .await??;
        }
        Commands::Export {
            report,
            output,
            title,
        } => {
            cli::run_export(&report, &output, title.as_deref())?;
        }
        Commands::FieldMap { template, output } => {
            let verifier = build_verifier(&load_config()?, Some(ModeArg::Fields));
            tokio::task::spawn_blocking(move || {
                cli::run_field_map(&verifier, &template, output.as_deref())
            })
            .await??;
        }
    }

    Ok(())
}
