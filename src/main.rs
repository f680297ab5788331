use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use resume_builder::layout::{LayoutEngine, TemplateRegistry};
use resume_builder::types::ResumeDocument;
use resume_builder::{pdf, start_web_server, ConfigManager};
use std::path::PathBuf;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "resumely", about = "Resume export and metering service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the API server (default)
    Serve,
    /// Render a JSON resume document to PDF without the server
    Export {
        /// Path to the resume document JSON
        #[arg(long)]
        input: PathBuf,
        /// Template id (falls back to the default when unknown)
        #[arg(long)]
        template: Option<String>,
        /// Output PDF path
        #[arg(long, default_value = "resume.pdf")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resume_builder=info,rocket=warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = ConfigManager::load()?;
            config.ensure_directories().await?;

            info!("Starting resume export and metering API server");
            info!(
                "Environment: {}",
                std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
            );
            info!(
                "Database: {}",
                config.environment.database_path.display()
            );
            info!("Server: http://0.0.0.0:{}", config.environment.port);

            start_web_server(config).await
        }
        Command::Export {
            input,
            template,
            output,
        } => {
            let raw = tokio::fs::read_to_string(&input)
                .await
                .with_context(|| format!("Failed to read document: {}", input.display()))?;
            let document: ResumeDocument =
                serde_json::from_str(&raw).context("Failed to parse resume document JSON")?;

            let registry = TemplateRegistry::new();
            let engine = LayoutEngine::new(registry.resolve(template.as_deref()).clone());
            let pages = engine.paginate_resume(&document);
            let data = pdf::render(&pages);

            tokio::fs::write(&output, &data)
                .await
                .with_context(|| format!("Failed to write PDF: {}", output.display()))?;

            info!(
                "Wrote {} ({} pages, {} bytes)",
                output.display(),
                pages.len(),
                data.len()
            );
            Ok(())
        }
    }
}
