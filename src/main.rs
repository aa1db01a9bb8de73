//! apigen CLI entrypoint
//! Parses command-line arguments and runs the project generator.
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use apigen::application::{
    GenerateFeatures, GenerateProjectRequest, GenerateProjectResponse, GenerateProjectUseCase,
};
use apigen::generation::GenerationPipeline;
use apigen::infrastructure::{
    FileOpenApiLoader, FileSystemOutputService, ShellCommandExecutor, TeraTemplateRenderer,
};
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apigen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate or extend a Go project from an OpenAPI 3.0 document
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// OpenAPI document (JSON or YAML)
    #[arg(long, value_name = "FILE")]
    pub spec: PathBuf,
    /// Project root to generate into
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,
    /// Package name of the generated domain types
    #[arg(long = "package", value_name = "NAME", default_value = "domain")]
    pub package_name: String,
    /// Generate domain types (the default when no other step is selected)
    #[arg(long)]
    pub types: bool,
    /// Generate the service layer
    #[arg(long)]
    pub services: bool,
    /// Generate MongoDB repositories
    #[arg(long)]
    pub mongo: bool,
    /// Generate HTTP handlers
    #[arg(long)]
    pub http: bool,
    /// Initialize the project skeleton, entrypoint and .env
    #[arg(long)]
    pub init: bool,
    /// Replace files that already exist
    #[arg(long)]
    pub overwrite: bool,
    /// Restrict generation to one schema
    #[arg(long, value_name = "NAME")]
    pub schema: Option<String>,
    /// Fail on schemas that only map to interface{}
    #[arg(long)]
    pub strict: bool,
    /// Do not run `go get` / `go mod tidy` after init
    #[arg(long)]
    pub skip_deps: bool,
    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl From<GenerateArgs> for GenerateProjectRequest {
    fn from(args: GenerateArgs) -> Self {
        Self {
            spec_file: args.spec,
            output_dir: args.output,
            package_name: args.package_name,
            features: GenerateFeatures {
                types: args.types,
                services: args.services,
                mongo: args.mongo,
                http: args.http,
                init: args.init,
            },
            overwrite: args.overwrite,
            schema: args.schema,
            strict: args.strict,
            skip_deps: args.skip_deps,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Commands::Generate(args) = cli.command;

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Starting apigen");
    let response = generate(args).await?;
    print_summary(&response);

    Ok(())
}

async fn generate(args: GenerateArgs) -> anyhow::Result<GenerateProjectResponse> {
    let spec = args.spec.clone();
    let renderer = TeraTemplateRenderer::new().context("Failed to load the embedded templates")?;
    let pipeline = GenerationPipeline::new(
        Arc::new(renderer),
        Arc::new(FileSystemOutputService::new()),
        Arc::new(ShellCommandExecutor::new()),
    );
    let use_case =
        GenerateProjectUseCase::new(Arc::new(FileOpenApiLoader::new()), Arc::new(pipeline));

    use_case
        .execute(args.into())
        .await
        .with_context(|| format!("Failed to generate from {}", spec.display()))
}

fn print_summary(response: &GenerateProjectResponse) {
    for entry in response.report.failed() {
        warn!(artifact = %entry.logical_name, outcome = %entry.outcome, "Artifact not generated");
    }
    for warning in &response.warnings {
        warn!("{warning}");
    }

    println!(
        "✅ Generated {} file(s) in {} ({} skipped, {} failed)",
        response.written,
        response.output_path.display(),
        response.skipped,
        response.failed
    );
}
