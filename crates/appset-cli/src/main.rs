//! argocd-offline - preview Argo CD ApplicationSets without a cluster

use appset_engine::Engine;
use appset_repo::{CredentialOverrides, CredentialStore, RepositoryFile, ToolchainRenderer};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod display;
mod error;
mod exit_codes;

use error::Result;

#[derive(Parser)]
#[command(name = "argocd-offline")]
#[command(version)]
#[command(about = "An Argo CD CLI offline utility", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Helm repositories file used for chart credentials
    #[arg(long, global = true, env = "HELM_REPOSITORY_CONFIG", value_name = "PATH")]
    repo_config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with ApplicationSet manifests
    Appset {
        #[command(subcommand)]
        command: AppsetCommands,
    },
}

#[derive(Subcommand)]
enum AppsetCommands {
    /// Print the Applications an ApplicationSet generates
    PreviewApps(PreviewArgs),

    /// Render the Kubernetes resources of the generated Applications
    PreviewResources(PreviewArgs),
}

#[derive(Args)]
struct PreviewArgs {
    /// ApplicationSet manifest; only the first document is previewed
    #[arg(value_name = "APPSETMANIFEST")]
    manifest: PathBuf,

    /// Only preview the Application with this name
    #[arg(short, long)]
    name: Option<String>,

    /// Output format: name, json or yaml
    #[arg(short, long, default_value = "name")]
    output: String,
}

fn main() -> ExitCode {
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(exit_codes::USAGE_ERROR)
            } else {
                ExitCode::from(exit_codes::SUCCESS)
            };
        }
    };

    init_tracing(cli.debug);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = run(cli, &mut out).and_then(|()| out.flush().map_err(error::CliError::from));
    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            let code = err.exit_code();
            if err.is_usage() {
                eprintln!("{}", err);
            } else {
                eprintln!("{:?}", miette::Report::new(err));
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let engine = Engine::default();

    match cli.command {
        Commands::Appset { command } => match command {
            AppsetCommands::PreviewApps(args) => commands::preview_apps::run(
                &engine,
                &args.manifest,
                args.name.as_deref(),
                &args.output,
                out,
            ),
            AppsetCommands::PreviewResources(args) => {
                let credentials = credential_store(cli.repo_config);
                let renderer = ToolchainRenderer::builder().build();
                commands::preview_resources::run(
                    &engine,
                    &renderer,
                    &credentials,
                    &args.manifest,
                    args.name.as_deref(),
                    &args.output,
                    out,
                )
            }
        },
    }
}

fn credential_store(repo_config: Option<PathBuf>) -> CredentialStore {
    let overrides = CredentialOverrides::from_env();
    let path = match repo_config.map_or_else(RepositoryFile::default_path, Ok) {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!("no helm repository config: {}", e);
            return CredentialStore::new(RepositoryFile::default(), overrides);
        }
    };
    CredentialStore::load(&path, overrides)
}

/// Logs go to stderr so previews on stdout stay machine readable
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
