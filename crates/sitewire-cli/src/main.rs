//! sitewire CLI: synthesizes provisioning plans for the static-site
//! hosting topologies and hands them to the provisioning engine as
//! JSON documents.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sitewire_config::Settings;

mod commands;

#[derive(Parser)]
#[command(name = "sitewire")]
#[command(about = "Provisioning-plan synthesizer for static-site hosting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize provisioning plans for every topology
    Synth {
        /// Deployment environment for the pipeline topology
        #[arg(long, env = "SITEWIRE_DEPLOY_ENV", default_value = "prod")]
        deploy_env: String,
        /// Directory the plan files are written to
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
    },
    /// Check environment configuration without synthesizing
    Validate {
        /// Deployment environment to resolve
        #[arg(long, env = "SITEWIRE_DEPLOY_ENV", default_value = "prod")]
        deploy_env: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Commands::Synth {
            deploy_env,
            out_dir,
        } => {
            commands::synth(&settings, &deploy_env, &out_dir)?;
        }
        Commands::Validate { deploy_env } => {
            commands::validate(&settings, &deploy_env)?;
        }
    }

    Ok(())
}
