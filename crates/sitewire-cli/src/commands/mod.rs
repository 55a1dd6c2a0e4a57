//! CLI command implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use sitewire_config::{DeployEnv, EnvironmentProfile, Settings};
use sitewire_core::ResourceGraph;

/// Build every topology and write one plan file per graph.
///
/// The full pipeline topology is instantiated once for the requested
/// environment and the simple hosting topology once; both plans go to
/// `out_dir` as the hand-off to the provisioning engine.
pub fn synth(settings: &Settings, deploy_env: &str, out_dir: &Path) -> Result<()> {
    let env: DeployEnv = deploy_env.parse()?;
    let profile = EnvironmentProfile::resolve(env);

    let pipeline_plan = sitewire_topology::full::build(&profile, settings)?;
    let simple_plan = sitewire_topology::simple::build(settings)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    for plan in [&pipeline_plan, &simple_plan] {
        let path = out_dir.join(format!("{}.plan.json", plan.name()));
        write_plan(plan, &path)?;
        info!(plan = plan.name(), path = %path.display(), "plan written");
    }
    Ok(())
}

/// Resolve configuration and report problems without synthesizing.
pub fn validate(settings: &Settings, deploy_env: &str) -> Result<()> {
    let env: DeployEnv = deploy_env.parse()?;
    EnvironmentProfile::resolve(env).validate()?;
    settings.validate()?;
    println!("configuration for '{}' is valid", env);
    Ok(())
}

fn write_plan(plan: &ResourceGraph, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
