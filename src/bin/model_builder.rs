use anyhow::{Context, Result};
use clap::Parser;
use jobmatch::{init_tracing, sample_jobs, ArtifactBundle, BuildCli};

fn main() -> Result<()> {
    let cli = BuildCli::parse();
    init_tracing();

    let jobs = sample_jobs();
    tracing::info!(jobs = jobs.len(), max_features = cli.max_features, "fitting model");
    let bundle = ArtifactBundle::build(jobs, cli.max_features).context("failed to fit model")?;
    bundle
        .save(&cli.model_dir)
        .with_context(|| format!("failed to write artifacts to {}", cli.model_dir.display()))?;
    println!("wrote model artifacts to {}", cli.model_dir.display());
    Ok(())
}
