//! Command-line configuration shared by the builder and API binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::recommend::DEFAULT_TOP_K;
use crate::vectorizer::DEFAULT_MAX_FEATURES;

/// Options for the offline model builder.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "model_builder",
    about = "Fits the TF-IDF job model and writes its artifacts"
)]
pub struct BuildCli {
    /// Directory receiving vectorizer, matrix, and metadata files.
    #[arg(long, env = "JOBMATCH_MODEL_DIR", default_value = "model")]
    pub model_dir: PathBuf,

    /// Maximum vocabulary size kept by the vectorizer.
    #[arg(long, env = "JOBMATCH_MAX_FEATURES", default_value_t = DEFAULT_MAX_FEATURES)]
    pub max_features: usize,
}

/// Options for the recommendation HTTP API.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "recommend_api",
    about = "HTTP API that ranks jobs for a candidate profile"
)]
pub struct ServeCli {
    /// Address to bind the HTTP server to (host:port).
    #[arg(long, env = "JOBMATCH_BIND", default_value = "127.0.0.1:8000")]
    pub bind: String,

    /// Directory holding the model artifacts.
    #[arg(long, env = "JOBMATCH_MODEL_DIR", default_value = "model")]
    pub model_dir: PathBuf,

    /// Matches returned per request.
    #[arg(long, env = "JOBMATCH_TOP_K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
}
