#![warn(missing_docs)]
//! Core library for the jobmatch TF-IDF job recommender.

pub mod artifacts;
pub mod config;
pub mod jobs;
pub mod recommend;
pub mod server;
pub mod sparse;
pub mod text;
pub mod vectorizer;

pub use artifacts::{ArtifactBundle, ArtifactError, MATRIX_FILE, META_FILE, VECTORIZER_FILE};
pub use config::{BuildCli, ServeCli};
pub use jobs::{sample_jobs, JobRecord};
pub use recommend::{CandidateProfile, Recommendation, Recommender, DEFAULT_TOP_K};
pub use server::{router, AppState};
pub use sparse::{CsrMatrix, SparseVector};
pub use vectorizer::{TfidfVectorizer, VectorizeError, DEFAULT_MAX_FEATURES};

/// Installs the fmt subscriber, honoring `RUST_LOG` and defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // A subscriber already installed (tests, embedding) keeps priority.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_tracing_tolerates_repeat_calls() {
        super::init_tracing();
        super::init_tracing();
    }
}
