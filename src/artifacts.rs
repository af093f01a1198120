//! Model artifact bundle: fitting, persistence, and validated loading.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::jobs::JobRecord;
use crate::sparse::CsrMatrix;
use crate::vectorizer::{TfidfVectorizer, VectorizeError};

/// File holding the fitted vectorizer.
pub const VECTORIZER_FILE: &str = "vectorizer.json";
/// File holding the job matrix.
pub const MATRIX_FILE: &str = "job_matrix.json";
/// File holding job metadata aligned with matrix rows.
pub const META_FILE: &str = "jobs_meta.json";

const ARTIFACT_FILES: [&str; 3] = [VECTORIZER_FILE, MATRIX_FILE, META_FILE];

/// Failures while building, writing, or reading a bundle.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// None of the artifact files exist.
    #[error("no model artifacts found in {}", .0.display())]
    Missing(PathBuf),
    /// Some, but not all, artifact files exist.
    #[error("partial model in {}: missing {missing:?}", dir.display())]
    Partial {
        /// Model directory.
        dir: PathBuf,
        /// Names of the absent files.
        missing: Vec<&'static str>,
    },
    /// Filesystem failure.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// An artifact file could not be encoded or decoded.
    #[error("invalid artifact {}: {source}", path.display())]
    Decode {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// Loaded pieces disagree on shape.
    #[error("misaligned artifacts: {0}")]
    Misaligned(String),
    /// Fitting failed.
    #[error(transparent)]
    Vectorize(#[from] VectorizeError),
}

/// Vectorizer, job matrix, and job metadata, always handled together.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    vectorizer: TfidfVectorizer,
    matrix: CsrMatrix,
    jobs: Vec<JobRecord>,
}

impl ArtifactBundle {
    /// Fits a vectorizer over `jobs` and transforms them into matrix rows.
    pub fn build(jobs: Vec<JobRecord>, max_features: usize) -> Result<Self, ArtifactError> {
        let corpus: Vec<String> = jobs.iter().map(JobRecord::corpus_text).collect();
        let (vectorizer, matrix) = TfidfVectorizer::fit_transform(&corpus, max_features)?;
        info!(
            jobs = jobs.len(),
            vocabulary = vectorizer.vocabulary_len(),
            "fitted tf-idf model"
        );
        Self::from_parts(vectorizer, matrix, jobs)
    }

    /// Assembles a bundle, enforcing row/metadata and column/vocabulary alignment.
    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        matrix: CsrMatrix,
        jobs: Vec<JobRecord>,
    ) -> Result<Self, ArtifactError> {
        if !vectorizer.is_consistent() {
            return Err(ArtifactError::Misaligned(
                "vectorizer vocabulary and idf weights disagree".to_string(),
            ));
        }
        if !matrix.is_well_formed() {
            return Err(ArtifactError::Misaligned(
                "job matrix is not a valid sparse matrix".to_string(),
            ));
        }
        if matrix.rows() != jobs.len() {
            return Err(ArtifactError::Misaligned(format!(
                "job matrix has {} rows but metadata lists {} jobs",
                matrix.rows(),
                jobs.len()
            )));
        }
        if matrix.cols() != vectorizer.vocabulary_len() {
            return Err(ArtifactError::Misaligned(format!(
                "job matrix has {} columns but vocabulary has {} terms",
                matrix.cols(),
                vectorizer.vocabulary_len()
            )));
        }
        Ok(Self {
            vectorizer,
            matrix,
            jobs,
        })
    }

    /// Writes the three artifact files into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<(), ArtifactError> {
        fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            context: format!("failed to create {}", dir.display()),
            source,
        })?;
        write_json(&dir.join(VECTORIZER_FILE), &self.vectorizer)?;
        write_json(&dir.join(MATRIX_FILE), &self.matrix)?;
        write_json(&dir.join(META_FILE), &self.jobs)?;
        Ok(())
    }

    /// Loads all three artifacts from `dir`; any absent file fails the load.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let missing: Vec<&'static str> = ARTIFACT_FILES
            .into_iter()
            .filter(|name| !dir.join(name).is_file())
            .collect();
        if missing.len() == ARTIFACT_FILES.len() {
            return Err(ArtifactError::Missing(dir.to_path_buf()));
        }
        if !missing.is_empty() {
            return Err(ArtifactError::Partial {
                dir: dir.to_path_buf(),
                missing,
            });
        }
        let vectorizer: TfidfVectorizer = read_json(&dir.join(VECTORIZER_FILE))?;
        let matrix: CsrMatrix = read_json(&dir.join(MATRIX_FILE))?;
        let jobs: Vec<JobRecord> = read_json(&dir.join(META_FILE))?;
        debug!(dir = %dir.display(), rows = matrix.rows(), "read model artifacts");
        Self::from_parts(vectorizer, matrix, jobs)
    }

    /// Fitted vectorizer.
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// One row per job.
    pub fn matrix(&self) -> &CsrMatrix {
        &self.matrix
    }

    /// Job metadata in matrix row order.
    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let file = File::create(path).map_err(|source| ArtifactError::Io {
        context: format!("failed to create {}", path.display()),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| ArtifactError::Io {
        context: format!("failed to flush {}", path.display()),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        context: format!("failed to open {}", path.display()),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
