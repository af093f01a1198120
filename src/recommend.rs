//! Candidate scoring against a loaded artifact bundle.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::artifacts::ArtifactBundle;
use crate::jobs::JobRecord;

/// Number of matches returned when the caller does not override it.
pub const DEFAULT_TOP_K: usize = 5;

/// Candidate profile submitted for matching. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    /// Skill keywords.
    pub skills: Vec<String>,
    /// Education summary.
    pub education: String,
    /// Years of experience; negative values are rejected at the HTTP boundary.
    pub experience_years: i64,
    /// Preferred location.
    pub location: String,
}

impl CandidateProfile {
    /// Query text in the fixed order: skills, education, experience, location.
    ///
    /// Empty fields still contribute their separating space.
    pub fn query_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.skills.join(" "),
            self.education,
            self.experience_years,
            self.location
        )
    }
}

/// One ranked job: the stored record plus its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Job metadata as persisted.
    #[serde(flatten)]
    pub job: JobRecord,
    /// Cosine similarity with the candidate.
    pub score: f64,
}

/// Read-only scorer built from a loaded bundle.
#[derive(Debug)]
pub struct Recommender {
    bundle: ArtifactBundle,
}

impl Recommender {
    /// Wraps a bundle for querying.
    pub fn new(bundle: ArtifactBundle) -> Self {
        Self { bundle }
    }

    /// Similarity of `profile` with every job, in stored order.
    pub fn scores(&self, profile: &CandidateProfile) -> Vec<f64> {
        let query = self.bundle.vectorizer().transform(&profile.query_text());
        debug!(terms = query.nnz(), "built candidate query vector");
        self.bundle.matrix().cosine_similarities(&query)
    }

    /// Top `top_k` jobs by descending score; equal scores keep stored order.
    pub fn recommend(&self, profile: &CandidateProfile, top_k: usize) -> Vec<Recommendation> {
        let scores = self.scores(profile);
        let jobs = self.bundle.jobs();
        rank(&scores, top_k)
            .into_iter()
            .filter_map(|idx| {
                Some(Recommendation {
                    job: jobs.get(idx)?.clone(),
                    score: scores[idx],
                })
            })
            .collect()
    }
}

/// Indices of the `top_k` highest scores, sorted by (-score, index).
fn rank(scores: &[f64], top_k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    order.truncate(top_k);
    order
}
