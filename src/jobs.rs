//! Job postings that make up the recommendation corpus.

use serde::{Deserialize, Serialize};

/// A single job posting, persisted verbatim as model metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Stable job identifier.
    pub job_id: String,
    /// Human-readable job title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Ordered list of required skills.
    pub skills_required: Vec<String>,
}

impl JobRecord {
    /// Creates a job record from the provided components.
    pub fn new<I, S>(job_id: &str, title: &str, description: &str, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            job_id: job_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            skills_required: skills.into_iter().map(Into::into).collect(),
        }
    }

    /// Text fed to the vectorizer: title, description, then space-joined skills.
    pub fn corpus_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description,
            self.skills_required.join(" ")
        )
    }
}

/// The fixed sample corpus the model builder fits on.
pub fn sample_jobs() -> Vec<JobRecord> {
    vec![
        JobRecord::new(
            "j1",
            "Backend Developer",
            "Python Django REST APIs. PostgreSQL.",
            ["python", "django", "rest"],
        ),
        JobRecord::new(
            "j2",
            "Frontend Developer",
            "React developer with Tailwind and Vite.",
            ["react", "tailwind", "javascript"],
        ),
        JobRecord::new(
            "j3",
            "Data Scientist",
            "Machine learning, NLP, sklearn.",
            ["python", "ml", "nlp"],
        ),
        JobRecord::new(
            "j4",
            "DevOps Engineer",
            "Docker, Kubernetes, AWS.",
            ["docker", "kubernetes", "aws"],
        ),
        JobRecord::new(
            "j5",
            "Fullstack Developer",
            "Node.js, Express, React and MongoDB.",
            ["node", "react", "mongodb"],
        ),
    ]
}
