use serde::{Deserialize, Serialize};

/// A candidate profile hit. Scores are percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub id: Option<String>,
    pub relevance_score: Option<f64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub current_city: Option<String>,
    pub job_role: Option<String>,
    pub job_title: Option<String>,
    pub total_months_of_experience: Option<u64>,
    pub skills: Option<Vec<String>>,
    pub job_role_score: Option<f64>,
    pub job_title_score: Option<f64>,
    pub skills_score: Option<f64>,
    pub created_at: Option<String>,
    pub created_by: Option<String>,
}

/// A job posting hit. `experience_required` is in whole years.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub id: Option<String>,
    pub relevance_score: Option<f64>,
    pub company: Option<String>,
    pub location: Option<Vec<String>>,
    pub experience_required: Option<u64>,
    pub salary: Option<f64>,
    pub description: Option<String>,
    pub role: Option<String>,
    pub title: Option<String>,
}

/// One formatted hit; serializes as the bare record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedResult {
    Candidate(CandidateResult),
    Job(JobResult),
}

impl TypedResult {
    pub fn id(&self) -> Option<&str> {
        match self {
            TypedResult::Candidate(c) => c.id.as_deref(),
            TypedResult::Job(j) => j.id.as_deref(),
        }
    }

    pub fn relevance_score(&self) -> Option<f64> {
        match self {
            TypedResult::Candidate(c) => c.relevance_score,
            TypedResult::Job(j) => j.relevance_score,
        }
    }
}
