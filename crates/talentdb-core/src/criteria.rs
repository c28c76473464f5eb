//! Request-boundary validation of search filters.
//!
//! `SearchParams` is the loosely-typed shape callers send; `SearchCriteria`
//! is the only form the compiler accepts. Validation is pure: list values are
//! trimmed and lower-cased, contradictory ranges are rejected, and at least one
//! text filter must be present.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::SearchMode;

/// Raw filter input as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub mode: Option<SearchMode>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, alias = "jobRole")]
    pub job_roles: Vec<String>,
    #[serde(default, alias = "jobTitle")]
    pub job_titles: Vec<String>,
    #[serde(default, alias = "location")]
    pub locations: Vec<String>,
    #[serde(default)]
    pub experience_min: Option<i64>,
    #[serde(default)]
    pub experience_max: Option<i64>,
    #[serde(default, alias = "expectedSalaryMin")]
    pub compensation_min: Option<f64>,
    #[serde(default, alias = "expectedSalaryMax")]
    pub compensation_max: Option<f64>,
}

/// Validated, normalized filter intent. Construct with [`SearchCriteria::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    mode: SearchMode,
    skills: Vec<String>,
    job_roles: Vec<String>,
    job_titles: Vec<String>,
    locations: Vec<String>,
    experience_min: Option<u32>,
    experience_max: Option<u32>,
    compensation_min: Option<f64>,
    compensation_max: Option<f64>,
}

impl SearchCriteria {
    pub fn validate(params: SearchParams) -> Result<Self, ValidationError> {
        let skills = normalize_list("skills", params.skills)?;
        let job_roles = normalize_list("jobRoles", params.job_roles)?;
        let job_titles = normalize_list("jobTitles", params.job_titles)?;
        let locations = normalize_list("locations", params.locations)?;

        let experience_min = non_negative_years("experienceMin", params.experience_min)?;
        let experience_max = non_negative_years("experienceMax", params.experience_max)?;
        let compensation_min = non_negative_amount("compensationMin", params.compensation_min)?;
        let compensation_max = non_negative_amount("compensationMax", params.compensation_max)?;

        if let (Some(min), Some(max)) = (experience_min, experience_max) {
            if min > max {
                return Err(ValidationError::ExperienceRange { min, max });
            }
        }
        if let (Some(min), Some(max)) = (compensation_min, compensation_max) {
            if min > max {
                return Err(ValidationError::CompensationRange { min, max });
            }
        }
        if skills.is_empty() && job_roles.is_empty() && job_titles.is_empty() && locations.is_empty() {
            return Err(ValidationError::NoFilterProvided);
        }

        Ok(Self {
            mode: params.mode.unwrap_or_default(),
            skills,
            job_roles,
            job_titles,
            locations,
            experience_min,
            experience_max,
            compensation_min,
            compensation_max,
        })
    }

    /// Same criteria forced to a different mode.
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> SearchMode { self.mode }
    pub fn skills(&self) -> &[String] { &self.skills }
    pub fn job_roles(&self) -> &[String] { &self.job_roles }
    pub fn job_titles(&self) -> &[String] { &self.job_titles }
    pub fn locations(&self) -> &[String] { &self.locations }
    pub fn experience_min(&self) -> Option<u32> { self.experience_min }
    pub fn experience_max(&self) -> Option<u32> { self.experience_max }
    pub fn compensation_min(&self) -> Option<f64> { self.compensation_min }
    pub fn compensation_max(&self) -> Option<f64> { self.compensation_max }

    /// Back to the raw shape, e.g. to re-validate or forward the request.
    pub fn to_params(&self) -> SearchParams {
        SearchParams {
            mode: Some(self.mode),
            skills: self.skills.clone(),
            job_roles: self.job_roles.clone(),
            job_titles: self.job_titles.clone(),
            locations: self.locations.clone(),
            experience_min: self.experience_min.map(i64::from),
            experience_max: self.experience_max.map(i64::from),
            compensation_min: self.compensation_min,
            compensation_max: self.compensation_max,
        }
    }
}

impl TryFrom<SearchParams> for SearchCriteria {
    type Error = ValidationError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        Self::validate(params)
    }
}

fn normalize_list(field: &'static str, values: Vec<String>) -> Result<Vec<String>, ValidationError> {
    values
        .into_iter()
        .map(|v| {
            let v = v.trim().to_lowercase();
            if v.is_empty() { Err(ValidationError::EmptyValue { field }) } else { Ok(v) }
        })
        .collect()
}

fn non_negative_years(field: &'static str, value: Option<i64>) -> Result<Option<u32>, ValidationError> {
    match value {
        None => Ok(None),
        Some(v) if v < 0 => Err(ValidationError::NegativeValue { field }),
        Some(v) => u32::try_from(v).map(Some).map_err(|_| ValidationError::OutOfRange { field, value: v }),
    }
}

fn non_negative_amount(field: &'static str, value: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match value {
        None => Ok(None),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        Some(_) => Err(ValidationError::NegativeValue { field }),
    }
}
