//! Structured candidate profile and the document payload fed for it.
//!
//! A profile arrives already structured (from the parsing collaborator). Before
//! feeding, the fields the candidate schema indexes on are derived from it:
//! the current role/title, the highest qualification and the combined city list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    pub organisation_name: Option<String>,
    pub job_title: Option<String>,
    pub role: Option<String>,
    pub industry: Option<String>,
    pub employment_type: Option<String>,
    #[serde(default)]
    pub is_current_job: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub education_level: Option<String>,
    pub course_name: Option<String>,
    pub specialization: Option<String>,
    pub year_of_completion: Option<i32>,
    pub course_type: Option<String>,
    #[serde(default)]
    pub is_highest_qualification: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_mobile_number: Option<String>,
    pub primary_email: Option<String>,
    pub current_city: Option<String>,
    #[serde(default)]
    pub preferred_cities: Vec<String>,
    pub total_months_of_experience: Option<u32>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub employment_history: Vec<Organisation>,
    #[serde(default)]
    pub education_details: Vec<Education>,
    pub expected_annual_ctc: Option<f64>,
    pub current_annual_ctc: Option<f64>,
}

impl CandidateProfile {
    /// `(latest_job_title, latest_role)` from the first current employment entry.
    pub fn latest_job(&self) -> (Option<&str>, Option<&str>) {
        self.employment_history
            .iter()
            .find(|job| job.is_current_job == Some(1))
            .map(|job| (job.job_title.as_deref(), job.role.as_deref()))
            .unwrap_or((None, None))
    }

    /// `(education_level, year_of_completion)` of the highest qualification.
    pub fn highest_education(&self) -> (Option<&str>, Option<i32>) {
        self.education_details
            .iter()
            .find(|edu| edu.is_highest_qualification == Some(1))
            .map(|edu| (edu.education_level.as_deref(), edu.year_of_completion))
            .unwrap_or((None, None))
    }

    /// Current city first, then preferred cities, without blanks.
    pub fn preferred_and_current_cities(&self) -> Vec<String> {
        self.current_city
            .iter()
            .chain(self.preferred_cities.iter())
            .filter(|c| !c.trim().is_empty())
            .cloned()
            .collect()
    }

    /// Document fields for the candidate schema. `None` values are omitted.
    pub fn into_feed_fields(self, created_at: i64, actor: &str) -> Map<String, Value> {
        let (latest_title, latest_role) = self.latest_job();
        let (level, year) = self.highest_education();
        let derived = [
            ("latest_job_title", latest_title.map(Value::from)),
            ("latest_role", latest_role.map(Value::from)),
            ("highest_education_level", level.map(Value::from)),
            ("highest_course_year_of_completion", year.map(Value::from)),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k.to_string(), v)))
        .collect::<Vec<_>>();
        let cities = self.preferred_and_current_cities();

        let mut fields = match serde_json::to_value(&self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        fields.retain(|_, v| !v.is_null());
        fields.extend(derived);
        fields.insert("preferred_and_current_cities".into(), Value::from(cities));
        fields.insert("created_at".into(), Value::from(created_at));
        fields.insert("created_by".into(), Value::from(actor));
        fields.insert("updated_by".into(), Value::from(actor));
        fields
    }
}
