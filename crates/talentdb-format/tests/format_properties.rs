use proptest::prelude::*;
use serde_json::json;

use talentdb_core::{DocumentType, RawHit};
use talentdb_format::timestamp::render_created_at;
use talentdb_format::{ResultFormatter, TypedResult};

proptest! {
    #[test]
    fn seconds_and_millis_render_alike(secs in 1i64..99_999_999_999) {
        prop_assert_eq!(render_created_at(&json!(secs)), render_created_at(&json!(secs * 1000)));
    }

    #[test]
    fn relevance_becomes_percent(relevance in 0.0f64..=1.0, doc_type in prop_oneof![Just(DocumentType::Candidate), Just(DocumentType::Job)]) {
        let hit: RawHit = serde_json::from_value(json!({ "relevance": relevance, "fields": { "id": "x" } })).expect("hit");
        let out = ResultFormatter.format(&[hit], doc_type).expect("formatted");
        let score = out[0].relevance_score().expect("score");
        prop_assert!((score - relevance * 100.0).abs() < 1e-9);
        prop_assert!((0.0..=100.0 + 1e-9).contains(&score));
    }

    #[test]
    fn experience_years_are_whole(months in 0u64..600) {
        let hit: RawHit = serde_json::from_value(json!({ "relevance": 0.5, "fields": { "total_months_of_experience": months } })).expect("hit");
        match ResultFormatter.format(&[hit], DocumentType::Job).expect("formatted").remove(0) {
            TypedResult::Job(job) => prop_assert_eq!(job.experience_required, Some(months / 12)),
            TypedResult::Candidate(_) => prop_assert!(false, "job hit formatted as candidate"),
        }
    }
}

#[test]
fn candidate_records_serialize_with_snake_case_keys() {
    let hit: RawHit = serde_json::from_value(json!({
        "relevance": 0.87,
        "fields": { "id": "c-1", "first_name": "A", "last_name": "B", "created_at": 1_700_000_000 }
    }))
    .expect("hit");
    let out = ResultFormatter.format(&[hit], DocumentType::Candidate).expect("formatted");
    let value = serde_json::to_value(&out).expect("json");
    assert_eq!(value[0]["id"], json!("c-1"));
    assert_eq!(value[0]["name"], json!("A B"));
    assert_eq!(value[0]["created_at"], json!("2023-11-14 22:13:20"));
    assert!(value[0]["job_role_score"].is_null());
}

#[test]
fn empty_page_formats_to_nothing() {
    assert!(ResultFormatter.format(&[], DocumentType::Job).expect("formatted").is_empty());
}
