use proptest::prelude::*;

use talentdb_core::error::QueryBuildError;
use talentdb_core::{DocumentType, FieldMap, Page, PaginationPolicy, SearchCriteria, SearchMode, SearchParams};
use talentdb_query::QueryCompiler;

fn term() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9 .+#-]{0,14}"
}

fn doc_type() -> impl Strategy<Value = DocumentType> {
    prop_oneof![Just(DocumentType::Candidate), Just(DocumentType::Job)]
}

proptest! {
    #[test]
    fn lexical_location_only_has_location_and_no_vectors(
        locations in prop::collection::vec(term(), 1..4),
        doc_type in doc_type(),
    ) {
        let criteria = SearchCriteria::validate(SearchParams {
            mode: Some(SearchMode::Lexical),
            locations: locations.clone(),
            ..SearchParams::default()
        }).expect("valid");
        let fields = FieldMap::builtin(doc_type);
        let q = QueryCompiler::default()
            .compile(&criteria, &fields, doc_type, Page { limit: 10, offset: 0 })
            .expect("compile");
        let location_field = fields.get(talentdb_core::FieldKey::Location).expect("mapped");
        for loc in &criteria.locations().to_vec() {
            let needle = format!("{location_field} contains '{loc}'");
            prop_assert!(q.expression.contains(&needle), "missing {} in {}", needle, q.expression);
        }
        prop_assert!(q.vector_inputs.is_empty());
        prop_assert!(!q.expression.contains("nearestNeighbor"));
    }

    #[test]
    fn semantic_skills_always_embed_skills(
        skills in prop::collection::vec(term(), 1..4),
        roles in prop::collection::vec(term(), 0..3),
        doc_type in doc_type(),
    ) {
        let criteria = SearchCriteria::validate(SearchParams {
            mode: Some(SearchMode::Semantic),
            skills,
            job_roles: roles,
            ..SearchParams::default()
        }).expect("valid");
        let q = QueryCompiler::default()
            .compile(&criteria, &FieldMap::builtin(doc_type), doc_type, Page { limit: 10, offset: 0 })
            .expect("compile");
        prop_assert!(q.vector_inputs.contains_key("input.query(s)"));
        prop_assert_eq!(q.feature_weights.get("input.query(skills_weight)"), Some(&1));
    }

    #[test]
    fn pagination_directive_is_trailing(number in 1i64..=20, size in 1i64..=50) {
        let page = PaginationPolicy::default().compute_numbers(number, size).expect("page");
        let criteria = SearchCriteria::validate(SearchParams {
            skills: vec!["rust".into()],
            ..SearchParams::default()
        }).expect("valid");
        let q = QueryCompiler::default()
            .compile(&criteria, &FieldMap::candidate(), DocumentType::Candidate, page)
            .expect("compile");
        let suffix = format!(" limit {} offset {}", page.limit, page.offset);
        prop_assert!(q.expression.ends_with(&suffix));
    }
}

#[test]
fn empty_field_map_fails_with_missing_key() {
    let criteria = SearchCriteria::validate(SearchParams {
        locations: vec!["delhi".into()],
        ..SearchParams::default()
    })
    .expect("valid");
    let fields = FieldMap::new("job", []);
    let err = QueryCompiler::default()
        .compile(&criteria, &fields, DocumentType::Job, Page { limit: 10, offset: 0 })
        .unwrap_err();
    assert!(matches!(err, QueryBuildError::MissingField { doc_type: DocumentType::Job, .. }));
    assert!(err.to_string().contains("location"));
}
