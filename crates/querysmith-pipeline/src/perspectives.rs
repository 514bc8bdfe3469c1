//! Perspective generation
//!
//! Derives up to three query-construction strategies from an intent. Each
//! rule below fires at most once; the survivors are ranked by confidence.

use querysmith_domain::{AnalysisType, Approach, Intent, Perspective, PerspectiveId};

/// Most perspectives kept per request
pub const MAX_PERSPECTIVES: usize = 3;

/// Intent confidence a targeted search requires
const TARGETED_MIN_CONFIDENCE: f64 = 0.7;

fn perspective(
    name: &str,
    description: &str,
    approach: Approach,
    reasoning: String,
    confidence: f64,
    estimated_complexity: u32,
) -> Perspective {
    Perspective {
        id: PerspectiveId::new(),
        name: name.to_string(),
        description: description.to_string(),
        approach,
        reasoning,
        confidence,
        estimated_complexity,
    }
}

/// Generate the perspectives for an intent
///
/// Deterministic apart from the fresh ids: the same intent always yields the
/// same names, approaches and confidences in the same order.
pub fn generate_perspectives(intent: &Intent) -> Vec<Perspective> {
    let entities = &intent.entities;
    let c = intent.confidence;
    let is_search = intent.analysis_type == AnalysisType::Search;
    let single_location = entities.locations.len() == 1;

    let mut perspectives: Vec<Perspective> = Vec::new();

    if intent.analysis_type.is_aggregate() {
        perspectives.push(perspective(
            "Data Aggregation / Statistical Analysis",
            "Aggregations over matching jobs instead of individual hits",
            Approach::Analytics,
            format!(
                "The request asks for {} rather than a list of jobs.",
                intent.analysis_type.as_str()
            ),
            0.9,
            3,
        ));
    }

    let mut targeted = false;
    if is_search
        && (!entities.job_titles.is_empty() || !entities.companies.is_empty() || single_location)
        && c > TARGETED_MIN_CONFIDENCE
    {
        targeted = true;
        perspectives.push(perspective(
            "Targeted Search",
            "Exact matches on titles, companies and location",
            Approach::ExactMatch,
            "Specific entities were named with high confidence.".to_string(),
            0.85 * c,
            2,
        ));
    }

    if is_search && !entities.skills.is_empty() {
        let has_exact = perspectives.iter().any(|p| p.approach == Approach::ExactMatch);
        let weight = if has_exact { 0.65 } else { 0.75 };
        perspectives.push(perspective(
            "Skills-Focused Search",
            "Full-text matching of required skills in descriptions",
            Approach::FuzzySearch,
            format!("Skills were mentioned: {}.", entities.skills.join(", ")),
            weight * c,
            3,
        ));
    }

    if is_search && !entities.locations.is_empty() && !(targeted && single_location) {
        perspectives.push(perspective(
            "Location Focused Search",
            "Filters on location first, then relevance",
            Approach::ExactMatch,
            format!("Locations were mentioned: {}.", entities.locations.join(", ")),
            0.7 * c,
            2,
        ));
    }

    if !entities.date_ranges.is_empty()
        && matches!(
            intent.analysis_type,
            AnalysisType::Search | AnalysisType::Analytics
        )
    {
        perspectives.push(perspective(
            "Time-Based Trend Search",
            "Date-bounded results ordered by posting time",
            Approach::TrendAnalysis,
            "A time window was specified.".to_string(),
            0.6 * c,
            3,
        ));
    }

    if is_search && perspectives.is_empty() {
        perspectives.push(perspective(
            "General Search",
            "Broad relevance search over the whole request",
            Approach::FuzzySearch,
            "No specific entities were extracted.".to_string(),
            0.5 * c,
            2,
        ));
    }

    // Stable, so rule order breaks ties
    perspectives.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    perspectives.truncate(MAX_PERSPECTIVES);
    perspectives
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use querysmith_domain::{DateRange, Entities};

    fn names(perspectives: &[Perspective]) -> Vec<&str> {
        perspectives.iter().map(|p| p.name.as_str()).collect()
    }

    fn search(entities: Entities, confidence: f64) -> Intent {
        Intent::new("q")
            .with_entities(entities)
            .with_confidence(confidence)
    }

    fn last_month() -> DateRange {
        DateRange {
            gte: Some("now-1M".to_string()),
            ..DateRange::default()
        }
    }

    #[test]
    fn test_aggregation_leads_with_analytics() {
        let intent =
            Intent::new("count jobs by company").with_analysis_type(AnalysisType::Aggregation);
        let perspectives = generate_perspectives(&intent);

        assert_eq!(perspectives.len(), 1);
        assert_eq!(perspectives[0].name, "Data Aggregation / Statistical Analysis");
        assert_eq!(perspectives[0].approach, Approach::Analytics);
        assert_eq!(perspectives[0].confidence, 0.9);
        assert_eq!(perspectives[0].estimated_complexity, 3);
    }

    #[test]
    fn test_targeted_search() {
        let entities = Entities {
            job_titles: vec!["Engineer".to_string()],
            ..Entities::default()
        };
        let perspectives = generate_perspectives(&search(entities, 0.85));

        assert_eq!(names(&perspectives), vec!["Targeted Search"]);
        assert_eq!(perspectives[0].approach, Approach::ExactMatch);
        assert!((perspectives[0].confidence - 0.85 * 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_low_confidence_skips_targeted() {
        let entities = Entities {
            companies: vec!["Acme".to_string()],
            ..Entities::default()
        };
        let perspectives = generate_perspectives(&search(entities, 0.7));
        assert_eq!(names(&perspectives), vec!["General Search"]);
    }

    #[test]
    fn test_skills_weight_depends_on_exact_match() {
        let with_title = Entities {
            job_titles: vec!["Engineer".to_string()],
            skills: vec!["Rust".to_string()],
            ..Entities::default()
        };
        let perspectives = generate_perspectives(&search(with_title, 0.8));
        let skills = perspectives
            .iter()
            .find(|p| p.name == "Skills-Focused Search")
            .unwrap();
        assert!((skills.confidence - 0.65 * 0.8).abs() < 1e-9);

        let skills_only = Entities {
            skills: vec!["Rust".to_string()],
            ..Entities::default()
        };
        let perspectives = generate_perspectives(&search(skills_only, 0.8));
        assert_eq!(names(&perspectives), vec!["Skills-Focused Search"]);
        assert!((perspectives[0].confidence - 0.75 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_single_location_covered_by_targeted() {
        let entities = Entities {
            locations: vec!["Austin".to_string()],
            ..Entities::default()
        };
        let perspectives = generate_perspectives(&search(entities, 0.9));
        assert_eq!(names(&perspectives), vec!["Targeted Search"]);
    }

    #[test]
    fn test_location_focused_without_targeted() {
        let entities = Entities {
            locations: vec!["Austin".to_string()],
            ..Entities::default()
        };
        let perspectives = generate_perspectives(&search(entities, 0.6));
        assert_eq!(names(&perspectives), vec!["Location Focused Search"]);
        assert!((perspectives[0].confidence - 0.42).abs() < 1e-9);
    }

    #[test]
    fn test_multiple_locations_with_targeted() {
        let entities = Entities {
            companies: vec!["Acme".to_string()],
            locations: vec!["Austin".to_string(), "Denver".to_string()],
            ..Entities::default()
        };
        let perspectives = generate_perspectives(&search(entities, 0.9));
        assert_eq!(
            names(&perspectives),
            vec!["Targeted Search", "Location Focused Search"]
        );
    }

    #[test]
    fn test_trend_for_search_and_analytics() {
        let entities = Entities {
            date_ranges: vec![last_month()],
            ..Entities::default()
        };

        let perspectives = generate_perspectives(&search(entities.clone(), 0.5));
        assert_eq!(names(&perspectives), vec!["Time-Based Trend Search"]);

        let analytics = search(entities.clone(), 0.5).with_analysis_type(AnalysisType::Analytics);
        assert_eq!(
            names(&generate_perspectives(&analytics)),
            vec!["Data Aggregation / Statistical Analysis", "Time-Based Trend Search"]
        );

        let aggregation = search(entities, 0.5).with_analysis_type(AnalysisType::Aggregation);
        assert_eq!(generate_perspectives(&aggregation).len(), 1);
    }

    #[test]
    fn test_general_search_fallback() {
        let perspectives = generate_perspectives(&search(Entities::default(), 0.5));
        assert_eq!(names(&perspectives), vec!["General Search"]);
        assert_eq!(perspectives[0].approach, Approach::FuzzySearch);
        assert!((perspectives[0].confidence - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_truncates_to_top_three() {
        let entities = Entities {
            job_titles: vec!["Engineer".to_string()],
            skills: vec!["Rust".to_string()],
            locations: vec!["Austin".to_string(), "Denver".to_string()],
            date_ranges: vec![last_month()],
            ..Entities::default()
        };
        let perspectives = generate_perspectives(&search(entities, 1.0));

        // Targeted 0.85, Location 0.7, Skills 0.65, Trend 0.6
        assert_eq!(
            names(&perspectives),
            vec![
                "Targeted Search",
                "Location Focused Search",
                "Skills-Focused Search"
            ]
        );
    }

    #[test]
    fn test_ids_are_fresh() {
        let intent = search(Entities::default(), 0.5);
        let first = generate_perspectives(&intent);
        let second = generate_perspectives(&intent);
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(first[0].name, second[0].name);
    }

    fn strings() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z]{1,8}", 0..3)
    }

    prop_compose! {
        fn arb_intent()(
            analysis in prop_oneof![
                Just(AnalysisType::Search),
                Just(AnalysisType::Aggregation),
                Just(AnalysisType::Analytics)
            ],
            job_titles in strings(),
            companies in strings(),
            locations in strings(),
            skills in strings(),
            dated in any::<bool>(),
            confidence in 0.0f64..=1.0,
        ) -> Intent {
            let entities = Entities {
                job_titles,
                companies,
                locations,
                skills,
                date_ranges: if dated { vec![last_month()] } else { Vec::new() },
                ..Entities::default()
            };
            Intent::new("q")
                .with_entities(entities)
                .with_analysis_type(analysis)
                .with_confidence(confidence)
        }
    }

    proptest! {
        #[test]
        fn prop_at_most_three_sorted(intent in arb_intent()) {
            let perspectives = generate_perspectives(&intent);
            prop_assert!(!perspectives.is_empty());
            prop_assert!(perspectives.len() <= MAX_PERSPECTIVES);
            for pair in perspectives.windows(2) {
                prop_assert!(pair[0].confidence >= pair[1].confidence);
            }
        }

        #[test]
        fn prop_aggregate_first_is_analytics(intent in arb_intent()) {
            prop_assume!(intent.analysis_type.is_aggregate());
            let perspectives = generate_perspectives(&intent);
            prop_assert_eq!(perspectives[0].approach, Approach::Analytics);
            prop_assert_eq!(perspectives[0].confidence, 0.9);
        }

        #[test]
        fn prop_unique_names(intent in arb_intent()) {
            let perspectives = generate_perspectives(&intent);
            let mut seen = std::collections::HashSet::new();
            for p in &perspectives {
                prop_assert!(seen.insert(p.name.clone()));
            }
        }
    }
}
