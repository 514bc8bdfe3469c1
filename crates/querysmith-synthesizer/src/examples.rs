//! Corpus example selection for query building

use querysmith_domain::{AnalysisType, Approach, Intent, Perspective, SampleQuery};

/// Additive relevance score of one corpus entry for an intent and perspective
pub fn score_example(intent: &Intent, perspective: &Perspective, sample: &SampleQuery) -> u32 {
    let entities = &intent.entities;
    let mut score = 0;

    if !entities.companies.is_empty() && sample.has_tag("company") {
        score += 3;
    }
    if !entities.locations.is_empty() && sample.has_tag("location") {
        score += 3;
    }
    if !entities.skills.is_empty() && sample.has_tag("skills") {
        score += 3;
    }
    if !entities.job_titles.is_empty() && sample.has_tag("job_title") {
        score += 3;
    }
    if !entities.date_ranges.is_empty() && sample.has_tag("date_range") {
        score += 2;
    }
    if !entities.salary_ranges.is_empty() && sample.has_tag("salary") {
        score += 2;
    }

    score += match intent.analysis_type {
        AnalysisType::Aggregation if sample.has_tag("aggregation") => 5,
        AnalysisType::Search if sample.has_tag("search") => 2,
        AnalysisType::Analytics if sample.has_tag("analytics") => 4,
        _ => 0,
    };

    if intent.complexity.as_str() == sample.complexity {
        score += 2;
    }

    score += match perspective.approach {
        Approach::ExactMatch if sample.has_tag("exact_match") => 3,
        Approach::FuzzySearch if sample.has_tag("fuzzy") => 3,
        Approach::Analytics if sample.has_tag("aggregation") => 3,
        _ => 0,
    };

    score
}

/// Pick the highest-scoring corpus entries; ties keep corpus order
pub fn select_similar<'a>(
    intent: &Intent,
    perspective: &Perspective,
    corpus: &'a [SampleQuery],
    limit: usize,
) -> Vec<&'a SampleQuery> {
    let mut scored: Vec<(u32, &SampleQuery)> = corpus
        .iter()
        .map(|s| (score_example(intent, perspective, s), s))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, s)| s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use querysmith_domain::{Complexity, Entities, PerspectiveId};
    use serde_json::json;

    fn sample(id: &str, tags: &[&str], complexity: &str) -> SampleQuery {
        SampleQuery {
            id: id.to_string(),
            description: String::new(),
            user_intent: String::new(),
            query: json!({}),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            complexity: complexity.to_string(),
            success_rate: 1.0,
            business_context: None,
            performance_notes: None,
        }
    }

    fn perspective(approach: Approach) -> Perspective {
        Perspective {
            id: PerspectiveId::new(),
            name: "p".to_string(),
            description: String::new(),
            approach,
            reasoning: String::new(),
            confidence: 0.5,
            estimated_complexity: 2,
        }
    }

    #[test]
    fn test_aggregation_scoring() {
        let intent = Intent::new("count")
            .with_analysis_type(AnalysisType::Aggregation)
            .with_complexity(Complexity::Medium);
        let p = perspective(Approach::Analytics);

        // +5 aggregation, +3 approach alignment, +2 complexity
        assert_eq!(score_example(&intent, &p, &sample("a", &["aggregation"], "medium")), 10);
        assert_eq!(score_example(&intent, &p, &sample("b", &["search"], "simple")), 0);
    }

    #[test]
    fn test_entity_scoring() {
        let entities = Entities {
            companies: vec!["Acme".into()],
            date_ranges: vec![Default::default()],
            ..Entities::default()
        };
        let intent = Intent::new("x").with_entities(entities);
        let p = perspective(Approach::ExactMatch);

        let s = sample("a", &["company", "date_range", "exact_match", "search"], "simple");
        // 3 + 2 + 3 (approach) + 2 (search) + 2 (simple == simple)
        assert_eq!(score_example(&intent, &p, &s), 12);
    }

    #[test]
    fn test_select_similar_is_stable() {
        let intent = Intent::new("x");
        let p = perspective(Approach::FuzzySearch);
        let corpus = vec![
            sample("a", &[], "medium"),
            sample("b", &["fuzzy"], "medium"),
            sample("c", &[], "medium"),
            sample("d", &["fuzzy"], "medium"),
        ];

        let ids: Vec<_> = select_similar(&intent, &p, &corpus, 3)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "d", "a"]);
    }
}
