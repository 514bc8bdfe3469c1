//! Prompt engineering for query construction

use querysmith_domain::{Intent, Perspective, SampleQuery, Schema};

/// Builds the system and user prompts for one perspective
pub struct QueryPromptBuilder<'a> {
    intent: &'a Intent,
    perspective: &'a Perspective,
    examples: Vec<&'a SampleQuery>,
}

impl<'a> QueryPromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(intent: &'a Intent, perspective: &'a Perspective) -> Self {
        Self {
            intent,
            perspective,
            examples: Vec::new(),
        }
    }

    /// Add similar corpus queries as references
    pub fn with_examples(mut self, examples: Vec<&'a SampleQuery>) -> Self {
        self.examples = examples;
        self
    }

    /// Build the system prompt: schema plus the fixed construction rules
    pub fn system_prompt(schema: &Schema) -> Result<String, serde_json::Error> {
        let properties = serde_json::to_string_pretty(&schema.mappings.properties)?;

        let mut prompt = String::new();
        prompt.push_str("You are an expert Elasticsearch Query Builder for jobs data.\n\n");
        prompt.push_str("JOBS INDEX SCHEMA:\n");
        prompt.push_str(&properties);
        prompt.push_str("\n\n");
        prompt.push_str(BUILD_RULES);
        Ok(prompt)
    }

    /// Build the user prompt: intent, perspective and examples
    pub fn build(&self) -> Result<String, serde_json::Error> {
        let intent = serde_json::to_string_pretty(self.intent)?;

        let mut prompt = String::new();
        prompt.push_str("BUILD ELASTICSEARCH QUERY:\n\n");
        prompt.push_str("USER INTENT:\n");
        prompt.push_str(&intent);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("PERSPECTIVE: {}\n", self.perspective.name));
        prompt.push_str(&format!("Approach: {}\n", self.perspective.approach));
        prompt.push_str(&format!("Description: {}\n", self.perspective.description));
        prompt.push_str(&format!("Reasoning: {}\n\n", self.perspective.reasoning));

        if !self.examples.is_empty() {
            prompt.push_str("SIMILAR SUCCESSFUL QUERIES:\n");
            for example in &self.examples {
                prompt.push_str(&format!("Example: {}\n", example.description));
                prompt.push_str(&format!("Intent: {}\n", example.user_intent));
                prompt.push_str("Query Structure:\n");
                prompt.push_str(&serde_json::to_string_pretty(&example.query)?);
                prompt.push_str(&format!(
                    "\nPerformance Notes: {}\n\n",
                    example
                        .performance_notes
                        .as_deref()
                        .unwrap_or("Good performance")
                ));
            }
        }

        prompt.push_str("Generate the optimized Elasticsearch query based on the intent and perspective:");
        Ok(prompt)
    }
}

const BUILD_RULES: &str = r#"MANDATORY REQUIREMENTS:
1. Always include: {"term": {"is_deleted.keyword": "0"}}
2. Always include: {"term": {"is_duplicate": false}}
3. Use .keyword fields for exact matching and aggregations
4. Use analyzed fields for full-text search
5. Prefer filters over queries for performance
6. Include appropriate date range filters

FIELD USAGE PATTERNS:
- job_title: Use both analyzed and .keyword versions
- company_name: Prefer .keyword for exact matches, analyzed for fuzzy
- location: Use analyzed for fuzzy matching, .keyword for exact
- standardized_geo_point: For geo-distance queries
- crawled_date/posted_date: For time-based filtering
- job_description: For skills and requirements matching
- raw_salary: For salary-based filtering
- skills.name: For technical skills matching

QUERY OPTIMIZATION:
- Use term queries for exact matches
- Use match queries for full-text search
- Use filters in bool context when possible
- Combine must/should/filter appropriately
- Limit aggregation sizes to reasonable values
- Use _source filtering to reduce payload size

RESPONSE FORMAT:
Return only valid Elasticsearch 7.x JSON query. No explanations or additional text.

PERFORMANCE CONSIDERATIONS:
- Avoid script queries
- Limit wildcard usage
- Use appropriate field types (.keyword vs analyzed)
- Set reasonable size limits
- Include timeout parameters for complex queries"#;

#[cfg(test)]
mod tests {
    use super::*;
    use querysmith_domain::{Approach, PerspectiveId};
    use serde_json::json;

    fn perspective() -> Perspective {
        Perspective {
            id: PerspectiveId::new(),
            name: "Targeted Search".to_string(),
            description: "Exact matches on titles and companies".to_string(),
            approach: Approach::ExactMatch,
            reasoning: "Specific entities were named".to_string(),
            confidence: 0.8,
            estimated_complexity: 2,
        }
    }

    #[test]
    fn test_user_prompt_names_perspective() {
        let intent = Intent::new("find jobs");
        let p = perspective();
        let prompt = QueryPromptBuilder::new(&intent, &p).build().unwrap();

        assert!(prompt.starts_with("BUILD ELASTICSEARCH QUERY"));
        assert!(prompt.contains("PERSPECTIVE: Targeted Search"));
        assert!(prompt.contains("Approach: exact_match"));
        assert!(prompt.contains("\"rawInput\": \"find jobs\""));
        assert!(!prompt.contains("SIMILAR SUCCESSFUL QUERIES"));
    }

    #[test]
    fn test_user_prompt_includes_examples() {
        let intent = Intent::new("x");
        let p = perspective();
        let example = SampleQuery {
            id: "e1".to_string(),
            description: "Jobs at Acme".to_string(),
            user_intent: "acme jobs".to_string(),
            query: json!({"query": {"term": {"company_name.keyword": "Acme"}}}),
            tags: vec![],
            complexity: "simple".to_string(),
            success_rate: 0.9,
            business_context: None,
            performance_notes: None,
        };

        let prompt = QueryPromptBuilder::new(&intent, &p)
            .with_examples(vec![&example])
            .build()
            .unwrap();
        assert!(prompt.contains("Example: Jobs at Acme"));
        assert!(prompt.contains("company_name.keyword"));
        assert!(prompt.contains("Performance Notes: Good performance"));
    }

    #[test]
    fn test_system_prompt_has_mandatory_rules() {
        let prompt = QueryPromptBuilder::system_prompt(&Schema::default()).unwrap();
        assert!(prompt.contains("is_deleted.keyword"));
        assert!(prompt.contains("is_duplicate"));
    }
}
