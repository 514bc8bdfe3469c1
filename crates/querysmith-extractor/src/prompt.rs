//! Prompt engineering for intent extraction

use querysmith_domain::{SampleQuery, Schema};

/// Pick the corpus entries sharing the most words with the request
///
/// Score is the number of whitespace-separated lowercase request words found as
/// substrings of the entry's description, intent and tags. Ties keep corpus order.
pub fn select_examples<'a>(
    user_input: &str,
    corpus: &'a [SampleQuery],
    limit: usize,
) -> Vec<&'a SampleQuery> {
    let lowered = user_input.to_lowercase();
    let keywords: Vec<&str> = lowered.split_whitespace().collect();

    let mut scored: Vec<(usize, &SampleQuery)> = corpus
        .iter()
        .map(|sample| {
            let text = format!(
                "{} {} {}",
                sample.description,
                sample.user_intent,
                sample.tags.join(" ")
            )
            .to_lowercase();
            let score = keywords.iter().filter(|k| text.contains(*k)).count();
            (score, sample)
        })
        .collect();

    // stable: equal scores keep corpus order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, s)| s).collect()
}

/// Builds the system and user prompts for one extraction
pub struct IntentPromptBuilder<'a> {
    user_input: &'a str,
    examples: Vec<&'a SampleQuery>,
}

impl<'a> IntentPromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(user_input: &'a str) -> Self {
        Self {
            user_input,
            examples: Vec::new(),
        }
    }

    /// Add corpus examples as extraction hints
    pub fn with_examples(mut self, examples: Vec<&'a SampleQuery>) -> Self {
        self.examples = examples;
        self
    }

    /// Build the system prompt: schema, output layout and extraction rules
    pub fn system_prompt(schema: &Schema) -> Result<String, serde_json::Error> {
        let properties = serde_json::to_string_pretty(&schema.mappings.properties)?;

        let mut prompt = String::new();
        prompt.push_str("You are an expert Elasticsearch intent parser for a jobs index.\n\n");
        prompt.push_str("JOBS INDEX SCHEMA:\n");
        prompt.push_str(&properties);
        prompt.push_str("\n\n");
        prompt.push_str(INTENT_LAYOUT);
        prompt.push_str("\n\n");
        prompt.push_str(EXTRACTION_RULES);
        Ok(prompt)
    }

    /// Build the user prompt: the request plus relevant examples
    pub fn build(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(&format!("USER QUERY: \"{}\"\n\n", self.user_input));

        if !self.examples.is_empty() {
            prompt.push_str("RELEVANT EXAMPLE PATTERNS:\n");
            for example in &self.examples {
                prompt.push_str(&format!(
                    "- Intent: {}\n  Entities found: {}\n  Complexity: {}\n",
                    example.user_intent,
                    example.tags.join(", "),
                    example.complexity
                ));
            }
            prompt.push('\n');
        }

        prompt.push_str("Extract structured intent from the user query:");
        prompt
    }
}

const INTENT_LAYOUT: &str = r#"Your task is to extract structured information from user queries and return JSON in this exact format:
{
  "entities": {
    "companies": ["extracted company names"],
    "locations": ["extracted locations"],
    "skills": ["extracted skills/technologies"],
    "jobTitles": ["extracted job titles"],
    "dateRanges": [{"gte": "date", "lte": "date"}],
    "salaryRanges": [{"min": number, "max": number}]
  },
  "analysisType": "search|aggregation|analytics",
  "complexity": "simple|medium|complex",
  "confidence": 0.95
}"#;

const EXTRACTION_RULES: &str = r#"EXTRACTION RULES:
- Extract only entities that can be mapped to schema fields
- Normalize company names to common formats (Google vs Alphabet Inc.)
- Convert location references to standardized forms
- Identify programming languages, frameworks, and technical skills
- Parse relative dates (e.g., "last 30 days" becomes {"gte": "now-30d"})
- Extract salary information when mentioned
- Classify complexity: simple (1-2 criteria), medium (3-4 criteria), complex (5+ criteria or aggregations)
- Set confidence based on clarity of user intent

RESPONSE: Return only valid JSON, no explanations."#;
