//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use querysmith_domain::{AgentLog, CompletionConfig, ProviderKind, QueryResult, SampleQuery, Schema};
use querysmith_llm::ProviderDescriptor;
use querysmith_pipeline::PipelineResponse;
use serde_json::{json, Map, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a pipeline response.
    ///
    /// With `all`, every candidate query is shown instead of only the best.
    pub fn format_response(&self, response: &PipelineResponse, all: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_response_json(response, all),
            OutputFormat::Table => self.format_response_table(response, all),
            OutputFormat::Quiet => Ok(match &response.best {
                Some(best) => serde_json::to_string_pretty(&best.query.to_value())?,
                None => String::new(),
            }),
        }
    }

    fn format_response_json(&self, response: &PipelineResponse, all: bool) -> Result<String> {
        let mut out = Map::new();
        out.insert("best".to_string(), serde_json::to_value(&response.best)?);
        if all {
            out.insert("candidates".to_string(), serde_json::to_value(&response.candidates)?);
        }
        if let Some(logs) = &response.logs {
            out.insert("logs".to_string(), serde_json::to_value(logs)?);
        }
        Ok(serde_json::to_string_pretty(&Value::Object(out))?)
    }

    fn format_response_table(&self, response: &PipelineResponse, all: bool) -> Result<String> {
        let Some(best) = &response.best else {
            let mut out = self.warning("No query could be built for this request.");
            if let Some(logs) = &response.logs {
                out.push_str("\n\n");
                out.push_str(&self.logs_table(logs));
            }
            return Ok(out);
        };

        let mut builder = Builder::default();
        builder.push_record(["", "Perspective", "Approach", "Confidence", "Score", "Issues"]);
        for candidate in &response.candidates {
            let marker = if candidate.perspective.id == best.perspective.id {
                "*"
            } else {
                ""
            };
            builder.push_record([
                marker.to_string(),
                candidate.perspective.name.clone(),
                candidate.perspective.approach.to_string(),
                format!("{:.2}", candidate.perspective.confidence),
                format!("{:.0}", candidate.validation.score),
                candidate.validation.issue_count().to_string(),
            ]);
        }
        let mut out = self.styled(builder);
        out.push('\n');

        if all {
            for candidate in &response.candidates {
                out.push('\n');
                out.push_str(&self.candidate_section(candidate)?);
            }
        } else {
            out.push('\n');
            out.push_str(&self.candidate_section(best)?);
        }

        if let Some(logs) = &response.logs {
            out.push('\n');
            out.push_str(&self.logs_table(logs));
        }

        Ok(out)
    }

    /// Heading, query JSON and findings for one candidate.
    fn candidate_section(&self, candidate: &QueryResult) -> Result<String> {
        let mut out = self.colorize(&candidate.perspective.name, "cyan");
        out.push('\n');
        out.push_str(&serde_json::to_string_pretty(&candidate.query.to_value())?);
        out.push('\n');

        let validation = &candidate.validation;
        for error in validation.syntax_errors.iter().chain(&validation.schema_errors) {
            out.push_str(&self.error(error));
            out.push('\n');
        }
        for warning in validation
            .performance_warnings
            .iter()
            .chain(&validation.security_issues)
        {
            out.push_str(&self.warning(warning));
            out.push('\n');
        }
        for recommendation in &validation.recommendations {
            out.push_str(&self.info(recommendation));
            out.push('\n');
        }
        Ok(out)
    }

    fn logs_table(&self, logs: &[AgentLog]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Agent", "Action", "Duration (ms)", "Status", "Error"]);
        for log in logs {
            let status = if log.success { "ok" } else { "failed" };
            builder.push_record([
                log.agent.clone(),
                log.action.clone(),
                log.duration.to_string(),
                status.to_string(),
                log.error.clone().unwrap_or_default(),
            ]);
        }
        self.styled(builder)
    }

    /// Format the stored completion settings, with the API key masked.
    pub fn format_completion_config(&self, config: &CompletionConfig) -> Result<String> {
        let masked = config.api_key.as_deref().map(mask_key);
        if let OutputFormat::Json | OutputFormat::Quiet = self.format {
            let mut value = serde_json::to_value(config)?;
            if let (Some(masked), Some(obj)) = (&masked, value.as_object_mut()) {
                obj.insert("apiKey".to_string(), json!(masked));
            }
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Setting", "Value"]);
        builder.push_record(["Provider".to_string(), config.provider.to_string()]);
        builder.push_record(["Model".to_string(), config.model.clone()]);
        builder.push_record(["Temperature".to_string(), config.temperature.to_string()]);
        builder.push_record(["Max tokens".to_string(), config.max_tokens.to_string()]);
        builder.push_record(["Timeout (ms)".to_string(), config.timeout.to_string()]);
        builder.push_record(["Retries".to_string(), config.retry_attempts.to_string()]);
        builder.push_record([
            "API key".to_string(),
            masked.unwrap_or_else(|| "(not set)".to_string()),
        ]);
        builder.push_record([
            "Base URL".to_string(),
            config.base_url.clone().unwrap_or_else(|| "(default)".to_string()),
        ]);
        Ok(self.styled(builder))
    }

    /// Format the stored schema.
    pub fn format_schema(&self, schema: &Schema) -> Result<String> {
        if let OutputFormat::Json | OutputFormat::Quiet = self.format {
            return Ok(serde_json::to_string_pretty(schema)?);
        }

        let mut out = self.info(&format!(
            "Index '{}' (version {}, updated {})",
            schema.index_name,
            schema.version,
            if schema.last_updated.is_empty() {
                "never"
            } else {
                schema.last_updated.as_str()
            }
        ));
        out.push('\n');

        if schema.mappings.properties.is_empty() {
            out.push_str(&self.warning("No fields mapped. Import a schema with 'schema import'."));
            return Ok(out);
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Type"]);
        for field in schema.field_names() {
            builder.push_record([
                field.to_string(),
                schema.field_type(field).unwrap_or("object").to_string(),
            ]);
        }
        out.push_str(&self.styled(builder));
        Ok(out)
    }

    /// Format the example corpus.
    pub fn format_corpus(&self, corpus: &[SampleQuery]) -> Result<String> {
        match self.format {
            OutputFormat::Json => return Ok(serde_json::to_string_pretty(corpus)?),
            OutputFormat::Quiet => {
                let ids: Vec<&str> = corpus.iter().map(|s| s.id.as_str()).collect();
                return Ok(ids.join("\n"));
            }
            OutputFormat::Table => {}
        }

        if corpus.is_empty() {
            return Ok(self.colorize("No sample queries stored.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Description", "Tags", "Complexity", "Success"]);
        for sample in corpus {
            builder.push_record([
                sample.id.clone(),
                sample.description.clone(),
                sample.tags.join(", "),
                sample.complexity.clone(),
                format!("{:.0}%", sample.success_rate * 100.0),
            ]);
        }
        Ok(self.styled(builder))
    }

    /// Format the provider registry, marking the active provider.
    pub fn format_providers<'a>(
        &self,
        providers: impl IntoIterator<Item = &'a ProviderDescriptor>,
        active: ProviderKind,
    ) -> Result<String> {
        let providers: Vec<&ProviderDescriptor> = providers.into_iter().collect();
        match self.format {
            OutputFormat::Json => return Ok(serde_json::to_string_pretty(&providers)?),
            OutputFormat::Quiet => {
                let ids: Vec<&str> = providers.iter().map(|p| p.id).collect();
                return Ok(ids.join("\n"));
            }
            OutputFormat::Table => {}
        }

        let mut builder = Builder::default();
        builder.push_record(["", "ID", "Name", "Models", "Requests/min"]);
        for provider in providers {
            let marker = if provider.id == active.as_str() { "*" } else { "" };
            let rpm = match provider.rate_limits.requests_per_minute {
                0 => "unlimited".to_string(),
                n => n.to_string(),
            };
            builder.push_record([
                marker.to_string(),
                provider.id.to_string(),
                provider.name.to_string(),
                provider.models.join(", "),
                rpm,
            ]);
        }
        Ok(self.styled(builder))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn styled(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Keep the last four characters of a secret.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
