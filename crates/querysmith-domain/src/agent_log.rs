//! Agent log - the per-request audit trail
//!
//! Every pipeline stage records what it was given, what it produced, how long
//! it took and whether it succeeded. Entries are never modified once appended.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// One audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentLog {
    /// Wall-clock time the step started (milliseconds since Unix epoch)
    pub timestamp: u64,

    /// Component name, e.g. "IntentParser"
    pub agent: String,

    /// Operation name, e.g. "parse"
    pub action: String,

    /// Input snapshot
    pub input: Value,

    /// Output snapshot (null on failure)
    pub output: Value,

    /// Elapsed time in milliseconds
    pub duration: u64,

    /// Whether the step succeeded
    pub success: bool,

    /// Error message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentLog {
    /// Start timing a step; finish it with [`PendingLog::succeed`] or [`PendingLog::fail`]
    pub fn start(agent: impl Into<String>, action: impl Into<String>, input: Value) -> PendingLog {
        PendingLog {
            timestamp: now_millis(),
            started: Instant::now(),
            agent: agent.into(),
            action: action.into(),
            input,
        }
    }

    /// Record an instantaneous step
    pub fn instant(
        agent: impl Into<String>,
        action: impl Into<String>,
        input: Value,
        output: Value,
    ) -> Self {
        Self::start(agent, action, input).succeed(output)
    }
}

/// A step whose log entry is not yet complete
#[derive(Debug)]
pub struct PendingLog {
    timestamp: u64,
    started: Instant,
    agent: String,
    action: String,
    input: Value,
}

impl PendingLog {
    /// Complete the entry as a success
    pub fn succeed(self, output: Value) -> AgentLog {
        let duration = self.elapsed_ms();
        AgentLog {
            timestamp: self.timestamp,
            agent: self.agent,
            action: self.action,
            input: self.input,
            output,
            duration,
            success: true,
            error: None,
        }
    }

    /// Complete the entry as a failure
    pub fn fail(self, error: impl ToString) -> AgentLog {
        let duration = self.elapsed_ms();
        AgentLog {
            timestamp: self.timestamp,
            agent: self.agent,
            action: self.action,
            input: self.input,
            output: Value::Null,
            duration,
            success: false,
            error: Some(error.to_string()),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Append-only collection of log entries for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    entries: Vec<AgentLog>,
}

impl SessionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry
    pub fn push(&mut self, entry: AgentLog) {
        self.entries.push(entry);
    }

    /// Append every entry of another log, preserving order
    pub fn append(&mut self, other: SessionLog) {
        self.entries.extend(other.entries);
    }

    /// Read-only view of the entries
    pub fn entries(&self) -> &[AgentLog] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was logged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the log, returning its entries
    pub fn into_entries(self) -> Vec<AgentLog> {
        self.entries
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_entry() {
        let entry = AgentLog::start("IntentParser", "parse", json!({"userInput": "x"}))
            .succeed(json!({"ok": true}));
        assert!(entry.success);
        assert!(entry.error.is_none());
        assert_eq!(entry.agent, "IntentParser");
        assert!(entry.timestamp > 0);
    }

    #[test]
    fn test_failure_entry() {
        let entry = AgentLog::start("QueryBuilder", "buildQuery", json!({})).fail("boom");
        assert!(!entry.success);
        assert_eq!(entry.error.as_deref(), Some("boom"));
        assert_eq!(entry.output, Value::Null);
    }

    #[test]
    fn test_session_log_append_preserves_order() {
        let mut first = SessionLog::new();
        first.push(AgentLog::instant("a", "1", json!(null), json!(null)));
        let mut second = SessionLog::new();
        second.push(AgentLog::instant("b", "2", json!(null), json!(null)));
        second.push(AgentLog::instant("c", "3", json!(null), json!(null)));

        first.append(second);
        let agents: Vec<_> = first.entries().iter().map(|e| e.agent.as_str()).collect();
        assert_eq!(agents, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_error_field_omitted_on_success() {
        let entry = AgentLog::instant("ConsensusAgent", "selectBestQuery", json!(1), json!(2));
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("error").is_none());
        assert_eq!(value["success"], true);
    }
}
