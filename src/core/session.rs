/// Session state
///
/// Append-only, in-memory log of what was asked and what the agent answered.
/// Lives as long as the agent instance and is never persisted.

use crate::intent::Intent;
use chrono::{DateTime, Local};

/// One processed line of input
#[derive(Debug, Clone)]
pub struct InteractionRecord {
    pub input: String,
    pub intent: Intent,
    pub confidence: f64,
    pub response: String,
    pub recorded_at: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct Session {
    records: Vec<InteractionRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: InteractionRecord) {
        self.records.push(record);
    }

    /// Last `n` records, oldest first
    pub fn recent(&self, n: usize) -> &[InteractionRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn last(&self) -> Option<&InteractionRecord> {
        self.records.last()
    }
}
