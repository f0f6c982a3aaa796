use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::parse::deadline::{format_timestamp, parse_deadline, parse_timestamp};
use crate::parse::lines::LineGrammar;

/// Line prefix carrying an explicit due timestamp in the text store
pub const DUE_MARKER: &str = "@due";
/// Line marking a finished task in the text store
pub const DONE_MARKER: &str = "@done";

/// Fields derived from a task's raw text.
///
/// A task has no identifier of its own: the raw text is the key under
/// which this info is cached, and everything here can be recomputed
/// from it at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// First line of the raw text
    #[serde(default)]
    pub header: String,
    /// Remaining lines, without `@due` / `@done` marker lines
    #[serde(default)]
    pub details: String,
    /// Earliest date phrase in the text, as `YYYY-MM-DD HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

impl TaskInfo {
    /// Derive header, details and due date from raw task text.
    pub fn derive(raw: &str, grammar: &LineGrammar, now: NaiveDateTime) -> TaskInfo {
        let (header, rest) = grammar.first_line_split(raw.trim_start());

        // Blank lines delimit tasks in the text store, so details never hold one.
        let detail_lines: Vec<&str> = grammar
            .lines(rest)
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| !is_due_line(line) && !is_done_line(line))
            .collect();
        let details = grammar.join(&detail_lines).trim_end().to_string();

        TaskInfo {
            header: header.trim().to_string(),
            details,
            due: earliest_due(raw, grammar, now).map(format_timestamp),
        }
    }

    pub fn due_at(&self) -> Option<NaiveDateTime> {
        self.due.as_deref().and_then(parse_timestamp)
    }

    pub fn has_details(&self) -> bool {
        !self.details.is_empty()
    }
}

/// Scan the text line by line for the earliest date phrase.
///
/// Ties keep the first line found. The scan stops after the first `@due`
/// line, so nothing below an explicit due date is mined for another one.
pub fn earliest_due(raw: &str, grammar: &LineGrammar, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let mut earliest: Option<NaiveDateTime> = None;
    for line in grammar.lines(raw) {
        if let Some(found) = parse_deadline(line, now)
            && earliest.is_none_or(|current| found < current)
        {
            earliest = Some(found);
        }
        if is_due_line(line) {
            break;
        }
    }
    earliest
}

pub fn is_due_line(line: &str) -> bool {
    line.trim_start().starts_with(DUE_MARKER)
}

pub fn is_done_line(line: &str) -> bool {
    line.trim() == DONE_MARKER
}
