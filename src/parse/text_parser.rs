use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::model::store::TaskStore;
use crate::model::task::{TaskInfo, is_done_line};
use crate::parse::lines::LineGrammar;

/// Parse a plain-text store.
///
/// Format: tasks are blocks separated by blank lines. The first line of a
/// block is the header. A block holding an `@done` line belongs to the
/// done list; the `@done` line itself is not part of the task text. An
/// `@due <timestamp>` line is kept in the task text so the due date can
/// always be derived again from the text alone.
///
/// The line-ending convention is detected from the whole source and
/// stays in effect for the returned store.
///
/// The text format carries no version tag: nothing is cached in it, so
/// every info entry is derived afresh on load.
pub fn parse_store(source: &str, now: NaiveDateTime) -> TaskStore {
    let mut grammar = LineGrammar::new();
    grammar.detect(source);

    let mut todo = Vec::new();
    let mut done = Vec::new();
    let mut info = IndexMap::new();

    for block in grammar.block_split(source) {
        let lines = grammar.lines(&block);
        let is_done = lines.iter().any(|line| is_done_line(line));
        let kept: Vec<&str> = lines
            .into_iter()
            .filter(|line| !is_done_line(line))
            .collect();
        let raw = grammar.join(&kept);
        if raw.trim().is_empty() {
            continue;
        }

        let task_info = TaskInfo::derive(&raw, &grammar, now);
        info.insert(raw.clone(), task_info);
        if is_done {
            done.push(raw);
        } else {
            todo.push(raw);
        }
    }

    TaskStore::from_parts(todo, done, info, grammar, now, false)
}
