use crate::model::store::TaskStore;
use crate::model::task::{DONE_MARKER, DUE_MARKER, TaskInfo};
use crate::parse::lines::LineGrammar;

/// Serialize a store to the plain-text format: todo tasks in their
/// current order, then done tasks, one block each, separated by a blank
/// line. The store's line-ending convention is used throughout.
pub fn serialize_store(store: &TaskStore) -> String {
    let grammar = store.grammar();
    let splitter = grammar.splitter();

    let mut blocks = Vec::new();
    for task in store.todo() {
        blocks.push(serialize_task(&store.info_or_derive(task), false, grammar));
    }
    for task in store.done() {
        blocks.push(serialize_task(&store.info_or_derive(task), true, grammar));
    }

    if blocks.is_empty() {
        return String::new();
    }
    let mut out = blocks.join(splitter.block_separator());
    out.push_str(splitter.as_str());
    out
}

/// Serialize one task as a block: header, details, then the synthesized
/// `@due` and `@done` lines.
pub fn serialize_task(info: &TaskInfo, done: bool, grammar: &LineGrammar) -> String {
    let mut lines: Vec<String> = vec![info.header.clone()];
    lines.extend(
        grammar
            .lines(&info.details)
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string),
    );
    if let Some(ref due) = info.due {
        lines.push(format!("{} {}", DUE_MARKER, due));
    }
    if done {
        lines.push(DONE_MARKER.to_string());
    }
    grammar.join(&lines)
}
