use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::store::{FORMAT_VERSION, TaskStore};
use crate::model::task::TaskInfo;
use crate::parse::lines::LineGrammar;

/// The legacy JSON document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonStore {
    #[serde(default)]
    pub todo: Vec<String>,
    #[serde(default)]
    pub done: Vec<String>,
    #[serde(default)]
    pub info: IndexMap<String, TaskInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Parse a JSON store.
///
/// Cached info is trusted only when the document carries the current
/// format version; otherwise every entry is derived again. The second
/// value reports whether that forced resync happened.
pub fn parse_json_store(
    source: &str,
    now: NaiveDateTime,
) -> Result<(TaskStore, bool), serde_json::Error> {
    let doc: JsonStore = serde_json::from_str(source)?;
    let force = doc.version.as_deref() != Some(FORMAT_VERSION);

    let mut grammar = LineGrammar::new();
    let sample: String = doc
        .todo
        .iter()
        .chain(doc.done.iter())
        .map(String::as_str)
        .collect();
    grammar.detect(&sample);

    let store = TaskStore::from_parts(doc.todo, doc.done, doc.info, grammar, now, force);
    Ok((store, force))
}

/// Serialize a store as a JSON document, indented with four spaces.
pub fn serialize_json_store(store: &TaskStore) -> Result<String, serde_json::Error> {
    let doc = JsonStore {
        todo: store.todo().to_vec(),
        done: store.done().to_vec(),
        info: store.info_map().clone(),
        version: Some(FORMAT_VERSION.to_string()),
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
