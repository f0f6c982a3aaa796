use std::collections::HashSet;

use chrono::{Local, NaiveDateTime};
use indexmap::IndexMap;

use super::task::TaskInfo;
use crate::parse::lines::LineGrammar;

/// Version tag written into JSON stores. Cached info from any other
/// version is recomputed on load.
pub const FORMAT_VERSION: &str = "3";

/// The task queue: ordered todo and done lists plus derived info.
///
/// After every mutation `info` holds exactly the texts present in
/// `todo` or `done`. Entries are computed only when missing, unless a
/// forced resync asks for all of them.
#[derive(Debug, Clone)]
pub struct TaskStore {
    todo: Vec<String>,
    done: Vec<String>,
    info: IndexMap<String, TaskInfo>,
    grammar: LineGrammar,
    /// Reference time for relative date phrases during this run
    now: NaiveDateTime,
}

impl Default for TaskStore {
    fn default() -> Self {
        TaskStore::new()
    }
}

impl TaskStore {
    /// An empty store anchored at the current local time
    pub fn new() -> Self {
        TaskStore::at(Local::now().naive_local())
    }

    /// An empty store anchored at `now`
    pub fn at(now: NaiveDateTime) -> Self {
        TaskStore {
            todo: Vec::new(),
            done: Vec::new(),
            info: IndexMap::new(),
            grammar: LineGrammar::new(),
            now,
        }
    }

    /// Assemble a store from decoded parts and restore the info invariant.
    pub fn from_parts(
        todo: Vec<String>,
        done: Vec<String>,
        info: IndexMap<String, TaskInfo>,
        grammar: LineGrammar,
        now: NaiveDateTime,
        force_resync: bool,
    ) -> Self {
        let mut store = TaskStore {
            todo,
            done,
            info,
            grammar,
            now,
        };
        store.resync(force_resync);
        store
    }

    pub fn todo(&self) -> &[String] {
        &self.todo
    }

    pub fn done(&self) -> &[String] {
        &self.done
    }

    pub fn info(&self, task: &str) -> Option<&TaskInfo> {
        self.info.get(task)
    }

    pub fn info_map(&self) -> &IndexMap<String, TaskInfo> {
        &self.info
    }

    pub fn grammar(&self) -> &LineGrammar {
        &self.grammar
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn is_empty(&self) -> bool {
        self.todo.is_empty() && self.done.is_empty()
    }

    pub fn is_done(&self, task: &str) -> bool {
        self.done.iter().any(|t| t == task)
    }

    /// Info for `task`, derived on the spot if it is not cached
    pub fn info_or_derive(&self, task: &str) -> TaskInfo {
        match self.info.get(task) {
            Some(info) => info.clone(),
            None => TaskInfo::derive(task, &self.grammar, self.now),
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a task. Its line endings are converted to the store's.
    pub fn add(&mut self, text: impl Into<String>) {
        let text = self.grammar.normalize(&text.into());
        self.todo.push(text);
        self.resync(false);
    }

    /// Move `task` from todo to done. A task missing from todo is still
    /// appended to done.
    pub fn do_task(&mut self, task: &str) {
        remove_first(&mut self.todo, task);
        self.done.push(task.to_string());
        self.resync(false);
    }

    /// Move `task` from done back to todo
    pub fn undo(&mut self, task: &str) {
        remove_first(&mut self.done, task);
        self.todo.push(task.to_string());
        self.resync(false);
    }

    /// Replace the todo entries in `old` with `new`. Editing one task is
    /// `edit(&[old], vec![new])`; splitting it passes several new texts.
    pub fn edit<S: AsRef<str>>(&mut self, old: &[S], new: Vec<String>) {
        let old: HashSet<&str> = old.iter().map(|s| s.as_ref()).collect();
        self.todo.retain(|task| !old.contains(task.as_str()));
        let grammar = &self.grammar;
        self.todo.extend(new.iter().map(|text| grammar.normalize(text)));
        self.resync(false);
    }

    /// Drop the whole done backlog
    pub fn clear_done(&mut self) {
        self.done.clear();
        self.resync(false);
    }

    /// Order todo for saving: lexicographic first, then every task with a
    /// due date moves to the front in due order. Done is left alone.
    pub fn sort(&mut self) {
        self.todo.sort();

        let info = &self.info;
        let (mut dated, undated): (Vec<String>, Vec<String>) = std::mem::take(&mut self.todo)
            .into_iter()
            .partition(|task| due_key(info, task).is_some());
        dated.sort_by_key(|task| due_key(info, task));

        dated.extend(undated);
        self.todo = dated;
    }

    /// Restore the info invariant: prune entries whose text left both
    /// lists and derive entries that are missing. `force` re-derives
    /// every entry.
    pub fn resync(&mut self, force: bool) {
        let live: HashSet<&str> = self
            .todo
            .iter()
            .chain(self.done.iter())
            .map(String::as_str)
            .collect();
        self.info.retain(|task, _| live.contains(task.as_str()));

        for task in self.todo.iter().chain(self.done.iter()) {
            if force || !self.info.contains_key(task) {
                let derived = TaskInfo::derive(task, &self.grammar, self.now);
                self.info.insert(task.clone(), derived);
            }
        }
    }
}

fn due_key(info: &IndexMap<String, TaskInfo>, task: &str) -> Option<NaiveDateTime> {
    info.get(task).and_then(TaskInfo::due_at)
}

fn remove_first(list: &mut Vec<String>, task: &str) {
    if let Some(pos) = list.iter().position(|t| t == task) {
        list.remove(pos);
    }
}
