use chrono::NaiveDateTime;
use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

use super::colorize::{Rule, apply_rules, default_rules, highlight_rules};
use crate::model::store::TaskStore;
use crate::model::task::TaskInfo;
use crate::ops::search::{Category, search};
use crate::parse::deadline::humanize_remaining;

const TODO_MARK: &str = "+";
const DONE_MARK: &str = "✓";
/// Appended to a short row when the task has details
const DETAILS_MARK: &str = "[+]";
/// Indent of detail lines in the full view
const DETAILS_INDENT: &str = "     ";

/// One short-view row before column alignment
struct Row {
    mark: &'static str,
    due: Option<String>,
    text: String,
}

/// Renders a store as text for the terminal
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    now: NaiveDateTime,
    color: bool,
}

impl Renderer {
    pub fn new(now: NaiveDateTime, color: bool) -> Self {
        Renderer { now, color }
    }

    /// `(in 3 days)` style phrase for a task with a due date
    pub fn due_phrase(&self, info: &TaskInfo) -> Option<String> {
        info.due_at()
            .map(|due| format!("({})", humanize_remaining(due, self.now)))
    }

    // -----------------------------------------------------------------------
    // Short view
    // -----------------------------------------------------------------------

    /// Both lists, one line per task
    pub fn render_short(&self, store: &TaskStore) -> String {
        let todo: Vec<&str> = store.todo().iter().map(String::as_str).collect();
        let done: Vec<&str> = store.done().iter().map(String::as_str).collect();
        let lines = self.short_sections(store, &todo, &done);
        self.finish(lines, &[] as &[&str], false)
    }

    /// Tasks matching every query, with the matching words highlighted
    pub fn render_search<S: AsRef<str>>(
        &self,
        store: &TaskStore,
        queries: &[S],
        case_sensitive: bool,
    ) -> String {
        let todo = search(store, queries, case_sensitive, Category::Todo);
        let done = search(store, queries, case_sensitive, Category::Done);
        let lines = self.short_sections(store, &todo, &done);
        self.finish(lines, queries, case_sensitive)
    }

    fn short_sections(&self, store: &TaskStore, todo: &[&str], done: &[&str]) -> Vec<String> {
        let todo_rows: Vec<Row> = todo
            .iter()
            .map(|task| self.short_row(store, task, false))
            .collect();
        let done_rows: Vec<Row> = done
            .iter()
            .map(|task| self.short_row(store, task, true))
            .collect();

        let mut lines = vec!["TODO:".to_string()];
        lines.extend(layout_rows(&todo_rows));
        lines.push("DONE:".to_string());
        lines.extend(layout_rows(&done_rows));
        lines
    }

    fn short_row(&self, store: &TaskStore, task: &str, done: bool) -> Row {
        let info = store.info_or_derive(task);
        let mut text = info.header.clone();
        if info.has_details() {
            text.push(' ');
            text.push_str(DETAILS_MARK);
        }
        Row {
            mark: if done { DONE_MARK } else { TODO_MARK },
            due: if done { None } else { self.due_phrase(&info) },
            text,
        }
    }

    // -----------------------------------------------------------------------
    // Full view
    // -----------------------------------------------------------------------

    /// Full view of the given tasks: header line, then indented details
    pub fn render_full(&self, store: &TaskStore, tasks: &[&str]) -> String {
        let mut lines = Vec::new();
        for task in tasks {
            lines.extend(self.full_task(store, task));
        }
        self.finish(lines, &[] as &[&str], false)
    }

    /// Full view of every task (todo, then done) matching the queries
    pub fn render_details<S: AsRef<str>>(&self, store: &TaskStore, queries: &[S]) -> String {
        let mut tasks = search(store, queries, false, Category::Todo);
        tasks.extend(search(store, queries, false, Category::Done));
        let mut lines = Vec::new();
        for task in &tasks {
            lines.extend(self.full_task(store, task));
        }
        self.finish(lines, queries, false)
    }

    fn full_task(&self, store: &TaskStore, task: &str) -> Vec<String> {
        let info = store.info_or_derive(task);
        let done = store.is_done(task);

        let mut first = format!(" {} ", if done { DONE_MARK } else { TODO_MARK });
        if !done && let Some(due) = self.due_phrase(&info) {
            first.push_str(&due);
            first.push(' ');
        }
        if info.has_details() && self.color {
            first.push_str(&info.header.as_str().bold().to_string());
        } else {
            first.push_str(&info.header);
        }

        let mut lines = vec![first];
        if info.has_details() {
            for detail in store.grammar().lines(&info.details) {
                lines.push(format!("{}{}", DETAILS_INDENT, detail));
            }
        }
        lines
    }

    /// Colorize line by line (plus search highlights) and join
    fn finish<S: AsRef<str>>(&self, lines: Vec<String>, queries: &[S], case_sensitive: bool) -> String {
        if !self.color {
            return lines.join("\n");
        }
        let search_rules: Vec<Rule> = highlight_rules(queries, case_sensitive);
        lines
            .iter()
            .map(|line| {
                let styled = apply_rules(line, default_rules());
                apply_rules(&styled, &search_rules)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Lay rows out as columns: mark, due phrase padded to the widest one, text
fn layout_rows(rows: &[Row]) -> Vec<String> {
    let due_width = rows
        .iter()
        .filter_map(|r| r.due.as_deref())
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|row| {
            if due_width == 0 {
                return format!(" {} {}", row.mark, row.text);
            }
            let due = row.due.as_deref().unwrap_or("");
            let pad = due_width - UnicodeWidthStr::width(due);
            format!(" {} {}{} {}", row.mark, due, " ".repeat(pad), row.text)
        })
        .collect()
}
