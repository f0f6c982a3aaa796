use crate::model::store::TaskStore;

/// Which list a search looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Todo,
    Done,
}

/// Tasks of `category` containing every query as a substring, in list
/// order. No queries match every task.
pub fn search<'a, S: AsRef<str>>(
    store: &'a TaskStore,
    queries: &[S],
    case_sensitive: bool,
    category: Category,
) -> Vec<&'a str> {
    let list = match category {
        Category::Todo => store.todo(),
        Category::Done => store.done(),
    };
    list.iter()
        .map(String::as_str)
        .filter(|task| matches_all(task, queries, case_sensitive))
        .collect()
}

/// Whether `text` contains every query
pub fn matches_all<S: AsRef<str>>(text: &str, queries: &[S], case_sensitive: bool) -> bool {
    if case_sensitive {
        queries.iter().all(|q| text.contains(q.as_ref()))
    } else {
        let text = text.to_lowercase();
        queries
            .iter()
            .all(|q| text.contains(&q.as_ref().to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_store() -> TaskStore {
        let now = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let mut store = TaskStore::at(now);
        store.add("Buy Milk and bread");
        store.add("Call the bank");
        store.add("buy stamps");
        store.add("Milk the cow");
        store.add("Bread for the ducks");
        store.do_task("Bread for the ducks");
        store
    }

    #[test]
    fn all_tokens_must_match() {
        let store = sample_store();
        let hits = search(&store, &["milk", "bread"], false, Category::Todo);
        assert_eq!(hits, vec!["Buy Milk and bread"]);
    }

    #[test]
    fn case_insensitive_folds_both_sides() {
        let store = sample_store();
        let hits = search(&store, &["BUY"], false, Category::Todo);
        assert_eq!(hits, vec!["Buy Milk and bread", "buy stamps"]);
    }

    #[test]
    fn case_sensitive_respects_case() {
        let store = sample_store();
        assert_eq!(
            search(&store, &["Milk"], true, Category::Todo),
            vec!["Buy Milk and bread", "Milk the cow"]
        );
        assert!(search(&store, &["MILK"], true, Category::Todo).is_empty());
    }

    #[test]
    fn empty_queries_return_whole_list_in_order() {
        let store = sample_store();
        let none: [&str; 0] = [];
        assert_eq!(
            search(&store, &none, false, Category::Todo),
            vec!["Buy Milk and bread", "Call the bank", "buy stamps", "Milk the cow"]
        );
        assert_eq!(
            search(&store, &none, true, Category::Done),
            vec!["Bread for the ducks"]
        );
    }

    #[test]
    fn done_category_only_sees_done_tasks() {
        let store = sample_store();
        assert_eq!(
            search(&store, &["bread"], false, Category::Done),
            vec!["Bread for the ducks"]
        );
    }
}
