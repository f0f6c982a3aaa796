use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use tasq::model::TaskStore;
use tasq::parse::{Splitter, parse_json_store, parse_store, serialize_json_store, serialize_store};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap()
}

/// (header, details, due, done) for every task, todo first
fn summary(store: &TaskStore) -> Vec<(String, String, Option<String>, bool)> {
    store
        .todo()
        .iter()
        .chain(store.done().iter())
        .map(|task| {
            let info = store.info_or_derive(task);
            (info.header, info.details, info.due, store.is_done(task))
        })
        .collect()
}

fn sample_store() -> TaskStore {
    let mut store = TaskStore::at(now());
    store.add("Buy milk");
    store.add("Pay rent\ndue tomorrow\nsee https://bank.example.com");
    store.add("Renew passport in 3 weeks");
    store.add("Plan trip\nbook hotel\ncompare flights on friday");
    store.add("Water plants");
    store.add("File taxes by 2026-04-15");
    store.do_task("Water plants");
    store.do_task("File taxes by 2026-04-15");
    store.sort();
    store
}

#[test]
fn text_round_trip_preserves_every_task() {
    let store = sample_store();
    let encoded = serialize_store(&store);
    let decoded = parse_store(&encoded, now());
    assert_eq!(summary(&decoded), summary(&store));
    assert_eq!(decoded.todo().len(), 4);
    assert_eq!(decoded.done().len(), 2);
}

#[test]
fn text_encoding_is_stable_after_first_decode() {
    let store = sample_store();
    let first = serialize_store(&store);
    let second = serialize_store(&parse_store(&first, now()));
    assert_eq!(second, first);
}

#[test]
fn crlf_store_round_trips_with_crlf() {
    let source = "Pay rent\r\ndue tomorrow\r\n\r\nBuy milk\r\n\r\nWater plants\r\n@done\r\n";
    let store = parse_store(source, now());
    assert_eq!(store.grammar().splitter(), Splitter::CrLf);
    assert_eq!(store.todo(), ["Pay rent\r\ndue tomorrow", "Buy milk"]);
    assert_eq!(store.info("Pay rent\r\ndue tomorrow").unwrap().details, "due tomorrow");

    let encoded = serialize_store(&store);
    assert_eq!(
        encoded,
        "Pay rent\r\ndue tomorrow\r\n@due 2026-10-19 09:00\r\n\r\nBuy milk\r\n\r\nWater plants\r\n@done\r\n"
    );
    assert_eq!(summary(&parse_store(&encoded, now())), summary(&store));
}

#[test]
fn legacy_json_imports_into_text() {
    let legacy = r#"{
    "todo": ["Pay rent tomorrow", "Buy milk"],
    "done": ["Water plants"],
    "info": {"Pay rent tomorrow": {"header": "stale", "details": ""}}
}"#;
    let (mut store, forced) = parse_json_store(legacy, now()).unwrap();
    assert!(forced);
    store.sort();

    let text = serialize_store(&store);
    assert_eq!(
        text,
        "Pay rent tomorrow\n@due 2026-10-19 09:00\n\nBuy milk\n\nWater plants\n@done\n"
    );
    assert_eq!(summary(&parse_store(&text, now())), summary(&store));
}

#[test]
fn json_round_trip_preserves_every_task() {
    let store = sample_store();
    let encoded = serialize_json_store(&store).unwrap();
    let (decoded, forced) = parse_json_store(&encoded, now()).unwrap();
    assert!(!forced);
    assert_eq!(decoded.todo(), store.todo());
    assert_eq!(decoded.done(), store.done());
    assert_eq!(summary(&decoded), summary(&store));
}

#[test]
fn blank_lines_in_details_do_not_split_the_task() {
    let mut store = TaskStore::at(now());
    store.add("Plan trip\nbook hotel\n\ncompare flights");
    store.add("\nPack bags\nsocks");

    let decoded = parse_store(&serialize_store(&store), now());
    assert_eq!(decoded.todo().len(), 2);
    assert_eq!(summary(&decoded), summary(&store));
    assert_eq!(
        summary(&decoded),
        vec![
            ("Plan trip".to_string(), "book hotel\ncompare flights".to_string(), None, false),
            ("Pack bags".to_string(), "socks".to_string(), None, false),
        ]
    );
}
