use pavotify_core::{EntryId, HistoryEntry, HistoryLog, Outcome, HISTORY_CAP};
use pretty_assertions::assert_eq;

fn entry(n: u64) -> HistoryEntry {
    HistoryEntry::new(
        EntryId::from(n),
        format!("https://open.example/track/id{n:06}"),
        "/music",
        1_700_000_000_000 + n as i64,
        Outcome::Completed,
    )
}

fn ids(log: &HistoryLog) -> Vec<String> {
    log.iter().map(|e| e.id().to_string()).collect()
}

#[test]
fn prepend_keeps_newest_first() {
    let mut log = HistoryLog::new();
    log.prepend(entry(1));
    log.prepend(entry(2));
    log.prepend(entry(3));
    assert_eq!(ids(&log), vec!["3", "2", "1"]);
}

#[test]
fn cap_holds_for_every_prefix_of_appends() {
    let mut log = HistoryLog::new();
    for n in 1..=120 {
        log.prepend(entry(n));
        assert!(log.len() <= HISTORY_CAP);
    }
    let expected: Vec<String> = (71..=120).rev().map(|n| n.to_string()).collect();
    assert_eq!(ids(&log), expected);
}

#[test]
fn exactly_cap_entries_are_all_kept() {
    let mut log = HistoryLog::new();
    for n in 1..=HISTORY_CAP as u64 {
        log.prepend(entry(n));
    }
    assert_eq!(log.len(), HISTORY_CAP);
    assert_eq!(log.entries().last().unwrap().id(), &EntryId::from(1));
}

#[test]
fn remove_absent_id_is_noop() {
    let mut log = HistoryLog::new();
    log.prepend(entry(1));
    log.prepend(entry(2));
    let before = log.clone();
    assert!(!log.remove(&EntryId::new("does-not-exist")));
    assert_eq!(log, before);
}

#[test]
fn remove_drops_only_matching_entry() {
    let mut log = HistoryLog::new();
    for n in 1..=3 {
        log.prepend(entry(n));
    }
    assert!(log.remove(&EntryId::from(2)));
    assert_eq!(ids(&log), vec!["3", "1"]);
    assert!(log.find(&EntryId::from(2)).is_none());
}

#[test]
fn clear_empties_the_log() {
    let mut log = HistoryLog::new();
    log.prepend(entry(1));
    log.clear();
    assert!(log.is_empty());
    assert!(log.first().is_none());
}

#[test]
fn from_entries_truncates_oversized_input() {
    let entries: Vec<HistoryEntry> = (1..=60).rev().map(entry).collect();
    let log = HistoryLog::from_entries(entries);
    assert_eq!(log.len(), HISTORY_CAP);
    assert_eq!(log.first().unwrap().id(), &EntryId::from(60));
}

#[test]
fn serialized_form_is_a_plain_array_with_short_field_names() {
    let mut log = HistoryLog::new();
    log.prepend(HistoryEntry::new(
        EntryId::from(42),
        "https://x/track/AbCd1234EfGh",
        "/tmp",
        1000,
        Outcome::Failed,
    ));
    let json = serde_json::to_string(&log).unwrap();
    assert_eq!(
        json,
        r#"[{"id":"42","url":"https://x/track/AbCd1234EfGh","title":"Track AbCd1234","path":"/tmp","timestamp":1000,"status":"failed"}]"#
    );

    let parsed: HistoryLog = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, log);
}

#[test]
fn unknown_status_does_not_parse() {
    let json = r#"[{"id":"1","url":"u","title":"t","path":"p","timestamp":1,"status":"paused"}]"#;
    assert!(serde_json::from_str::<HistoryLog>(json).is_err());
}
