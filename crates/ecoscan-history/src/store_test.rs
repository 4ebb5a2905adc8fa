use super::*;

#[test]
fn tmp_path_is_a_sibling_of_the_history_file() {
    let store = HistoryStore::open("/var/lib/ecoscan/history.json");
    assert_eq!(
        store.tmp_path(),
        PathBuf::from("/var/lib/ecoscan/history.json.tmp")
    );
}

#[test]
fn tmp_path_for_bare_file_name() {
    let store = HistoryStore::open("history.json");
    assert_eq!(store.tmp_path(), PathBuf::from("history.json.tmp"));
}

#[test]
fn open_does_not_touch_the_filesystem() {
    let store = HistoryStore::open("/nonexistent/ecoscan/history.json");
    assert_eq!(store.path(), Path::new("/nonexistent/ecoscan/history.json"));
    assert!(store.entries().unwrap().is_empty());
}
