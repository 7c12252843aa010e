use altre_rope::{EngineConfig, FileError, RopeError, TextBuffer};
use proptest::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_hello_world_scenario() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "Hello");
    buffer.insert(5, " World");
    buffer.insert(11, "!");
    assert_eq!(buffer.text(0, 12), "Hello World!");

    buffer.erase(5, 6);
    assert_eq!(buffer.text(0, 5), "Hello");
    assert!(buffer.validate());
}

#[test]
fn test_save_and_load_round_trip() {
    let temp_dir = tempdir().unwrap();
    let file_path = temp_dir.path().join("round_trip.txt");

    let mut original = TextBuffer::new();
    original.insert(0, "third line\n");
    original.insert(0, "second line\n");
    original.insert(0, "first line\n");
    original.insert(6, "(edited) ");
    original.save_to_file(&file_path).unwrap();

    let mut loaded = TextBuffer::new();
    loaded.load_from_file(&file_path).unwrap();

    assert_eq!(loaded.len(), original.len());
    assert_eq!(loaded.text(0, loaded.len()), original.text(0, original.len()));
    assert_eq!(fs::read_to_string(&file_path).unwrap(), original.to_string());
}

#[test]
fn test_load_clears_history_and_is_not_undoable() {
    let temp_dir = tempdir().unwrap();
    let file_path = temp_dir.path().join("load.txt");
    fs::write(&file_path, "from disk").unwrap();

    let mut buffer = TextBuffer::new();
    buffer.insert(0, "scratch");
    assert!(buffer.can_undo());

    buffer.load_from_file(&file_path).unwrap();
    assert_eq!(buffer.to_string(), "from disk");
    assert!(!buffer.can_undo());
    assert!(!buffer.undo());
    assert_eq!(buffer.to_string(), "from disk");
}

#[test]
fn test_load_empty_file() {
    let temp_dir = tempdir().unwrap();
    let file_path = temp_dir.path().join("empty.txt");
    fs::write(&file_path, "").unwrap();

    let mut buffer = TextBuffer::from_text("previous");
    buffer.load_from_file(&file_path).unwrap();
    assert!(buffer.is_empty());
    assert!(buffer.validate());
}

#[test]
fn test_load_missing_file_reports_io_error() {
    let temp_dir = tempdir().unwrap();
    let mut buffer = TextBuffer::from_text("keep me");

    let result = buffer.load_from_file(temp_dir.path().join("absent.txt"));
    assert!(matches!(
        result,
        Err(RopeError::File(FileError::NotFound { .. }))
    ));
    assert_eq!(buffer.to_string(), "keep me");
}

#[test]
fn test_save_into_missing_directory_fails() {
    let temp_dir = tempdir().unwrap();
    let buffer = TextBuffer::from_text("data");
    let result = buffer.save_to_file(temp_dir.path().join("nope").join("out.txt"));
    assert!(result.unwrap_err().is_io());
}

#[test]
fn test_redo_after_undo_restores_state() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "abc");
    buffer.erase(1, 1);
    assert_eq!(buffer.to_string(), "ac");

    assert!(buffer.undo());
    assert_eq!(buffer.to_string(), "abc");
    assert!(buffer.can_redo());
    assert!(buffer.redo());
    assert_eq!(buffer.to_string(), "ac");

    buffer.undo();
    buffer.insert(0, "new ");
    assert!(!buffer.can_redo());
}

#[test]
fn test_clear_history() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "one");
    buffer.insert(3, " two");
    buffer.undo();
    buffer.clear_history();
    assert!(!buffer.can_undo());
    assert!(!buffer.can_redo());
    assert_eq!(buffer.to_string(), "one");
}

#[test]
fn test_history_is_trimmed_to_recent_entries() {
    let mut buffer = TextBuffer::with_config(&EngineConfig::default());
    for _ in 0..51 {
        buffer.insert(0, "x");
    }
    assert_eq!(buffer.history_depth(), 25);

    let mut undone = 0;
    while buffer.undo() {
        undone += 1;
    }
    assert_eq!(undone, 25);
    assert_eq!(buffer.len(), 26);
}

#[test]
fn test_dump_tree_lists_every_chunk() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "c");
    buffer.insert(0, "b");
    buffer.insert(0, "a");

    let dump = buffer.dump_tree();
    assert_eq!(dump.lines().count(), 3);
    assert!(dump.contains("[b] (h:2, s:3)"));
    assert!(dump.contains("[a] (h:1, s:1)"));
}

fn apply_to_model(model: &mut Vec<char>, is_insert: bool, pos: usize, payload: &str) {
    if is_insert {
        let pos = pos.min(model.len());
        for (i, ch) in payload.chars().enumerate() {
            model.insert(pos + i, ch);
        }
    } else if pos < model.len() {
        let end = (pos + payload.chars().count()).min(model.len());
        model.drain(pos..end);
    }
}

proptest! {
    #[test]
    fn prop_undo_walks_back_through_every_edit(
        ops in prop::collection::vec((any::<bool>(), 0usize..40, "[a-z]{1,5}"), 1..30)
    ) {
        let mut buffer = TextBuffer::new();
        let mut model: Vec<char> = Vec::new();
        let mut states = vec![String::new()];

        for (is_insert, pos, payload) in &ops {
            if *is_insert {
                buffer.insert(*pos, payload);
            } else {
                buffer.erase(*pos, payload.chars().count());
            }
            apply_to_model(&mut model, *is_insert, *pos, payload);
            prop_assert_eq!(buffer.to_string(), model.iter().collect::<String>());
            states.push(buffer.to_string());
        }

        states.pop();
        while let Some(expected) = states.pop() {
            prop_assert!(buffer.undo());
            prop_assert_eq!(buffer.to_string(), expected);
            prop_assert!(buffer.validate());
        }
        prop_assert!(!buffer.undo());
    }

    #[test]
    fn prop_insert_into_empty_reads_back(text in "\\PC{0,40}", pos in 0usize..10) {
        let mut buffer = TextBuffer::new();
        buffer.insert(pos, &text);
        // 空のバッファでは位置に関係なく先頭に入る
        prop_assert_eq!(buffer.text(0, text.chars().count()), text.clone());
        prop_assert_eq!(buffer.len(), text.chars().count());
    }

    #[test]
    fn prop_noop_edits_change_nothing(text in "[a-z\\n]{0,30}", pos in 0usize..40) {
        let mut buffer = TextBuffer::from_text(&text);
        let before = buffer.to_string();
        buffer.insert(pos, "");
        buffer.erase(pos, 0);
        prop_assert_eq!(buffer.len(), before.chars().count());
        prop_assert_eq!(buffer.to_string(), before);
    }
}
