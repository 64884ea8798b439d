//! Persistence Tests
//!
//! Covers the file-backed lifecycle of a document:
//! - every format survives a save and reopen
//! - alternate-name saves rebind to the original file
//! - autosave and save-on-close policies
//! - configuration-driven opening

mod common;

use std::fs;

use chrono::{TimeZone, Utc};
use leafdb::{ErrorCode, File, FileOptions, Format, Node, Value};

// =============================================================================
// Format Round-Trips
// =============================================================================

/// Every format reopens to the document that was saved.
#[test]
fn test_every_format_roundtrips_through_disk() {
    common::init_tracing();
    let dir = common::create_temp_dir();

    for format in Format::ALL {
        let path = common::temp_path(&dir, &format!("doc.{}", format.extensions()[0]));
        {
            let root = Node::open(&path).unwrap();
            assert_eq!(root.file().format(), format);
            root.set("doc", common::sample_document()).unwrap();
            root.set("list", vec![1.5, 2.5]).unwrap();
            root.save().unwrap();
        }
        let reopened = Node::open(&path).unwrap();
        assert_eq!(
            reopened.get("doc").unwrap().get("b").unwrap().get("c").unwrap(),
            Value::Int(2),
            "format {}",
            format
        );
        assert_eq!(reopened.get("list").unwrap(), Value::from(vec![1.5, 2.5]));
    }
}

/// Binary formats keep timestamps and bytes.
#[test]
fn test_structured_formats_keep_opaque_leaves() {
    let dir = common::create_temp_dir();
    let stamp = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();

    for name in ["opaque.pyn", "opaque.gz", "opaque.bz2", "opaque.xz", "opaque.zip", "opaque.lz4"] {
        let path = common::temp_path(&dir, name);
        {
            let root = Node::open(&path).unwrap();
            root.set("when", stamp).unwrap();
            root.set("raw", Value::bytes(vec![9u8, 8, 7])).unwrap();
            root.save().unwrap();
        }
        let reopened = Node::open(&path).unwrap();
        assert_eq!(reopened.get("when").unwrap(), Value::Timestamp(stamp), "{}", name);
        assert_eq!(reopened.get("raw").unwrap(), Value::bytes(vec![9u8, 8, 7]));
    }
}

/// Saved then reloaded arithmetic results persist.
#[test]
fn test_increment_survives_save_and_reload() {
    let dir = common::create_temp_dir();
    let path = common::temp_path(&dir, "counter.pyn");

    let root = Node::open(&path).unwrap();
    root.set("z", 1).unwrap();
    assert_eq!(root.get("z").unwrap().add_assign(1).unwrap(), Value::Int(2));
    root.save().unwrap();

    root.get("z").unwrap().add_assign(100).unwrap();
    root.reload().unwrap();
    assert_eq!(root.get("z").unwrap(), Value::Int(2));
}

/// Bytes that do not match the declared format are a decode error.
#[test]
fn test_wrong_format_is_decode_error() {
    let dir = common::create_temp_dir();
    let path = common::temp_path(&dir, "data.json");
    fs::write(&path, b"{'a': 1}").unwrap();

    let err = Node::open(&path).unwrap_err();
    assert_eq!(err.code(), ErrorCode::DecodeFailed);

    let root = Node::open_with(&path, FileOptions::new().with_format(Format::Text)).unwrap();
    assert_eq!(root.get("a").unwrap(), Value::Int(1));
}

// =============================================================================
// Alternate Names
// =============================================================================

/// A second, argument-free save targets the original file.
#[test]
fn test_save_as_then_save_writes_original() {
    let dir = common::create_temp_dir();
    let original = common::temp_path(&dir, "main.json");
    let copy = common::temp_path(&dir, "copy.json");

    let root = Node::open(&original).unwrap();
    root.set("v", 1).unwrap();
    root.save_as(&copy).unwrap();
    root.set("v", 2).unwrap();
    root.save().unwrap();

    assert_eq!(Node::open(&copy).unwrap().get("v").unwrap(), Value::Int(1));
    assert_eq!(Node::open(&original).unwrap().get("v").unwrap(), Value::Int(2));
    assert_eq!(root.file().name(), Some(original.as_path()));
}

/// Without an original name the document stays bound to the alternate file.
#[test]
fn test_save_as_from_memory_stays_bound() {
    let dir = common::create_temp_dir();
    let target = common::temp_path(&dir, "adopted.txt");

    let root = Node::from_value(common::sample_document());
    assert_eq!(root.save().unwrap_err().code(), ErrorCode::FileNameUnset);

    root.save_as(&target).unwrap();
    assert_eq!(root.display_name(), target.display().to_string());
    root.set("after", true).unwrap();
    root.save().unwrap();

    let reopened = Node::open(&target).unwrap();
    assert_eq!(reopened.get("after").unwrap(), Value::Bool(true));
}

/// Switching files keeps the in-memory document and redirects saves.
#[test]
fn test_switch_to_file_redirects_saves() {
    let dir = common::create_temp_dir();
    let first = common::temp_path(&dir, "first.pyn");
    let second = common::temp_path(&dir, "second.dat");

    let root = Node::open(&first).unwrap();
    root.set("k", "v").unwrap();
    root.switch_to_file(&second, Some(Format::Json)).unwrap();
    assert_eq!(root.file().format(), Format::Json);
    root.save().unwrap();

    let text = fs::read_to_string(&second).unwrap();
    assert!(text.contains("\"k\": \"v\""), "{}", text);
    assert_eq!(Node::open(&first).unwrap().names().unwrap().len(), 0);
}

// =============================================================================
// Save Policies
// =============================================================================

/// Autosave persists assignments, deletions and arithmetic immediately.
#[test]
fn test_autosave_writes_every_mutation() {
    let dir = common::create_temp_dir();
    let path = common::temp_path(&dir, "auto.json");
    let read_back = || File::open(&path, FileOptions::default()).unwrap().data().clone();

    let root = Node::open_with(&path, FileOptions::new().with_autosave(true)).unwrap();
    root.set("n", 1).unwrap();
    assert_eq!(read_back(), Value::from(serde_json::json!({"n": 1})));

    root.get("n").unwrap().add_assign(4).unwrap();
    assert_eq!(read_back(), Value::from(serde_json::json!({"n": 5})));

    root.get("n").unwrap().delete().unwrap();
    assert_eq!(read_back(), Value::empty());
}

/// Save-on-close persists once the last node goes away.
#[test]
fn test_save_on_close_fires_on_last_drop() {
    let dir = common::create_temp_dir();
    let path = common::temp_path(&dir, "close.pyn");

    let root = Node::open_with(&path, FileOptions::new().with_save_on_close(true)).unwrap();
    let child_holder = {
        root.set("kept", "yes").unwrap();
        root.clone()
    };
    drop(root);
    assert_eq!(Node::open(&path).unwrap().names().unwrap().len(), 0);

    drop(child_holder);
    let reopened = Node::open(&path).unwrap();
    assert_eq!(reopened.get("kept").unwrap(), Value::from("yes"));
}

/// A failed open never writes back to the file on drop.
#[test]
fn test_failed_open_does_not_overwrite() {
    let dir = common::create_temp_dir();
    let path = common::temp_path(&dir, "fragile.json");
    fs::write(&path, b"not json").unwrap();

    let options = FileOptions::new().with_save_on_close(true);
    assert!(Node::open_with(&path, options).is_err());
    assert_eq!(fs::read(&path).unwrap(), b"not json");
}

// =============================================================================
// Configuration
// =============================================================================

/// A JSON config file names the path and options.
#[test]
fn test_open_from_config() {
    let dir = common::create_temp_dir();
    let data = common::temp_path(&dir, "configured.bin");
    let config = common::temp_path(&dir, "leafdb.json");
    fs::write(
        &config,
        serde_json::json!({"path": data, "format": "gzip", "autosave": true}).to_string(),
    )
    .unwrap();

    let root = Node::from_config(&config).unwrap();
    assert_eq!(root.file().format(), Format::Gzip);
    assert!(root.file().autosave());
    root.set("x", 1).unwrap();

    let reopened = Node::open_with(&data, FileOptions::new().with_format(Format::Gzip)).unwrap();
    assert_eq!(reopened.get("x").unwrap(), Value::Int(1));
}
