use pretty_assertions::assert_eq;
use rstest::rstest;
use sharer_fs::{RobustnessConfig, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tools.json");

    io::write_atomic(&path, b"{}", RobustnessConfig::default()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "{}");
}

#[test]
fn test_write_atomic_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data").join("nested").join("tools.json");

    io::write_atomic(&path, b"{}", RobustnessConfig::default()).unwrap();

    assert!(path.exists());
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tools.json");
    fs::write(&path, "original").unwrap();

    io::write_atomic(&path, b"updated", RobustnessConfig::default()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "updated");
}

#[rstest]
#[case(true)]
#[case(false)]
fn test_write_atomic_leaves_no_temp_files(#[case] enable_fsync: bool) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tools.json");
    let config = RobustnessConfig {
        enable_fsync,
        ..RobustnessConfig::default()
    };

    io::write_atomic(&path, b"first", config).unwrap();
    io::write_atomic(&path, b"second", config).unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["tools.json".to_string()]);
}

#[test]
fn test_read_optional_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tools.json");
    fs::write(&path, "hello").unwrap();

    assert_eq!(io::read_optional(&path).unwrap(), Some("hello".to_string()));
}

#[test]
fn test_read_text_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let result = io::read_text(&temp.path().join("missing.json"));
    assert!(result.is_err());
}

#[test]
fn test_read_optional_rejects_invalid_utf8() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tools.json");
    fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

    assert!(io::read_optional(&path).is_err());
}

#[test]
fn test_move_aside_renames_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tools.json");
    fs::write(&path, "not json").unwrap();

    let moved = io::move_aside(&path, "corrupt-1").unwrap();

    assert!(!path.exists());
    assert_eq!(moved, temp.path().join("tools.json.corrupt-1"));
    assert_eq!(fs::read_to_string(moved).unwrap(), "not json");
}

#[test]
fn test_move_aside_never_replaces_earlier_copy() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tools.json");

    fs::write(&path, "first broken").unwrap();
    let first = io::move_aside(&path, "corrupt-1").unwrap();
    fs::write(&path, "second broken").unwrap();
    let second = io::move_aside(&path, "corrupt-1").unwrap();

    assert_ne!(first, second);
    assert_eq!(second, temp.path().join("tools.json.corrupt-1.1"));
    assert_eq!(fs::read_to_string(first).unwrap(), "first broken");
    assert_eq!(fs::read_to_string(second).unwrap(), "second broken");
    assert!(!path.exists());
}
