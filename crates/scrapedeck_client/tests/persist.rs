use std::fs;

use scrapedeck_client::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("logs");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("scraping.log", b"first run").unwrap();
    assert_eq!(fs::read(&first).unwrap(), b"first run");

    let second = writer.write("scraping.log", b"second run").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "second run");
}

#[test]
fn rejects_names_with_directories() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let err = writer.write("../escape.log", b"x").unwrap_err();
    assert!(matches!(err, PersistError::FileName(_)));
}

#[test]
fn file_in_place_of_dir_is_an_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("scraping.log", b"data").is_err());
}
