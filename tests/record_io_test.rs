//! Integration tests for line and record handles

mod common;

use filekit::{CsvHandle, Dialect, FileContract, FileMode, LineEnding, OpenFlags, TextHandle};
use std::fs;
use tempfile::TempDir;

fn strings(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| (*f).to_owned()).collect()
}

#[test]
fn test_csv_round_trip_through_reopen() -> anyhow::Result<()> {
    common::init_tracing();
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("table.csv");
    let rows = vec![
        strings(&["id", "name", "comment"]),
        strings(&["1", "Smith, Jane", "said \"hello\""]),
        strings(&["2", "O'Brien", "multi\nline\nnote"]),
        strings(&["3", "", "trailing,"]),
    ];

    let mut csv = CsvHandle::new();
    assert!(csv.open(Some(&path), FileMode::Write, OpenFlags::new().with_truncate(true)));
    for row in &rows {
        assert!(csv.write_row(row)?.is_some());
    }
    csv.close();

    let mut csv = CsvHandle::new();
    assert!(csv.open(Some(&path), FileMode::Read, OpenFlags::new()));
    for row in &rows {
        assert_eq!(csv.read_row(None)?.as_ref(), Some(row));
    }
    assert_eq!(csv.read_row(None)?, None);
    assert_eq!(csv.read_row(None)?, None);

    Ok(())
}

#[test]
fn test_csv_reads_foreign_file_with_blank_lines() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = common::write_fixture(temp_dir.path(), "blanks.csv", b"a\n\nb\n")?;

    let mut csv = CsvHandle::new();
    assert!(csv.open(Some(&path), FileMode::Read, OpenFlags::new()));
    assert_eq!(csv.read_row(None)?, Some(strings(&["a"])));
    assert_eq!(csv.read_row(None)?, Some(Vec::new()));

    let mut csv = CsvHandle::new().with_skip_empty_rows(true);
    assert!(csv.open(Some(&path), FileMode::Read, OpenFlags::new()));
    assert_eq!(csv.read_row(None)?, Some(strings(&["a"])));
    assert_eq!(csv.read_row(None)?, Some(strings(&["b"])));
    assert_eq!(csv.read_row(None)?, None);

    Ok(())
}

#[test]
fn test_tsv_file_layout() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("table.tsv");

    let mut tsv = CsvHandle::with_dialect(Dialect::tsv());
    assert!(tsv.open(Some(&path), FileMode::ReadWrite, OpenFlags::new()));
    tsv.write_row(["k", "v"])?;
    tsv.write_row(["comma,ok", "tab\there"])?;
    tsv.close();

    assert_eq!(fs::read_to_string(&path)?, "k\tv\ncomma,ok\t\"tab\there\"\n");

    Ok(())
}

#[test]
fn test_text_lines_through_reopen() -> anyhow::Result<()> {
    common::init_tracing();
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("notes.txt");

    let mut text = TextHandle::new().with_line_ending(LineEnding::Lf);
    assert!(text.open(Some(&path), FileMode::Write, OpenFlags::new()));
    text.write_line("first", None)?;
    text.write_line("", None)?;
    text.write_line("third", None)?;

    let mut text = TextHandle::new();
    assert!(text.open(Some(&path), FileMode::Read, OpenFlags::new()));
    assert_eq!(text.read_line(None)?.as_deref(), Some("first\n"));
    assert_eq!(text.read_line(None)?.as_deref(), Some("\n"));
    assert_eq!(text.read_line(None)?.as_deref(), Some("third\n"));
    assert_eq!(text.read_line(None)?, None);

    Ok(())
}

#[test]
fn test_append_lines_to_existing_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = common::write_fixture(temp_dir.path(), "log.txt", b"boot\n")?;

    let mut text = TextHandle::new().with_line_ending(LineEnding::Lf);
    assert!(text.open(Some(&path), FileMode::Write, OpenFlags::new().with_append(true)));
    text.write_line("ready", None)?;
    text.close();

    assert_eq!(fs::read_to_string(&path)?, "boot\nready\n");

    Ok(())
}
