//! Integration tests for the raw handle lifecycle

mod common;

use filekit::{FileContract, FileHandle, FileMode, HandleError, OpenFlags};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

#[rstest]
#[case(FileMode::Read, OpenFlags::new(), false)]
#[case(FileMode::Write, OpenFlags::new(), true)]
#[case(FileMode::Write, OpenFlags::new().with_truncate(true), true)]
#[case(FileMode::Write, OpenFlags::new().with_append(true), true)]
#[case(FileMode::ReadWrite, OpenFlags::new(), true)]
#[case(FileMode::ReadWrite, OpenFlags::new().with_truncate(true).with_binary(true), true)]
#[case(FileMode::ReadWrite, OpenFlags::new().with_append(true), true)]
fn test_open_missing_file(
    #[case] mode: FileMode,
    #[case] flags: OpenFlags,
    #[case] expect_open: bool,
) -> anyhow::Result<()> {
    common::init_tracing();
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("absent.dat");

    let mut handle = FileHandle::new();
    assert_eq!(handle.open(Some(&path), mode, flags), expect_open);
    assert_eq!(handle.is_open(), expect_open);
    assert_eq!(path.exists(), expect_open);

    handle.close();
    assert!(!handle.is_open());

    Ok(())
}

#[rstest]
#[case(FileMode::Read, OpenFlags::new())]
#[case(FileMode::Write, OpenFlags::new())]
#[case(FileMode::ReadWrite, OpenFlags::new().with_append(true))]
fn test_open_existing_file(#[case] mode: FileMode, #[case] flags: OpenFlags) -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = common::write_fixture(temp_dir.path(), "present.dat", b"content")?;

    let mut handle = FileHandle::new();
    assert!(handle.open(Some(&path), mode, flags));
    assert!(handle.is_open());
    assert_eq!(handle.flags(), flags);
    handle.close();

    assert_eq!(fs::read(&path)?, b"content");

    Ok(())
}

#[test]
fn test_round_trip_arbitrary_bytes() -> anyhow::Result<()> {
    common::init_tracing();
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("bytes.bin");
    let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    let mut handle = FileHandle::new();
    assert!(handle.open(Some(&path), FileMode::Write, OpenFlags::new().with_binary(true)));
    assert_eq!(handle.write(&content, None)?, Some(content.len()));

    assert!(handle.open(Some(&path), FileMode::Read, OpenFlags::new().with_binary(true)));
    assert_eq!(handle.read(Some(content.len()))?, Some(content));
    assert_eq!(handle.read(None)?, None);

    Ok(())
}

#[test]
fn test_read_is_absent_only_at_end_of_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = common::write_fixture(temp_dir.path(), "eof.txt", b"0123456789")?;

    let mut handle = FileHandle::new();
    assert!(handle.open(Some(&path), FileMode::Read, OpenFlags::new()));
    handle.set_read_length(Some(5))?;

    assert!(!handle.is_end_of_file()?);
    assert_eq!(handle.read(None)?.as_deref(), Some(&b"01234"[..]));
    assert!(!handle.is_end_of_file()?);
    assert_eq!(handle.read(None)?.as_deref(), Some(&b"56789"[..]));
    assert!(handle.is_end_of_file()?);
    assert_eq!(handle.read(None)?, None);
    assert_eq!(handle.read(None)?, None);

    Ok(())
}

#[test]
fn test_truncate_scenario_on_anonymous_handle() -> anyhow::Result<()> {
    common::init_tracing();
    let mut handle = FileHandle::new();
    assert!(handle.open(None, FileMode::ReadWrite, OpenFlags::new()));

    assert_eq!(handle.write(b"1,2,3\n4,5,6\n", None)?, Some(12));
    assert!(handle.truncate(6)?);
    assert!(handle.rewind()?);

    assert_eq!(handle.read_to_end()?, b"1,2,3\n");

    Ok(())
}

#[test]
fn test_operations_before_open_are_precondition_errors() {
    let mut handle = FileHandle::new();

    assert_eq!(handle.read(None), Err(HandleError::NotOpen));
    assert_eq!(handle.read(Some(1)), Err(HandleError::NotOpen));
    assert_eq!(handle.write(b"data", None), Err(HandleError::NotOpen));
    assert_eq!(handle.truncate(0), Err(HandleError::NotOpen));
    assert_eq!(handle.is_end_of_file(), Err(HandleError::NotOpen));
    assert_eq!(handle.read_to_end(), Err(HandleError::NotOpen));
}

#[test]
fn test_operations_after_close_are_precondition_errors() {
    let mut handle = FileHandle::new();
    assert!(handle.open(None, FileMode::ReadWrite, OpenFlags::new()));
    handle.close();
    handle.close();

    assert_eq!(handle.read(None), Err(HandleError::NotOpen));
    assert_eq!(handle.write(b"data", None), Err(HandleError::NotOpen));
}

#[test]
fn test_drop_releases_anonymous_file() -> anyhow::Result<()> {
    let path = {
        let mut handle = FileHandle::new();
        assert!(handle.open(None, FileMode::ReadWrite, OpenFlags::new()));
        handle
            .path()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| anyhow::anyhow!("anonymous handle has no path"))?
    };

    assert!(!path.exists());

    Ok(())
}

#[test]
fn test_negative_read_length_is_rejected() -> anyhow::Result<()> {
    let mut handle = FileHandle::new();
    handle.set_read_length(Some(16))?;

    assert!(matches!(
        handle.set_read_length(Some(-1)),
        Err(HandleError::InvalidReadLength(-1))
    ));
    assert_eq!(handle.read_length(), Some(16));

    Ok(())
}
