use std::path::{Path, PathBuf};
use std::sync::Once;

use filekit::{FileContract, FileHandle, FileMode, OpenFlags};

static TRACING: Once = Once::new();

/// Route library logs to the test harness output
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// Write `content` to `dir/name` through a fresh handle and return the path
#[allow(dead_code)]
pub fn write_fixture(dir: &Path, name: &str, content: &[u8]) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    let mut handle = FileHandle::new();
    anyhow::ensure!(
        handle.open(Some(&path), FileMode::Write, OpenFlags::new().with_truncate(true)),
        "failed to open fixture {}",
        path.display()
    );
    anyhow::ensure!(
        handle.write(content, None)? == Some(content.len()),
        "short write to fixture {}",
        path.display()
    );
    Ok(path)
}
