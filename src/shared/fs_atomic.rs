use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn sibling_temp_path(path: &Path, parent: &Path) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    parent.join(format!(
        ".{}.partial-{}-{stamp}",
        path.file_name().and_then(|v| v.to_str()).unwrap_or("file"),
        std::process::id(),
    ))
}

/// Replaces the contents of `path`, creating missing parent directories.
///
/// Bytes land in a hidden sibling first and are renamed over the target, so
/// concurrent readers observe either the old or the new contents.
pub fn replace_file_contents(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Err(std::io::Error::other("path has no parent")),
    };
    fs::create_dir_all(parent)?;

    let tmp_path = sibling_temp_path(path, parent);
    let written = fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&tmp_path)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path));

    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}
