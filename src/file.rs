// src/file.rs

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// A fully written temp file waiting to be renamed over its target.
/// Dropped without `commit`, the temp file is removed and the target is
/// left as it was.
#[derive(Debug)]
pub struct Staged {
    tmp: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl Staged {
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn commit(mut self) -> io::Result<()> {
        fs::rename(&self.tmp, &self.target)?;
        self.committed = true;
        logd!("Replaced {}", self.target.display());
        Ok(())
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

/// Write `contents` to a sibling temp file, creating parents as needed.
/// Nothing at `path` changes until `Staged::commit` renames it into place.
pub fn stage_document(path: &Path, contents: &str) -> io::Result<Staged> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let tmp = tmp_sibling(path);
    fs::write(&tmp, contents)?;
    logd!("Staged {} bytes for {}", contents.len(), path.display());
    Ok(Staged { tmp, target: path.to_path_buf(), committed: false })
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// User text → output file. A directory (existing, or written with a
/// trailing separator) gets `default_filename` appended.
pub fn resolve_out_path(user_o: &str, default_filename: &str) -> PathBuf {
    let p = PathBuf::from(normalize_separators(user_o));
    if looks_like_dir_hint(user_o) || p.is_dir() {
        p.join(default_filename)
    } else {
        p
    }
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c == '/' || c == '\\' { sep } else { c }).collect()
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::other(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

pub fn looks_like_dir_hint(p: &str) -> bool {
    p.ends_with('/') || p.ends_with('\\')
}
