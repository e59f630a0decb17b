use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_against<P: AsRef<Path>, B: AsRef<Path>>(base: B, path: P) -> PathBuf {
    let p = path.as_ref();
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.as_ref().join(p)
    }
}

/// Turn a user-supplied executable path into one that is never looked up on `PATH`.
///
/// `sps` becomes `<cwd>/sps`, the same as invoking `./sps` from a shell.
pub fn resolve_executable<P: AsRef<Path>>(path: P) -> PathBuf {
    let p = path.as_ref();
    if p.is_absolute() {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    cwd.join(p)
}

/// File stem of `path` reduced to characters that are safe inside a temp-file name.
pub fn safe_stem<P: AsRef<Path>>(path: P) -> String {
    let stem = path
        .as_ref()
        .components()
        .next_back()
        .and_then(|c| match c {
            Component::Normal(name) => Path::new(name).file_stem(),
            _ => None,
        })
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if cleaned.is_empty() { "input".to_string() } else { cleaned }
}
