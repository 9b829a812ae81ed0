use serde::de::DeserializeOwned;
use simplesheet_sheet::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Resolve `path` against `base`. Absolute paths are returned unchanged.
pub fn resolve_path(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Replace a leading `~` with `home`. Paths without one, or any path when no
/// home directory is known, are returned unchanged.
pub fn expand_home(path: impl AsRef<Path>, home: Option<&Path>) -> PathBuf {
    let path = path.as_ref();
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Read and deserialize a JSON file, resolving relative paths against `base`.
pub fn load_json<T: DeserializeOwned>(base: &Path, path: impl AsRef<Path>) -> Result<T> {
    let path = resolve_path(base, path);
    let file = File::open(&path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
