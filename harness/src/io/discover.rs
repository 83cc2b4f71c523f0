//! Recursive discovery of script files for corpus runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Find every file under `root` with the given extension.
///
/// Returns `root` and the matching paths relative to it, sorted. A missing
/// root yields no scripts.
pub fn discover_scripts(root: &Path, extension: &str) -> Result<(PathBuf, Vec<PathBuf>)> {
    let mut found = Vec::new();
    if root.exists() {
        walk(root, root, extension, &mut found)?;
    }
    found.sort();
    debug!(root = %root.display(), count = found.len(), "scripts discovered");
    Ok((root.to_path_buf(), found))
}

fn walk(root: &Path, dir: &Path, extension: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("file type {}", path.display()))?;
        if file_type.is_dir() {
            walk(root, &path, extension, found)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            let relative = path
                .strip_prefix(root)
                .with_context(|| format!("relativize {}", path.display()))?;
            found.push(relative.to_path_buf());
        }
    }
    Ok(())
}
