use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{BrandframeError, BrandframeResult};

/// Normalize and validate asset paths relative to an assets root.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> BrandframeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(BrandframeError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(BrandframeError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(BrandframeError::validation(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(BrandframeError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Resolve a normalized relative path under `root`.
pub(crate) fn resolve(root: &Path, norm_path: &str) -> PathBuf {
    root.join(Path::new(norm_path))
}

pub(crate) fn read_bytes(path: &Path) -> BrandframeResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read asset bytes from '{}'", path.display()))
        .map_err(BrandframeError::from)
}
