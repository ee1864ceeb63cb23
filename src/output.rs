// src/output.rs

//! Rendering an ordering as text.

use std::path::Path;

use crate::errors::Result;
use crate::fs::FileSystem;

/// One id per line; every line, the last one included, ends with `\n`.
pub fn format_ordering<S: AsRef<str>>(ids: &[S]) -> String {
    let mut out = String::with_capacity(ids.iter().map(|s| s.as_ref().len() + 1).sum());
    for id in ids {
        out.push_str(id.as_ref());
        out.push('\n');
    }
    out
}

/// Format `ids` and write them to `path`.
pub fn write_ordering<S: AsRef<str>>(fs: &dyn FileSystem, path: &Path, ids: &[S]) -> Result<()> {
    let text = format_ordering(ids);
    fs.write(path, text.as_bytes())?;
    Ok(())
}
