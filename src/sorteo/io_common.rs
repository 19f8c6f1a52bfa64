use std::path::{Path, PathBuf};

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Paths in a configuration file are relative to the directory of that file.
pub fn resolve_path(root: &Path, path: &str) -> PathBuf {
    root.join(path)
}

/// The reader to use when the input type is not given.
pub fn infer_provider(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("csv") | Some("txt") => "csv",
        _ => "excel",
    }
}

/// A line of a group listing: the cells separated by vertical bars.
pub fn format_line(cells: &[&str]) -> String {
    cells.join(" | ")
}
