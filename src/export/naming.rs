use crate::foundation::core::FormatId;

/// File-name-safe prefix from the first caption line.
///
/// Keeps letters (any script), digits, whitespace and `-`, trims the result and keeps at most
/// `max_chars` characters. Falls back to `default_name` when nothing survives.
pub fn sanitize_caption_prefix(caption: &str, max_chars: usize, default_name: &str) -> String {
    let first = caption.split('\n').next().unwrap_or_default();
    let kept: String = first
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    let out: String = kept.trim().chars().take(max_chars).collect();
    if out.is_empty() {
        default_name.to_string()
    } else {
        out
    }
}

/// `{prefix}_{id}.{ext}`
pub fn format_file_name(prefix: &str, id: &FormatId, ext: &str) -> String {
    format!("{prefix}_{id}.{ext}")
}

/// `{archive_prefix}_{prefix}.zip`, or `{prefix}.zip` without an archive prefix.
pub fn archive_file_name(archive_prefix: Option<&str>, prefix: &str) -> String {
    match archive_prefix.filter(|p| !p.is_empty()) {
        Some(p) => format!("{p}_{prefix}.zip"),
        None => format!("{prefix}.zip"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/naming.rs"]
mod tests;
