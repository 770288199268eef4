//! Download file names derived from page titles.

use regex::Regex;
use std::sync::LazyLock;

static RE_UNSAFE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]").unwrap());

/// Stem used when the title yields nothing.
pub const DEFAULT_FILE_STEM: &str = "qrcode";

/// PNG file name for a title: ASCII-lowercased, anything outside `[a-z0-9]`
/// replaced by `_`. Blank titles give `qrcode.png`.
pub fn download_file_name(title: &str) -> String {
    if title.trim().is_empty() {
        return format!("{DEFAULT_FILE_STEM}.png");
    }
    let lower = title.to_ascii_lowercase();
    let stem = RE_UNSAFE.replace_all(&lower, "_");
    format!("{stem}.png")
}
