//! Derivation of the catalog key (`filename`) from user input.
//!
//! The filename doubles as a storage key, so it is restricted to a portable
//! character set and can never escape the asset prefix.

/// Name used when the caller supplies a blank model name.
pub const DEFAULT_MODEL_NAME: &str = "unnamedmodel";

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// Reduce a display name to a storage-safe stem.
///
/// Characters outside `[A-Za-z0-9._-]` become `_` and leading dots are
/// stripped. A name that ends up empty maps to [`DEFAULT_MODEL_NAME`].
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if is_safe(c) { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        DEFAULT_MODEL_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Extension of an uploaded file's original name, including the dot.
///
/// Returns an empty string when the base name has no extension, when the
/// only dot is leading (`.hidden`), or when the extension is not purely
/// alphanumeric.
pub fn file_extension(original_filename: &str) -> String {
    let base = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_filename);
    match base.rfind('.') {
        Some(idx) if idx > 0 => {
            let ext = &base[idx + 1..];
            if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                format!(".{ext}")
            } else {
                String::new()
            }
        }
        _ => String::new(),
    }
}

/// `sanitize_name(name) + ext`.
pub fn derive_filename(name: &str, ext: &str) -> String {
    format!("{}{}", sanitize_name(name), ext)
}
