//! Slug normalization utilities.
//!
//! Filter values arrive from query strings in whatever shape the browser
//! produced. These helpers bring them to the form the index stores.

/// Normalize a slug to lowercase kebab-case.
///
/// Performs the following transformations:
/// 1. Trims leading/trailing whitespace
/// 2. Converts to lowercase
/// 3. Replaces underscores with hyphens
/// 4. Collapses multiple whitespace into single hyphens
///
/// # Examples
///
/// ```
/// use maktaba_core::util::ids::normalize_slug;
///
/// assert_eq!(normalize_slug("Ibn Uthaymeen"), "ibn-uthaymeen");
/// assert_eq!(normalize_slug("fiqh_of_salah"), "fiqh-of-salah");
/// assert_eq!(normalize_slug("  Mixed   Case  "), "mixed-case");
/// ```
pub fn normalize_slug(slug: &str) -> String {
    slug.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join("-")
}

/// Normalize a media type filter value (`"Audio "` → `"audio"`).
///
/// Returns `None` for blank input so callers can drop it.
///
/// ```
/// use maktaba_core::util::ids::normalize_media_type;
///
/// assert_eq!(normalize_media_type(" Video"), Some("video".to_string()));
/// assert_eq!(normalize_media_type("   "), None);
/// ```
pub fn normalize_media_type(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_lowercase())
    }
}
