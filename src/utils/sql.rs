// src/utils/sql.rs

/// Escape character declared next to every `ILIKE` built from user input.
pub const LIKE_ESCAPE: &str = " ESCAPE '\\'";

/// Turns raw user text into an `ILIKE` pattern that matches it as a substring.
///
/// `%`, `_` and `\` are escaped so they match literally; pair the pattern with
/// [`LIKE_ESCAPE`].
pub fn contains_pattern(raw: &str) -> String {
    let mut pattern = String::with_capacity(raw.len() + 2);
    pattern.push('%');
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
