//! Small text helpers for display formatting.

/// Title-case a string: lowercase everything, then uppercase the first
/// character of each word. Word characters are alphanumerics and `_`, so
/// `"foo_bar"` becomes `"Foo_bar"`. An empty input yields an empty string.
pub fn to_title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() || c == '_' {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
