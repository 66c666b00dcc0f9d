//! String utility functions
//!
//! Utilities for working with strings and text data.

/// Makes a metadata value safe to use as a single path component
///
/// Path separators and characters rejected by common file systems become
/// `_`; an empty result becomes `unnamed`.
pub fn sanitize_file_stem(value: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "unnamed".to_string(),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_separators() {
        assert_eq!(sanitize_file_stem("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_file_stem(" cell-01 "), "cell-01");
        assert_eq!(sanitize_file_stem(".."), "unnamed");
        assert_eq!(sanitize_file_stem(""), "unnamed");
    }
}
