//! The slug normalizer. Turns arbitrary title text into the URL-safe,
//! lowercase, hyphen-joined tokens that name content both on disk (directory
//! and file names) and in URLs. Everything downstream (the scanner, the
//! resolver, the content-creation scaffolding) assumes titles have been
//! through [`normalize`] exactly once, which is safe because the function is
//! idempotent.

use unicode_normalization::UnicodeNormalization;

/// The word-separator class: tab, space, and the punctuation marks that end
/// or delimit words. Characters outside this class (notably Unicode
/// punctuation such as the em-dash) are not separators; they survive the
/// split and are dropped afterwards by the ASCII-alphanumeric filter.
fn is_separator(c: char) -> bool {
    matches!(
        c,
        '\t' | ' '
            | '!'
            | '"'
            | '#'
            | '$'
            | '%'
            | '&'
            | '\''
            | '('
            | ')'
            | '*'
            | '-'
            | '/'
            | '<'
            | '='
            | '>'
            | '?'
            | '@'
            | '['
            | '\\'
            | ']'
            | '^'
            | '_'
            | '`'
            | '{'
            | '|'
            | '}'
            | ','
            | '.'
    )
}

/// Normalizes title text into a slug: lowercases, splits on the separator
/// class, NFKD-decomposes each segment, keeps the characters that survive as
/// ASCII alphanumerics, discards segments with nothing left, and joins the
/// survivors with `-`.
///
/// The result contains only `[a-z0-9-]`. Empty input, or input that is all
/// separators and non-convertible punctuation, yields an empty string, which
/// callers creating content must reject before touching the filesystem.
pub fn normalize(text: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for segment in text.to_lowercase().split(is_separator) {
        let word: String = segment
            .nfkd()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        if !word.is_empty() {
            words.push(word);
        }
    }
    words.join("-")
}
