//! Cleanup for raw cell text copied out of Confluence.
//!
//! Confluence renders line breaks inside a cell as non-breaking spaces, so an
//! address such as `Example Org<br>Seattle,WA` arrives as
//! `Example Org\u{a0}Seattle,WA`. The normalizer turns those into a separator
//! and repairs the comma spacing around it.

/// What a non-breaking space becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NbspMode {
    /// Replace with a comma (multi-line names become comma lists)
    Comma,
    /// Replace with a regular space
    Space,
}

const NBSP: char = '\u{a0}';

/// Normalize one cell value.
///
/// Idempotent: a second pass over the output changes nothing.
pub fn normalize_text(line: &str, mode: NbspMode) -> String {
    let replacement = match mode {
        NbspMode::Comma => ",",
        NbspMode::Space => " ",
    };
    let cleaned = line.replace(NBSP, replacement);
    let cleaned = cleaned.replace(",,", ", ");
    space_after_word_commas(&cleaned)
}

/// Strip double quotes, then normalize with spaces.
pub fn normalize_quoted(line: &str) -> String {
    normalize_text(&line.replace('"', ""), NbspMode::Space)
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// "Seattle,WA" -> "Seattle, WA"
fn space_after_word_commas(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if c == ','
            && i > 0
            && is_word(chars[i - 1])
            && chars.get(i + 1).copied().is_some_and(is_word)
        {
            out.push(' ');
        }
    }
    out
}
