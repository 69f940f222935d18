//! Whitespace reconciliation around inline placeholder tags
//!
//! Segments carry inline formatting as short placeholders such as `<b0>`,
//! `</b0>` or `<x1/>`. Machine translation tends to pad them with spaces
//! the source never had; this pass removes that padding.

use regex::Regex;
use std::sync::OnceLock;

/// Placeholder tag followed by one ASCII whitespace character
fn tag_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?[a-zA-Z]+[0-9]+/?>[ \t\n\x0B\f\r]").expect("valid tag pattern"))
}

/// One ASCII whitespace character followed by a placeholder tag
fn space_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\n\x0B\f\r]</?[a-zA-Z]+[0-9]+/?>").expect("valid tag pattern"))
}

/// Distinct matches of `re` in `text`, in order of appearance
fn matches(re: &Regex, text: &str) -> Vec<String> {
    let mut found: Vec<String> = re.find_iter(text).map(|m| m.as_str().to_string()).collect();
    found.dedup();
    found
}

/// Drop whitespace next to tags in `machine_text` unless `source_text` has
/// the same tag with the same spacing.
pub fn clean_spaces_around_tags(machine_text: &str, source_text: &str) -> String {
    let mut text = machine_text.to_string();

    // trailing
    for spaced in matches(tag_space(), machine_text) {
        if source_text.contains(&spaced) {
            continue;
        }
        if let Some((cut, _)) = spaced.char_indices().last() {
            text = text.replace(&spaced, &spaced[..cut]);
        }
    }

    // leading
    for spaced in matches(space_tag(), &text) {
        if source_text.contains(&spaced) {
            continue;
        }
        if let Some(first) = spaced.chars().next() {
            text = text.replace(&spaced, &spaced[first.len_utf8()..]);
        }
    }

    text
}
