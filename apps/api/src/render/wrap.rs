//! Greedy word wrapping against a measured font.

use crate::render::font::FontHandle;

/// Wraps `text` into lines that each render within `max_width` pixels.
///
/// Words are accumulated greedily: a word joins the current line if the
/// candidate line still measures within `max_width`, otherwise the current
/// line is emitted and the word starts the next one. A single word wider than
/// `max_width` is emitted alone, unsplit — the overflow is accepted rather
/// than treated as an error.
///
/// Pure and deterministic: identical `(text, font, max_width)` inputs always
/// produce the same line sequence.
pub fn wrap(text: &str, font: &FontHandle, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        let (width, _) = font.measure(&candidate);

        if width <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
