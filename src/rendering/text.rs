//! Pixel-width aware title wrapping and single-line truncation

use crate::rendering::font::Typeface;

pub const ELLIPSIS: &str = "...";

/// Wrap `text` into at most `max_lines` lines no wider than `max_width`.
///
/// Characters are added greedily. When one no longer fits, it starts the
/// next line unless the current line is the last allowed one; the last line
/// instead drops trailing characters until `"..."` fits after them and input
/// stops there. Empty lines are never returned.
pub fn wrap_title(
    face: &dyn Typeface,
    size: f32,
    text: &str,
    max_width: f32,
    max_lines: usize,
) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }
    let ellipsis_width = face.measure(ELLIPSIS, size);

    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<(char, f32)> = Vec::new();
    let mut current_width = 0.0f32;

    for ch in text.chars() {
        let w = face.advance(ch, size);
        if current_width + w <= max_width {
            current.push((ch, w));
            current_width += w;
            continue;
        }

        if lines.len() + 1 < max_lines && !current.is_empty() && w <= max_width {
            lines.push(current.drain(..).map(|(c, _)| c).collect());
            current.push((ch, w));
            current_width = w;
            continue;
        }

        // Last line, or a glyph wider than any line: close with the ellipsis.
        while current_width + ellipsis_width > max_width {
            match current.pop() {
                Some((_, popped)) => current_width -= popped,
                None => break,
            }
        }
        let mut line: String = current.drain(..).map(|(c, _)| c).collect();
        if current_width + ellipsis_width <= max_width {
            line.push_str(ELLIPSIS);
        }
        if !line.is_empty() {
            lines.push(line);
        }
        return lines;
    }

    if !current.is_empty() {
        lines.push(current.into_iter().map(|(c, _)| c).collect());
    }
    lines
}

/// Shorten `text` to fit `max_width`, ending in `"..."` when cut.
///
/// Returns the text unchanged when it fits, otherwise the longest non-empty
/// prefix whose width plus the ellipsis fits, otherwise the ellipsis alone.
/// The bare ellipsis is returned even when it is itself wider than
/// `max_width`, so a cut is always visible.
pub fn truncate_text(face: &dyn Typeface, size: f32, text: &str, max_width: f32) -> String {
    if face.measure(text, size) <= max_width {
        return text.to_string();
    }
    let ellipsis_width = face.measure(ELLIPSIS, size);

    let chars: Vec<char> = text.chars().collect();
    let mut prefix_widths = Vec::with_capacity(chars.len() + 1);
    let mut acc = 0.0f32;
    prefix_widths.push(acc);
    for c in &chars {
        acc += face.advance(*c, size);
        prefix_widths.push(acc);
    }

    for i in (1..chars.len()).rev() {
        if prefix_widths[i] + ellipsis_width <= max_width {
            let mut out: String = chars[..i].iter().collect();
            out.push_str(ELLIPSIS);
            return out;
        }
    }
    ELLIPSIS.to_string()
}
