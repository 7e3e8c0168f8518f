use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cuts `text` to at most `width` terminal columns, marking the cut with an
/// ellipsis, and pads it to exactly `width` columns.
pub(crate) fn fit(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let text_width = UnicodeWidthStr::width(text);
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }

    let mut cut = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        // Leave one column for the ellipsis
        if used + w + 1 > width {
            break;
        }
        cut.push(c);
        used += w;
    }
    cut.push('…');
    used += 1;

    cut + &" ".repeat(width - used)
}

/// Right aligns `text` in `width` terminal columns. Wider text is kept whole.
pub(crate) fn pad_start(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    format!("{}{}", " ".repeat(width.saturating_sub(text_width)), text)
}
