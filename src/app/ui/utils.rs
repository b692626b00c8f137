use ratatui::layout::{Constraint, Flex, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate a string to fit within the given display width, handling Unicode
/// properly, and pad it with spaces to exactly that width.
pub fn truncate_by_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for ch in s.chars() {
        let char_width = ch.width().unwrap_or(0);
        if current_width + char_width > max_width {
            break;
        }
        result.push(ch);
        current_width += char_width;
    }

    result.push_str(&" ".repeat(max_width - current_width));
    result
}

/// Left-align `s` in a column of `width` cells, cutting it with an ellipsis
/// when it does not fit.
pub fn left_align(s: &str, width: usize) -> String {
    let display_width = s.width();
    if display_width <= width {
        return format!("{}{}", s, " ".repeat(width - display_width));
    }
    if width == 0 {
        return String::new();
    }
    let mut cut = truncate_by_width(s, width - 1).trim_end().to_string();
    cut.push('…');
    let cut_width = cut.width();
    cut.push_str(&" ".repeat(width.saturating_sub(cut_width)));
    cut
}

/// Helper function to center a rect within another rect
pub fn center_area(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

/// Center an image of the given size inside the available area.
pub fn center_image(image: Rect, available: Rect) -> Rect {
    Rect {
        x: available.x + available.width.saturating_sub(image.width) / 2,
        y: available.y + available.height.saturating_sub(image.height) / 2,
        width: image.width.min(available.width),
        height: image.height.min(available.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_by_width() {
        assert_eq!(truncate_by_width("abc", 5), "abc  ");
        assert_eq!(truncate_by_width("abcdef", 3), "abc");
        // Wide characters never get split
        assert_eq!(truncate_by_width("日本語", 5), "日本 ");
    }

    #[test]
    fn test_left_align() {
        assert_eq!(left_align("Air", 6), "Air   ");
        assert_eq!(left_align("Radiohead", 6), "Radio…");
        assert_eq!(left_align("Radiohead", 0), "");
    }

    #[test]
    fn test_center_image() {
        let image = Rect::new(0, 0, 10, 4);
        let area = Rect::new(2, 2, 20, 10);
        assert_eq!(center_image(image, area), Rect::new(7, 5, 10, 4));
    }
}
