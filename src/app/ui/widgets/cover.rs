use image::imageops::FilterType;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    widgets::Paragraph,
};
use ratatui_image::{Resize, StatefulImage};
use unicode_width::UnicodeWidthStr;

use crate::app::config::Palette;
use crate::app::page::Cover;
use crate::app::ui::utils::{center_area, center_image};

/// Placeholder text for each cover state. None once the image is ready.
pub fn placeholder_text(cover: &Cover) -> Option<&'static str> {
    match cover {
        Cover::Ready(_) => None,
        Cover::Absent => Some("No album art"),
        Cover::Loading => Some("Loading cover…"),
        Cover::Failed => Some("Cover unavailable"),
    }
}

pub fn render_cover(frame: &mut Frame<'_>, cover: &mut Cover, image_area: Rect, palette: &Palette) {
    if let Cover::Ready(img) = cover {
        // Get the image dimensions after resizing for the available area
        let resize = Resize::Scale(Some(FilterType::Lanczos3));
        let img_rect = img.size_for(resize.clone(), image_area);

        let centered_area = center_image(img_rect, image_area);

        let image = StatefulImage::default().resize(resize);
        frame.render_stateful_widget(image, centered_area, img.as_mut());
        return;
    }

    if let Some(text) = placeholder_text(cover) {
        let placeholder_area = center_area(
            image_area,
            Constraint::Length(text.width() as u16),
            Constraint::Length(1),
        );
        let placeholder = Paragraph::new(text).style(Style::default().fg(palette.placeholder));
        frame.render_widget(placeholder, placeholder_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_text() {
        assert_eq!(placeholder_text(&Cover::Absent), Some("No album art"));
        assert_eq!(placeholder_text(&Cover::Loading), Some("Loading cover…"));
        assert_eq!(placeholder_text(&Cover::Failed), Some("Cover unavailable"));
    }
}
