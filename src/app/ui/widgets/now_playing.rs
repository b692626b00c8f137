use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, LineGauge, Paragraph, Widget},
};

use crate::app::config::Palette;
use crate::app::views::{AudioDisplayView, PlayerStatus, ReactiveView};

/// Bordered box with the audio display line and a progress gauge.
pub struct NowPlayingBar<'a> {
    lines: &'a [Line<'static>],
    progress: Option<f64>,
    status: PlayerStatus,
    palette: &'a Palette,
}

impl<'a> NowPlayingBar<'a> {
    pub fn new(view: &'a AudioDisplayView, palette: &'a Palette) -> Self {
        let player = view.player();
        Self {
            lines: view.output(),
            progress: player.map(|player| player.progress()),
            status: player.map(|player| player.status).unwrap_or_default(),
            palette,
        }
    }

    fn gauge_color(&self) -> ratatui::style::Color {
        match self.status {
            PlayerStatus::Playing => self.palette.playing,
            PlayerStatus::Paused => self.palette.paused,
            PlayerStatus::Stopped | PlayerStatus::Unknown => self.palette.stopped,
        }
    }
}

impl Widget for NowPlayingBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .border_type(BorderType::Rounded)
            .borders(Borders::ALL)
            .title(Span::styled(
                " Now Playing ",
                Style::default().fg(self.palette.border_title),
            ))
            .border_style(Style::default().fg(self.palette.border));

        let inner = block.inner(area);
        block.render(area, buf);

        let [line_area, gauge_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

        Paragraph::new(self.lines.to_vec()).render(line_area, buf);

        if let Some(progress) = self.progress {
            LineGauge::default()
                .filled_style(Style::default().fg(self.gauge_color()))
                .unfilled_style(Style::default().fg(self.palette.border))
                .label("")
                .ratio(progress.clamp(0.0, 1.0))
                .render(gauge_area, buf);
        }
    }
}
