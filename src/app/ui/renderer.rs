use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
};
use std::cell::RefCell;
use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::app::app::{InputMode, MessageType, StatusMessage};
use crate::app::binds_handler::KeyPress;
use crate::app::config::{BindsConfig, Palette};
use crate::app::page::{Cover, PageViews};
use crate::app::ui::widgets::{NowPlayingBar, render_cover};
use crate::app::views::{AlbumDetailView, AlbumListView, FilterBarView, Mounted, ReactiveView};

/// Width of the " / " prompt in front of the filter text
const FILTER_PROMPT_WIDTH: u16 = 3;

fn bordered_block<'a>(title: impl Into<Line<'a>>, palette: &Palette, focused: bool) -> Block<'a> {
    let border = if focused {
        palette.selected_highlight
    } else {
        palette.border
    };
    let title: Line<'a> = title.into();
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(title.fg(palette.border_title))
}

fn highlight_style(palette: &Palette) -> Style {
    Style::default()
        .bg(palette.selected_highlight)
        .fg(palette.selected_text)
        .add_modifier(Modifier::BOLD)
}

fn render_album_list_page(
    frame: &mut Frame,
    filter_bar: &Rc<RefCell<FilterBarView>>,
    list: &Mounted<AlbumListView>,
    area: Rect,
    palette: &Palette,
) {
    let [filter_area, list_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let filter_bar = filter_bar.borrow();
    let editing = filter_bar.is_editing();
    frame.render_widget(
        Paragraph::new(filter_bar.output().to_vec())
            .block(bordered_block(" Filter ", palette, editing)),
        filter_area,
    );
    if editing {
        let x = filter_area.x + 1 + FILTER_PROMPT_WIDTH + filter_bar.query().width() as u16;
        frame.set_cursor_position(Position::new(
            x.min(filter_area.right().saturating_sub(2)),
            filter_area.y + 1,
        ));
    }

    let mut view = list.view().borrow_mut();
    let items: Vec<ListItem> = view.output().iter().cloned().map(ListItem::new).collect();
    let widget = List::new(items)
        .block(bordered_block(view.title(), palette, !editing))
        .highlight_style(highlight_style(palette));
    frame.render_stateful_widget(widget, list_area, view.list_state_mut());
}

fn render_album_detail_page(
    frame: &mut Frame,
    detail: &Mounted<AlbumDetailView>,
    cover: &mut Cover,
    area: Rect,
    palette: &Palette,
) {
    let block = bordered_block(" Album ", palette, true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [cover_area, info_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Min(0)])
            .spacing(1)
            .areas(inner);

    render_cover(frame, cover, cover_area, palette);

    let mut view = detail.view().borrow_mut();
    let caption = view.caption().to_vec();
    let rows: Vec<ListItem> = view.track_rows().iter().cloned().map(ListItem::new).collect();
    let footer = view.footer().to_vec();

    let [caption_area, tracks_area, footer_area] = Layout::vertical([
        Constraint::Length(caption.len() as u16),
        Constraint::Min(0),
        Constraint::Length(footer.len() as u16),
    ])
    .areas(info_area);

    frame.render_widget(Paragraph::new(caption), caption_area);
    frame.render_stateful_widget(
        List::new(rows).highlight_style(highlight_style(palette)),
        tracks_area,
        view.list_state_mut(),
    );
    frame.render_widget(Paragraph::new(footer), footer_area);
}

/// Display form of a key press, e.g. "Ctrl+c" or "↑".
fn describe_key((modifiers, key_code): &KeyPress) -> String {
    use crossterm::event::{KeyCode, KeyModifiers};

    let key_str = match key_code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => format!("{:?}", key_code),
    };

    let mut result = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        result.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        result.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        result.push_str("Shift+");
    }
    result.push_str(&key_str);
    result
}

fn key_sequence_text(sequence: &[KeyPress]) -> Option<String> {
    if sequence.is_empty() {
        return None;
    }
    Some(
        sequence
            .iter()
            .map(describe_key)
            .collect::<Vec<_>>()
            .join(" → "),
    )
}

/// First configured key of each common action, for the hint line.
fn key_hints(
    binds: &BindsConfig,
    input_mode: InputMode,
    on_list: bool,
) -> Vec<(String, &'static str)> {
    if input_mode == InputMode::Search {
        return vec![
            ("Enter".to_string(), "done"),
            ("Esc".to_string(), "done"),
            ("Backspace".to_string(), "delete"),
        ];
    }

    fn first(keys: &[String]) -> String {
        keys.first().cloned().unwrap_or_default()
    }

    let mut hints = vec![(first(&binds.open), if on_list { "open" } else { "play" })];
    if on_list {
        hints.push((first(&binds.search), "filter"));
        hints.push((first(&binds.toggle_sort), "sort"));
    }
    hints.push((first(&binds.back), "back"));
    hints.push((first(&binds.toggle_play_pause), "pause"));
    hints.push((first(&binds.quit), "quit"));
    hints.retain(|(key, _)| !key.is_empty());
    hints
}

fn status_line(message: &StatusMessage, palette: &Palette) -> Line<'static> {
    let color = match message.message_type {
        MessageType::Info => palette.song_title,
        MessageType::Error => palette.error,
    };
    Line::from(Span::styled(
        format!("{} ", message.text),
        Style::default().fg(color),
    ))
}

fn render_bottom_line(frame: &mut Frame, app: &App, on_list: bool, area: Rect) {
    let palette = &app.palette;

    let mut spans = Vec::new();
    for (key, label) in key_hints(&app.config.binds, app.input_mode, on_list) {
        spans.push(Span::styled(
            format!(" {}", key),
            Style::default().fg(palette.border_title),
        ));
        spans.push(Span::styled(
            format!(" {} ", label),
            Style::default().fg(palette.placeholder),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    // Pending key sequence wins over the status message
    let right = match key_sequence_text(app.key_binds.pending_sequence()) {
        Some(sequence) => Line::from(vec![
            Span::styled("Seq: ", Style::default().fg(palette.border_title)),
            Span::styled(format!("{} ", sequence), Style::default().fg(palette.song_title)),
        ]),
        None => match &app.status_message {
            Some(message) => status_line(message, palette),
            None => return,
        },
    };
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), area);
}

/// Render config warnings popup centered on screen
fn render_config_warnings_popup(frame: &mut Frame, warnings: &[String], palette: &Palette) {
    let area = frame.area();

    let title = " Config Warnings ";
    let footer = "Press any key to close";

    let max_content_width = warnings
        .iter()
        .map(|w| w.width())
        .max()
        .unwrap_or(20)
        .max(title.width())
        .max(footer.width());

    // Content + padding (2 on each side) + borders (1 on each side)
    let popup_width = (max_content_width + 6).min(area.width.saturating_sub(4) as usize) as u16;
    let text_width = popup_width.saturating_sub(4) as usize;

    // Warnings + blank after title + blank before footer + footer + borders
    let popup_height = (warnings.len() + 5).min(area.height.saturating_sub(4) as usize) as u16;

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for warning in warnings {
        lines.push(Line::from(Span::styled(
            format!(" {}", crate::app::ui::utils::left_align(warning, text_width).trim_end()),
            Style::default().fg(palette.song_title),
        )));
    }
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            footer,
            Style::default().fg(palette.border_title),
        ))
        .centered(),
    );

    let popup_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.error))
        .title(Line::from(title).fg(palette.border_title))
        .style(Style::default().bg(ratatui::style::Color::Black));

    frame.render_widget(
        Paragraph::new(lines)
            .block(popup_block)
            .alignment(Alignment::Left),
        popup_area,
    );
}

/// Draw one frame.
pub fn render(frame: &mut Frame, app: &mut App) {
    let [page_area, now_playing_area, bottom_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(4),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let palette = app.palette;
    let mut on_list = false;
    if let Some(page) = &mut app.page {
        match &mut page.views {
            PageViews::AlbumList { filter_bar, list } => {
                on_list = true;
                render_album_list_page(frame, filter_bar, list, page_area, &palette);
            }
            PageViews::AlbumDetail { detail, cover } => {
                render_album_detail_page(frame, detail, cover, page_area, &palette);
            }
        }
    }

    {
        let view = app.audio_display.view().borrow();
        frame.render_widget(NowPlayingBar::new(&view, &palette), now_playing_area);
    }

    render_bottom_line(frame, app, on_list, bottom_area);

    if app.show_config_warnings_popup && !app.config_warnings.is_empty() {
        render_config_warnings_popup(frame, &app.config_warnings, &palette);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_describe_key() {
        assert_eq!(describe_key(&(KeyModifiers::CONTROL, KeyCode::Char('c'))), "Ctrl+c");
        assert_eq!(describe_key(&(KeyModifiers::NONE, KeyCode::Char(' '))), "Space");
        assert_eq!(describe_key(&(KeyModifiers::NONE, KeyCode::Up)), "↑");
    }

    #[test]
    fn test_key_sequence_text() {
        assert_eq!(key_sequence_text(&[]), None);
        let g = (KeyModifiers::NONE, KeyCode::Char('g'));
        assert_eq!(key_sequence_text(&[g, g]).as_deref(), Some("g → g"));
    }

    #[test]
    fn test_key_hints_follow_bindings() {
        let mut binds = BindsConfig::default();
        binds.search = vec!["f".to_string()];
        binds.toggle_sort = Vec::new();

        let hints = key_hints(&binds, InputMode::Browse, true);
        assert!(hints.contains(&("f".to_string(), "filter")));
        assert!(hints.iter().all(|(_, label)| *label != "sort"));

        let detail = key_hints(&binds, InputMode::Browse, false);
        assert!(detail.contains(&("enter".to_string(), "play")));
        assert!(detail.iter().all(|(_, label)| *label != "filter"));
    }
}
