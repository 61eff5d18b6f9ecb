use crate::app::{Pane, ViewState};
use crate::core::Session;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

const APP_TITLE: &str = "Tunes  ";

struct Palette {
    bg: Color,
    panel_bg: Color,
    border: Color,
    focus_border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    alert: Color,
    selected_bg: Color,
}

const COLORS: Palette = Palette {
    bg: Color::Rgb(10, 15, 24),
    panel_bg: Color::Rgb(19, 29, 43),
    border: Color::Rgb(69, 121, 176),
    focus_border: Color::Rgb(100, 203, 184),
    text: Color::Rgb(214, 228, 248),
    muted: Color::Rgb(149, 173, 204),
    accent: Color::Rgb(100, 203, 184),
    alert: Color::Rgb(249, 174, 88),
    selected_bg: Color::Rgb(34, 55, 82),
};

pub fn draw(frame: &mut Frame, session: &Session, view: &ViewState) {
    frame.render_widget(
        Block::default().style(Style::default().bg(COLORS.bg)),
        frame.area(),
    );

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, session, vertical[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(vertical[1]);
    draw_library(frame, session, view, body[0]);
    draw_playlist(frame, session, view, body[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            "Tab pane, Enter queue/jump, d remove, n next, p prev, Space play/pause, r reload, s save, q quit",
            Style::default().fg(COLORS.muted),
        ),
        Span::styled("  |  ", Style::default().fg(COLORS.muted)),
        Span::styled(view.status.as_str(), Style::default().fg(COLORS.text)),
    ]))
    .block(panel_block("Message", COLORS.border));
    frame.render_widget(footer, vertical[2]);
}

fn draw_header(frame: &mut Frame, session: &Session, area: Rect) {
    let player = session.player();
    let state_color = if player.is_playing() {
        COLORS.accent
    } else {
        COLORS.alert
    };
    let state_label = format!("[{}]", player.state().label());
    let now = session
        .current_album()
        .ok()
        .and_then(|album| album.tracks.get(player.current_track_index()))
        .map(|track| track.display_name().to_string())
        .unwrap_or_else(|| String::from("-"));

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            APP_TITLE,
            Style::default()
                .fg(COLORS.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(state_label, Style::default().fg(state_color)),
        Span::styled("  |  ", Style::default().fg(COLORS.muted)),
        Span::styled(format!("Now {now}"), Style::default().fg(COLORS.text)),
    ]))
    .block(panel_block("Player", COLORS.border));
    frame.render_widget(header, area);
}

fn draw_library(frame: &mut Frame, session: &Session, view: &ViewState, area: Rect) {
    let items: Vec<ListItem> = session
        .library()
        .iter()
        .enumerate()
        .map(|(index, album)| {
            let marker = if session.is_queued(index) { "  + " } else { "    " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(COLORS.muted)),
                Span::styled(album.display_name(), Style::default().fg(COLORS.text)),
                Span::styled(
                    format!("  ({})", album.track_count()),
                    Style::default().fg(COLORS.muted),
                ),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select((!session.library().is_empty()).then_some(view.library_selected));

    let border = focus_border(view.focus == Pane::Library);
    let list = List::new(items)
        .block(panel_block("Library", border))
        .highlight_style(selected_style())
        .highlight_symbol("-> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_playlist(frame: &mut Frame, session: &Session, view: &ViewState, area: Rect) {
    let rows = playlist_rows(session);
    let selected_row = rows
        .iter()
        .position(|(album_index, _)| *album_index == view.playlist_selected);
    let items: Vec<ListItem> = rows.into_iter().map(|(_, line)| ListItem::new(line)).collect();

    let mut state = ListState::default();
    state.select(selected_row);

    let border = focus_border(view.focus == Pane::Playlist);
    let list = List::new(items)
        .block(panel_block("Playlist", border))
        .highlight_style(selected_style())
        .highlight_symbol("-> ");
    frame.render_stateful_widget(list, area, &mut state);
}

/// One row per queued album; the current album also lists its tracks with
/// the current track marked.
pub fn playlist_rows(session: &Session) -> Vec<(usize, Line<'static>)> {
    let player = session.player();
    let mut rows = Vec::new();

    for (album_index, album) in session.playlist().iter().enumerate() {
        let is_current = album_index == player.current_album_index();
        let album_style = if is_current {
            Style::default()
                .fg(COLORS.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLORS.text)
        };
        rows.push((
            album_index,
            Line::from(Span::styled(album.display_name(), album_style)),
        ));

        if !is_current {
            continue;
        }
        for (track_index, track) in album.tracks.iter().enumerate() {
            let (marker, style) = if track_index == player.current_track_index() {
                (" >  ", Style::default().fg(COLORS.alert))
            } else {
                ("    ", Style::default().fg(COLORS.muted))
            };
            rows.push((
                album_index,
                Line::from(Span::styled(
                    format!("{marker}{}. {}", track_index + 1, track.display_name()),
                    style,
                )),
            ));
        }
    }

    rows
}

fn focus_border(focused: bool) -> Color {
    if focused {
        COLORS.focus_border
    } else {
        COLORS.border
    }
}

fn selected_style() -> Style {
    Style::default()
        .bg(COLORS.selected_bg)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn panel_block(title: &str, border: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(COLORS.text).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(COLORS.panel_bg))
}
