//! CardList component — the scrollable column of item cards.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use cards_proto::page::{Card, CardMedia};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_title, C_IMAGE, C_MUTED, C_PLAYING, C_SECONDARY, C_SELECTION_BG, C_SEPARATOR,
        C_SITE, C_VIDEO,
    },
    widgets::{
        pane_chrome::{pane_chrome_borders, Badge},
        scrollable_list::ScrollableList,
    },
};

/// Terminal rows per card: title, media line, separator.
pub const CARD_ROWS: u16 = 3;

pub const LOADING_MESSAGE: &str = "Loading...";

pub struct CardList {
    pub list: ScrollableList<Card>,
    synced_rev: Option<u64>,
    /// Track last click (card index, time) for double-click detection.
    last_click: Option<(usize, Instant)>,
}

impl CardList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            synced_rev: None,
            last_click: None,
        }
    }

    /// Rebuild cards from the page when it changed since the last sync.
    pub fn sync(&mut self, state: &AppState) {
        if self.synced_rev == Some(state.page_rev) {
            return;
        }
        self.list.set_items(state.page.cards());
        self.synced_rev = Some(state.page_rev);
    }

    fn card_lines(&self, card: &Card, selected: bool, width: usize) -> Vec<Line<'static>> {
        let marker = if selected { "▌ " } else { "  " };
        let bg = if selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };

        let title = Line::from(vec![
            Span::styled(marker, Style::default().fg(C_PLAYING)),
            Span::styled(
                truncate(&card.name, width.saturating_sub(2)),
                style_title(selected).add_modifier(Modifier::BOLD),
            ),
        ])
        .style(bg);

        let media = match media_spans(&card.media) {
            Some((label, color, detail)) => {
                let room = width.saturating_sub(4 + label.chars().count() + 2);
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(truncate(&detail, room), Style::default().fg(C_SECONDARY)),
                ])
            }
            None => Line::from(""),
        };

        let separator = Line::from(Span::styled(
            "─".repeat(width),
            Style::default().fg(C_SEPARATOR),
        ));

        vec![title, media, separator]
    }
}

impl Default for CardList {
    fn default() -> Self {
        Self::new()
    }
}

/// Label, color and detail text for a card's media line; `None` for title-only cards.
fn media_spans(media: &CardMedia) -> Option<(String, ratatui::style::Color, String)> {
    match media {
        CardMedia::None => None,
        CardMedia::Image { url } => Some(("▣ image".to_string(), C_IMAGE, url.clone())),
        CardMedia::Thumbnail {
            thumbnail_url, url, ..
        } => Some((
            "▶ video".to_string(),
            C_VIDEO,
            thumbnail_url.clone().unwrap_or_else(|| url.clone()),
        )),
        CardMedia::Player { video_id, src } => {
            Some((format!("■ playing {}", video_id), C_PLAYING, src.clone()))
        }
        CardMedia::Site { url } => Some(("↗ Visit site".to_string(), C_SITE, url.clone())),
    }
}

/// The URL a card points at, for copying.
pub fn media_url(media: &CardMedia) -> Option<&str> {
    match media {
        CardMedia::None => None,
        CardMedia::Image { url } | CardMedia::Site { url } | CardMedia::Thumbnail { url, .. } => {
            Some(url)
        }
        CardMedia::Player { src, .. } => Some(src),
    }
}

/// Cut `s` to at most `max` display columns, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            if max > 0 {
                while used + 1 > max {
                    match out.pop() {
                        Some(c) => used -= c.width().unwrap_or(0),
                        None => break,
                    }
                }
                out.push('…');
            }
            return out;
        }
        used += w;
        out.push(ch);
    }
    out
}

impl Component for CardList {
    fn id(&self) -> ComponentId {
        ComponentId::CardList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.sync(state);

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(5),
            KeyCode::PageDown => self.list.select_down(5),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(idx) = self.list.selected_index() {
                    return vec![Action::Activate(idx)];
                }
            }

            KeyCode::Char('s') | KeyCode::Esc => {
                if state.page.playback().current().is_some() {
                    return vec![Action::StopPlayback];
                }
            }

            KeyCode::Char('y') => {
                if let Some(url) = self.list.selected_item().and_then(|c| media_url(&c.media)) {
                    return vec![Action::CopyToClipboard(url.to_string())];
                }
            }

            _ => {}
        }

        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        self.sync(state);
        let rel_row = event.row.saturating_sub(area.y + 1) / CARD_ROWS; // +1 for border
        let rel_row = rel_row as usize;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            // top border
            MouseEventKind::Down(MouseButton::Left) if event.row <= area.y => {}
            MouseEventKind::Down(MouseButton::Left) => {
                let now = Instant::now();
                if self.list.handle_click(rel_row) {
                    let idx = self.list.selected;
                    let is_double = self
                        .last_click
                        .map(|(i, t)| i == idx && t.elapsed().as_millis() < 400)
                        .unwrap_or(false);
                    if is_double {
                        self.last_click = None;
                        return vec![Action::Activate(idx)];
                    }
                    self.last_click = Some((idx, now));
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.sync(state);

        let badge = state.page.playback().current().map(|_| Badge {
            text: "PLAYING",
            color: C_PLAYING,
        });
        let block = pane_chrome_borders("cards", Some('1'), focused, badge, Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if state.page.is_loading() {
            let msg_area = Rect {
                y: inner.y + inner.height / 2,
                height: 1,
                ..inner
            };
            frame.render_widget(
                Paragraph::new(Span::styled(LOADING_MESSAGE, Style::default().fg(C_MUTED)))
                    .alignment(Alignment::Center),
                msg_area,
            );
            return;
        }

        let per_view = (inner.height / CARD_ROWS).max(1) as usize;
        self.list.ensure_visible(per_view);

        let width = inner.width as usize;
        let lines: Vec<Line> = self
            .list
            .visible_items(per_view)
            .into_iter()
            .flat_map(|(idx, card)| self.card_lines(card, idx == self.list.selected, width))
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
