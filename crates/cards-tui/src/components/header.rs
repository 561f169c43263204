//! Header — 1-row top bar: page title, item count, playing video.
//!
//! Not focusable.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    app_state::AppState,
    theme::{C_ACCENT, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY},
};

pub const PAGE_TITLE: &str = "Content list";

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }

        let mut spans = vec![
            Span::styled(" ◆ ", Style::default().fg(C_ACCENT)),
            Span::styled(
                PAGE_TITLE,
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  ·  ", Style::default().fg(C_MUTED)),
        ];

        if state.page.is_loading() {
            spans.push(Span::styled("waiting for items", Style::default().fg(C_MUTED)));
        } else {
            let n = state.page.len();
            spans.push(Span::styled(
                format!("{} item{}", n, if n == 1 { "" } else { "s" }),
                Style::default().fg(C_SECONDARY),
            ));
        }

        if let Some(id) = state.page.playback().current() {
            spans.push(Span::styled("  ·  ", Style::default().fg(C_MUTED)));
            let icon = if state.player_running { "▶ " } else { "■ " };
            spans.push(Span::styled(
                format!("{}{}", icon, id),
                Style::default().fg(C_PLAYING).add_modifier(Modifier::BOLD),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}
