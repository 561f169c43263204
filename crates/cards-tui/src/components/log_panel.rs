//! LogPanel component — collapsible view of the app's own diagnostics.
//!
//! Collapsed it shows the newest line; expanded it is a scrollable pane.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_MUTED, C_SECONDARY, C_VIDEO},
    widgets::pane_chrome::pane_chrome_borders,
};

/// Rows the panel takes when expanded.
pub const EXPANDED_HEIGHT: u16 = 10;

pub struct LogPanel {
    pub expanded: bool,
    pub scroll: usize,
    /// Line count at the previous draw, for follow-tail.
    last_log_count: usize,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            expanded: false,
            scroll: 0,
            last_log_count: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
        if self.expanded {
            self.scroll = usize::MAX;
        }
    }

    /// Rows to reserve in the layout.
    pub fn height(&self) -> u16 {
        if self.expanded {
            EXPANDED_HEIGHT
        } else {
            1
        }
    }
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for LogPanel {
    fn id(&self) -> ComponentId {
        ComponentId::LogPanel
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.expanded {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            KeyCode::End | KeyCode::Char('G') => self.scroll = usize::MAX,
            KeyCode::Esc => return vec![Action::FocusPane(ComponentId::CardList)],
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if !self.expanded {
            return vec![];
        }
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleLogs = action {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        frame.render_widget(Clear, area);

        if !self.expanded || area.height <= 2 {
            let last = state
                .logs
                .last()
                .map(|s| compact_log_line(s))
                .unwrap_or_else(|| "(no log)".to_string());
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(" log ", Style::default().fg(C_MUTED)),
                    Span::styled(last, Style::default().fg(C_SECONDARY)),
                ])),
                area,
            );
            return;
        }

        let block = pane_chrome_borders("log", Some('2'), focused, None, Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let height = inner.height as usize;
        let count = state.logs.len();
        let max_scroll = count.saturating_sub(height);

        // follow the tail while the view sits at the bottom
        if count > self.last_log_count {
            if self.scroll >= self.last_log_count.saturating_sub(height) {
                self.scroll = usize::MAX;
            }
            self.last_log_count = count;
        }
        self.scroll = self.scroll.min(max_scroll);

        if state.logs.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no log entries yet",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let lines: Vec<Line> = state
            .logs
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(|raw| {
                let text = compact_log_line(raw);
                let color = if text.contains(" ERROR ") {
                    C_ACCENT
                } else if text.contains(" WARN ") {
                    C_VIDEO
                } else {
                    C_MUTED
                };
                Line::from(vec![Span::raw("  "), Span::styled(text, Style::default().fg(color))])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Format a log line the way the app records it.
pub fn log_line(level: &str, message: &str) -> String {
    format!("{} {} {}", chrono::Local::now().to_rfc3339(), level, message)
}

/// Shorten "<rfc3339> LEVEL target: message" to "HH:MM:SS LEVEL message".
fn compact_log_line(raw: &str) -> String {
    let mut rest = raw.trim();
    let mut head: Vec<String> = Vec::new();

    if let Some((tok, rem)) = split_first_token(rest) {
        if let Some(ts) = compact_timestamp(tok) {
            head.push(ts);
            rest = rem.trim_start();
        }
    }

    if let Some((tok, rem)) = split_first_token(rest) {
        let upper = tok.to_ascii_uppercase();
        if matches!(upper.as_str(), "TRACE" | "DEBUG" | "INFO" | "WARN" | "ERROR") {
            head.push(upper);
            rest = rem.trim_start();
        }
    }

    // module path prefix like "cards::app: "
    if let Some((left, msg)) = rest.split_once(": ") {
        if left.contains("::")
            && left
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':'))
        {
            rest = msg.trim_start();
        }
    }

    match (head.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => head.join(" "),
        (false, false) => format!("{} {}", head.join(" "), rest),
    }
}

fn compact_timestamp(token: &str) -> Option<String> {
    let dt = chrono::DateTime::parse_from_rfc3339(token).ok()?;
    let local = dt.with_timezone(&chrono::Local);
    let fmt = if local.date_naive() == chrono::Local::now().date_naive() {
        "%H:%M:%S"
    } else {
        "%m-%d %H:%M"
    };
    Some(local.format(fmt).to_string())
}

fn split_first_token(s: &str) -> Option<(&str, &str)> {
    let mut parts = s.splitn(2, char::is_whitespace);
    let first = parts.next()?.trim();
    if first.is_empty() {
        return None;
    }
    Some((first, parts.next().unwrap_or("")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_strips_timestamp_and_target() {
        let line = log_line("info", "cards::app: fetched 4 items");
        let compact = compact_log_line(&line);
        assert!(compact.ends_with("INFO fetched 4 items"), "{compact}");
        // HH:MM:SS
        assert_eq!(compact.split(' ').next().map(str::len), Some(8));
    }

    #[test]
    fn test_compact_leaves_plain_text() {
        assert_eq!(compact_log_line("  hello: world "), "hello: world");
        assert_eq!(compact_log_line("WARN"), "WARN");
    }

    #[test]
    fn test_toggle_jumps_to_bottom() {
        let mut panel = LogPanel::new();
        assert_eq!(panel.height(), 1);
        panel.on_action(&Action::ToggleLogs, &AppState::new());
        assert!(panel.expanded);
        assert_eq!(panel.scroll, usize::MAX);
        assert_eq!(panel.height(), EXPANDED_HEIGHT);
    }
}
