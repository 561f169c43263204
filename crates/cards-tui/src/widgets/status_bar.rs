//! Status bar — bottom line with the key reference.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_PLAYING, C_SECONDARY};

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, playing: bool) {
    let (label, color) = if playing {
        ("PLAYING", C_PLAYING)
    } else {
        ("CARDS", C_SECONDARY)
    };

    let keys = if playing {
        " ↑↓/jk select  Enter open/play  s stop  y copy url  Tab panes  L logs  ? help  q quit"
    } else {
        " ↑↓/jk select  Enter open/play  y copy url  Tab panes  L logs  ? help  q quit"
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
