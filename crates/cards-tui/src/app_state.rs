//! AppState — shared read-only data passed to all components during render/event.
//!
//! The App event-loop is the only thing that writes to AppState.

use cards_proto::page::Page;

/// Cap on in-memory log lines shown in the log panel.
pub const MAX_LOG_LINES: usize = 500;

pub struct AppState {
    /// Fetched items plus the playback flag.
    pub page: Page,
    /// Bumped whenever the page changes; components resync their cards on change.
    pub page_rev: u64,
    /// Whether the external player process is alive.
    pub player_running: bool,
    /// Diagnostic lines for the log panel, oldest first.
    pub logs: Vec<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            page: Page::new(),
            page_rev: 0,
            player_running: false,
            logs: Vec::new(),
        }
    }

    pub fn bump(&mut self) {
        self.page_rev = self.page_rev.wrapping_add(1);
    }

    pub fn push_log(&mut self, line: String) {
        self.logs.push(line);
        if self.logs.len() > MAX_LOG_LINES {
            let excess = self.logs.len() - MAX_LOG_LINES;
            self.logs.drain(..excess);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
