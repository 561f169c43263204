//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks:
//!   terminal input, the one-shot item fetch and player exits.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn, Level};

use cards_proto::config::Config;
use cards_proto::fetch::{FetchError, ItemsClient};
use cards_proto::item::Item;
use cards_proto::page::Activation;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        card_list::CardList,
        header::Header,
        help_overlay::HelpOverlay,
        log_panel::{log_line, LogPanel},
    },
    focus::FocusRing,
    player::{PlayerExit, VideoPlayer},
    widgets::{status_bar, toast::ToastManager},
};

// ── Internal event bus ────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum AppMessage {
    Event(Event),
    ItemsLoaded(Vec<Item>),
    FetchFailed(FetchError),
    PlayerExited(PlayerExit),
}

impl From<PlayerExit> for AppMessage {
    fn from(exit: PlayerExit) -> Self {
        AppMessage::PlayerExited(exit)
    }
}

/// Opens image and site links outside the terminal.
pub type LinkOpener = fn(&str) -> io::Result<()>;

#[derive(Default, Clone, Copy)]
struct PaneAreas {
    card_list: Rect,
    log_panel: Rect,
}

pub struct App {
    state: AppState,
    client: ItemsClient,
    player: VideoPlayer,
    open_link: LinkOpener,

    header: Header,
    card_list: CardList,
    log_panel: LogPanel,
    help_overlay: HelpOverlay,
    toast: ToastManager,
    focus: FocusRing,
    pane_areas: PaneAreas,

    tx: mpsc::Sender<AppMessage>,
    rx: Option<mpsc::Receiver<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, client: ItemsClient) -> Self {
        let (tx, rx) = mpsc::channel::<AppMessage>(256);
        Self {
            state: AppState::new(),
            client,
            player: VideoPlayer::new(config.player),
            open_link: webbrowser::open,
            header: Header::new(),
            card_list: CardList::new(),
            log_panel: LogPanel::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            focus: FocusRing::new(vec![ComponentId::CardList]),
            pane_areas: PaneAreas::default(),
            tx,
            rx: Some(rx),
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut rx = self
            .rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("app already running"))?;

        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let endpoint = self.client.endpoint().to_string();
        self.push_log(Level::INFO, format!("fetching {}", endpoint));

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: the single item fetch ────────────────────────────
        let fetch_tx = self.tx.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            let msg = match client.fetch_items().await {
                Ok(items) => AppMessage::ItemsLoaded(items),
                Err(e) => AppMessage::FetchFailed(e),
            };
            let _ = fetch_tx.send(msg).await;
        });

        // Toast expiry check
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        let result: anyhow::Result<()> = loop {
            if needs_redraw {
                if let Err(e) = terminal.draw(|f| self.draw(f)) {
                    break Err(e.into());
                }
            }
            needs_redraw = false;

            if self.should_quit {
                break Ok(());
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                    while let Ok(next) = rx.try_recv() {
                        needs_redraw |= self.handle_message(next);
                    }
                }
                _ = toast_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }
        };

        // ── Teardown ──────────────────────────────────────────────────────────
        self.player.stop();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one message. Returns true when the screen needs a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                for action in self.handle_mouse(mouse) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Resize(_, _)) => true,
            AppMessage::Event(_) => false,

            AppMessage::ItemsLoaded(items) => {
                self.push_log(Level::INFO, format!("fetched {} items", items.len()));
                self.state.page.set_items(items);
                self.state.bump();
                true
            }
            AppMessage::FetchFailed(e) => {
                // no toast: the list keeps showing the loading message
                self.push_log(Level::ERROR, format!("fetch failed: {}", e));
                self.state.page.fetch_failed(&e);
                true
            }
            AppMessage::PlayerExited(exit) => {
                if !self.player.exited(&exit) {
                    debug!("ignoring exit of replaced player gen {}", exit.generation);
                    return false;
                }
                self.state.player_running = false;
                let how = if exit.killed { "killed" } else { "exited" };
                self.push_log(
                    Level::INFO,
                    format!("player for {} {} (code {:?})", exit.video_id, how, exit.code),
                );
                if self.state.page.playback().is_playing(&exit.video_id) {
                    self.state.page.end();
                    self.state.bump();
                }
                true
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Help overlay takes every key while visible; any key closes it
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('L') => return vec![Action::ToggleLogs],
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::CardList)],
            KeyCode::Char('2') if self.log_panel.expanded => {
                return vec![Action::FocusPane(ComponentId::LogPanel)]
            }
            _ => {}
        }

        let s = &self.state;
        if self.focus.is_focused(self.log_panel.id()) {
            self.log_panel.handle_key(key, s)
        } else {
            self.card_list.handle_key(key, s)
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let relevant = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !relevant || self.help_overlay.visible {
            return vec![];
        }

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas;
        let s = &self.state;
        let (id, mut actions) = if hit(areas.card_list, event.column, event.row) {
            (
                self.card_list.id(),
                self.card_list.handle_mouse(event, areas.card_list, s),
            )
        } else if self.log_panel.expanded && hit(areas.log_panel, event.column, event.row) {
            (
                self.log_panel.id(),
                self.log_panel.handle_mouse(event, areas.log_panel, s),
            )
        } else {
            return vec![];
        };

        if !self.focus.is_focused(id) {
            actions.insert(0, Action::FocusPane(id));
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.card_list.on_action(&action, s));
            out.extend(self.log_panel.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::Activate(idx) => self.activate(idx),

            Action::StopPlayback => {
                self.player.stop();
                self.state.player_running = false;
                if let Some(id) = self.state.page.playback().current().map(str::to_string) {
                    self.push_log(Level::INFO, format!("stopped {}", id));
                }
                self.state.page.end();
                self.state.bump();
            }

            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPane(id) => self.focus.set(id),

            Action::ToggleLogs => {
                // the panel already flipped itself in on_action
                if self.log_panel.expanded {
                    self.focus
                        .set_items(vec![ComponentId::CardList, ComponentId::LogPanel]);
                } else {
                    self.focus.set_items(vec![ComponentId::CardList]);
                }
            }

            // Handled in HelpOverlay::on_action
            Action::ToggleHelp => {}

            Action::Quit => {
                info!("quit requested");
                self.player.stop();
                self.should_quit = true;
            }
        }
    }

    fn activate(&mut self, idx: usize) {
        match self.state.page.activate(idx) {
            Activation::Play { video_id, src } => {
                self.state.bump();
                match self.player.launch(&video_id, &src, self.tx.clone()) {
                    Ok(()) => {
                        self.state.player_running = true;
                        self.push_log(Level::INFO, format!("playing {}", video_id));
                        self.toast.info(format!("playing {}", video_id));
                    }
                    Err(e) => {
                        self.state.page.end();
                        self.state.player_running = false;
                        self.state.bump();
                        self.push_log(Level::ERROR, format!("player failed for {}: {}", video_id, e));
                        self.toast.error(format!("player failed: {}", e));
                    }
                }
            }
            Activation::OpenImage(url) | Activation::OpenSite(url) => match (self.open_link)(&url) {
                Ok(()) => {
                    self.push_log(Level::INFO, format!("opened {}", url));
                    self.toast.info("opened in browser");
                }
                Err(e) => {
                    self.push_log(Level::WARN, format!("could not open {}: {}", url, e));
                    self.toast.error(format!("could not open link: {}", e));
                }
            },
            Activation::NoVideoId => {
                self.toast.warning("no video id in this link");
            }
            Activation::Nothing => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // header | cards | log | keys
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(self.log_panel.height()),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.draw(frame, outer[0], &self.state);

        let cards_focused = self.focus.is_focused(ComponentId::CardList);
        self.card_list
            .draw(frame, outer[1], cards_focused, &self.state);
        self.pane_areas.card_list = outer[1];

        let log_focused = self.focus.is_focused(ComponentId::LogPanel);
        self.log_panel.draw(frame, outer[2], log_focused, &self.state);
        self.pane_areas.log_panel = outer[2];

        status_bar::draw_keys_bar(
            frame,
            outer[3],
            self.state.page.playback().current().is_some(),
        );

        self.help_overlay.draw(frame, area, false, &self.state);
        self.toast.draw(frame, area);
    }

    fn push_log(&mut self, level: Level, msg: String) {
        if level == Level::ERROR {
            error!("{}", msg);
        } else if level == Level::WARN {
            warn!("{}", msg);
        } else {
            info!("{}", msg);
        }
        self.state.push_log(log_line(level.as_str(), &msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cards_proto::config::PlayerConfig;

    fn no_browser(_url: &str) -> io::Result<()> {
        Ok(())
    }

    fn app_with_player(command: &str) -> App {
        let mut config = Config::default();
        config.player = PlayerConfig {
            command: command.to_string(),
            args: Vec::new(),
        };
        let client = ItemsClient::new("http://127.0.0.1:9/teste").unwrap();
        let mut app = App::new(config, client);
        app.open_link = no_browser;
        app
    }

    fn item(id: i64, name: &str, media: Option<&str>) -> Item {
        Item {
            id,
            name: name.to_string(),
            media_ref: media.map(str::to_string),
        }
    }

    fn sample_items() -> Vec<Item> {
        vec![
            item(1, "Photo", Some("https://cdn.example.com/a.jpg")),
            item(2, "Clip", Some("https://www.youtube.com/watch?v=abc12345678")),
            item(3, "Broken clip", Some("https://www.youtube.com/watch?v=short")),
        ]
    }

    fn key(code: KeyCode) -> AppMessage {
        AppMessage::Event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_items_loaded_leaves_loading() {
        let mut app = app_with_player("definitely-not-a-real-player-binary");
        assert!(app.state.page.is_loading());
        let rev = app.state.page_rev;

        assert!(app.handle_message(AppMessage::ItemsLoaded(sample_items())));
        assert!(!app.state.page.is_loading());
        assert_ne!(app.state.page_rev, rev);
        assert!(app.state.logs.last().unwrap().contains("fetched 3 items"));
    }

    #[test]
    fn test_fetch_failure_keeps_loading_without_toast() {
        let mut app = app_with_player("definitely-not-a-real-player-binary");
        app.handle_message(AppMessage::FetchFailed(FetchError::Status(503)));
        assert!(app.state.page.is_loading());
        assert!(app.toast.is_empty());
        assert!(app.state.page.last_error().is_some());
    }

    #[test]
    fn test_player_launch_failure_ends_playback() {
        let mut app = app_with_player("definitely-not-a-real-player-binary");
        app.handle_message(AppMessage::ItemsLoaded(sample_items()));

        app.dispatch(Action::Activate(1));
        assert_eq!(app.state.page.playback().current(), None);
        assert!(!app.state.player_running);
        assert!(!app.toast.is_empty());
    }

    #[test]
    fn test_video_without_id_is_not_played() {
        let mut app = app_with_player("definitely-not-a-real-player-binary");
        app.handle_message(AppMessage::ItemsLoaded(sample_items()));

        app.dispatch(Action::Activate(2));
        assert_eq!(app.state.page.playback().current(), None);
        assert_eq!(app.toast.len(), 1);
    }

    #[test]
    fn test_image_opens_link() {
        let mut app = app_with_player("definitely-not-a-real-player-binary");
        app.handle_message(AppMessage::ItemsLoaded(sample_items()));

        app.dispatch(Action::Activate(0));
        assert_eq!(app.state.page.playback().current(), None);
        assert!(app.state.logs.last().unwrap().contains("opened https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn test_hidden_cards_do_nothing_while_playing() {
        let mut app = app_with_player("definitely-not-a-real-player-binary");
        app.handle_message(AppMessage::ItemsLoaded(sample_items()));
        app.state.page.play("abc12345678");
        let logs = app.state.logs.len();

        app.dispatch(Action::Activate(0));
        assert_eq!(app.state.page.playback().current(), Some("abc12345678"));
        assert_eq!(app.state.logs.len(), logs);
        assert!(app.toast.is_empty());
    }

    #[test]
    fn test_stop_clears_playback() {
        let mut app = app_with_player("definitely-not-a-real-player-binary");
        app.handle_message(AppMessage::ItemsLoaded(sample_items()));
        app.state.page.play("abc12345678");

        app.dispatch(Action::StopPlayback);
        assert_eq!(app.state.page.playback().current(), None);
    }

    #[test]
    fn test_stale_player_exit_is_ignored() {
        let mut app = app_with_player("definitely-not-a-real-player-binary");
        app.handle_message(AppMessage::ItemsLoaded(sample_items()));
        app.state.page.play("abc12345678");

        let redraw = app.handle_message(AppMessage::PlayerExited(PlayerExit {
            video_id: "abc12345678".to_string(),
            generation: 42,
            killed: false,
            code: Some(0),
        }));
        assert!(!redraw);
        assert_eq!(app.state.page.playback().current(), Some("abc12345678"));
    }

    #[test]
    fn test_global_keys() {
        let mut app = app_with_player("definitely-not-a-real-player-binary");

        app.handle_message(key(KeyCode::Char('?')));
        assert!(app.help_overlay.visible);
        // any key closes help and is swallowed
        app.handle_message(key(KeyCode::Char('q')));
        assert!(!app.help_overlay.visible);
        assert!(!app.should_quit);

        app.handle_message(key(KeyCode::Char('L')));
        assert!(app.log_panel.expanded);
        app.handle_message(key(KeyCode::Tab));
        assert!(app.focus.is_focused(ComponentId::LogPanel));
        app.handle_message(key(KeyCode::Char('L')));
        assert!(app.focus.is_focused(ComponentId::CardList));

        app.handle_message(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_player_exit_ends_playback() {
        let mut app = app_with_player("true");
        let mut rx = app.rx.take().unwrap();
        app.handle_message(AppMessage::ItemsLoaded(sample_items()));

        app.dispatch(Action::Activate(1));
        assert_eq!(app.state.page.playback().current(), Some("abc12345678"));
        assert!(app.state.player_running);

        let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(app.handle_message(msg));
        assert_eq!(app.state.page.playback().current(), None);
        assert!(!app.state.player_running);
    }
}
