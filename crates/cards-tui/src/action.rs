//! Action enum — all user-initiated intents.

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    CardList,
    LogPanel,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Cards ────────────────────────────────────────────────────────────────
    /// Activate ("click") the card at this index.
    Activate(usize),
    StopPlayback,
    CopyToClipboard(String),

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPane(ComponentId),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleLogs,
    ToggleHelp,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
