/// The single "currently expanded video" flag shared by the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    playing: Option<String>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any id is accepted, including ones no card will ever match.
    pub fn play(&mut self, video_id: impl Into<String>) {
        self.playing = Some(video_id.into());
    }

    pub fn end(&mut self) {
        self.playing = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.playing.as_deref()
    }

    pub fn is_playing(&self, video_id: &str) -> bool {
        self.playing.as_deref() == Some(video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_then_end() {
        let mut state = PlaybackState::new();
        assert_eq!(state.current(), None);

        state.play("abc12345678");
        assert_eq!(state.current(), Some("abc12345678"));
        assert!(state.is_playing("abc12345678"));
        assert!(!state.is_playing("zzz12345678"));

        state.end();
        assert_eq!(state.current(), None);
        assert!(!state.is_playing("abc12345678"));
    }

    #[test]
    fn test_play_replaces_previous() {
        let mut state = PlaybackState::new();
        state.play("first000000");
        state.play("second00000");
        assert!(!state.is_playing("first000000"));
        assert!(state.is_playing("second00000"));
    }

    #[test]
    fn test_no_guard_on_ids() {
        let mut state = PlaybackState::new();
        state.play("");
        assert_eq!(state.current(), Some(""));
        state.end();
        state.end();
        assert_eq!(state.current(), None);
    }
}
