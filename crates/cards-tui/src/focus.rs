//! FocusRing — keyboard focus cycling between panes.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    /// Focus `id` if it is part of the ring.
    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }

    /// Replace the ring, keeping the focused pane when it is still present.
    pub fn set_items(&mut self, items: Vec<ComponentId>) {
        let old = self.current();
        self.items = items;
        self.current = old
            .and_then(|id| self.items.iter().position(|&x| x == id))
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps() {
        let mut ring = FocusRing::new(vec![ComponentId::CardList, ComponentId::LogPanel]);
        assert_eq!(ring.next(), Some(ComponentId::LogPanel));
        assert_eq!(ring.next(), Some(ComponentId::CardList));
    }

    #[test]
    fn test_set_items_falls_back_to_first() {
        let mut ring = FocusRing::new(vec![ComponentId::CardList, ComponentId::LogPanel]);
        ring.set(ComponentId::LogPanel);
        ring.set_items(vec![ComponentId::CardList]);
        assert!(ring.is_focused(ComponentId::CardList));

        // unknown ids are ignored
        ring.set(ComponentId::HelpOverlay);
        assert!(ring.is_focused(ComponentId::CardList));
    }
}
