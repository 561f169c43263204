//! Generic scrollable list with a selection cursor.
//!
//! Rows are counted in list entries, not terminal lines; callers that draw
//! multi-line entries pass the number of entries that fit.

pub struct ScrollableList<T> {
    pub items: Vec<T>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl<T> ScrollableList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            scroll_offset: 0,
        }
    }

    /// Replace the items, keeping the cursor position when it is still valid.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    pub fn select_up(&mut self, n: usize) {
        if self.items.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.items.len().saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    pub fn selected_index(&self) -> Option<usize> {
        (self.selected < self.items.len()).then_some(self.selected)
    }

    /// Returns (index, &item) pairs visible in `height` entries.
    /// Call ensure_visible first to update scroll_offset.
    pub fn visible_items(&self, height: usize) -> Vec<(usize, &T)> {
        if height == 0 || self.items.is_empty() {
            return Vec::new();
        }
        let start = self.scroll_offset.min(self.items.len());
        let end = (start + height).min(self.items.len());
        self.items[start..end]
            .iter()
            .enumerate()
            .map(|(i, item)| (start + i, item))
            .collect()
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected.saturating_sub(height - 1);
        }
    }

    /// Handle a click on the `row`-th visible entry.
    /// Returns true if the row maps to an item.
    pub fn handle_click(&mut self, row: usize) -> bool {
        let target = self.scroll_offset + row;
        if target < self.items.len() {
            self.selected = target;
            return true;
        }
        false
    }
}

impl<T> Default for ScrollableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(n: usize) -> ScrollableList<usize> {
        let mut l = ScrollableList::new();
        l.set_items((0..n).collect());
        l
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut l = list(3);
        l.select_down(10);
        assert_eq!(l.selected, 2);
        l.select_up(10);
        assert_eq!(l.selected, 0);

        let mut empty = list(0);
        empty.select_down(1);
        assert_eq!(empty.selected_index(), None);
    }

    #[test]
    fn test_scroll_follows_selection() {
        let mut l = list(10);
        l.select_down(6);
        l.ensure_visible(3);
        assert_eq!(l.scroll_offset, 4);
        let visible: Vec<usize> = l.visible_items(3).into_iter().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![4, 5, 6]);

        l.select_first();
        l.ensure_visible(3);
        assert_eq!(l.scroll_offset, 0);
    }

    #[test]
    fn test_set_items_keeps_cursor() {
        let mut l = list(5);
        l.select_down(3);
        l.set_items((0..5).collect());
        assert_eq!(l.selected, 3);
        l.set_items((0..2).collect());
        assert_eq!(l.selected, 1);
    }

    #[test]
    fn test_click_maps_to_item() {
        let mut l = list(4);
        l.scroll_offset = 1;
        assert!(l.handle_click(2));
        assert_eq!(l.selected, 3);
        assert!(!l.handle_click(5));
        assert_eq!(l.selected, 3);
    }
}
