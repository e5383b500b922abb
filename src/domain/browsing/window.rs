use std::collections::HashSet;

use crate::domain::AssetId;

/// The ordered list of asset ids being browsed plus a cursor into it.
///
/// Order is the server's order and is what the user sees. Ids are only ever
/// appended; an id already present keeps its position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrowsingWindow {
    ids: Vec<AssetId>,
    seen: HashSet<AssetId>,
    current_index: usize,
}

impl BrowsingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a window from an id sequence, dropping repeated ids
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = AssetId>,
    {
        let mut window = Self::new();
        for id in ids {
            window.push_if_new(id);
        }
        window
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[AssetId] {
        &self.ids
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.seen.contains(id)
    }

    pub fn get(&self, index: usize) -> Option<&AssetId> {
        self.ids.get(index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Id under the cursor
    pub fn current(&self) -> Option<&AssetId> {
        self.ids.get(self.current_index)
    }

    /// Append `id` unless already present. Returns true if it was appended.
    pub fn push_if_new(&mut self, id: AssetId) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.ids.push(id);
        true
    }

    /// Move the cursor, clamping into range
    pub fn set_current_index(&mut self, index: usize) {
        self.current_index = index;
        self.clamp_index();
    }

    /// Step the cursor by `delta` without wrapping. Returns true if it moved.
    pub fn step(&mut self, delta: isize) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        let last = self.ids.len() - 1;
        let target = self.current_index.saturating_add_signed(delta).min(last);
        let moved = target != self.current_index;
        self.current_index = target;
        moved
    }

    /// Re-establish `0 <= current_index < len` (or 0 for an empty window)
    pub fn clamp_index(&mut self) {
        self.current_index = clamp_index(self.current_index, self.ids.len());
    }

}

/// `index` clamped into a window of `len` items; 0 when empty
pub fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<AssetId> {
        names.iter().map(|n| AssetId::from(*n)).collect()
    }

    #[test]
    fn test_push_keeps_first_position() {
        let mut window = BrowsingWindow::from_ids(ids(&["a", "b", "c"]));
        assert!(!window.push_if_new(AssetId::from("a")));
        assert!(window.push_if_new(AssetId::from("d")));
        assert_eq!(window.ids(), ids(&["a", "b", "c", "d"]).as_slice());
    }

    #[test]
    fn test_shrunk_window_reclamps_cursor() {
        for (len, prior, expected) in [(10usize, 7usize, 7usize), (3, 7, 2), (1, 7, 0), (0, 7, 0)] {
            let mut window = BrowsingWindow::from_ids((0..10).map(|i| AssetId::new(format!("x{}", i))));
            window.set_current_index(prior);
            window.ids.truncate(len);
            window.clamp_index();
            assert_eq!(window.current_index(), expected, "len {} prior {}", len, prior);
        }
    }

    #[test]
    fn test_step_does_not_wrap() {
        let mut window = BrowsingWindow::from_ids(ids(&["a", "b"]));
        assert!(!window.step(-1));
        assert!(window.step(1));
        assert!(!window.step(1));
        assert_eq!(window.current(), Some(&AssetId::from("b")));
    }
}
