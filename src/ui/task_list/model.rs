use crate::task::{TaskId, TaskStore};

/// How a row is drawn this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowState {
    Idle,
    Editing,
    /// Fading out; progress runs from 0.0 to 1.0
    Removing { progress: f32 },
}

/// Visible `(start, end)` slice of a list that keeps `selected` in view
pub fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Move an index by `delta`, staying inside `0..len`
pub fn step_selection(current: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let Some(current) = current else {
        return Some(0);
    };
    let max = len as isize - 1;
    let next = (current as isize + delta).clamp(0, max);
    Some(next as usize)
}

/// Row to select once the row at `removed` is gone from a list now `len` long
pub fn neighbor_after_removal(removed: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(removed.min(len - 1))
    }
}

/// Keep a selection by id, falling back to the first row
pub fn select_by_id(store: &TaskStore, previous: Option<TaskId>) -> Option<TaskId> {
    previous
        .filter(|id| store.get(*id).is_some())
        .or_else(|| store.id_at(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageAdapter};

    #[test]
    fn window_keeps_selection_visible() {
        assert_eq!(list_window(0, None, 5), (0, 0));
        assert_eq!(list_window(3, Some(2), 5), (0, 3));
        assert_eq!(list_window(20, Some(10), 5), (8, 13));
        assert_eq!(list_window(20, Some(19), 5), (15, 20));
    }

    #[test]
    fn step_clamps_at_edges() {
        assert_eq!(step_selection(None, 1, 3), Some(0));
        assert_eq!(step_selection(Some(0), -1, 3), Some(0));
        assert_eq!(step_selection(Some(1), 5, 3), Some(2));
        assert_eq!(step_selection(Some(1), 1, 0), None);
    }

    #[test]
    fn removal_selects_next_or_last() {
        assert_eq!(neighbor_after_removal(1, 3), Some(1));
        assert_eq!(neighbor_after_removal(3, 3), Some(2));
        assert_eq!(neighbor_after_removal(0, 0), None);
    }

    #[test]
    fn selection_persists_by_id_or_falls_back() {
        let mut store = TaskStore::new(StorageAdapter::new(MemoryStore::new(), "tasks"));
        let first = store.add("one").unwrap();
        let second = store.add("two").unwrap();
        assert_eq!(select_by_id(&store, Some(second)), Some(second));

        store.delete(second);
        assert_eq!(select_by_id(&store, Some(second)), Some(first));
        store.delete(first);
        assert_eq!(select_by_id(&store, None), None);
    }
}
