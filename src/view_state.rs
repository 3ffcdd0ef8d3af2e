//! Expanded/collapsed display flags, kept apart from the domain entities.

use std::collections::HashMap;

use uuid::Uuid;

/// Per-entity expanded flags for workouts and exercises.
///
/// Entities that were never toggled are expanded.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    expanded: HashMap<Uuid, bool>,
}

impl ViewState {
    pub fn from_entries(entries: impl IntoIterator<Item = (Uuid, bool)>) -> Self {
        Self {
            expanded: entries.into_iter().collect(),
        }
    }

    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.expanded.get(&id).copied().unwrap_or(true)
    }

    /// Flip the flag for `id` and return the new value.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        let expanded = !self.is_expanded(id);
        self.expanded.insert(id, expanded);
        expanded
    }

    pub fn forget(&mut self, ids: &[Uuid]) {
        for id in ids {
            self.expanded.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_entity_is_expanded() {
        let state = ViewState::default();
        assert!(state.is_expanded(Uuid::new_v4()));
    }

    #[test]
    fn test_toggle_flips_back_and_forth() {
        let mut state = ViewState::default();
        let id = Uuid::new_v4();

        assert!(!state.toggle(id));
        assert!(!state.is_expanded(id));
        assert!(state.toggle(id));
        assert!(state.is_expanded(id));
    }

    #[test]
    fn test_forget_restores_default() {
        let id = Uuid::new_v4();
        let mut state = ViewState::from_entries([(id, false)]);

        state.forget(&[id]);

        assert!(state.is_expanded(id));
    }
}
