use std::collections::HashSet;

/// Expanded folders and the active file.
///
/// Transitions return a new state instead of mutating in place, so a
/// renderer holding the old value never sees a half-applied update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    expanded: HashSet<String>,
    active: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip whether `path` is expanded.
    pub fn toggle_folder(&self, path: &str) -> Self {
        let mut expanded = self.expanded.clone();
        if !expanded.remove(path) {
            expanded.insert(path.to_string());
        }
        Self {
            expanded,
            active: self.active.clone(),
        }
    }

    /// Make `path` the active file.
    pub fn select_file(&self, path: &str) -> Self {
        Self {
            expanded: self.expanded.clone(),
            active: Some(path.to_string()),
        }
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn expanded_folders(&self) -> &HashSet<String> {
        &self.expanded
    }

    pub fn active_file(&self) -> Option<&str> {
        self.active.as_deref()
    }
}
