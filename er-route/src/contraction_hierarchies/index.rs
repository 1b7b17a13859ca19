use crate::model::Shortcut;
use crate::network::EdgeState;

/// The fixed set of precomputed shortcuts.
///
/// Validity is recomputed from live road state on every call rather than cached, since roads open
/// and close underneath it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShortcutIndex {
    shortcuts: Vec<Shortcut>,
}

impl ShortcutIndex {
    /// Wrap an already-validated shortcut list.
    #[must_use]
    pub const fn new(shortcuts: Vec<Shortcut>) -> Self {
        Self { shortcuts }
    }

    /// Number of shortcuts, usable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    /// True when there are no shortcuts at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    /// Every shortcut, in declaration order.
    #[must_use]
    pub fn as_slice(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    /// True iff every road the shortcut represents is currently open.
    #[must_use]
    pub fn is_valid<S: EdgeState + ?Sized>(shortcut: &Shortcut, roads: &S) -> bool {
        shortcut.legs().all(|(from, to)| roads.is_open(from, to))
    }

    /// Usable shortcuts with their position in the index.
    pub(crate) fn usable<S: EdgeState + ?Sized>(&self, roads: &S) -> Vec<(usize, &Shortcut)> {
        self.shortcuts
            .iter()
            .enumerate()
            .filter(|(_, shortcut)| Self::is_valid(shortcut, roads))
            .collect()
    }

    /// Shortcuts whose roads are all open right now.
    #[must_use]
    pub fn usable_shortcuts<S: EdgeState + ?Sized>(&self, roads: &S) -> Vec<&Shortcut> {
        self.usable(roads).into_iter().map(|(_, shortcut)| shortcut).collect()
    }

    /// Shortcuts knocked out by at least one closed road.
    #[must_use]
    pub fn invalidated_shortcuts<S: EdgeState + ?Sized>(&self, roads: &S) -> Vec<&Shortcut> {
        self.shortcuts.iter().filter(|shortcut| !Self::is_valid(shortcut, roads)).collect()
    }
}
