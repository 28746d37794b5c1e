use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// What happens to highlighted groups when new data arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HighlightPolicy {
    /// Every update starts with nothing highlighted.
    #[default]
    ResetOnUpdate,
    /// Highlights survive updates for names still present in the data.
    Retain,
}

/// Set of highlighted group names.
///
/// Opacity is derived from the set rather than stored per group: a group is
/// drawn at full opacity when it is highlighted or when nothing is, and
/// dimmed otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    highlighted: IndexSet<String>,
}

impl HighlightState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `name` and returns its new highlighted flag.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.highlighted.shift_remove(name) {
            false
        } else {
            self.highlighted.insert(name.to_owned());
            true
        }
    }

    #[must_use]
    pub fn is_highlighted(&self, name: &str) -> bool {
        self.highlighted.contains(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.highlighted.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.highlighted.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.highlighted.iter().map(String::as_str)
    }

    #[must_use]
    pub fn opacity_for(&self, name: &str, dimmed_opacity: f64) -> f64 {
        if self.highlighted.is_empty() || self.highlighted.contains(name) {
            1.0
        } else {
            dimmed_opacity
        }
    }

    pub fn reset(&mut self) {
        self.highlighted.clear();
    }

    /// Drops highlighted names not accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.highlighted.retain(|name| keep(name));
    }

    /// Applies `policy` against the names of the incoming groups.
    pub fn apply_policy<'a>(
        &mut self,
        policy: HighlightPolicy,
        names: impl IntoIterator<Item = &'a str>,
    ) {
        match policy {
            HighlightPolicy::ResetOnUpdate => self.reset(),
            HighlightPolicy::Retain => {
                let present: IndexSet<&str> = names.into_iter().collect();
                self.retain(|name| present.contains(name));
            }
        }
    }
}
