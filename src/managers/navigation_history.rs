//! Per-tab back/forward bookkeeping.
//!
//! The engine owns the real session history. This mirror only exists so the
//! toolbar can enable or disable its back and forward buttons, so it is
//! updated from load notifications rather than driving navigation itself.

use serde::{Deserialize, Serialize};

/// A traversal the browser asked the engine to perform and is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Traversal {
    Back,
    Forward,
    Reload,
    /// A fresh load requested by the browser (address bar, home, error page).
    Navigate,
}

/// Mirror of one tab's session history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationHistory {
    entries: Vec<String>,
    index: Option<usize>,
    pending: Option<Traversal>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.index.map(|i| self.entries[i].as_str())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.index, Some(i) if i > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        matches!(self.index, Some(i) if i + 1 < self.entries.len())
    }

    pub fn pending(&self) -> Option<Traversal> {
        self.pending
    }

    /// URL of the previous entry, if there is one.
    pub fn back_target(&self) -> Option<&str> {
        match self.index {
            Some(i) if i > 0 => Some(self.entries[i - 1].as_str()),
            _ => None,
        }
    }

    /// URL of the next entry, if there is one.
    pub fn forward_target(&self) -> Option<&str> {
        match self.index {
            Some(i) if i + 1 < self.entries.len() => Some(self.entries[i + 1].as_str()),
            _ => None,
        }
    }

    /// Records that a traversal was requested. Returns false when the
    /// traversal is impossible, in which case nothing is recorded.
    pub fn begin(&mut self, traversal: Traversal) -> bool {
        let possible = match traversal {
            Traversal::Back => self.can_go_back(),
            Traversal::Forward => self.can_go_forward(),
            Traversal::Reload => self.index.is_some(),
            Traversal::Navigate => true,
        };
        if possible {
            self.pending = Some(traversal);
        }
        possible
    }

    /// Drops a requested traversal, e.g. when the user navigates elsewhere.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Applies a committed top-level load of `url`.
    pub fn commit(&mut self, url: &str) {
        match self.pending.take() {
            Some(Traversal::Back) if self.can_go_back() => {
                self.step(-1, url);
                return;
            }
            Some(Traversal::Forward) if self.can_go_forward() => {
                self.step(1, url);
                return;
            }
            Some(Traversal::Reload) if self.index.is_some() => {
                self.replace_current(url);
                return;
            }
            Some(Traversal::Navigate) => {
                if self.current() != Some(url) {
                    self.push(url);
                }
                return;
            }
            _ => {}
        }

        if self.current() == Some(url) {
            return;
        }
        // Only page-initiated history.back()/forward() arrive without a request.
        if self.back_target() == Some(url) {
            self.step(-1, url);
            return;
        }
        if self.forward_target() == Some(url) {
            self.step(1, url);
            return;
        }
        self.push(url);
    }

    /// Rewrites the current entry after a redirect or same-document change.
    pub fn replace_current(&mut self, url: &str) {
        match self.index {
            Some(i) => self.entries[i] = url.to_string(),
            None => self.push(url),
        }
    }

    fn push(&mut self, url: &str) {
        let keep = self.index.map(|i| i + 1).unwrap_or(0);
        self.entries.truncate(keep);
        self.entries.push(url.to_string());
        self.index = Some(self.entries.len() - 1);
    }

    fn step(&mut self, delta: isize, url: &str) {
        if let Some(i) = self.index {
            let next = (i as isize + delta) as usize;
            self.entries[next] = url.to_string();
            self.index = Some(next);
        }
    }
}
