use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::errors::TabError;
use crate::types::tab::{Tab, TabId, TabOrigin};

/// Trait defining the tab management interface.
pub trait TabManagerTrait {
    fn create_tab(&mut self, id: TabId, url: &str, origin: TabOrigin, active: bool) -> TabId;
    fn close_tab(&mut self, tab_id: TabId) -> Result<Tab, TabError>;
    fn switch_tab(&mut self, tab_id: TabId) -> Result<(), TabError>;
    fn switch_to_index(&mut self, index: usize) -> Result<TabId, TabError>;
    fn move_tab(&mut self, tab_id: TabId, new_index: usize) -> Result<(), TabError>;
    fn get_tab(&self, tab_id: TabId) -> Option<&Tab>;
    fn get_tab_mut(&mut self, tab_id: TabId) -> Option<&mut Tab>;
    fn get_all_tabs(&self) -> Vec<&Tab>;
    fn get_active_tab(&self) -> Option<&Tab>;
    fn get_active_tab_mut(&mut self) -> Option<&mut Tab>;
    fn active_tab_id(&self) -> Option<TabId>;
    fn index_of(&self, tab_id: TabId) -> Option<usize>;
    fn tab_count(&self) -> usize;
    fn get_tab_order(&self) -> Vec<TabId>;
}

/// In-memory, ordered tab collection for one window.
pub struct TabManager {
    tabs: Vec<Tab>,
    active_tab_id: Option<TabId>,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active_tab_id: None,
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManagerTrait for TabManager {
    /// Appends a tab. The first tab always becomes active.
    fn create_tab(&mut self, id: TabId, url: &str, origin: TabOrigin, active: bool) -> TabId {
        self.tabs.push(Tab::new(id, url, origin, Self::now()));
        if active || self.active_tab_id.is_none() {
            self.active_tab_id = Some(id);
        }
        id
    }

    /// Removes a tab and hands it back. Closing the only tab is refused.
    /// When the active tab closes, its right neighbour takes over, or the
    /// left one when it was last.
    fn close_tab(&mut self, tab_id: TabId) -> Result<Tab, TabError> {
        let idx = self
            .index_of(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        if self.tabs.len() == 1 {
            return Err(TabError::LastTab);
        }

        let removed = self.tabs.remove(idx);
        if self.active_tab_id == Some(tab_id) {
            let next = idx.min(self.tabs.len() - 1);
            self.active_tab_id = Some(self.tabs[next].id);
        }
        Ok(removed)
    }

    fn switch_tab(&mut self, tab_id: TabId) -> Result<(), TabError> {
        if self.index_of(tab_id).is_none() {
            return Err(TabError::NotFound(tab_id.to_string()));
        }
        self.active_tab_id = Some(tab_id);
        Ok(())
    }

    fn switch_to_index(&mut self, index: usize) -> Result<TabId, TabError> {
        let id = self
            .tabs
            .get(index)
            .map(|t| t.id)
            .ok_or(TabError::InvalidIndex(index))?;
        self.active_tab_id = Some(id);
        Ok(id)
    }

    /// Move a tab to a new position in the tab strip.
    fn move_tab(&mut self, tab_id: TabId, new_index: usize) -> Result<(), TabError> {
        let idx = self
            .index_of(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        if new_index >= self.tabs.len() {
            return Err(TabError::InvalidIndex(new_index));
        }
        let tab = self.tabs.remove(idx);
        self.tabs.insert(new_index, tab);
        Ok(())
    }

    fn get_tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn get_tab_mut(&mut self, tab_id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    fn get_all_tabs(&self) -> Vec<&Tab> {
        self.tabs.iter().collect()
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.and_then(|id| self.get_tab(id))
    }

    fn get_active_tab_mut(&mut self) -> Option<&mut Tab> {
        let id = self.active_tab_id?;
        self.get_tab_mut(id)
    }

    fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    fn index_of(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn get_tab_order(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id).collect()
    }
}
