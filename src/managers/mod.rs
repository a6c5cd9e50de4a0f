// Clow Browser state managers
// Managers handle stateful bookkeeping: tabs, per-tab history, shortcuts.

pub mod navigation_history;
pub mod shortcut_manager;
pub mod tab_manager;
