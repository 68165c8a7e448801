//! Process-wide state shared with outside collaborators.
//!
//! Each store holds one slice of state behind its own lock plus a version
//! counter, so a poller can skip work when nothing changed.

use std::collections::HashSet;
use std::sync::Arc;

use bevy::prelude::Resource;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::gate::InterfaceKind;
use crate::timeline::ControlMode;

/// Interaction ledger: completed points, scroll permission, open interface.
#[derive(Debug)]
pub struct InteractionStore {
    completed: RwLock<HashSet<String>>,
    allow_scroll: RwLock<bool>,
    current_step: RwLock<Option<String>>,
    interface: RwLock<Option<InterfaceKind>>,
    version: RwLock<u64>,
}

impl Default for InteractionStore {
    fn default() -> Self {
        Self {
            completed: RwLock::new(HashSet::new()),
            allow_scroll: RwLock::new(true),
            current_step: RwLock::new(None),
            interface: RwLock::new(None),
            version: RwLock::new(0),
        }
    }
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_completed(&self) -> HashSet<String> {
        self.completed.read().clone()
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.read().contains(id)
    }

    /// Returns `false` if `id` was already recorded.
    pub fn mark_completed(&self, id: &str) -> bool {
        let inserted = self.completed.write().insert(id.to_string());
        if inserted {
            *self.version.write() += 1;
        }
        inserted
    }

    pub fn allow_scroll(&self) -> bool {
        *self.allow_scroll.read()
    }

    pub fn set_allow_scroll(&self, allow: bool) {
        *self.allow_scroll.write() = allow;
        *self.version.write() += 1;
    }

    pub fn current_step(&self) -> Option<String> {
        self.current_step.read().clone()
    }

    pub fn set_current_step(&self, step: Option<String>) {
        *self.current_step.write() = step;
        *self.version.write() += 1;
    }

    pub fn active_interface(&self) -> Option<InterfaceKind> {
        *self.interface.read()
    }

    /// True while any modal interface is open.
    pub fn is_interface_active(&self) -> bool {
        self.interface
            .read()
            .is_some_and(|kind| kind != InterfaceKind::None)
    }

    pub fn set_active_interface(&self, interface: Option<InterfaceKind>) {
        *self.interface.write() = interface;
        *self.version.write() += 1;
    }

    pub fn get_version(&self) -> u64 {
        *self.version.read()
    }
}

/// Playback snapshot for progress indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSummary {
    pub position: f32,
    pub length: f32,
    pub progress: f32,
    pub chapter_index: Option<usize>,
    pub mode: ControlMode,
    pub transitioning: bool,
    pub at_end: bool,
}

impl Default for PlaybackSummary {
    fn default() -> Self {
        Self {
            position: 0.0,
            length: 0.0,
            progress: 0.0,
            chapter_index: None,
            mode: ControlMode::Scrolling,
            transitioning: false,
            at_end: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct PlaybackStore {
    summary: RwLock<PlaybackSummary>,
    version: RwLock<u64>,
}

impl PlaybackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_summary(&self) -> PlaybackSummary {
        self.summary.read().clone()
    }

    pub fn get_version(&self) -> u64 {
        *self.version.read()
    }

    /// Replaces the snapshot; the version only moves when it differs.
    pub fn update(&self, summary: PlaybackSummary) {
        let mut current = self.summary.write();
        if *current != summary {
            *current = summary;
            *self.version.write() += 1;
        }
    }
}

/// All stores combined for easy sharing.
#[derive(Debug, Clone, Resource)]
pub struct StateStores {
    pub interaction: Arc<InteractionStore>,
    pub playback: Arc<PlaybackStore>,
}

impl StateStores {
    pub fn new() -> Self {
        Self {
            interaction: Arc::new(InteractionStore::new()),
            playback: Arc::new(PlaybackStore::new()),
        }
    }
}

impl Default for StateStores {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_store_versions() {
        let store = InteractionStore::new();
        assert!(store.allow_scroll());
        assert_eq!(store.get_version(), 0);

        assert!(store.mark_completed("a"));
        assert!(!store.mark_completed("a"));
        assert_eq!(store.get_version(), 1);
        assert!(store.is_completed("a"));

        store.set_active_interface(Some(InterfaceKind::None));
        assert!(!store.is_interface_active());
        store.set_active_interface(Some(InterfaceKind::Scanner));
        assert!(store.is_interface_active());
    }

    #[test]
    fn test_playback_update_skips_unchanged() {
        let store = PlaybackStore::new();
        store.update(PlaybackSummary::default());
        assert_eq!(store.get_version(), 0);

        let summary = PlaybackSummary {
            position: 3.0,
            length: 30.0,
            progress: 0.1,
            ..Default::default()
        };
        store.update(summary.clone());
        store.update(summary);
        assert_eq!(store.get_version(), 1);
        assert!((store.get_summary().progress - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_stores_share_state() {
        let stores = StateStores::new();
        let clone = stores.clone();
        clone.interaction.set_allow_scroll(false);
        assert!(!stores.interaction.allow_scroll());
    }
}
