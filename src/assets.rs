//! Asset readiness tracking
//!
//! The host loads images and decodes audio; the engine only needs to know
//! when every slot is ready. A session may not start until then.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::audio::SoundCue;

/// What kind of handle a slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Image,
    Audio,
}

/// Images the renderer draws
pub const IMAGE_ASSETS: [&str; 10] = [
    "pillar",
    "obstacle",
    "collectible",
    "player_perched_0",
    "player_perched_1",
    "player_climbing_0",
    "player_climbing_1",
    "cloud_0",
    "cloud_1",
    "cloud_2",
];

/// Named asset slots and whether each is ready
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    slots: BTreeMap<String, (AssetKind, bool)>,
}

impl AssetManifest {
    /// Empty manifest; always ready
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sprite plus one decoded buffer per sound cue
    pub fn standard() -> Self {
        let mut manifest = Self::new();
        for name in IMAGE_ASSETS {
            manifest.require(name, AssetKind::Image);
        }
        for cue in SoundCue::ALL {
            manifest.require(cue.as_str(), AssetKind::Audio);
        }
        manifest
    }

    /// Add a slot (not yet ready)
    pub fn require(&mut self, name: &str, kind: AssetKind) {
        self.slots.insert(name.to_string(), (kind, false));
    }

    /// Flag a slot as loaded; returns false for unknown names
    pub fn mark_ready(&mut self, name: &str) -> bool {
        match self.slots.get_mut(name) {
            Some((_, ready)) => {
                *ready = true;
                true
            }
            None => {
                log::warn!("Unknown asset reported ready: {}", name);
                false
            }
        }
    }

    pub fn all_ready(&self) -> bool {
        self.slots.values().all(|(_, ready)| *ready)
    }

    /// Names still loading, in name order
    pub fn missing(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|(_, (_, ready))| !ready)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn count(&self, kind: AssetKind) -> usize {
        self.slots.values().filter(|(k, _)| *k == kind).count()
    }
}
