//! Player progress
//!
//! `ProgressRecord` is the flat keyed structure written to storage.
//! `Profile` is the slice of it that lives across levels in memory:
//! coins, unlocks and skins.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::shop::Skin;

/// Persisted snapshot of everything worth keeping between visits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressRecord {
    /// Level the player was on when the record was written
    pub level_index: u32,
    /// Score of the attempt in progress
    pub session_score: u64,
    /// Coin wallet, spent in the shop
    pub total_coins: u64,
    /// Levels selectable from level select (always at least 1)
    pub levels_unlocked: u32,
    pub furthest_level_reached: u32,
    pub actor_x: f32,
    pub actor_y: f32,
    /// +1 down, -1 up
    pub gravity_sign: i8,
    pub equipped_skin: Skin,
    /// Grows only; white is owned without being listed
    pub purchased_skins: BTreeSet<Skin>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            level_index: 0,
            session_score: 0,
            total_coins: 0,
            levels_unlocked: 1,
            furthest_level_reached: 0,
            actor_x: SCREEN_WIDTH / 4.0,
            actor_y: SCREEN_HEIGHT / 2.0,
            gravity_sign: 1,
            equipped_skin: Skin::White,
            purchased_skins: BTreeSet::new(),
        }
    }
}

/// Long-lived player state
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub total_coins: u64,
    pub levels_unlocked: u32,
    pub furthest_level_reached: u32,
    pub equipped_skin: Skin,
    pub purchased_skins: BTreeSet<Skin>,
}

impl Default for Profile {
    fn default() -> Self {
        Self::from_record(&ProgressRecord::default())
    }
}

impl Profile {
    pub fn from_record(record: &ProgressRecord) -> Self {
        let mut profile = Self {
            total_coins: record.total_coins,
            levels_unlocked: record.levels_unlocked.max(1),
            furthest_level_reached: record.furthest_level_reached,
            equipped_skin: record.equipped_skin,
            purchased_skins: record.purchased_skins.clone(),
        };
        // A record that equips something it never bought falls back to white
        if !profile.owns(profile.equipped_skin) {
            log::warn!("Saved skin {} is not owned, equipping white", profile.equipped_skin);
            profile.equipped_skin = Skin::White;
        }
        profile
    }

    pub fn owns(&self, skin: Skin) -> bool {
        skin == Skin::White || self.purchased_skins.contains(&skin)
    }

    /// Make every level up to and including `level` selectable
    pub fn unlock_through(&mut self, level: u32) {
        self.levels_unlocked = self.levels_unlocked.max(level.saturating_add(1));
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        level < self.levels_unlocked
    }

    /// Raise the furthest-level watermark
    pub fn reach(&mut self, level: u32) {
        self.furthest_level_reached = self.furthest_level_reached.max(level);
    }
}
