//! Poison and bleed countdown timers.
//!
//! Two independent, non-stacking afflictions live on the player record.
//! Each is either inert (zero) or counting down; a tick deals its fixed
//! damage and decrements. Reapplying an affliction resets its timer
//! rather than adding to it.

use serde::{Deserialize, Serialize};

/// Turns an affliction lasts when (re)applied.
pub const AFFLICTION_DURATION: u32 = 2;
/// Damage dealt per active poison tick.
pub const POISON_TICK_DAMAGE: i32 = 1;
/// Damage dealt per active bleed tick.
pub const BLEED_TICK_DAMAGE: i32 = 2;

/// Per-combatant affliction state, persisted flat in the save record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Afflictions {
    pub poison_turns: u32,
    pub bleed_turns: u32,
}

/// Damage produced by one processing tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub poison_damage: i32,
    pub bleed_damage: i32,
}

impl TickReport {
    pub fn total(&self) -> i32 {
        self.poison_damage + self.bleed_damage
    }
}

impl Afflictions {
    /// Reset the poison timer to its full duration.
    pub fn apply_poison(&mut self) {
        self.poison_turns = AFFLICTION_DURATION;
    }

    /// Reset the bleed timer to its full duration.
    pub fn apply_bleed(&mut self) {
        self.bleed_turns = AFFLICTION_DURATION;
    }

    pub fn is_poisoned(&self) -> bool {
        self.poison_turns > 0
    }

    pub fn is_bleeding(&self) -> bool {
        self.bleed_turns > 0
    }

    /// Deal one tick of damage for each active timer and count it down.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.poison_turns > 0 {
            report.poison_damage = POISON_TICK_DAMAGE;
            self.poison_turns -= 1;
        }
        if self.bleed_turns > 0 {
            report.bleed_damage = BLEED_TICK_DAMAGE;
            self.bleed_turns -= 1;
        }
        report
    }

    /// Clear both timers unconditionally (bandage).
    pub fn cure(&mut self) {
        self.poison_turns = 0;
        self.bleed_turns = 0;
    }
}
