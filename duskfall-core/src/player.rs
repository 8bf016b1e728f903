//! The player record.
//!
//! A single mutable combatant owned by the session; combat and traversal
//! borrow it exclusively for their duration. Serializes to the flat
//! save-file shape (inventory and coins as name-to-count maps, the
//! affliction timers flattened alongside the scalar fields).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::items::{self, LANTERN, LANTERN_STARTING_FUEL};
use crate::status::Afflictions;

/// Experience needed to leave `level` is `level * EXP_PER_LEVEL`.
pub const EXP_PER_LEVEL: u32 = 20;
/// Max-hp gain per level.
pub const LEVEL_UP_HP: i32 = 20;
/// Attack gain per level.
pub const LEVEL_UP_ATTACK: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub backstory: String,
    pub hp: i32,
    pub max_hp: i32,
    pub exp: u32,
    pub level: u32,
    pub attack: i32,
    pub inventory: BTreeMap<String, u32>,
    pub coins: BTreeMap<String, u32>,
    pub unlocked_rest: bool,
    pub pet: Option<String>,
    pub armor: Option<String>,
    pub tool: Option<String>,
    pub lantern_on: bool,
    pub lantern_fuel: u32,
    #[serde(flatten)]
    pub afflictions: Afflictions,
}

/// Result of an experience gain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelUpReport {
    pub levels_gained: u32,
    pub new_level: u32,
}

impl Player {
    /// A fresh wanderer with the starting kit.
    pub fn new(name: impl Into<String>) -> Self {
        let mut inventory = BTreeMap::new();
        inventory.insert(items::POTION.to_string(), 2);

        let mut coins = BTreeMap::new();
        coins.insert("gold".to_string(), 10);
        coins.insert("silver".to_string(), 0);
        coins.insert("bronze".to_string(), 0);
        coins.insert("zinc".to_string(), 0);

        Self {
            name: name.into(),
            backstory: String::new(),
            hp: 100,
            max_hp: 100,
            exp: 0,
            level: 1,
            attack: 10,
            inventory,
            coins,
            unlocked_rest: false,
            pet: None,
            armor: None,
            tool: None,
            lantern_on: false,
            lantern_fuel: 0,
            afflictions: Afflictions::default(),
        }
    }

    /// Apply damage, clamping at zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    /// Restore hp, clamping at the maximum.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn is_down(&self) -> bool {
        self.hp <= 0
    }

    /// Base attack plus the equipped tool's tier bonus.
    pub fn effective_attack(&self) -> i32 {
        let tool_bonus = self
            .tool
            .as_deref()
            .map(items::tool_tier_bonus)
            .unwrap_or(0);
        self.attack + tool_bonus
    }

    pub fn item_count(&self, name: &str) -> u32 {
        self.inventory.get(name).copied().unwrap_or(0)
    }

    /// Add `qty` of an item. A lantern acquired while dry is auto-fueled.
    pub fn add_item(&mut self, name: &str, qty: u32) {
        *self.inventory.entry(name.to_string()).or_insert(0) += qty;
        if name == LANTERN && self.lantern_fuel == 0 {
            self.lantern_fuel = LANTERN_STARTING_FUEL;
        }
    }

    /// Consume one of an item; false if none was held.
    pub fn consume_item(&mut self, name: &str) -> bool {
        match self.inventory.get_mut(name) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.inventory.remove(name);
                }
                true
            }
            _ => false,
        }
    }

    pub fn gold(&self) -> u32 {
        self.coins.get("gold").copied().unwrap_or(0)
    }

    pub fn gain_gold(&mut self, amount: u32) {
        *self.coins.entry("gold".to_string()).or_insert(0) += amount;
    }

    /// Gain experience and resolve any level-ups, carrying remainders.
    ///
    /// Each level costs `level * EXP_PER_LEVEL`; levelling grants max hp
    /// and attack and restores hp to full.
    pub fn gain_exp(&mut self, amount: u32) -> LevelUpReport {
        self.exp += amount;
        let mut levels_gained = 0;
        while self.exp >= self.level * EXP_PER_LEVEL {
            self.exp -= self.level * EXP_PER_LEVEL;
            self.level += 1;
            self.max_hp += LEVEL_UP_HP;
            self.attack += LEVEL_UP_ATTACK;
            self.hp = self.max_hp;
            levels_gained += 1;
        }
        LevelUpReport {
            levels_gained,
            new_level: self.level,
        }
    }

    /// Light the lantern; false if it is missing or dry.
    pub fn light_lantern(&mut self) -> bool {
        if self.item_count(LANTERN) > 0 && self.lantern_fuel > 0 {
            self.lantern_on = true;
            true
        } else {
            self.lantern_on = false;
            false
        }
    }

    pub fn refuel_lantern(&mut self, fuel: u32) {
        self.lantern_fuel += fuel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::POTION;

    #[test]
    fn damage_and_heal_clamp() {
        let mut player = Player::new("Wren");
        player.take_damage(250);
        assert_eq!(player.hp, 0);
        assert!(player.is_down());

        player.heal(500);
        assert_eq!(player.hp, player.max_hp);
    }

    #[test]
    fn level_up_carries_remainder_exp() {
        let mut player = Player::new("Wren");
        // Level 1 -> 2 costs 20; 25 exp leaves 5 over.
        let report = player.gain_exp(25);
        assert_eq!(report.levels_gained, 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.exp, 5);
        assert_eq!(player.max_hp, 120);
        assert_eq!(player.attack, 15);
        assert_eq!(player.hp, player.max_hp);
    }

    #[test]
    fn multi_level_gain_resolves_in_one_call() {
        let mut player = Player::new("Wren");
        // 20 (1->2) + 40 (2->3) = 60 exactly.
        let report = player.gain_exp(60);
        assert_eq!(report.levels_gained, 2);
        assert_eq!(player.level, 3);
        assert_eq!(player.exp, 0);
    }

    #[test]
    fn effective_attack_includes_tool_tier() {
        let mut player = Player::new("Wren");
        assert_eq!(player.effective_attack(), 10);
        player.tool = Some("Enchanted Lantern".to_string());
        assert_eq!(player.effective_attack(), 14);
        player.tool = Some("Plain Stick".to_string());
        assert_eq!(player.effective_attack(), 10);
    }

    #[test]
    fn consume_item_removes_exhausted_entries() {
        let mut player = Player::new("Wren");
        assert_eq!(player.item_count(POTION), 2);
        assert!(player.consume_item(POTION));
        assert!(player.consume_item(POTION));
        assert!(!player.consume_item(POTION));
        assert!(!player.inventory.contains_key(POTION));
    }

    #[test]
    fn dry_lantern_is_auto_fueled_on_pickup() {
        let mut player = Player::new("Wren");
        player.add_item(LANTERN, 1);
        assert_eq!(player.lantern_fuel, LANTERN_STARTING_FUEL);

        // A second lantern does not top up an already-fueled one.
        player.lantern_fuel = 2;
        player.add_item(LANTERN, 1);
        assert_eq!(player.lantern_fuel, 2);
    }

    #[test]
    fn lantern_cannot_light_without_fuel() {
        let mut player = Player::new("Wren");
        player.add_item(LANTERN, 1);
        player.lantern_fuel = 0;
        assert!(!player.light_lantern());
        assert!(!player.lantern_on);

        player.lantern_fuel = 3;
        assert!(player.light_lantern());
        assert!(player.lantern_on);
    }

    #[test]
    fn save_record_round_trips_flat() {
        let mut player = Player::new("Wren");
        player.afflictions.apply_poison();
        player.tool = Some("Ancient Key".to_string());

        let json = serde_json::to_value(&player).unwrap();
        // Affliction timers serialize flat beside the scalar fields.
        assert_eq!(json["poison_turns"], 2);
        assert_eq!(json["bleed_turns"], 0);
        assert_eq!(json["inventory"]["Potion"], 2);
        assert_eq!(json["coins"]["gold"], 10);

        let back: Player = serde_json::from_value(json).unwrap();
        assert_eq!(back, player);
    }
}
