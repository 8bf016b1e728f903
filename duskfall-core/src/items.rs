//! Item names, tool tiers and find tables.
//!
//! Inventory is a flat name-to-count map in the save record, so item
//! identity is the canonical name string. The constants here keep the
//! engine honest about spelling.

/// Restores 30 hp when drunk in combat.
pub const POTION: &str = "Potion";
/// Cures both poison and bleed.
pub const BANDAGE: &str = "Bandage";
/// Required to enter the cavern.
pub const LANTERN: &str = "Lantern";
/// Lantern fuel; also usable mid-battle inside the cavern.
pub const ANIMAL_FAT: &str = "Animal Fat";
/// Dropped by silk-spinners; crafting material.
pub const SILK: &str = "Silk";
/// Dropped by certain sundered-mode creatures.
pub const ECTOPLASM: &str = "Ectoplasm";
/// Volcano trophy, normal mode.
pub const DRAGON_SCALE: &str = "Dragon Scale";
/// Volcano trophy, sundered mode.
pub const DEMON_HEART: &str = "Demon Heart";
/// Rare herb found in the ruins.
pub const KINGSFOIL: &str = "Kingsfoil";

/// Healing restored by one potion.
pub const POTION_HEAL: i32 = 30;
/// Lantern fuel granted per unit of animal fat.
pub const FUEL_PER_FAT: u32 = 3;
/// Fuel granted when a lantern is first acquired dry.
pub const LANTERN_STARTING_FUEL: u32 = 6;

/// Attack bonus granted by an equipped tool, keyed on its tier prefix.
///
/// Tool names read "<Tier> <Thing>"; an unrecognized prefix grants
/// nothing.
pub fn tool_tier_bonus(tool: &str) -> i32 {
    match tool.split_whitespace().next() {
        Some("Rusty") => 1,
        Some("Common") => 2,
        Some("Enchanted") => 4,
        Some("Ancient") => 6,
        _ => 0,
    }
}

/// Armor pieces found in chests.
pub const ARMOR_FINDS: &[&str] = &["Leather Vest", "Iron Plate", "Void Cloak"];

/// Tools found in chests.
pub const TOOL_FINDS: &[&str] = &["Rusty Pickaxe", "Enchanted Lantern", "Ancient Key"];

/// Companions that may take a liking to the player.
pub const COMPANION_FINDS: &[&str] = &["Void Cat", "Spectral Fox", "Tiny Dragon"];
