//! Enemy taxonomy and level scaling.
//!
//! Each (mode, context) pair owns a disjoint species pool with its own
//! base stats and per-level scaling. Category tags are explicit metadata
//! on the pool entry and are copied onto the descriptor at generation
//! time; nothing in the engine matches on name text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::{pick, Dice};

/// Story act. Act two unlocks the ruins, cavern and volcano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Act {
    One,
    Two,
}

/// Session difficulty, applied to generated enemy stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Hp and attack halved.
    Easy,
    Normal,
    /// Attack doubled.
    Hard,
}

impl Difficulty {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// The one-way narrative variant. Flipped by the sundering trigger and
/// never reset within a run; held by the session, not a process global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Normal,
    Sundered,
}

/// Where an encounter takes place; selects the species pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Context {
    ActOne,
    ActTwo,
    /// Also used for rare overworld ambushes.
    Cavern,
    Volcano,
}

impl Context {
    /// The ordinary overworld context for a story act.
    pub fn overworld(act: Act) -> Self {
        match act {
            Act::One => Context::ActOne,
            Act::Two => Context::ActTwo,
        }
    }

    /// Whether the animal-fat refuel item is usable mid-battle here.
    pub fn is_cavern(&self) -> bool {
        matches!(self, Context::Cavern)
    }
}

/// Category tags carried by a species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags {
    pub inflicts_poison: bool,
    pub inflicts_bleed: bool,
    pub drops_silk: bool,
    pub drops_fat: bool,
    pub drops_ectoplasm: bool,
    pub ghost: bool,
}

impl Tags {
    /// Life-stealers feed on a bleeding player: bleed-inflictors and
    /// ghost-class creatures.
    pub fn life_steals(&self) -> bool {
        self.inflicts_bleed || self.ghost
    }
}

const NONE: Tags = Tags {
    inflicts_poison: false,
    inflicts_bleed: false,
    drops_silk: false,
    drops_fat: false,
    drops_ectoplasm: false,
    ghost: false,
};

const POISON: Tags = Tags {
    inflicts_poison: true,
    ..NONE
};

const POISON_SILK: Tags = Tags {
    inflicts_poison: true,
    drops_silk: true,
    ..NONE
};

const BLEED_FAT: Tags = Tags {
    inflicts_bleed: true,
    drops_fat: true,
    ..NONE
};

const BLEED: Tags = Tags {
    inflicts_bleed: true,
    ..NONE
};

const GHOST: Tags = Tags { ghost: true, ..NONE };

const ECTOPLASM: Tags = Tags {
    drops_ectoplasm: true,
    ..NONE
};

/// One entry in a species pool.
struct Species {
    name: &'static str,
    tags: Tags,
}

const fn species(name: &'static str, tags: Tags) -> Species {
    Species { name, tags }
}

/// A context's species pool with its scaling coefficients.
struct Pool {
    entries: &'static [Species],
    base_hp: i32,
    base_attack: i32,
    hp_scale: i32,
    atk_scale: i32,
}

static ACT_ONE: Pool = Pool {
    entries: &[
        species("Goblin", NONE),
        species("Shade", NONE),
        species("Bandit", NONE),
        species("Wolf", NONE),
    ],
    base_hp: 20,
    base_attack: 5,
    hp_scale: 10,
    atk_scale: 2,
};

static ACT_TWO: Pool = Pool {
    entries: &[
        species("Wraith", NONE),
        species("Voidspawn", NONE),
        species("Corrupted Knight", NONE),
        species("Specter", NONE),
        species("Abyssal Beast", NONE),
    ],
    base_hp: 40,
    base_attack: 12,
    hp_scale: 18,
    atk_scale: 5,
};

static CAVERN: Pool = Pool {
    entries: &[
        species("Bat", BLEED_FAT),
        species("Giant Bat", BLEED_FAT),
        species("Blind Lizard", NONE),
        species("Cave Snake", POISON),
        species("Cave Spider", POISON_SILK),
        species("Ghost", GHOST),
    ],
    base_hp: 12,
    base_attack: 4,
    hp_scale: 4,
    atk_scale: 2,
};

static VOLCANO: Pool = Pool {
    entries: &[
        species("Magma Hound", NONE),
        species("Ash Revenant", NONE),
        species("Cinder Shade", NONE),
        species("Obsidian Crawler", NONE),
    ],
    base_hp: 30,
    base_attack: 10,
    hp_scale: 12,
    atk_scale: 4,
};

static SUNDERED_ACT_ONE: Pool = Pool {
    entries: &[
        species("Lost Shade", NONE),
        species("Broken Doll", NONE),
        species("Wailing Child", NONE),
        species("Crawling Grin", NONE),
    ],
    base_hp: 28,
    base_attack: 9,
    hp_scale: 13,
    atk_scale: 4,
};

static SUNDERED_ACT_TWO: Pool = Pool {
    entries: &[
        species("Remnant", NONE),
        species("The Forgotten", NONE),
        species("Hollow Priest", NONE),
        species("Bleeding Idol", BLEED),
        species("The Hunger", BLEED),
    ],
    base_hp: 50,
    base_attack: 18,
    hp_scale: 22,
    atk_scale: 7,
};

static SUNDERED_CAVERN: Pool = Pool {
    entries: &[
        species("Shambling Husk", NONE),
        species("The Watcher", ECTOPLASM),
        species("Flesh Moth", POISON_SILK),
        species("Echoing Maw", BLEED),
    ],
    base_hp: 18,
    base_attack: 7,
    hp_scale: 6,
    atk_scale: 3,
};

static SUNDERED_VOLCANO: Pool = Pool {
    entries: &[
        species("Seared Penitent", NONE),
        species("Weeping Pyre", NONE),
        species("The Charred Choir", NONE),
    ],
    base_hp: 34,
    base_attack: 14,
    hp_scale: 14,
    atk_scale: 5,
};

fn pool_for(context: Context, mode: Mode) -> &'static Pool {
    match (mode, context) {
        (Mode::Normal, Context::ActOne) => &ACT_ONE,
        (Mode::Normal, Context::ActTwo) => &ACT_TWO,
        (Mode::Normal, Context::Cavern) => &CAVERN,
        (Mode::Normal, Context::Volcano) => &VOLCANO,
        (Mode::Sundered, Context::ActOne) => &SUNDERED_ACT_ONE,
        (Mode::Sundered, Context::ActTwo) => &SUNDERED_ACT_TWO,
        (Mode::Sundered, Context::Cavern) => &SUNDERED_CAVERN,
        (Mode::Sundered, Context::Volcano) => &SUNDERED_VOLCANO,
    }
}

/// An ephemeral encounter descriptor; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub boss: bool,
    pub tags: Tags,
}

impl Enemy {
    /// Generate a scaled enemy from the pool selected by context and mode.
    pub fn generate(
        level: u32,
        context: Context,
        difficulty: Difficulty,
        mode: Mode,
        dice: &mut dyn Dice,
    ) -> Self {
        let pool = pool_for(context, mode);
        let chosen = pick(dice, pool.entries);
        let (hp, attack) = scaled_stats(level, pool, difficulty);
        tracing::debug!(name = chosen.name, hp, attack, ?context, ?mode, "generated enemy");
        Self {
            name: chosen.name.to_string(),
            hp,
            max_hp: hp,
            attack,
            boss: false,
            tags: chosen.tags,
        }
    }

    /// The volcano-summit boss for the given mode.
    pub fn summit_boss(mode: Mode) -> Self {
        let (name, hp, attack) = match mode {
            Mode::Normal => ("Ancient Dragon", 300, 30),
            Mode::Sundered => ("Azrael, the Unyielding", 9999, 999),
        };
        Self {
            name: name.to_string(),
            hp,
            max_hp: hp,
            attack,
            boss: true,
            tags: NONE,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Below a fifth of starting hp; eligible to flee.
    pub fn is_weakened(&self) -> bool {
        (self.hp as f64) < (self.max_hp as f64) * 0.2
    }
}

impl fmt::Display for Enemy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn scaled_stats(level: u32, pool: &Pool, difficulty: Difficulty) -> (i32, i32) {
    let hp = pool.base_hp + level as i32 * pool.hp_scale;
    let attack = pool.base_attack + level as i32 * pool.atk_scale;
    let (hp, attack) = match difficulty {
        Difficulty::Easy => (hp / 2, attack / 2),
        Difficulty::Normal => (hp, attack),
        Difficulty::Hard => (hp, attack * 2),
    };
    (hp.max(1), attack.max(1))
}
