//! Overworld expeditions: trail walks and the volcano ascent.
//!
//! Trails are data-driven staged walks; each stage rolls the side-event
//! table first and falls back to an ordinary battle at the trail's own
//! chance. The volcano is the hard-coded endgame climb: three stages of
//! likely fighting, then the summit boss.

use crate::battle::Outcome;
use crate::dice::Dice;
use crate::enemy::{Context, Enemy, Mode};
use crate::io::Console;
use crate::items::{BANDAGE, DEMON_HEART, DRAGON_SCALE, KINGSFOIL};
use crate::persist::SaveStore;
use crate::session::Session;

/// How an expedition ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpeditionOutcome {
    /// Reached the end and collected the reward.
    Completed,
    /// Chose to leave partway.
    TurnedBack,
    /// Died on the way.
    Defeated,
}

/// What finishing a trail pays out.
#[derive(Debug, Clone, Copy)]
pub struct Reward {
    pub exp: u32,
    pub gold: u32,
    pub item: Option<&'static str>,
}

/// A staged overworld walk.
#[derive(Debug, Clone, Copy)]
pub struct Trail {
    pub name: &'static str,
    pub stages: u32,
    pub battle_chance: f64,
    pub reward: Reward,
}

pub const TRAILS: &[Trail] = &[
    Trail {
        name: "Mosswood Trail",
        stages: 2,
        battle_chance: 0.4,
        reward: Reward {
            exp: 15,
            gold: 20,
            item: None,
        },
    },
    Trail {
        name: "Riverside Path",
        stages: 3,
        battle_chance: 0.5,
        reward: Reward {
            exp: 25,
            gold: 30,
            item: Some(KINGSFOIL),
        },
    },
    Trail {
        name: "Ruined Watchtower",
        stages: 4,
        battle_chance: 0.6,
        reward: Reward {
            exp: 40,
            gold: 60,
            item: Some(BANDAGE),
        },
    },
];

const VOLCANO_STAGES: u32 = 3;
const VOLCANO_BATTLE_CHANCE: f64 = 0.6;
const VOLCANO_EXP: u32 = 1000;
const VOLCANO_GOLD: u32 = 500;

impl<C: Console, D: Dice, S: SaveStore> Session<C, D, S> {
    /// Walk a trail stage by stage.
    pub fn walk_trail(&mut self, trail: &Trail) -> ExpeditionOutcome {
        self.console
            .say(&format!("You set out along the {}.", trail.name));
        for stage in 1..=trail.stages {
            self.console
                .say(&format!("({}: stage {} of {})", trail.name, stage, trail.stages));
            if !self.console.ask_yes_no("Press on? ") {
                self.console.say("You turn for home while the light holds.");
                return ExpeditionOutcome::TurnedBack;
            }

            let fired = self.random_event();
            if self.player.is_down() {
                return ExpeditionOutcome::Defeated;
            }
            if !fired && self.dice.chance(trail.battle_chance) {
                if self.scaled_battle(Context::overworld(self.act)) == Outcome::Lost {
                    return ExpeditionOutcome::Defeated;
                }
            } else if !fired {
                self.console.say("The way is quiet.");
            }
        }

        self.console
            .say(&format!("You reach the end of the {}.", trail.name));
        self.grant_reward(trail.reward);
        self.autosave();
        ExpeditionOutcome::Completed
    }

    /// The three-stage climb to the summit boss.
    pub fn ascend_volcano(&mut self) -> ExpeditionOutcome {
        self.console
            .say("The volcano looms, its slopes bleeding smoke.");
        if !self.console.ask_yes_no("Begin the climb? ") {
            return ExpeditionOutcome::TurnedBack;
        }

        for stage in 1..=VOLCANO_STAGES {
            self.console
                .say(&format!("The ash thickens. (Stage {stage} of {VOLCANO_STAGES})"));
            if self.dice.chance(VOLCANO_BATTLE_CHANCE)
                && self.scaled_battle(Context::Volcano) == Outcome::Lost
            {
                return ExpeditionOutcome::Defeated;
            }
        }

        self.console
            .say("At the summit, the air itself burns. Something is waiting.");
        let boss = Enemy::summit_boss(self.mode);
        self.console.say(&format!("{} rises to meet you!", boss.name));
        match self.battle(boss, Context::Volcano) {
            Outcome::Won => {
                let trophy = match self.mode {
                    Mode::Normal => DRAGON_SCALE,
                    Mode::Sundered => DEMON_HEART,
                };
                self.grant_reward(Reward {
                    exp: VOLCANO_EXP,
                    gold: VOLCANO_GOLD,
                    item: Some(trophy),
                });
                self.autosave();
                ExpeditionOutcome::Completed
            }
            // Bosses cannot flee and cannot be fled.
            _ => ExpeditionOutcome::Defeated,
        }
    }

    fn grant_reward(&mut self, reward: Reward) {
        if reward.exp > 0 {
            let report = self.player.gain_exp(reward.exp);
            self.console.say(&format!("You gain {} exp.", reward.exp));
            if report.levels_gained > 0 {
                self.console
                    .say(&format!("You reach level {}!", report.new_level));
            }
        }
        if reward.gold > 0 {
            self.player.gain_gold(reward.gold);
            self.console.say(&format!("You gain {} gold.", reward.gold));
        }
        if let Some(item) = reward.item {
            self.player.add_item(item, 1);
            self.console.say(&format!("You receive: {item}."));
        }
    }
}
