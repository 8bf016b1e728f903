//! The game session.
//!
//! A `Session` owns the player record and the three seams (console,
//! dice, save store) and drives encounters between them. Combat,
//! traversal and expeditions borrow its pieces; the session itself
//! handles what happens around an encounter: spoils, autosaves, and the
//! boss second-chance checkpoint.

use crate::battle::{self, Outcome};
use crate::dice::{pick, pick_weighted, Dice};
use crate::enemy::{Act, Context, Difficulty, Enemy, Mode};
use crate::event::{Event, EventTable};
use crate::io::Console;
use crate::items::{
    ANIMAL_FAT, ARMOR_FINDS, COMPANION_FINDS, ECTOPLASM, LANTERN, POTION, SILK, TOOL_FINDS,
};
use crate::persist::SaveStore;
use crate::player::Player;

/// Experience granted by an ordinary victory.
pub const VICTORY_EXP: u32 = 10;

/// Starting parameters for a run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub name: String,
    pub difficulty: Difficulty,
    pub mode: Mode,
}

impl SessionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            difficulty: Difficulty::Normal,
            mode: Mode::Normal,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

/// What a chest can hold, weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChestLoot {
    Potion,
    Gold,
    Lantern,
    Armor,
    Tool,
}

const CHEST_TABLE: &[(ChestLoot, u32)] = &[
    (ChestLoot::Potion, 3),
    (ChestLoot::Gold, 3),
    (ChestLoot::Lantern, 2),
    (ChestLoot::Armor, 1),
    (ChestLoot::Tool, 1),
];

/// One run of the game, from the main menu to defeat or quit.
pub struct Session<C: Console, D: Dice, S: SaveStore> {
    pub player: Player,
    pub act: Act,
    pub difficulty: Difficulty,
    pub mode: Mode,
    pub console: C,
    pub dice: D,
    pub store: S,
}

impl<C: Console, D: Dice, S: SaveStore> Session<C, D, S> {
    /// Start a fresh run.
    pub fn new(config: SessionConfig, console: C, dice: D, store: S) -> Self {
        Self {
            player: Player::new(config.name),
            act: Act::One,
            difficulty: config.difficulty,
            mode: config.mode,
            console,
            dice,
            store,
        }
    }

    /// Resume a run from a persisted player record.
    pub fn resume(player: Player, config: SessionConfig, console: C, dice: D, store: S) -> Self {
        Self {
            player,
            act: Act::One,
            difficulty: config.difficulty,
            mode: config.mode,
            console,
            dice,
            store,
        }
    }

    /// Persist the player; failures are narrated, never fatal.
    pub fn autosave(&mut self) {
        match self.store.save(&self.player) {
            Ok(()) => self.console.say("(Progress saved.)"),
            Err(err) => {
                tracing::warn!(%err, "autosave failed");
                self.console
                    .say(&format!("(Your progress could not be saved: {err})"));
            }
        }
    }

    /// Roll the side-event table once; apply whatever fires.
    ///
    /// Returns whether anything fired, so callers can gate a fallback
    /// encounter on a quiet roll.
    pub fn random_event(&mut self) -> bool {
        let table = EventTable::for_overworld(self.act, self.mode);
        match table.roll(&mut self.dice) {
            Some(event) => {
                self.apply_event(event);
                true
            }
            None => false,
        }
    }

    fn apply_event(&mut self, event: Event) {
        match event {
            Event::Sundering => self.sundering(),
            Event::Chest => self.open_chest(),
            Event::Companion => self.meet_companion(),
            Event::RareAmbush => {
                self.console
                    .say("Something pale and wrong crawls out of the treeline!");
                let enemy = Enemy::generate(
                    self.player.level,
                    Context::Cavern,
                    self.difficulty,
                    self.mode,
                    &mut self.dice,
                );
                // Ambushes are fought under cavern conditions: the
                // creature is out of the deep dark, and fat is burnable.
                self.battle(enemy, Context::Cavern);
            }
        }
    }

    /// The one-way rupture into sundered mode.
    fn sundering(&mut self) {
        self.mode = Mode::Sundered;
        self.console.say("The light curdles. The birdsong stops.");
        self.console
            .say("Something fundamental has broken in the world. It will not mend.");
        tracing::info!("mode shifted to sundered");
    }

    fn open_chest(&mut self) {
        self.console
            .say("Half-buried under the roots sits a weathered chest.");
        match *pick_weighted(&mut self.dice, CHEST_TABLE) {
            ChestLoot::Potion => {
                self.player.add_item(POTION, 1);
                self.console.say("Inside: a potion.");
            }
            ChestLoot::Gold => {
                let amount = self.dice.range(5, 20) as u32;
                self.player.gain_gold(amount);
                self.console.say(&format!("Inside: {amount} gold."));
            }
            ChestLoot::Lantern => {
                self.player.add_item(LANTERN, 1);
                self.console.say("Inside: a lantern, already wicked.");
            }
            ChestLoot::Armor => {
                let piece = *pick(&mut self.dice, ARMOR_FINDS);
                self.console.say(&format!("Inside: a {piece}."));
                if self.console.ask_yes_no(&format!("Wear the {piece}? ")) {
                    if let Some(old) = self.player.armor.take() {
                        self.player.add_item(&old, 1);
                    }
                    self.player.armor = Some(piece.to_string());
                } else {
                    self.player.add_item(piece, 1);
                }
            }
            ChestLoot::Tool => {
                let tool = *pick(&mut self.dice, TOOL_FINDS);
                self.console.say(&format!("Inside: a {tool}."));
                if self
                    .console
                    .ask_yes_no(&format!("Carry the {tool} in hand? "))
                {
                    if let Some(old) = self.player.tool.take() {
                        self.player.add_item(&old, 1);
                    }
                    self.player.tool = Some(tool.to_string());
                } else {
                    self.player.add_item(tool, 1);
                }
            }
        }
        self.autosave();
    }

    fn meet_companion(&mut self) {
        if self.player.pet.is_some() {
            self.console
                .say("A small creature watches you pass, but keeps its distance.");
            return;
        }
        let creature = *pick(&mut self.dice, COMPANION_FINDS);
        let wants = self
            .console
            .ask_yes_no(&format!("A {creature} approaches you. Take it along? "));
        if wants {
            self.player.pet = Some(creature.to_string());
            self.console
                .say(&format!("The {creature} pads along beside you."));
            self.autosave();
        } else {
            self.console.say("It slinks back into the undergrowth.");
        }
    }

    /// Run a battle against an already-generated enemy and settle the
    /// aftermath: spoils and autosave on a win, the second-chance
    /// checkpoint on a boss loss.
    pub fn battle(&mut self, mut enemy: Enemy, context: Context) -> Outcome {
        let outcome = battle::resolve(
            &mut self.player,
            &mut enemy,
            context,
            &mut self.dice,
            &mut self.console,
        );
        match outcome {
            Outcome::Won => {
                self.console
                    .say(&format!("The {} falls. You are victorious!", enemy.name));
                self.award_spoils(&enemy);
                self.autosave();
            }
            Outcome::Lost if enemy.boss => self.write_second_chance(),
            Outcome::Lost => {
                self.console.say("Your strength fails. Darkness takes you.");
            }
            Outcome::Fled | Outcome::EnemyFled => {}
        }
        outcome
    }

    /// Generate a context-appropriate enemy and fight it.
    pub fn scaled_battle(&mut self, context: Context) -> Outcome {
        let enemy = Enemy::generate(
            self.player.level,
            context,
            self.difficulty,
            self.mode,
            &mut self.dice,
        );
        self.console
            .say(&format!("A {} blocks your path!", enemy.name));
        self.battle(enemy, context)
    }

    fn award_spoils(&mut self, enemy: &Enemy) {
        let report = self.player.gain_exp(VICTORY_EXP);
        self.console.say(&format!("You gain {VICTORY_EXP} exp."));
        if report.levels_gained > 0 {
            self.console.say(&format!(
                "You reach level {}! You feel stronger, and your wounds close.",
                report.new_level
            ));
        }
        for (dropped, item) in [
            (enemy.tags.drops_fat, ANIMAL_FAT),
            (enemy.tags.drops_silk, SILK),
            (enemy.tags.drops_ectoplasm, ECTOPLASM),
        ] {
            if dropped {
                self.player.add_item(item, 1);
                self.console
                    .say(&format!("The {} drops: {item}.", enemy.name));
            }
        }
    }

    /// On a boss loss the run ends, but a snapshot with restored hp goes
    /// to the rebirth slot so the next run can pick it up.
    fn write_second_chance(&mut self) {
        self.console
            .say("As the killing blow falls, a pale warmth closes around you.");
        self.console
            .say("You will wake again. Not here, and not unchanged.");
        let mut snapshot = self.player.clone();
        snapshot.hp = snapshot.max_hp;
        snapshot.afflictions.cure();
        snapshot.lantern_on = false;
        if let Err(err) = self.store.save_checkpoint(&snapshot) {
            tracing::warn!(%err, "second-chance checkpoint failed");
            self.console
                .say(&format!("(The checkpoint could not be written: {err})"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::Tags;
    use crate::testing::{MemoryStore, ScriptedConsole, ScriptedDice};

    type TestSession = Session<ScriptedConsole, ScriptedDice, MemoryStore>;

    fn session(dice: ScriptedDice, console: ScriptedConsole) -> TestSession {
        Session::new(
            SessionConfig::new("Wren"),
            console,
            dice,
            MemoryStore::new(),
        )
    }

    fn dead_rat(tags: Tags) -> Enemy {
        Enemy {
            name: "Plague Rat".to_string(),
            hp: 1,
            max_hp: 1,
            attack: 1,
            boss: false,
            tags,
        }
    }

    #[test]
    fn victory_awards_exp_drops_and_autosaves() {
        let console = ScriptedConsole::with_answers(["attack"]);
        let dice = ScriptedDice::new().with_ranges([0]);
        let mut session = session(dice, console);

        let tags = Tags {
            drops_fat: true,
            ..Tags::default()
        };
        let outcome = session.battle(dead_rat(tags), Context::ActOne);
        assert_eq!(outcome, Outcome::Won);
        assert_eq!(session.player.exp, VICTORY_EXP);
        assert_eq!(session.player.item_count(ANIMAL_FAT), 1);
        assert_eq!(session.store.saves, 1);
    }

    #[test]
    fn failed_autosave_is_narrated_not_fatal() {
        let console = ScriptedConsole::with_answers(["attack"]);
        let dice = ScriptedDice::new().with_ranges([0]);
        let mut session = session(dice, console);
        session.store.fail_saves = true;

        let outcome = session.battle(dead_rat(Tags::default()), Context::ActOne);
        assert_eq!(outcome, Outcome::Won);
        assert!(session
            .console
            .has_line_containing("could not be saved"));
    }

    #[test]
    fn boss_loss_writes_exactly_one_rebirth_checkpoint() {
        // Ten attacks, then the cap falls.
        let answers = std::iter::repeat("attack".to_string()).take(10);
        let console = ScriptedConsole::with_answers(answers);
        let dice = ScriptedDice::new();
        let mut session = session(dice, console);
        session.player.hp = 20_000;
        session.player.max_hp = 20_000;

        let boss = Enemy::summit_boss(Mode::Sundered);
        let outcome = session.battle(boss, Context::Volcano);
        assert_eq!(outcome, Outcome::Lost);
        assert_eq!(session.store.checkpoints, 1);
        assert_eq!(session.store.saves, 0);

        let snapshot = session.store.checkpoint.as_ref().unwrap();
        assert_eq!(snapshot.hp, snapshot.max_hp);
        assert!(!snapshot.afflictions.is_bleeding());
    }

    #[test]
    fn ordinary_loss_writes_nothing() {
        let console = ScriptedConsole::with_answers(["attack"]);
        let dice = ScriptedDice::new().with_ranges([0, 3]);
        let mut session = session(dice, console);
        session.player.hp = 1;
        session.player.attack = 1;

        let strong = Enemy {
            name: "Corrupted Knight".to_string(),
            hp: 500,
            max_hp: 500,
            attack: 50,
            boss: false,
            tags: Tags::default(),
        };
        let outcome = session.battle(strong, Context::ActTwo);
        assert_eq!(outcome, Outcome::Lost);
        assert_eq!(session.store.checkpoints, 0);
        assert_eq!(session.store.saves, 0);
    }

    #[test]
    fn quiet_event_roll_reports_nothing_fired() {
        let console = ScriptedConsole::new();
        let dice = ScriptedDice::new().with_uniforms([0.5]);
        let mut session = session(dice, console);
        assert!(!session.random_event());
        assert!(session.console.lines.is_empty());
    }

    #[test]
    fn sundering_event_flips_mode_one_way() {
        let console = ScriptedConsole::new();
        let dice = ScriptedDice::new().with_uniforms([0.0005]);
        let mut session = session(dice, console);
        assert!(session.random_event());
        assert_eq!(session.mode, Mode::Sundered);

        // The trigger band no longer exists; the same draw now opens the
        // chest band instead.
        session.dice = ScriptedDice::new()
            .with_uniforms([0.0005])
            .with_ranges([1]); // chest table roll -> potion
        assert!(session.random_event());
        assert_eq!(session.mode, Mode::Sundered);
        assert!(session.console.has_line_containing("chest"));
    }

    #[test]
    fn chest_gold_band_pays_the_rolled_amount() {
        let console = ScriptedConsole::new();
        // Draw 0.05 -> chest; weighted roll 4 lands in the gold band
        // (potion 0-2, gold 3-5); amount roll 17.
        let dice = ScriptedDice::new()
            .with_uniforms([0.05])
            .with_ranges([4, 17]);
        let mut session = session(dice, console);
        let before = session.player.gold();

        assert!(session.random_event());
        assert_eq!(session.player.gold(), before + 17);
    }

    #[test]
    fn companion_respects_refusal_and_existing_pet() {
        let console = ScriptedConsole::with_answers(["no"]);
        // Draw 0.09 -> companion band; pick roll 0 -> first creature.
        let dice = ScriptedDice::new().with_uniforms([0.09]).with_ranges([0]);
        let mut session = session(dice, console);

        assert!(session.random_event());
        assert!(session.player.pet.is_none());

        session.player.pet = Some("Void Cat".to_string());
        session.dice = ScriptedDice::new().with_uniforms([0.09]);
        assert!(session.random_event());
        assert_eq!(session.player.pet.as_deref(), Some("Void Cat"));
    }

    #[test]
    fn ambush_battles_allow_burning_fat() {
        // Act-two draw 0.12 springs the ambush; the fight runs under
        // cavern conditions, so animal fat refuels the lantern mid-turn.
        let console = ScriptedConsole::with_answers(["use item", "run"]);
        let dice = ScriptedDice::new()
            .with_uniforms([0.12, 0.4])
            .with_ranges([2, 0]); // species pick -> Blind Lizard, attack bonus 0
        let mut session = session(dice, console);
        session.act = crate::enemy::Act::Two;
        session.player.inventory.clear();
        session.player.add_item(ANIMAL_FAT, 1);

        assert!(session.random_event());
        assert_eq!(session.player.item_count(ANIMAL_FAT), 0);
        assert_eq!(session.player.lantern_fuel, crate::items::FUEL_PER_FAT);
        assert!(!session.console.has_line_containing("no usable items"));
    }

    #[test]
    fn chest_and_companion_events_advance_the_save() {
        // Chest (gold band).
        let console = ScriptedConsole::new();
        let dice = ScriptedDice::new()
            .with_uniforms([0.05])
            .with_ranges([4, 17]);
        let mut session = session(dice, console);
        assert!(session.random_event());
        assert_eq!(session.store.saves, 1);

        // Adopting a companion saves too; refusing does not.
        session.console.push_answer("yes");
        session.dice = ScriptedDice::new().with_uniforms([0.09]).with_ranges([0]);
        assert!(session.random_event());
        assert_eq!(session.store.saves, 2);
        assert_eq!(session.store.saved.as_ref().map(|p| p.pet.is_some()), Some(true));
    }

    #[test]
    fn equipping_chest_gear_stashes_the_old_piece() {
        let console = ScriptedConsole::with_answers(["yes"]);
        // Draw 0.05 -> chest; weighted roll 9 -> the tool band;
        // pick roll 0 -> Rusty Pickaxe.
        let dice = ScriptedDice::new()
            .with_uniforms([0.05])
            .with_ranges([9, 0]);
        let mut session = session(dice, console);
        session.player.tool = Some("Ancient Key".to_string());

        assert!(session.random_event());
        assert_eq!(session.player.tool.as_deref(), Some("Rusty Pickaxe"));
        assert_eq!(session.player.item_count("Ancient Key"), 1);
    }
}
