//! Cavern traversal.
//!
//! A confined exploration loop gated by lantern fuel. The path in is a
//! stack of directions; `back` pops it, and an empty stack means the
//! entrance. Every counted step burns one fuel, and running dry while
//! still inside costs the player everything since the last save.

use crate::battle::Outcome;
use crate::dice::{pick, Dice};
use crate::enemy::Context;
use crate::io::{normalize, Console};
use crate::items::LANTERN;
use crate::persist::SaveStore;
use crate::session::Session;

/// How a cavern visit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CavernOutcome {
    /// Walked out (or never went in).
    Exited,
    /// Fuel ran dry inside; the last saved state was reloaded.
    Reloaded,
    /// Died inside.
    Defeated,
}

const SIGHTS: &[&str] = &[
    "Water drips somewhere far overhead, counting out the dark.",
    "Pale fungus crusts the wall in the shape of a reaching hand.",
    "Old bones lie swept into a corner, too small to be a person's.",
    "Your light catches a vein of ore, glittering and out of reach.",
];

impl<C: Console, D: Dice, S: SaveStore> Session<C, D, S> {
    /// Enter and walk the cavern until exit, rollback, or death.
    pub fn explore_cavern(&mut self) -> CavernOutcome {
        if self.player.item_count(LANTERN) == 0 {
            self.console
                .say("The cavern mouth is pitch black. Without a lantern you'd be lost in ten paces.");
            return CavernOutcome::Exited;
        }
        if self.player.lantern_fuel == 0 {
            self.console.say("Your lantern is dry. It needs fuel.");
            return CavernOutcome::Exited;
        }
        if !self.player.lantern_on && !self.console.ask_yes_no("Light your lantern and go in? ") {
            self.console.say("You stay in the daylight.");
            return CavernOutcome::Exited;
        }
        // Known to succeed: lantern present, fuel positive.
        self.player.light_lantern();
        self.console
            .say("Lantern held high, you step into the cavern.");

        let mut path: Vec<String> = Vec::new();
        loop {
            let report = self.player.afflictions.tick();
            if report.total() > 0 {
                self.player.take_damage(report.total());
                self.console.say(&format!(
                    "Your wounds seep in the cold air. You lose {} HP.",
                    report.total()
                ));
                if self.player.is_down() {
                    self.player.lantern_on = false;
                    self.console
                        .say("You sink to the cavern floor, and the light goes out with you.");
                    return CavernOutcome::Defeated;
                }
            }

            self.console.say(&format!(
                "Fuel: {} | Depth: {} steps",
                self.player.lantern_fuel,
                path.len()
            ));
            let step = self.prompt_direction();

            if step == "back" {
                path.pop();
                self.player.lantern_fuel = self.player.lantern_fuel.saturating_sub(1);
                if path.is_empty() {
                    self.player.lantern_on = false;
                    self.console
                        .say("You retrace your steps and emerge into open air.");
                    return CavernOutcome::Exited;
                }
            } else {
                path.push(step);
                let draw = self.dice.uniform();
                tracing::debug!(draw, depth = path.len(), "cavern step");
                if draw < 0.6 {
                    if self.scaled_battle(Context::Cavern) == Outcome::Lost {
                        self.player.lantern_on = false;
                        return CavernOutcome::Defeated;
                    }
                } else if draw < 0.7 {
                    if !self.random_event() {
                        self.console.say("The tunnel bends on into silence.");
                    }
                } else if draw < 0.8 {
                    let sight = *pick(&mut self.dice, SIGHTS);
                    self.console.say(sight);
                } else {
                    self.console.say("The dark passes without incident.");
                }
                self.player.lantern_fuel = self.player.lantern_fuel.saturating_sub(1);
            }

            // Dry with steps still on the stack: progress is forfeit.
            if self.player.lantern_fuel == 0 {
                return self.forced_reload();
            }
        }
    }

    fn prompt_direction(&mut self) -> String {
        loop {
            let answer = normalize(&self.console.ask("Which way (left/right/forward/back)? "));
            match answer.as_str() {
                "left" | "right" | "forward" | "back" => return answer,
                _ => self.console.say("You can go left, right, forward, or back."),
            }
        }
    }

    /// The lantern died inside. One reload of the last persisted state;
    /// if even that fails, play continues on what's in memory.
    fn forced_reload(&mut self) -> CavernOutcome {
        self.console
            .say("The lantern gutters, flares once, and dies.");
        self.console
            .say("You grope through absolute dark for what feels like hours.");
        match self.store.load() {
            Ok(mut saved) => {
                saved.lantern_on = false;
                self.player = saved;
                self.console.say(
                    "You come to at the cavern mouth. Whatever you gained in there is gone.",
                );
            }
            Err(err) => {
                tracing::warn!(%err, "rollback load failed");
                self.player.lantern_on = false;
                self.console
                    .say(&format!("(Your last save could not be read: {err})"));
                self.console
                    .say("You stumble out with what you have.");
            }
        }
        CavernOutcome::Reloaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use crate::session::SessionConfig;
    use crate::testing::{MemoryStore, ScriptedConsole, ScriptedDice};

    fn spelunker() -> Player {
        let mut player = Player::new("Wren");
        player.add_item(LANTERN, 1); // auto-fuels to 6
        player.lantern_on = true;
        player
    }

    fn session(
        player: Player,
        console: ScriptedConsole,
        dice: ScriptedDice,
        store: MemoryStore,
    ) -> Session<ScriptedConsole, ScriptedDice, MemoryStore> {
        let mut session = Session::new(SessionConfig::new("Wren"), console, dice, store);
        session.player = player;
        session
    }

    #[test]
    fn entry_requires_a_lantern() {
        let mut session = session(
            Player::new("Wren"),
            ScriptedConsole::new(),
            ScriptedDice::new(),
            MemoryStore::new(),
        );
        assert_eq!(session.explore_cavern(), CavernOutcome::Exited);
        assert_eq!(session.store.loads, 0);
    }

    #[test]
    fn declining_to_light_costs_nothing() {
        let mut player = spelunker();
        player.lantern_on = false;
        let console = ScriptedConsole::with_answers(["no"]);
        let mut session = session(player, console, ScriptedDice::new(), MemoryStore::new());

        assert_eq!(session.explore_cavern(), CavernOutcome::Exited);
        assert_eq!(session.player.lantern_fuel, 6);
        assert!(!session.player.lantern_on);
    }

    #[test]
    fn dry_lantern_blocks_entry() {
        let mut player = spelunker();
        player.lantern_fuel = 0;
        player.lantern_on = false;
        let mut session = session(
            player,
            ScriptedConsole::new(),
            ScriptedDice::new(),
            MemoryStore::new(),
        );
        assert_eq!(session.explore_cavern(), CavernOutcome::Exited);
    }

    #[test]
    fn depletion_inside_triggers_exactly_one_reload() {
        let mut player = spelunker();
        player.lantern_fuel = 1;
        let saved = Player::new("Wren");
        let store = MemoryStore::holding(saved.clone());
        // One step in (idle outcome), fuel hits zero at depth 1.
        let console = ScriptedConsole::with_answers(["forward"]);
        let dice = ScriptedDice::new().with_uniforms([0.9]);
        let mut session = session(player, console, dice, store);

        assert_eq!(session.explore_cavern(), CavernOutcome::Reloaded);
        assert_eq!(session.store.loads, 1);
        // The in-memory player is the rolled-back snapshot, unlit.
        assert!(!session.player.lantern_on);
        assert_eq!(session.player.lantern_fuel, saved.lantern_fuel);
    }

    #[test]
    fn walking_out_as_the_fuel_dies_is_a_clean_exit() {
        let mut player = spelunker();
        player.lantern_fuel = 2;
        // Forward (idle), then back to the entrance; fuel reaches zero
        // exactly as the stack empties.
        let console = ScriptedConsole::with_answers(["forward", "back"]);
        let dice = ScriptedDice::new().with_uniforms([0.9]);
        let mut session = session(player, console, dice, MemoryStore::new());

        assert_eq!(session.explore_cavern(), CavernOutcome::Exited);
        assert_eq!(session.store.loads, 0);
        assert_eq!(session.player.lantern_fuel, 0);
        assert!(!session.player.lantern_on);
    }

    #[test]
    fn back_at_the_entrance_leaves_immediately() {
        let player = spelunker();
        let console = ScriptedConsole::with_answers(["back"]);
        let mut session = session(player, console, ScriptedDice::new(), MemoryStore::new());

        assert_eq!(session.explore_cavern(), CavernOutcome::Exited);
        // The step still cost a unit of fuel.
        assert_eq!(session.player.lantern_fuel, 5);
    }

    #[test]
    fn invalid_direction_reprompts_without_cost() {
        let player = spelunker();
        let console = ScriptedConsole::with_answers(["sideways", "up", "back"]);
        let mut session = session(player, console, ScriptedDice::new(), MemoryStore::new());

        assert_eq!(session.explore_cavern(), CavernOutcome::Exited);
        // Only the final "back" burned fuel.
        assert_eq!(session.player.lantern_fuel, 5);
    }

    #[test]
    fn afflictions_tick_while_exploring() {
        let mut player = spelunker();
        player.hp = 2;
        player.afflictions.apply_bleed();
        let mut session = session(
            player,
            ScriptedConsole::new(),
            ScriptedDice::new(),
            MemoryStore::new(),
        );

        assert_eq!(session.explore_cavern(), CavernOutcome::Defeated);
        assert!(session.console.prompts.is_empty());
        assert!(!session.player.lantern_on);
    }

    #[test]
    fn losing_a_cavern_battle_is_a_defeat() {
        let mut player = spelunker();
        player.hp = 1;
        player.attack = 1;
        // Step forward, outcome draw 0.1 forces a battle; the enemy's
        // hit ends it.
        let console = ScriptedConsole::with_answers(["forward", "attack"]);
        let dice = ScriptedDice::new().with_uniforms([0.1]).with_ranges([0, 0, 0]);
        let mut session = session(player, console, dice, MemoryStore::new());

        assert_eq!(session.explore_cavern(), CavernOutcome::Defeated);
        assert!(!session.player.lantern_on);
    }
}
