//! The turn-based combat resolver.
//!
//! `resolve` runs the attack/use-item/run loop to a terminal outcome,
//! mutating the passed-in player and enemy. Experience, drops, saving
//! and the boss second-chance checkpoint are the session's business;
//! this module only fights.

use crate::dice::Dice;
use crate::enemy::{Context, Enemy};
use crate::io::{normalize, Console};
use crate::items::{ANIMAL_FAT, BANDAGE, FUEL_PER_FAT, POTION, POTION_HEAL};
use crate::player::Player;

/// Terminal outcome of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
    Fled,
    EnemyFled,
}

/// Turns a boss fight lasts before the player is overwhelmed.
pub const BOSS_TURN_CAP: u32 = 10;

/// Hp a life-stealer regains from a bleeding player. Deliberately not
/// clamped against the enemy's maximum.
const LIFESTEAL_HEAL: i32 = 2;

/// Player bonus damage is uniform in [0, ATTACK_BONUS_MAX].
const ATTACK_BONUS_MAX: i32 = 4;
/// Enemy bonus damage is uniform in [0, ENEMY_BONUS_MAX].
const ENEMY_BONUS_MAX: i32 = 3;

/// Chance an escape attempt succeeds.
const RUN_CHANCE: f64 = 0.5;
/// Chance a weakened non-boss enemy flees before its attack.
const ENEMY_FLEE_CHANCE: f64 = 0.1;
/// Chance per tag that a hit inflicts its affliction.
const AFFLICT_CHANCE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Attack,
    UseItem,
    Run,
}

/// Run one encounter to completion.
pub fn resolve(
    player: &mut Player,
    enemy: &mut Enemy,
    context: Context,
    dice: &mut dyn Dice,
    console: &mut dyn Console,
) -> Outcome {
    let mut turns = 0u32;

    while enemy.is_alive() && !player.is_down() {
        if enemy.boss {
            turns += 1;
            if turns > BOSS_TURN_CAP {
                console.say(&format!(
                    "{} overwhelms you. There was never a way to outlast it.",
                    enemy.name
                ));
                player.hp = 0;
                break;
            }
        }

        // Afflictions tick before the player may act; a fatal tick ends
        // the encounter with no further action this turn.
        tick_afflictions(player, console);
        if player.is_down() {
            break;
        }

        present_health(player, enemy, console);

        match prompt_action(enemy.boss, console) {
            Action::Attack => player_attack(player, enemy, dice, console),
            Action::UseItem => use_item(player, context, console),
            Action::Run => {
                if dice.chance(RUN_CHANCE) {
                    console.say("You escaped successfully!");
                    tracing::debug!(enemy = %enemy.name, "player fled");
                    return Outcome::Fled;
                }
                console.say("You failed to escape!");
            }
        }

        if !enemy.is_alive() {
            break;
        }

        // Enemy turn: a weakened stray may bolt before it can strike.
        if !enemy.boss && enemy.is_weakened() && dice.chance(ENEMY_FLEE_CHANCE) {
            console.say(&format!(
                "The {} is low on health and flees from the battle!",
                enemy.name
            ));
            tracing::debug!(enemy = %enemy.name, "enemy fled");
            return Outcome::EnemyFled;
        }
        enemy_attack(player, enemy, dice, console);
    }

    let outcome = if player.is_down() {
        Outcome::Lost
    } else {
        Outcome::Won
    };
    tracing::debug!(enemy = %enemy.name, ?outcome, "encounter resolved");
    outcome
}

fn tick_afflictions(player: &mut Player, console: &mut dyn Console) {
    let report = player.afflictions.tick();
    if report.poison_damage > 0 {
        player.take_damage(report.poison_damage);
        console.say(&format!("Poison deals {} damage to you!", report.poison_damage));
    }
    if report.bleed_damage > 0 {
        player.take_damage(report.bleed_damage);
        console.say(&format!("Bleeding deals {} damage to you!", report.bleed_damage));
    }
}

fn present_health(player: &Player, enemy: &Enemy, console: &mut dyn Console) {
    // Boss hit points stay hidden; despair is part of the design.
    let enemy_hp = if enemy.boss {
        "???".to_string()
    } else {
        enemy.hp.to_string()
    };
    console.say(&format!(
        "Your HP: {}/{} | {} HP: {}",
        player.hp, player.max_hp, enemy.name, enemy_hp
    ));
}

/// Re-prompts until a recognized action arrives; invalid input costs
/// nothing and changes nothing.
fn prompt_action(boss: bool, console: &mut dyn Console) -> Action {
    let prompt = if boss {
        "Do you (attack/use item)? "
    } else {
        "Do you (attack/use item/run)? "
    };
    loop {
        let answer = normalize(&console.ask(prompt));
        match answer.as_str() {
            "attack" => return Action::Attack,
            "use item" => return Action::UseItem,
            "run" if !boss => return Action::Run,
            _ => console.say("Invalid action."),
        }
    }
}

fn player_attack(
    player: &mut Player,
    enemy: &mut Enemy,
    dice: &mut dyn Dice,
    console: &mut dyn Console,
) {
    let damage = player.effective_attack() + dice.range(0, ATTACK_BONUS_MAX);
    enemy.hp -= damage;
    console.say(&format!("You strike the {} for {} damage!", enemy.name, damage));

    // Feeds-on-your-bleeding rule: only if the hit did not finish it.
    if enemy.is_alive() && enemy.tags.life_steals() && player.afflictions.is_bleeding() {
        enemy.hp += LIFESTEAL_HEAL;
        console.say(&format!(
            "{} absorbs {} HP from your bleeding!",
            enemy.name, LIFESTEAL_HEAL
        ));
    }
}

/// Item priority: potion, then animal fat (cavern only), then bandage.
/// Having nothing usable still passes the turn to the enemy.
fn use_item(player: &mut Player, context: Context, console: &mut dyn Console) {
    if player.consume_item(POTION) {
        player.heal(POTION_HEAL);
        console.say(&format!("You drink a potion and restore {POTION_HEAL} HP."));
    } else if context.is_cavern() && player.consume_item(ANIMAL_FAT) {
        player.refuel_lantern(FUEL_PER_FAT);
        console.say(&format!(
            "You refuel your lantern with animal fat. Lantern fuel: {} turns.",
            player.lantern_fuel
        ));
    } else if player.consume_item(BANDAGE) {
        player.afflictions.cure();
        console.say("You use a bandage and cure all bleeding and poison effects!");
    } else {
        console.say("You have no usable items!");
    }
}

fn enemy_attack(
    player: &mut Player,
    enemy: &Enemy,
    dice: &mut dyn Dice,
    console: &mut dyn Console,
) {
    let damage = enemy.attack + dice.range(0, ENEMY_BONUS_MAX);
    player.take_damage(damage);
    console.say(&format!("The {} hits you for {} damage!", enemy.name, damage));

    // Each affliction rolls independently.
    if enemy.tags.inflicts_poison && dice.chance(AFFLICT_CHANCE) {
        player.afflictions.apply_poison();
        console.say("You have been poisoned! You will lose 1 HP for the next 2 turns.");
    }
    if enemy.tags.inflicts_bleed && dice.chance(AFFLICT_CHANCE) {
        player.afflictions.apply_bleed();
        console.say("You are bleeding! You will lose 2 HP for the next 2 turns.");
    }
}
