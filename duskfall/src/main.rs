//! Duskfall terminal front-end.
//!
//! A line-based interface over the `duskfall-core` engine: main menu,
//! exploration dispatch, and status display.
//!
//! ```bash
//! cargo run -p duskfall -- --name Wren --difficulty hard
//! ```

mod console;

use std::process::ExitCode;

use duskfall_core::{
    Act, CavernOutcome, Console, Difficulty, ExpeditionOutcome, FileStore, SaveStore, SeededDice,
    Session, SessionConfig, Trail, TRAILS,
};
use tracing_subscriber::EnvFilter;

use console::StdConsole;

struct Args {
    name: Option<String>,
    difficulty: Difficulty,
    seed: Option<u64>,
    save_dir: String,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        name: None,
        difficulty: Difficulty::Normal,
        seed: None,
        save_dir: "saves".to_string(),
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--name" => {
                parsed.name = Some(
                    iter.next()
                        .ok_or("--name requires a value")?
                        .clone(),
                );
            }
            "--difficulty" => {
                let value = iter.next().ok_or("--difficulty requires a value")?;
                parsed.difficulty = Difficulty::parse(value)
                    .ok_or_else(|| format!("unknown difficulty {value:?}"))?;
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed requires a value")?;
                parsed.seed = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid seed {value:?}"))?,
                );
            }
            "--save-dir" => {
                parsed.save_dir = iter
                    .next()
                    .ok_or("--save-dir requires a value")?
                    .clone();
            }
            "--help" | "-h" => return Err(String::new()),
            other => return Err(format!("unknown argument {other:?}")),
        }
    }
    Ok(parsed)
}

fn print_help() {
    println!("duskfall - a text adventure");
    println!();
    println!("Options:");
    println!("  --name NAME          character name (skips the prompt)");
    println!("  --difficulty LEVEL   easy | normal | hard (default: normal)");
    println!("  --seed N             fixed RNG seed for reproducible runs");
    println!("  --save-dir DIR       save directory (default: saves)");
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
                eprintln!();
            }
            print_help();
            return if message.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    let mut console = StdConsole;
    console.say("DUSKFALL");
    console.say("The road south is long, and the light is failing.");

    loop {
        let choice = console.ask("\nMain menu (new/load/rebirth/quit): ");
        match choice.trim().to_lowercase().as_str() {
            "new" => {
                let name = match &args.name {
                    Some(name) => name.clone(),
                    None => {
                        let answer = console.ask("What is your name? ");
                        let name = answer.trim().to_string();
                        if name.is_empty() {
                            console.say("The road remembers no nameless travelers.");
                            continue;
                        }
                        name
                    }
                };
                let config = SessionConfig::new(name).with_difficulty(args.difficulty);
                let session = Session::new(
                    config,
                    StdConsole,
                    dice_from(&args),
                    FileStore::new(&args.save_dir),
                );
                run(session);
            }
            "load" => {
                let mut store = FileStore::new(&args.save_dir);
                match store.load() {
                    Ok(player) => {
                        let config =
                            SessionConfig::new(player.name.clone()).with_difficulty(args.difficulty);
                        let session =
                            Session::resume(player, config, StdConsole, dice_from(&args), store);
                        run(session);
                    }
                    Err(err) => console.say(&format!("(Could not load the save: {err})")),
                }
            }
            "rebirth" => {
                let mut store = FileStore::new(&args.save_dir);
                match store.load_checkpoint() {
                    Ok(player) => {
                        console.say("You wake with the taste of ash, whole again.");
                        let config =
                            SessionConfig::new(player.name.clone()).with_difficulty(args.difficulty);
                        let session =
                            Session::resume(player, config, StdConsole, dice_from(&args), store);
                        run(session);
                    }
                    Err(err) => console.say(&format!("(No second chance awaits: {err})")),
                }
            }
            "quit" => {
                console.say("The dusk takes the road, and you with it. Farewell.");
                return ExitCode::SUCCESS;
            }
            _ => console.say("Choose new, load, rebirth, or quit."),
        }
    }
}

fn dice_from(args: &Args) -> SeededDice {
    match args.seed {
        Some(seed) => SeededDice::seeded(seed),
        None => SeededDice::from_entropy(),
    }
}

/// The exploration loop for one run. Returns when the player quits or
/// falls.
fn run(mut session: Session<StdConsole, SeededDice, FileStore>) {
    session.console.say(&format!(
        "\nWelcome, {}. Difficulty: {:?}.",
        session.player.name, session.difficulty
    ));

    loop {
        let choice = session
            .console
            .ask("\nWhat now (walk/cavern/volcano/onward/status/save/quit)? ");
        match choice.trim().to_lowercase().as_str() {
            "walk" => {
                if let Some(trail) = choose_trail(&mut session.console) {
                    if session.walk_trail(trail) == ExpeditionOutcome::Defeated {
                        break;
                    }
                }
            }
            "cavern" => {
                if session.explore_cavern() == CavernOutcome::Defeated {
                    break;
                }
            }
            "volcano" => match session.ascend_volcano() {
                ExpeditionOutcome::Completed => {
                    session
                        .console
                        .say("The mountain is yours. Few will ever believe it.");
                }
                ExpeditionOutcome::Defeated => break,
                ExpeditionOutcome::TurnedBack => {}
            },
            "onward" => match session.act {
                Act::One => {
                    session.act = Act::Two;
                    session
                        .console
                        .say("You cross the ridge into stranger country. (Act Two)");
                }
                Act::Two => session.console.say("There is no further east to go."),
            },
            "status" => print_status(&mut session),
            "save" => session.autosave(),
            "quit" => {
                session.autosave();
                session.console.say("You make camp. The road will wait.");
                return;
            }
            _ => session
                .console
                .say("Choose walk, cavern, volcano, onward, status, save, or quit."),
        }

        if session.player.is_down() {
            break;
        }
    }

    session
        .console
        .say("\nThis run has ended. The road goes on without you.");
}

fn choose_trail(console: &mut StdConsole) -> Option<&'static Trail> {
    console.say("Trails:");
    for (i, trail) in TRAILS.iter().enumerate() {
        console.say(&format!(
            "  {}. {} ({} stages)",
            i + 1,
            trail.name,
            trail.stages
        ));
    }
    let answer = console.ask("Which trail (number, or back)? ");
    let answer = answer.trim().to_lowercase();
    if answer == "back" {
        return None;
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=TRAILS.len()).contains(&n) => Some(&TRAILS[n - 1]),
        _ => {
            console.say("No such trail.");
            None
        }
    }
}

fn print_status(session: &mut Session<StdConsole, SeededDice, FileStore>) {
    let player = &session.player;
    session.console.say(&format!(
        "{} | Level {} ({} exp) | HP {}/{} | Attack {} | Gold {}",
        player.name,
        player.level,
        player.exp,
        player.hp,
        player.max_hp,
        player.effective_attack(),
        player.gold()
    ));
    session.console.say(&format!(
        "Armor: {} | Tool: {} | Companion: {}",
        player.armor.as_deref().unwrap_or("none"),
        player.tool.as_deref().unwrap_or("none"),
        player.pet.as_deref().unwrap_or("none")
    ));
    session.console.say(&format!(
        "Lantern: {} (fuel {})",
        if player.lantern_on { "lit" } else { "out" },
        player.lantern_fuel
    ));
    if player.inventory.is_empty() {
        session.console.say("Pack: empty");
    } else {
        let pack: Vec<String> = player
            .inventory
            .iter()
            .map(|(name, count)| format!("{name} x{count}"))
            .collect();
        session.console.say(&format!("Pack: {}", pack.join(", ")));
    }
}
