//! Duskfall game engine.
//!
//! This crate provides:
//! - Turn-based combat with poison/bleed afflictions
//! - Level- and difficulty-scaled enemy generation, with a one-way
//!   "sundered" alternate mode
//! - Weighted side-events (chests, companions, rare ambushes)
//! - Lantern-gated cavern traversal with save rollback on depletion
//! - Trail and volcano expeditions
//! - Versioned JSON save files
//!
//! All I/O and randomness flow through the [`io::Console`] and
//! [`dice::Dice`] seams, so the whole engine runs deterministically
//! under test.
//!
//! # Quick Start
//!
//! ```ignore
//! use duskfall_core::{FileStore, SeededDice, Session, SessionConfig};
//!
//! let config = SessionConfig::new("Wren").with_difficulty(Difficulty::Hard);
//! let mut session = Session::new(
//!     config,
//!     my_console,
//!     SeededDice::from_entropy(),
//!     FileStore::new("saves"),
//! );
//! session.explore_cavern();
//! ```

pub mod battle;
pub mod cavern;
pub mod dice;
pub mod enemy;
pub mod event;
pub mod expedition;
pub mod io;
pub mod items;
pub mod persist;
pub mod player;
pub mod session;
pub mod status;
pub mod testing;

// Primary public API
pub use battle::Outcome;
pub use cavern::CavernOutcome;
pub use dice::{Dice, SeededDice};
pub use enemy::{Act, Context, Difficulty, Enemy, Mode};
pub use event::{Event, EventTable};
pub use expedition::{ExpeditionOutcome, Trail, TRAILS};
pub use io::Console;
pub use persist::{FileStore, SaveError, SaveStore};
pub use player::Player;
pub use session::{Session, SessionConfig};
pub use status::Afflictions;
