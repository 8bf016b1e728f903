//! Weighted side-event selection.
//!
//! One uniform draw per traversal step is checked against an ordered
//! list of literal thresholds; the first entry the draw falls under
//! fires. The thresholds are cutoffs, not cumulative band widths, so a
//! later entry's effective rate is eaten into by every earlier entry.
//! The bands are deliberately not renormalized; the balance numbers
//! assume these literal cutoffs.

use crate::dice::Dice;
use crate::enemy::{Act, Mode};

/// A side-event that can fire on a traversal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The one-way narrative trigger that flips the run into sundered
    /// mode. Cannot fire once the mode has already flipped.
    Sundering,
    /// A loot chest with gold and a chance at gear.
    Chest,
    /// A creature that may take a liking to the player.
    Companion,
    /// A stronger-than-usual enemy; act two only.
    RareAmbush,
}

/// An ordered event table for one overworld context.
#[derive(Debug, Clone)]
pub struct EventTable {
    entries: Vec<(f64, Event)>,
}

impl EventTable {
    /// Build the table for an overworld walk.
    ///
    /// Entries are kept in ascending threshold order, matching the check
    /// order the selection semantics depend on.
    pub fn for_overworld(act: Act, mode: Mode) -> Self {
        let mut entries = Vec::with_capacity(4);
        if mode == Mode::Normal {
            entries.push((0.001, Event::Sundering));
        }
        entries.push((0.08, Event::Chest));
        entries.push((0.10, Event::Companion));
        if act == Act::Two {
            entries.push((0.13, Event::RareAmbush));
        }
        Self { entries }
    }

    /// First entry whose threshold the draw falls under, if any.
    pub fn select(&self, draw: f64) -> Option<Event> {
        self.entries
            .iter()
            .find(|(threshold, _)| draw < *threshold)
            .map(|(_, event)| *event)
    }

    /// Make one draw and select against it.
    pub fn roll(&self, dice: &mut dyn Dice) -> Option<Event> {
        let draw = dice.uniform();
        let event = self.select(draw);
        tracing::debug!(draw, ?event, "event roll");
        event
    }
}
