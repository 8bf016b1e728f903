//! Scripted doubles for deterministic tests.
//!
//! `ScriptedConsole` plays back canned answers and records narration;
//! `ScriptedDice` plays back canned rolls; `MemoryStore` keeps saves in
//! memory and counts calls. Panics here are fine: these types only run
//! under test.

use std::collections::VecDeque;

use crate::dice::Dice;
use crate::io::Console;
use crate::persist::{SaveError, SaveStore};
use crate::player::Player;

/// A console that answers from a script and records everything said.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    /// Every line said, in order.
    pub lines: Vec<String>,
    /// Every prompt asked, in order.
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn push_answer(&mut self, answer: impl Into<String>) {
        self.answers.push_back(answer.into());
    }

    pub fn has_line_containing(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn ask(&mut self, prompt: &str) -> String {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("console script ran out of answers at {prompt:?}"))
    }
}

/// Dice that play back scripted rolls.
///
/// An exhausted uniform queue yields just-under-one draws (so `chance`
/// never fires by accident); an exhausted range queue yields the low
/// bound.
#[derive(Debug, Default)]
pub struct ScriptedDice {
    uniforms: VecDeque<f64>,
    ranges: VecDeque<i32>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniforms<I: IntoIterator<Item = f64>>(mut self, draws: I) -> Self {
        self.uniforms.extend(draws);
        self
    }

    pub fn with_ranges<I: IntoIterator<Item = i32>>(mut self, rolls: I) -> Self {
        self.ranges.extend(rolls);
        self
    }
}

impl Dice for ScriptedDice {
    fn uniform(&mut self) -> f64 {
        self.uniforms.pop_front().unwrap_or(0.999_999)
    }

    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        match self.ranges.pop_front() {
            Some(roll) => roll.clamp(lo, hi),
            None => lo,
        }
    }
}

/// An in-memory save store with call counters and failure switches.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub saved: Option<Player>,
    pub checkpoint: Option<Player>,
    pub saves: usize,
    pub loads: usize,
    pub checkpoints: usize,
    pub fail_saves: bool,
    pub fail_loads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a persisted player.
    pub fn holding(player: Player) -> Self {
        Self {
            saved: Some(player),
            ..Self::default()
        }
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, player: &Player) -> Result<(), SaveError> {
        self.saves += 1;
        if self.fail_saves {
            return Err(SaveError::Io(std::io::Error::other("scripted save failure")));
        }
        self.saved = Some(player.clone());
        Ok(())
    }

    fn load(&mut self) -> Result<Player, SaveError> {
        self.loads += 1;
        if self.fail_loads {
            return Err(SaveError::Io(std::io::Error::other("scripted load failure")));
        }
        self.saved.clone().ok_or(SaveError::NotFound)
    }

    fn save_checkpoint(&mut self, player: &Player) -> Result<(), SaveError> {
        self.checkpoints += 1;
        self.checkpoint = Some(player.clone());
        Ok(())
    }

    fn load_checkpoint(&mut self) -> Result<Player, SaveError> {
        self.checkpoint.clone().ok_or(SaveError::NotFound)
    }
}
