//! Presentation and input seam.
//!
//! The engine never touches stdin/stdout directly. Narration and
//! prompting go through the [`Console`] trait; the `duskfall` binary
//! implements it over the terminal, and tests drive the engine with the
//! scripted implementation in [`crate::testing`].

/// The presentation/input collaborator.
pub trait Console {
    /// Emit one line of narration.
    fn say(&mut self, line: &str);

    /// Ask a question and return the raw answer line.
    fn ask(&mut self, prompt: &str) -> String;

    /// Ask until the player answers yes or no.
    fn ask_yes_no(&mut self, prompt: &str) -> bool {
        loop {
            let answer = self.ask(prompt);
            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => self.say("Please answer yes or no."),
            }
        }
    }
}

/// Normalize a raw answer for command matching.
pub fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedConsole;

    #[test]
    fn ask_yes_no_reprompts_until_answered() {
        let mut console = ScriptedConsole::with_answers(["what", "maybe", "YES"]);
        assert!(console.ask_yes_no("Proceed?"));
        assert_eq!(
            console
                .lines
                .iter()
                .filter(|l| l.contains("yes or no"))
                .count(),
            2
        );
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Attack \n"), "attack");
    }
}
