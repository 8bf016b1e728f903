//! Terminal implementation of the engine's console seam.

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;
use duskfall_core::Console;

/// Line-based console over stdin/stdout.
pub struct StdConsole;

impl Console for StdConsole {
    fn say(&mut self, line: &str) {
        // Parenthesized lines are system asides; dim them.
        if line.starts_with('(') {
            println!("{}", line.dark_grey());
        } else {
            println!("{line}");
        }
    }

    fn ask(&mut self, prompt: &str) -> String {
        print!("{}", prompt.bold());
        let _ = io::stdout().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            // EOF or a broken pipe means the player is gone.
            Ok(0) | Err(_) => {
                println!();
                std::process::exit(0);
            }
            Ok(_) => answer,
        }
    }
}
