use std::io::{BufRead, Write};

use colored::Colorize;
use eyre::Result;

/// Line-oriented prompting over any reader/writer pair.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn parts(&mut self) -> (&mut R, &mut W) {
        (&mut self.input, &mut self.output)
    }

    pub fn say(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Rewrites the current line in place.
    pub fn progress(&mut self, text: impl std::fmt::Display) -> Result<()> {
        write!(self.output, "\r{text}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Shows `question` and reads one trimmed line. `None` at end of input.
    pub fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Shows a numbered menu and re-asks until one of `choices` or `0` is
    /// entered. `0` and end of input both yield `None`.
    pub fn menu(&mut self, menu: &str, choices: &[u32], retry: &str) -> Result<Option<u32>> {
        loop {
            let Some(answer) = self.ask(menu)? else {
                return Ok(None);
            };
            match answer.parse::<u32>() {
                Ok(0) => return Ok(None),
                Ok(choice) if choices.contains(&choice) => return Ok(Some(choice)),
                _ => self.say(format!("\n❗{}", retry).red())?,
            }
        }
    }

    /// Re-asks until a positive integer is entered.
    pub fn positive(&mut self, question: &str) -> Result<Option<u64>> {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            match answer.parse::<u64>() {
                Ok(value) if value > 0 => return Ok(Some(value)),
                _ => self.say("Ошибка ввода данных. Введите целое положительное число.".red())?,
            }
        }
    }
}
