use std::io::{BufRead, BufReader, Stdin};
use termon_core::Result;

/// Asks the user whether to end the run.
pub trait ConfirmPrompt {
    /// Blocks until an answer is read. `true` means quit.
    fn confirm(&mut self) -> Result<bool>;
}

/// Reads one answer line per question from a buffered input.
#[derive(Debug)]
pub struct LinePrompt<R> {
    input: R,
}

impl LinePrompt<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(std::io::stdin()))
    }
}

impl<R: BufRead> LinePrompt<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> ConfirmPrompt for LinePrompt<R> {
    fn confirm(&mut self) -> Result<bool> {
        let mut line = String::new();
        // End of input reads as "no".
        if self.input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        Ok(is_yes(&line))
    }
}

/// The first non-blank character decides: `y` quits, anything else does not.
pub fn is_yes(answer: &str) -> bool {
    answer.trim_start().starts_with('y')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  yes"));
        assert!(!is_yes("n\n"));
        assert!(!is_yes("Y"));
        assert!(!is_yes(""));
    }

    #[test]
    fn one_line_per_question() {
        let mut prompt = LinePrompt::new(Cursor::new("n\ny\n"));
        assert!(!prompt.confirm().unwrap());
        assert!(prompt.confirm().unwrap());
        assert!(!prompt.confirm().unwrap());
    }
}
