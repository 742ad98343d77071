use std::io::{Stdout, Write};
use termon_core::Result;

/// Clears the screen and resets the terminal.
const RESET: &str = "\x1bc";

/// Where rendered frames go.
pub trait RenderSink {
    /// Replace whatever is on screen with `lines`.
    fn present(&mut self, lines: &[String]) -> Result<()>;

    /// Print a one-off message below the current frame.
    fn notice(&mut self, message: &str) -> Result<()>;
}

/// Writes frames to a terminal (or anything else that implements `Write`).
#[derive(Debug)]
pub struct TerminalSink<W: Write> {
    out: W,
}

impl TerminalSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn present(&mut self, lines: &[String]) -> Result<()> {
        self.out.write_all(RESET.as_bytes())?;
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "\n{message}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_clears_then_writes_lines() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.present(&["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "\x1bca\nb\n");
    }

    #[test]
    fn notice_starts_on_a_fresh_line() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.notice("Continuing").unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "\nContinuing\n");
    }
}
