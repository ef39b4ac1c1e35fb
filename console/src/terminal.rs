//! Line-oriented user I/O.

use std::io::{self, BufRead, Write};

/// Where the controller reads answers and writes messages.
pub trait Terminal {
    /// Show `prompt` and read one line without its terminator.
    /// `Ok(None)` means the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Terminal over any buffered reader and writer; `StdTerminal::stdio()`
/// is the interactive one.
pub struct StdTerminal<R, W> {
    input: R,
    output: W,
}

impl StdTerminal<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdTerminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Terminal for StdTerminal<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lines_and_reports_eof() {
        let mut term = StdTerminal::new("first\r\nsecond\n".as_bytes(), Vec::new());
        assert_eq!(term.read_line("> ").unwrap().as_deref(), Some("first"));
        assert_eq!(term.read_line("> ").unwrap().as_deref(), Some("second"));
        assert_eq!(term.read_line("> ").unwrap(), None);
        term.write_line("done").unwrap();
        assert_eq!(String::from_utf8(term.into_output()).unwrap(), "> > > done\n");
    }
}
