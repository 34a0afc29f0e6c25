//! Console interaction (line prompts, confirmations).

use anyhow::{Result, bail};
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Line-oriented console over any input and output stream.
///
/// Every prompt of the installer goes through this type, so tests feed it a
/// scripted `Cursor` and inspect what was written.
pub struct Console<I, O> {
    input: I,
    output: O,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console wired to the process stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<I: BufRead, O: Write> Console<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Write one line of output.
    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Write `prompt` (without newline) and read one line of input,
    /// with the line terminator stripped.
    ///
    /// Reaching end of input is an error: a prompt can never be answered.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("Unexpected end of input while waiting for an answer");
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask a yes/no question. Returns true if the answer is y/yes.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let response = self.ask(&format!("{} [y/N] ", prompt))?;
        let response = response.trim().to_lowercase();
        Ok(response == "y" || response == "yes")
    }

    pub fn into_output(self) -> O {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::Console;
    use anyhow::Result;
    use std::io::Cursor;

    #[test]
    fn confirms_yes_and_short_y() -> Result<()> {
        let cases = vec!["y\n", "Y\n", "yes\n", " YES \n", "  y  \r\n"];
        for case in cases {
            let mut console = Console::new(Cursor::new(case.as_bytes()), Vec::new());
            let ok = console.confirm("Proceed?")?;
            assert!(ok, "expected '{}' to be accepted as yes", case);
            let out = String::from_utf8(console.into_output())?;
            assert!(out.contains("Proceed? [y/N]"));
        }
        Ok(())
    }

    #[test]
    fn rejects_no_and_empty() -> Result<()> {
        let cases = vec!["n\n", "no\n", "\n", "  \n", "other\n"];
        for case in cases {
            let mut console = Console::new(Cursor::new(case.as_bytes()), Vec::new());
            assert!(!console.confirm("Continue?")?, "expected '{}' to be rejected", case);
        }
        Ok(())
    }

    #[test]
    fn ask_returns_lines_in_order() -> Result<()> {
        let mut console = Console::new(Cursor::new(b"0\r\n1,2\n\n"), Vec::new());
        assert_eq!(console.ask("a: ")?, "0");
        assert_eq!(console.ask("b: ")?, "1,2");
        assert_eq!(console.ask("c: ")?, "");

        let out = String::from_utf8(console.into_output())?;
        assert_eq!(out, "a: b: c: ");
        Ok(())
    }

    #[test]
    fn ask_fails_at_end_of_input() {
        let mut console = Console::new(Cursor::new(b""), Vec::new());
        let err = console.ask("choice: ").unwrap_err();
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn last_line_without_newline_is_read() -> Result<()> {
        let mut console = Console::new(Cursor::new(b"3"), Vec::new());
        assert_eq!(console.ask("> ")?, "3");
        Ok(())
    }
}
