//! Where the shell's input comes from.
//!
//! On a terminal, command lines come from stdin and secrets are read
//! through a hidden `dialoguer` prompt. When stdin is a pipe, both are
//! read line by line from the same stream, which is what scripts and
//! tests use.

use std::io::{self, BufRead};

use zeroize::Zeroizing;

use crate::errors::{LockboxError, Result};

/// A source of command lines and hidden values.
pub trait Prompter {
    /// Read the next command line. `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Read a value that must not be echoed.
    fn read_hidden(&mut self, prompt: &str) -> Result<Zeroizing<String>>;
}

/// Interactive terminal input.
pub struct TerminalPrompter {
    stdin: io::Stdin,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.stdin.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_newline(line)))
    }

    fn read_hidden(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        let value = dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| LockboxError::CommandFailed(format!("input prompt: {e}")))?;
        Ok(Zeroizing::new(value))
    }
}

/// Line-oriented input from any reader (pipes, files, tests).
pub struct ScriptedPrompter<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ScriptedPrompter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Prompter for ScriptedPrompter<R> {
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_newline(line)))
    }

    fn read_hidden(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        let mut line = Zeroizing::new(String::new());
        if self.reader.read_line(&mut line)? == 0 {
            return Err(LockboxError::CommandFailed(format!(
                "input ended while waiting for: {prompt}"
            )));
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(line)
    }
}

fn trim_newline(mut line: String) -> String {
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_lines_and_hidden_values_share_the_stream() {
        let mut input = ScriptedPrompter::new("store bank\r\nsecret\nsecret\n".as_bytes());
        assert_eq!(input.read_line().unwrap().as_deref(), Some("store bank"));
        assert_eq!(input.read_hidden("content").unwrap().as_str(), "secret");
        assert_eq!(input.read_hidden("again").unwrap().as_str(), "secret");
        assert_eq!(input.read_line().unwrap(), None);
    }

    #[test]
    fn hidden_read_at_end_of_input_fails() {
        let mut input = ScriptedPrompter::new("".as_bytes());
        assert!(matches!(
            input.read_hidden("Once again"),
            Err(LockboxError::CommandFailed(_))
        ));
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let mut input = ScriptedPrompter::new("show bank".as_bytes());
        assert_eq!(input.read_line().unwrap().as_deref(), Some("show bank"));
    }
}
