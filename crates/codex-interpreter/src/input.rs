//! Input providers for `XIN`.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal};

/// Supplies one line of text per `XIN` statement.
///
/// `Ok(None)` means the input is exhausted. Sources never print; the
/// interpreter writes the prompt to its own output sink when
/// [`wants_prompt`](InputSource::wants_prompt) says a person is typing.
pub trait InputSource {
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn wants_prompt(&self) -> bool {
        false
    }
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }

    fn wants_prompt(&self) -> bool {
        (**self).wants_prompt()
    }
}

/// Reads lines from standard input. Asks for a prompt only when stdin is a
/// terminal.
pub struct StdinInput {
    prompt: bool,
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl StdinInput {
    pub fn new() -> Self {
        Self {
            prompt: io::stdin().is_terminal(),
        }
    }
}

impl InputSource for StdinInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        // Remove trailing newline
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn wants_prompt(&self) -> bool {
        self.prompt
    }
}

/// A fixed queue of input lines, for tests and `--input` files.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
