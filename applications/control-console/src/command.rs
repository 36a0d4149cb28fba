//! Console command parsing

use crate::error::{ConsoleError, Result};
use std::time::Duration;

/// One line of console input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(usize),
    Next,
    Previous,
    Pause,
    Resume,
    Seek(Duration),
    Mode(i32),
    List,
    Current,
    Status,
    Progress,
    Complete,
    Quit,
}

impl Command {
    /// Parse a console line
    ///
    /// Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(ConsoleError::InvalidArgument {
                command: "input",
                reason: format!("unexpected `{}`", extra),
            });
        }

        let command = match name.to_ascii_lowercase().as_str() {
            "play" => Command::Play(required(arg, "play")?),
            "next" => Command::Next,
            "prev" | "previous" => Command::Previous,
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "seek" => Command::Seek(Duration::from_millis(required(arg, "seek")?)),
            "mode" => Command::Mode(required(arg, "mode")?),
            "list" => Command::List,
            "current" => Command::Current,
            "status" => Command::Status,
            "progress" => Command::Progress,
            "complete" => Command::Complete,
            "quit" | "exit" => Command::Quit,
            other => return Err(ConsoleError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn required<T>(arg: Option<&str>, command: &'static str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let arg = arg.ok_or_else(|| ConsoleError::InvalidArgument {
        command,
        reason: "missing argument".to_string(),
    })?;

    arg.parse().map_err(|e: T::Err| ConsoleError::InvalidArgument {
        command,
        reason: format!("`{}`: {}", arg, e),
    })
}
