//! Argument-vector commands for programs that embed the migrator.
//!
//! ```text
//! init | up [version] | down | reset | version | set_version <version>
//! ```

use std::fmt;

use crate::error::UsageError;
use tm_core::Version;

/// A controller operation requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create the history table and record the baseline
    Init,
    /// Apply pending migrations up to the target, or all of them
    Up(Option<Version>),
    /// Revert the latest migration
    Down,
    /// Revert every applied migration down to the baseline
    Reset,
    /// Report the current version
    Version,
    /// Rewrite the history to the target without running procedures
    SetVersion(Version),
}

impl Command {
    /// Parse `args` (without the program name).
    ///
    /// Arguments after the command and its version are ignored.
    pub fn parse<I, A>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let mut args = args.into_iter();
        let command = args.next().ok_or(UsageError::CommandRequired)?;
        let version_arg = args.next();
        let version_arg: Option<&str> = version_arg.as_ref().map(|s| s.as_ref());

        match command.as_ref() {
            "init" => Ok(Command::Init),
            "up" => Ok(Command::Up(parse_version(version_arg)?)),
            "down" => Ok(Command::Down),
            "reset" => Ok(Command::Reset),
            "version" => Ok(Command::Version),
            "set_version" => parse_version(version_arg)?
                .map(Command::SetVersion)
                .ok_or(UsageError::VersionRequired),
            other => Err(UsageError::UnexpectedCommand(other.to_string())),
        }
    }

    /// Command name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init => "init",
            Command::Up(_) => "up",
            Command::Down => "down",
            Command::Reset => "reset",
            Command::Version => "version",
            Command::SetVersion(_) => "set_version",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Up(Some(v)) | Command::SetVersion(v) => write!(f, "{} {}", self.name(), v),
            _ => f.write_str(self.name()),
        }
    }
}

fn parse_version(arg: Option<&str>) -> Result<Option<Version>, UsageError> {
    arg.map(|s| {
        s.parse::<Version>()
            .map_err(|_| UsageError::InvalidVersion(s.to_string()))
    })
    .transpose()
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
