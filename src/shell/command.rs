/*!
 * Shell Commands
 * Parsing of one input line into a command
 */

use crate::core::types::{Pid, Size};
use std::str::FromStr;
use thiserror::Error;

/// Command parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}', try 'help'")]
    UnknownCommand(String),

    #[error("'{command}' is missing its {argument} argument")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{command}' takes {expected} argument(s)")]
    TooManyArguments {
        command: &'static str,
        expected: usize,
    },

    #[error("Invalid {argument} '{value}': expected a positive integer")]
    InvalidNumber {
        argument: &'static str,
        value: String,
    },
}

/// A shell command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Alloc { pid: Pid, size: Size },
    Free { pid: Pid },
    FreeAll { pid: Pid },
    Stats,
    Show,
    List,
    Json,
    Reset,
    Help,
    Quit,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Alloc { .. } => "alloc",
            Command::Free { .. } => "free",
            Command::FreeAll { .. } => "free-all",
            Command::Stats => "stats",
            Command::Show => "show",
            Command::List => "list",
            Command::Json => "json",
            Command::Reset => "reset",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

pub const HELP: &str = "\
commands:
  alloc <pid> <size>   place <size> units for <pid>
  free <pid>           release the first block held by <pid>
  free-all <pid>       release every block held by <pid>
  stats                usage summary
  show                 print the block tree
  list                 list allocated blocks
  json                 dump the block tree as JSON
  reset                drop every allocation
  help                 this text
  quit                 exit";

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(ParseError::Empty)?;
        let args: Vec<&str> = words.collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "alloc" | "allocate" => {
                expect_args("alloc", &args, 2)?;
                Command::Alloc {
                    pid: positive(&args, 0, "alloc", "pid")?,
                    size: positive(&args, 1, "alloc", "size")?,
                }
            }
            "free" | "release" => {
                expect_args("free", &args, 1)?;
                Command::Free {
                    pid: positive(&args, 0, "free", "pid")?,
                }
            }
            "free-all" => {
                expect_args("free-all", &args, 1)?;
                Command::FreeAll {
                    pid: positive(&args, 0, "free-all", "pid")?,
                }
            }
            other => {
                let command = match other {
                    "stats" => Command::Stats,
                    "show" | "tree" => Command::Show,
                    "list" | "ls" => Command::List,
                    "json" => Command::Json,
                    "reset" => Command::Reset,
                    "help" | "?" => Command::Help,
                    "quit" | "exit" => Command::Quit,
                    _ => return Err(ParseError::UnknownCommand(head.to_string())),
                };
                expect_args(command.name(), &args, 0)?;
                command
            }
        };
        Ok(command)
    }
}

fn expect_args(command: &'static str, args: &[&str], expected: usize) -> Result<(), ParseError> {
    if args.len() > expected {
        return Err(ParseError::TooManyArguments { command, expected });
    }
    Ok(())
}

fn positive<T>(
    args: &[&str],
    index: usize,
    command: &'static str,
    argument: &'static str,
) -> Result<T, ParseError>
where
    T: FromStr + Default + PartialOrd,
{
    let raw = args
        .get(index)
        .ok_or(ParseError::MissingArgument { command, argument })?;
    match raw.parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ParseError::InvalidNumber {
            argument,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alloc() {
        assert_eq!(
            "alloc 3 100".parse::<Command>(),
            Ok(Command::Alloc { pid: 3, size: 100 })
        );
        assert_eq!(
            "  ALLOCATE   1 64 ".parse::<Command>(),
            Ok(Command::Alloc { pid: 1, size: 64 })
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("free 9".parse::<Command>(), Ok(Command::Free { pid: 9 }));
        assert_eq!("free-all 9".parse::<Command>(), Ok(Command::FreeAll { pid: 9 }));
        assert_eq!("tree".parse::<Command>(), Ok(Command::Show));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!(
            "grow 1".parse::<Command>(),
            Err(ParseError::UnknownCommand("grow".into()))
        );
        assert_eq!(
            "alloc 1".parse::<Command>(),
            Err(ParseError::MissingArgument {
                command: "alloc",
                argument: "size"
            })
        );
        assert_eq!(
            "stats now".parse::<Command>(),
            Err(ParseError::TooManyArguments {
                command: "stats",
                expected: 0
            })
        );
    }

    #[test]
    fn test_non_positive_values_rejected() {
        assert_eq!(
            "alloc 0 64".parse::<Command>(),
            Err(ParseError::InvalidNumber {
                argument: "pid",
                value: "0".into()
            })
        );
        assert_eq!(
            "alloc 1 -5".parse::<Command>(),
            Err(ParseError::InvalidNumber {
                argument: "size",
                value: "-5".into()
            })
        );
    }
}
