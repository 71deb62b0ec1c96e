use std::fmt;
use std::path::PathBuf;

use course_core::model::WeekId;
use services::{DeckKind, GroupSizing};

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingCommand,
    UnknownCommand(String),
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    ConflictingFlags { first: &'static str, second: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDeck { raw: String },
    NoNames,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingCommand => write!(f, "no command given"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::ConflictingFlags { first, second } => {
                write!(f, "{first} and {second} cannot be combined")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidDeck { raw } => {
                write!(f, "invalid --deck value: {raw} (expected core or concepts)")
            }
            ArgsError::NoNames => write!(f, "groups needs at least one name"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Dashboard,
    Schedule { week: Option<WeekId> },
    Concepts { dimension: Option<String> },
    Flashcards { deck: DeckKind },
    Quiz,
    Live { week: Option<WeekId> },
    Tutor,
    Outline { country: String, interest: String },
    Groups { sizing: GroupSizing, names: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// Content document overriding the bundled one.
    pub content: Option<PathBuf>,
    pub command: Command,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app dashboard");
    eprintln!("  app schedule   [--week <n>]");
    eprintln!("  app concepts   [--dimension <id>]");
    eprintln!("  app flashcards [--deck core|concepts]");
    eprintln!("  app quiz");
    eprintln!("  app live       [--week <n>]");
    eprintln!("  app tutor");
    eprintln!("  app outline    --country <name> --interest <text>");
    eprintln!("  app groups     (--size <n> | --count <n>) <name>...");
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  --content <path>   course content JSON (default: bundled)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSE_CONTENT, COURSE_AI_API_KEY, COURSE_AI_BASE_URL, COURSE_AI_MODEL,");
    eprintln!("  COURSE_GET_READY_SECS, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(raw: String, flag: &'static str) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

impl Args {
    /// Parse everything after the program name.
    ///
    /// `default_content` seeds `--content`, normally from `COURSE_CONTENT`.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        default_content: Option<PathBuf>,
    ) -> Result<Self, ArgsError> {
        let mut args = argv.into_iter();
        let mut content = default_content;
        let mut name = None;
        let mut rest = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--content" => content = Some(PathBuf::from(require_value(&mut args, "--content")?)),
                "--help" | "-h" if name.is_none() => name = Some("help".to_string()),
                _ if name.is_none() && !arg.starts_with("--") => name = Some(arg),
                _ => rest.push(arg),
            }
        }

        let name = name.ok_or(ArgsError::MissingCommand)?;
        let mut rest = rest.into_iter();
        let command = match name.as_str() {
            "help" => Command::Help,
            "dashboard" => {
                no_more(&mut rest)?;
                Command::Dashboard
            }
            "schedule" => Command::Schedule {
                week: optional_week(&mut rest)?,
            },
            "concepts" => {
                let mut dimension = None;
                while let Some(arg) = rest.next() {
                    match arg.as_str() {
                        "--dimension" => dimension = Some(require_value(&mut rest, "--dimension")?),
                        _ => return Err(ArgsError::UnknownArg(arg)),
                    }
                }
                Command::Concepts { dimension }
            }
            "flashcards" => {
                let mut deck = DeckKind::CoreDimensions;
                while let Some(arg) = rest.next() {
                    match arg.as_str() {
                        "--deck" => {
                            let raw = require_value(&mut rest, "--deck")?;
                            deck = raw.parse().map_err(|_| ArgsError::InvalidDeck { raw })?;
                        }
                        _ => return Err(ArgsError::UnknownArg(arg)),
                    }
                }
                Command::Flashcards { deck }
            }
            "quiz" => {
                no_more(&mut rest)?;
                Command::Quiz
            }
            "live" => Command::Live {
                week: optional_week(&mut rest)?,
            },
            "tutor" => {
                no_more(&mut rest)?;
                Command::Tutor
            }
            "outline" => parse_outline(&mut rest)?,
            "groups" => parse_groups(&mut rest)?,
            _ => return Err(ArgsError::UnknownCommand(name)),
        };

        Ok(Self { content, command })
    }
}

fn no_more(args: &mut impl Iterator<Item = String>) -> Result<(), ArgsError> {
    match args.next() {
        Some(arg) => Err(ArgsError::UnknownArg(arg)),
        None => Ok(()),
    }
}

fn optional_week(args: &mut impl Iterator<Item = String>) -> Result<Option<WeekId>, ArgsError> {
    let mut week = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--week" => {
                let raw = require_value(args, "--week")?;
                week = Some(WeekId::new(parse_number(raw, "--week")?));
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(week)
}

fn parse_outline(args: &mut impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let mut country = None;
    let mut interest = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--country" => country = Some(require_value(args, "--country")?),
            "--interest" => interest = Some(require_value(args, "--interest")?),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(Command::Outline {
        country: country.ok_or(ArgsError::MissingFlag { flag: "--country" })?,
        interest: interest.ok_or(ArgsError::MissingFlag { flag: "--interest" })?,
    })
}

fn parse_groups(args: &mut impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let mut sizing = None;
    let mut names = Vec::new();
    while let Some(arg) = args.next() {
        let next = match arg.as_str() {
            "--size" => {
                let raw = require_value(args, "--size")?;
                GroupSizing::BySize(parse_number(raw, "--size")?)
            }
            "--count" => {
                let raw = require_value(args, "--count")?;
                GroupSizing::ByCount(parse_number(raw, "--count")?)
            }
            _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
            _ => {
                names.push(arg);
                continue;
            }
        };
        if sizing.is_some() {
            return Err(ArgsError::ConflictingFlags {
                first: "--size",
                second: "--count",
            });
        }
        sizing = Some(next);
    }
    if names.is_empty() {
        return Err(ArgsError::NoNames);
    }
    Ok(Command::Groups {
        sizing: sizing.ok_or(ArgsError::MissingFlag {
            flag: "--size or --count",
        })?,
        names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(|s| (*s).to_string()), None)
    }

    #[test]
    fn content_flag_is_global() {
        let args = parse(&["--content", "course.json", "schedule", "--week", "4"]).unwrap();
        assert_eq!(args.content, Some(PathBuf::from("course.json")));
        assert_eq!(
            args.command,
            Command::Schedule {
                week: Some(WeekId::new(4))
            }
        );

        let args = parse(&["live", "--content", "other.json"]).unwrap();
        assert_eq!(args.content, Some(PathBuf::from("other.json")));
        assert_eq!(args.command, Command::Live { week: None });
    }

    #[test]
    fn groups_need_one_sizing_and_names() {
        let args = parse(&["groups", "--size", "2", "Ana", "Ben", "Cy"]).unwrap();
        assert_eq!(
            args.command,
            Command::Groups {
                sizing: GroupSizing::BySize(2),
                names: vec!["Ana".into(), "Ben".into(), "Cy".into()],
            }
        );
        assert!(matches!(
            parse(&["groups", "--size", "2", "--count", "3", "Ana"]),
            Err(ArgsError::ConflictingFlags { .. })
        ));
        assert_eq!(parse(&["groups", "--count", "2"]), Err(ArgsError::NoNames));
        assert!(matches!(
            parse(&["groups", "Ana"]),
            Err(ArgsError::MissingFlag { .. })
        ));
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(parse(&[]), Err(ArgsError::MissingCommand));
        assert_eq!(
            parse(&["lecture"]),
            Err(ArgsError::UnknownCommand("lecture".into()))
        );
        assert_eq!(
            parse(&["flashcards", "--deck", "history"]),
            Err(ArgsError::InvalidDeck {
                raw: "history".into()
            })
        );
        assert_eq!(
            parse(&["schedule", "--week", "three"]),
            Err(ArgsError::InvalidNumber {
                flag: "--week",
                raw: "three".into()
            })
        );
        assert_eq!(
            parse(&["outline", "--country", "Japan"]),
            Err(ArgsError::MissingFlag { flag: "--interest" })
        );
        assert_eq!(parse(&["-h"]).unwrap().command, Command::Help);
    }
}
