//! Enumerated editor commands
//!
//! Replaces by-name method reflection with a closed command set. Names are
//! parsed from strings at the declarative boundary; typed call sites should
//! call the [`EditorContext`](crate::EditorContext) methods directly.

use std::str::FromStr;

use inlay_core::Error;

/// Operations that can be dispatched to an attached editor by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Trigger,
    Confirm,
    Cancel,
    ClearErrors,
    ShowErrors,
    Destroy,
}

impl Command {
    /// Parse a command name.
    ///
    /// Names with the reserved `_` prefix never parse; unknown names fail
    /// with [`Error::UnknownCommand`].
    pub fn parse(name: &str) -> Result<Self, Error> {
        if name.starts_with('_') {
            return Err(Error::ReservedCommand(name.to_string()));
        }
        match name {
            "trigger" => Ok(Self::Trigger),
            "confirm" => Ok(Self::Confirm),
            "cancel" => Ok(Self::Cancel),
            "clear_errors" => Ok(Self::ClearErrors),
            "show_errors" => Ok(Self::ShowErrors),
            "destroy" => Ok(Self::Destroy),
            _ => Err(Error::UnknownCommand(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::ClearErrors => "clear_errors",
            Self::ShowErrors => "show_errors",
            Self::Destroy => "destroy",
        }
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(Command::parse("trigger").unwrap(), Command::Trigger);
        assert_eq!(Command::parse("destroy").unwrap(), Command::Destroy);
        assert_eq!(Command::parse("clear_errors").unwrap(), Command::ClearErrors);
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert!(matches!(
            Command::parse("explode"),
            Err(Error::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_parse_rejects_reserved_prefix() {
        assert!(matches!(
            Command::parse("_private"),
            Err(Error::ReservedCommand(_))
        ));
    }

    #[test]
    fn test_round_trips_through_name() {
        for command in [
            Command::Trigger,
            Command::Confirm,
            Command::Cancel,
            Command::ClearErrors,
            Command::ShowErrors,
            Command::Destroy,
        ] {
            assert_eq!(Command::parse(command.name()).unwrap(), command);
        }
    }
}
