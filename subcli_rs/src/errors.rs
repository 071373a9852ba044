//! The error taxonomy shared by the classifier, the collaborator, and both
//! dispatchers.
//!
//! Everything that can go wrong during a run is one variant of [`Error`], so
//! dispatchers discriminate by pattern matching instead of downcasting.
//! Parse-phase failures are wrapped in `ParsingCommand` /
//! `ParsingGlobalArgs` / `ParsingSubCommand` and always halt before
//! execution; execution-phase failures are wrapped in `ExecutingCommand` /
//! `ExecutingSubCommand` and surfaced verbatim with no help rendering.
//!
//! `HelpRequested` travels the same channel as a parse error but is
//! distinguished by variant identity so dispatchers can omit the leading
//! error line when rendering.

use thiserror::Error;

use crate::parameter::{Parameter, format_parameter};

fn format_required(name: &str, many: &bool) -> String {
    format_parameter(&Parameter {
        name: name.to_string(),
        optional: false,
        many: *many,
    })
}

/// All failures reported by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A `-h` or `-help` flag was seen without being declared. Sentinel, not
    /// a failure in itself.
    #[error("help requested")]
    HelpRequested,

    /// A flag token named a flag that was never declared.
    #[error("flag provided but not defined: -{0}")]
    FlagNotDefined(String),

    /// A non-boolean flag was last in the stream with no value to consume.
    #[error("flag needs an argument: -{0}")]
    FlagNeedsArgument(String),

    /// A flag value failed to parse into the declared type.
    #[error("invalid value {value:?} for flag -{name}: {reason}")]
    InvalidFlagValue {
        name: String,
        value: String,
        reason: String,
    },

    /// A token looked like a flag but had a malformed name (e.g. `---x`).
    #[error("bad flag syntax: {0}")]
    BadFlagSyntax(String),

    /// Ordering violation under `FlagsFirst` or `ParametersFirst`, naming
    /// the offending tokens.
    #[error("flags present after parameters: {}", .0.join(", "))]
    FlagsAfterParameters(Vec<String>),

    /// A required positional parameter was not supplied.
    #[error("required parameter {} not set", format_required(.name, .many))]
    RequiredParameterNotSet { name: String, many: bool },

    /// More positional parameters were supplied than the contract accepts.
    #[error("too many parameters supplied")]
    TooManyParameters,

    /// Generic parameter-contract rejection.
    #[error("invalid parameters")]
    InvalidParameters,

    /// No subcommand name remained after global flag parsing.
    #[error("sub_command not supplied")]
    UnsuppliedSubCommand,

    /// The selector token resolved to no registered name or alias.
    #[error("unknown sub_command {0:?}")]
    UnknownSubCommand(String),

    /// Classification or parameter setting failed for a single command.
    #[error(transparent)]
    ParsingCommand(Box<Error>),

    /// A single command's execution callback failed.
    #[error("{0}")]
    ExecutingCommand(anyhow::Error),

    /// Global flag classification failed before a subcommand was resolved.
    #[error(transparent)]
    ParsingGlobalArgs(Box<Error>),

    /// Classification or parameter setting failed for a resolved subcommand.
    #[error(transparent)]
    ParsingSubCommand(Box<Error>),

    /// A subcommand's execution callback failed.
    #[error("{0}")]
    ExecutingSubCommand(anyhow::Error),
}

impl Error {
    /// Whether this error is, or wraps, the help-requested sentinel.
    pub fn is_help_requested(&self) -> bool {
        match self {
            Error::HelpRequested => true,
            Error::ParsingCommand(inner)
            | Error::ParsingGlobalArgs(inner)
            | Error::ParsingSubCommand(inner) => inner.is_help_requested(),
            _ => false,
        }
    }

    /// Whether this error came from an execution callback rather than from
    /// parsing. Execution errors are surfaced verbatim, without help output.
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Error::ExecutingCommand(_) | Error::ExecutingSubCommand(_))
    }

    /// The exit code carried by an [`ExitStatusError`] inside an execution
    /// failure, if any. The library never acts on it; callers map it to a
    /// process exit status.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            Error::ExecutingCommand(source) | Error::ExecutingSubCommand(source) => {
                source.downcast_ref::<ExitStatusError>().map(|e| e.code)
            }
            _ => None,
        }
    }
}

/// Pairs a numeric exit code with the error that produced it.
///
/// Execution callbacks return this (via `anyhow`) when they want the calling
/// program to exit with a specific status:
///
/// ```
/// use subcli::ExitStatusError;
///
/// let err = ExitStatusError::new(3, anyhow::anyhow!("boom"));
/// assert_eq!(err.code, 3);
/// ```
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ExitStatusError {
    /// Desired process exit status.
    pub code: i32,

    /// The wrapped failure.
    pub error: anyhow::Error,
}

impl ExitStatusError {
    pub fn new(code: i32, error: impl Into<anyhow::Error>) -> Self {
        Self { code, error: error.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_parameter_not_set_message() {
        let err = Error::RequiredParameterNotSet { name: "name".into(), many: false };
        assert_eq!(err.to_string(), "required parameter <NAME> not set");

        let err = Error::RequiredParameterNotSet { name: "files".into(), many: true };
        assert_eq!(err.to_string(), "required parameter <FILES...> not set");
    }

    #[test]
    fn test_flags_after_parameters_message() {
        let err = Error::FlagsAfterParameters(vec!["-a".into(), "-b".into()]);
        assert_eq!(err.to_string(), "flags present after parameters: -a, -b");
    }

    #[test]
    fn test_unknown_sub_command_message() {
        let err = Error::UnknownSubCommand("foo".into());
        assert_eq!(err.to_string(), "unknown sub_command \"foo\"");
    }

    #[test]
    fn test_wrappers_are_transparent() {
        let inner = Error::FlagNotDefined("value".into());
        let wrapped = Error::ParsingCommand(Box::new(inner));
        assert_eq!(wrapped.to_string(), "flag provided but not defined: -value");
    }

    #[test]
    fn test_is_help_requested_through_wrappers() {
        let err = Error::ParsingSubCommand(Box::new(Error::HelpRequested));
        assert!(err.is_help_requested());
        assert!(!err.is_execution_error());

        let err = Error::ParsingSubCommand(Box::new(Error::TooManyParameters));
        assert!(!err.is_help_requested());
    }

    #[test]
    fn test_is_execution_error() {
        let err = Error::ExecutingSubCommand(anyhow::anyhow!("boom"));
        assert!(err.is_execution_error());
        assert!(!Error::TooManyParameters.is_execution_error());
    }

    #[test]
    fn test_exit_status_extraction() {
        let err = Error::ExecutingSubCommand(ExitStatusError::new(3, anyhow::anyhow!("boom")).into());
        assert_eq!(err.exit_status(), Some(3));
        assert_eq!(err.to_string(), "boom");

        let err = Error::ExecutingSubCommand(anyhow::anyhow!("plain"));
        assert_eq!(err.exit_status(), None);
    }
}
