//! The token classifier: interleaves flag parsing with positional parameter
//! capture.
//!
//! A [`FlagSet`] on its own only accepts flags at the front of a stream and
//! stops permanently at the first non-flag token. The classifier drives it
//! repeatedly so flags and parameters may be freely interleaved, while the
//! literal `--` terminator escapes everything after it verbatim:
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use subcli::{FlagSet, parse_arguments_interspersed};
//!
//! let count = Rc::new(Cell::new(0));
//! let mut flags = FlagSet::new("demo");
//! flags.int_var(&count, "count", 0, "how many");
//!
//! let args: Vec<String> = ["one", "-count", "22", "two"].map(String::from).into();
//! let params = parse_arguments_interspersed(&flags, &args).unwrap();
//! assert_eq!(params, ["one", "two"]);
//! assert_eq!(count.get(), 22);
//! ```

use crate::errors::Error;
use crate::flagset::FlagSet;

/// The literal terminator. Once it is the next unconsumed token, every
/// remaining token is a verbatim parameter.
pub const TERMINATOR: &str = "--";

/// Ordering discipline for flags versus positional parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParameterFlagMode {
    /// Flags and parameters may be mixed in any order.
    #[default]
    Interspersed,

    /// All flags must come before the first parameter.
    FlagsFirst,

    /// All parameters must come before the first flag.
    ParametersFirst,
}

/// Classify `args` against `flags` under `mode`, returning the captured
/// parameters in order.
pub fn parse_arguments(
    flags: &FlagSet,
    args: &[String],
    mode: ParameterFlagMode,
) -> Result<Vec<String>, Error> {
    match mode {
        ParameterFlagMode::Interspersed => parse_arguments_interspersed(flags, args),
        ParameterFlagMode::FlagsFirst => parse_arguments_flags_first(flags, args),
        ParameterFlagMode::ParametersFirst => parse_arguments_parameters_first(flags, args),
    }
}

/// Classify with [`ParameterFlagMode::Interspersed`], the default mode.
///
/// Repeatedly lets `flags` consume a maximal flag prefix; when it stops on
/// the terminator the rest is captured verbatim, otherwise exactly one token
/// is captured as a parameter and the loop continues. Help-requested and any
/// other flag error propagate immediately.
pub fn parse_arguments_interspersed(flags: &FlagSet, args: &[String]) -> Result<Vec<String>, Error> {
    let mut params = Vec::new();
    let mut args = args.to_vec();
    while !args.is_empty() {
        args = flags.parse(&args)?;
        if at_terminator(&args) {
            params.extend(args.drain(..).skip(1));
            return Ok(params);
        }
        if !args.is_empty() {
            params.push(args.remove(0));
        }
    }
    Ok(params)
}

/// Classify with [`ParameterFlagMode::FlagsFirst`].
///
/// A single flag-prefix parse, then everything is parameter territory: any
/// pre-terminator flag-shaped token left over is an ordering violation.
/// Tokens behind the terminator stay verbatim parameters and never offend.
fn parse_arguments_flags_first(flags: &FlagSet, args: &[String]) -> Result<Vec<String>, Error> {
    let remaining = flags.parse(args)?;
    let mut params = Vec::new();
    let mut offenders = Vec::new();
    let mut escaped = false;
    for token in remaining {
        if escaped {
            params.push(token);
        } else if token == TERMINATOR {
            escaped = true;
        } else if is_flag_shaped(&token) {
            offenders.push(token);
        } else {
            params.push(token);
        }
    }
    if !offenders.is_empty() {
        tracing::debug!(offenders = ?offenders, "flags found after parameters");
        return Err(Error::FlagsAfterParameters(offenders));
    }
    Ok(params)
}

/// Classify with [`ParameterFlagMode::ParametersFirst`].
///
/// Leading non-flag tokens are captured; from the first flag-shaped token on,
/// interspersed parsing resumes but every token it would capture is an
/// ordering violation instead.
fn parse_arguments_parameters_first(
    flags: &FlagSet,
    args: &[String],
) -> Result<Vec<String>, Error> {
    let mut params = Vec::new();
    let mut args = args.to_vec();

    while let Some(token) = args.first() {
        if token == TERMINATOR {
            params.extend(args.drain(..).skip(1));
            return Ok(params);
        }
        if is_flag_shaped(token) {
            break;
        }
        params.push(args.remove(0));
    }

    let mut offenders = Vec::new();
    while !args.is_empty() {
        args = flags.parse(&args)?;
        if at_terminator(&args) {
            offenders.extend(args.drain(..).skip(1));
            break;
        }
        if !args.is_empty() {
            offenders.push(args.remove(0));
        }
    }
    if !offenders.is_empty() {
        tracing::debug!(offenders = ?offenders, "parameters found after flags");
        return Err(Error::FlagsAfterParameters(offenders));
    }
    Ok(params)
}

/// Whether the next unconsumed token is the literal terminator.
fn at_terminator(args: &[String]) -> bool {
    args.first().map(String::as_str) == Some(TERMINATOR)
}

fn is_flag_shaped(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && token != TERMINATOR
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn int_flags(names: &[&str]) -> (FlagSet, Vec<Rc<Cell<i64>>>) {
        let mut f = FlagSet::new("test");
        let mut dests = Vec::new();
        for name in names {
            let dest = Rc::new(Cell::new(0));
            f.int_var(&dest, name, 0, "");
            dests.push(dest);
        }
        (f, dests)
    }

    #[test]
    fn test_interspersed_empty() {
        let (f, _) = int_flags(&[]);
        assert!(parse_arguments_interspersed(&f, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_interspersed_single_empty_token_is_parameter() {
        let (f, _) = int_flags(&[]);
        let params = parse_arguments_interspersed(&f, &strings(&[""])).unwrap();
        assert_eq!(params, strings(&[""]));
    }

    #[test]
    fn test_interspersed_help() {
        let (f, _) = int_flags(&[]);
        let err = parse_arguments_interspersed(&f, &strings(&["-h"])).unwrap_err();
        assert!(matches!(err, Error::HelpRequested));
    }

    #[test]
    fn test_interspersed_mixed_order() {
        let (f, dests) = int_flags(&["a", "b"]);
        let params =
            parse_arguments_interspersed(&f, &strings(&["-a", "10", "hello", "-b", "2", "world"]))
                .unwrap();
        assert_eq!(params, strings(&["hello", "world"]));
        assert_eq!(dests[0].get(), 10);
        assert_eq!(dests[1].get(), 2);
    }

    #[test]
    fn test_interspersed_parameters_before_flags() {
        let (f, dests) = int_flags(&["a"]);
        let params =
            parse_arguments_interspersed(&f, &strings(&["hello", "world", "-a", "10"])).unwrap();
        assert_eq!(params, strings(&["hello", "world"]));
        assert_eq!(dests[0].get(), 10);
    }

    #[test]
    fn test_interspersed_lone_terminator() {
        let (f, _) = int_flags(&[]);
        let params = parse_arguments_interspersed(&f, &strings(&["--"])).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_interspersed_terminator_escapes_declared_flags() {
        let (f, dests) = int_flags(&["a"]);
        let params =
            parse_arguments_interspersed(&f, &strings(&["--", "-a", "10", "x"])).unwrap();
        assert_eq!(params, strings(&["-a", "10", "x"]));
        assert_eq!(dests[0].get(), 0);
    }

    #[test]
    fn test_interspersed_terminator_mid_stream() {
        let (f, dests) = int_flags(&["a", "b"]);
        let params =
            parse_arguments_interspersed(&f, &strings(&["-a", "10", "--", "-b", "hello"])).unwrap();
        assert_eq!(params, strings(&["-b", "hello"]));
        assert_eq!(dests[0].get(), 10);
        assert_eq!(dests[1].get(), 0);
    }

    #[test]
    fn test_interspersed_terminator_as_flag_value_is_not_special() {
        let name = Rc::new(std::cell::RefCell::new(String::new()));
        let mut f = FlagSet::new("test");
        f.string_var(&name, "name", "", "");
        let err =
            parse_arguments_interspersed(&f, &strings(&["-name", "--", "x", "-other"])).unwrap_err();
        // "--" was consumed as -name's value, so "-other" is parsed as a flag.
        assert!(matches!(err, Error::FlagNotDefined(n) if n == "other"));
        assert_eq!(*name.borrow(), "--");
    }

    #[test]
    fn test_interspersed_preserves_order_of_non_flags() {
        let (f, _) = int_flags(&["a"]);
        let params =
            parse_arguments_interspersed(&f, &strings(&["one", "-a", "1", "two", "three"])).unwrap();
        assert_eq!(params, strings(&["one", "two", "three"]));
    }

    #[test]
    fn test_interspersed_propagates_flag_errors() {
        let (f, _) = int_flags(&["a"]);
        let err = parse_arguments_interspersed(&f, &strings(&["x", "-a"])).unwrap_err();
        assert!(matches!(err, Error::FlagNeedsArgument(n) if n == "a"));
    }

    #[test]
    fn test_flags_first_accepts_flags_then_parameters() {
        let (f, dests) = int_flags(&["a"]);
        let params = parse_arguments(
            &f,
            &strings(&["-a", "1", "x", "y"]),
            ParameterFlagMode::FlagsFirst,
        )
        .unwrap();
        assert_eq!(params, strings(&["x", "y"]));
        assert_eq!(dests[0].get(), 1);
    }

    #[test]
    fn test_flags_first_rejects_trailing_flags() {
        let (f, _) = int_flags(&["a", "b"]);
        let err = parse_arguments(
            &f,
            &strings(&["-a", "1", "x", "-b"]),
            ParameterFlagMode::FlagsFirst,
        )
        .unwrap_err();
        match err {
            Error::FlagsAfterParameters(tokens) => assert_eq!(tokens, strings(&["-b"])),
            other => panic!("expected FlagsAfterParameters, got {other:?}"),
        }
    }

    #[test]
    fn test_flags_first_terminator_escapes_tail() {
        let (f, dests) = int_flags(&["a", "b"]);
        let params = parse_arguments(
            &f,
            &strings(&["-a", "1", "--", "-b", "2"]),
            ParameterFlagMode::FlagsFirst,
        )
        .unwrap();
        assert_eq!(params, strings(&["-b", "2"]));
        assert_eq!(dests[0].get(), 1);
        assert_eq!(dests[1].get(), 0);
    }

    #[test]
    fn test_flags_first_terminator_after_parameters_escapes_tail() {
        let (f, _) = int_flags(&["b"]);
        let params = parse_arguments(
            &f,
            &strings(&["x", "--", "-b", "2"]),
            ParameterFlagMode::FlagsFirst,
        )
        .unwrap();
        assert_eq!(params, strings(&["x", "-b", "2"]));
    }

    #[test]
    fn test_parameters_first_accepts_parameters_then_flags() {
        let (f, dests) = int_flags(&["a", "b"]);
        let params = parse_arguments(
            &f,
            &strings(&["x", "y", "-a", "1", "-b", "2"]),
            ParameterFlagMode::ParametersFirst,
        )
        .unwrap();
        assert_eq!(params, strings(&["x", "y"]));
        assert_eq!(dests[0].get(), 1);
        assert_eq!(dests[1].get(), 2);
    }

    #[test]
    fn test_parameters_first_rejects_parameter_after_flags() {
        let (f, _) = int_flags(&["a"]);
        let err = parse_arguments(
            &f,
            &strings(&["x", "-a", "1", "y"]),
            ParameterFlagMode::ParametersFirst,
        )
        .unwrap_err();
        match err {
            Error::FlagsAfterParameters(tokens) => assert_eq!(tokens, strings(&["y"])),
            other => panic!("expected FlagsAfterParameters, got {other:?}"),
        }
    }

    #[test]
    fn test_parameters_first_leading_terminator_escapes_everything() {
        let (f, dests) = int_flags(&["a"]);
        let params = parse_arguments(
            &f,
            &strings(&["x", "--", "-a", "1"]),
            ParameterFlagMode::ParametersFirst,
        )
        .unwrap();
        assert_eq!(params, strings(&["x", "-a", "1"]));
        assert_eq!(dests[0].get(), 0);
    }

    #[test]
    fn test_parameters_first_help_propagates() {
        let (f, _) = int_flags(&[]);
        let err = parse_arguments(&f, &strings(&["x", "-h"]), ParameterFlagMode::ParametersFirst)
            .unwrap_err();
        assert!(matches!(err, Error::HelpRequested));
    }

    #[test]
    fn test_mode_default_is_interspersed() {
        assert_eq!(ParameterFlagMode::default(), ParameterFlagMode::Interspersed);
    }
}
