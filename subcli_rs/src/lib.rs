//! # subcli
//!
//! **Flag and subcommand dispatch** for command line programs that do one
//! thing, or several.
//!
//! Application authors declare flags, positional parameters, and an
//! execution callback; the library classifies the raw tokens, reports
//! structured errors, and renders consistent help and usage text.
//!
//! ## Features
//!
//! - **Interleaved arguments** - flags and positional parameters mix freely;
//!   the `--` terminator escapes the rest of the stream verbatim
//! - **Ordering modes** - interspersed (default), flags-first, or
//!   parameters-first, with violations reported by token
//! - **Subcommand dispatch** - name/alias registry, global flags, built-in
//!   `help` and `list` subcommands
//! - **Structured errors** - one closed error type; parse failures render
//!   help, execution failures surface verbatim
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::io::Write as _;
//! use subcli::{SubCommandStruct, SubCommander};
//!
//! let mut cli = SubCommander::new("demo");
//! cli.register(SubCommandStruct {
//!     name: "greet".into(),
//!     synopsis: "Prints a greeting".into(),
//!     execute: Some(Box::new(|_ctx, _stdin, out, _err| {
//!         writeln!(out, "hello")?;
//!         Ok(())
//!     })),
//!     ..Default::default()
//! });
//! cli.register_help("help", "", "", &["h"]);
//! cli.register_list("list", "", "", &["ls"]);
//!
//! let args: Vec<String> = std::env::args().skip(1).collect();
//! if let Err(err) = cli.execute(&args) {
//!     std::process::exit(err.exit_status().unwrap_or(1));
//! }
//! ```
//!
//! For programs without subcommands, pair a [`CommandStruct`] with a
//! [`Commander`] instead.

// ============================================================================
// Core Modules
// ============================================================================

/// Token classification: interleaving flag parsing with parameter capture.
pub mod argparse;

/// The single-command entity.
pub mod command;

/// Orchestrates one command: parse, set parameters, execute.
pub mod commander;

/// Opaque cancellation context for execution callbacks.
pub mod context;

/// The closed error taxonomy and the exit-status wrapper.
pub mod errors;

/// Typed flag declarations, prefix parsing, and defaults rendering.
pub mod flagset;

/// Positional parameter metadata and formatting.
pub mod parameter;

/// The subcommand entity.
pub mod subcommand;

/// Multi-command dispatch: registry, resolution, contextual help.
pub mod subcommander;

/// Help-output vocabulary and argument-group formatting.
pub mod usage;

#[cfg(test)]
pub(crate) mod testkit;

// ============================================================================
// Re-exports
// ============================================================================

pub use argparse::{
    ParameterFlagMode, TERMINATOR, parse_arguments, parse_arguments_interspersed,
};
pub use command::{Command, CommandStruct, ExecuteFn, FlagsFn, ParameterUsageFn, SetParametersFn};
pub use commander::Commander;
pub use context::Context;
pub use errors::{Error, ExitStatusError};
pub use flagset::{FlagSet, FlagSetter, FlagSetterFn};
pub use parameter::{
    Parameter, ParameterSetter, format_parameter, format_parameter_name, format_parameters,
};
pub use subcommand::{SubCommand, SubCommandStruct};
pub use subcommander::SubCommander;
