//! The single-command entity: flag declarer + parameter contract +
//! execution callback.

use std::io::{Read, Write};

use crate::context::Context;
use crate::errors::Error;
use crate::flagset::FlagSet;
use crate::parameter::{Parameter, ParameterSetter};

/// Closure type for flag declaration.
pub type FlagsFn = Box<dyn FnMut(&mut FlagSet)>;

/// Closure type for parameter usage queries.
pub type ParameterUsageFn = Box<dyn Fn() -> (Vec<Parameter>, String)>;

/// Closure type for receiving the captured parameter list.
pub type SetParametersFn = Box<dyn FnMut(&[String]) -> Result<(), Error>>;

/// Closure type for the execution callback.
pub type ExecuteFn = Box<
    dyn FnMut(&Context, &mut dyn Read, &mut dyn Write, &mut dyn Write) -> anyhow::Result<()>,
>;

/// A command line program that does one thing.
///
/// `set_flags` and usage queries may run any number of times (help passes);
/// `set_parameters` and `execute` run at most once each, in that order, and
/// only after classification succeeded.
pub trait Command: ParameterSetter {
    /// One-line description used in help output. Empty means no header line.
    fn description(&self) -> String {
        String::new()
    }

    /// Declare flags onto a fresh [`FlagSet`]. Must be idempotent.
    fn set_flags(&mut self, flags: &mut FlagSet) {
        let _ = flags;
    }

    /// Do the work. A returned error is surfaced verbatim by the
    /// [`crate::Commander`] as an execution failure.
    fn execute(
        &mut self,
        ctx: &Context,
        stdin: &mut dyn Read,
        out: &mut dyn Write,
        out_err: &mut dyn Write,
    ) -> anyhow::Result<()>;
}

/// Closure-backed [`Command`] implementation.
///
/// Each field, when present, provides the corresponding trait method; absent
/// fields fall back to the zero behavior (no description, no flags, no
/// parameters, successful no-op execute).
///
/// ```no_run
/// use std::io::Write as _;
/// use subcli::{Commander, CommandStruct};
///
/// let command = CommandStruct {
///     description: "prints a greeting".into(),
///     execute: Some(Box::new(|_ctx, _in, out, _err| {
///         writeln!(out, "hello")?;
///         Ok(())
///     })),
///     ..Default::default()
/// };
/// let args: Vec<String> = std::env::args().skip(1).collect();
/// Commander::new("greet", command).execute(&args).ok();
/// ```
#[derive(Default)]
pub struct CommandStruct {
    pub description: String,
    pub flags: Option<FlagsFn>,
    pub parameter_usage: Option<ParameterUsageFn>,
    pub set_parameters: Option<SetParametersFn>,
    pub execute: Option<ExecuteFn>,
}

impl ParameterSetter for CommandStruct {
    fn parameter_usage(&self) -> (Vec<Parameter>, String) {
        match &self.parameter_usage {
            Some(f) => f(),
            None => (Vec::new(), String::new()),
        }
    }

    fn set_parameters(&mut self, params: &[String]) -> Result<(), Error> {
        match &mut self.set_parameters {
            Some(f) => f(params),
            None => Ok(()),
        }
    }
}

impl Command for CommandStruct {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn set_flags(&mut self, flags: &mut FlagSet) {
        if let Some(f) = &mut self.flags {
            f(flags);
        }
    }

    fn execute(
        &mut self,
        ctx: &Context,
        stdin: &mut dyn Read,
        out: &mut dyn Write,
        out_err: &mut dyn Write,
    ) -> anyhow::Result<()> {
        match &mut self.execute {
            Some(f) => f(ctx, stdin, out, out_err),
            None => Ok(()),
        }
    }
}
