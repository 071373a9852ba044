//! Orchestrates a single [`Command`]: parse, set parameters, execute, and
//! render help on parse failure.

use std::io::{self, Read, Write};

use crate::argparse::parse_arguments_interspersed;
use crate::command::Command;
use crate::context::Context;
use crate::errors::Error;
use crate::flagset::FlagSet;
use crate::parameter::{format_parameter, format_parameters};
use crate::usage::{
    ARGUMENT_SEPARATOR, OPTIONS_NAME, PARAMETERS_NAME, USAGE, format_argument,
};

/// Runs one [`Command`] from raw arguments.
///
/// Run sequence: build a fresh [`FlagSet`] and have the command declare its
/// flags; classify the tokens (interspersed); hand the captured parameters
/// to the command; execute. Classification and parameter failures are
/// wrapped as [`Error::ParsingCommand`] and render full help to the error
/// stream (the leading error line is omitted when help was requested);
/// execution failures are wrapped as [`Error::ExecutingCommand`] and
/// surfaced as-is with no help output. Single pass, no retries.
pub struct Commander<C> {
    /// Program name used in help and error output, usually `args[0]`.
    pub name: String,

    /// The command to execute.
    pub command: C,
}

impl<C: Command> Commander<C> {
    pub fn new(name: impl Into<String>, command: C) -> Self {
        Self { name: name.into(), command }
    }

    /// Run with process stdio and a background context. `args` exclude the
    /// program name.
    pub fn execute(&mut self, args: &[String]) -> Result<(), Error> {
        let ctx = Context::new();
        let mut stdin = io::stdin();
        let mut out = io::stdout();
        let mut out_err = io::stderr();
        self.execute_with(&ctx, args, &mut stdin, &mut out, &mut out_err)
    }

    /// Run with caller-supplied context and streams.
    pub fn execute_with(
        &mut self,
        ctx: &Context,
        args: &[String],
        stdin: &mut dyn Read,
        out: &mut dyn Write,
        out_err: &mut dyn Write,
    ) -> Result<(), Error> {
        let result = self.run(ctx, args, stdin, out, out_err);
        if let Err(err) = &result {
            if matches!(err, Error::ParsingCommand(_)) {
                let help = if err.is_help_requested() {
                    self.render_help(None)
                } else {
                    self.render_help(Some(err))
                };
                let _ = out_err.write_all(help.as_bytes());
            }
        }
        result
    }

    fn run(
        &mut self,
        ctx: &Context,
        args: &[String],
        stdin: &mut dyn Read,
        out: &mut dyn Write,
        out_err: &mut dyn Write,
    ) -> Result<(), Error> {
        let mut flags = FlagSet::new(&self.name);
        self.command.set_flags(&mut flags);

        let params = parse_arguments_interspersed(&flags, args)
            .map_err(|e| Error::ParsingCommand(Box::new(e)))?;
        tracing::debug!(command = %self.name, params = params.len(), "arguments classified");

        self.command
            .set_parameters(&params)
            .map_err(|e| Error::ParsingCommand(Box::new(e)))?;

        self.command
            .execute(ctx, stdin, out, out_err)
            .map_err(Error::ExecutingCommand)
    }

    /// Full help text: optional error line, header, usage line, flag
    /// defaults, parameter usage.
    fn render_help(&mut self, err: Option<&Error>) -> String {
        let mut text = String::new();
        if let Some(err) = err {
            text.push_str(&format!("{err}\n\n"));
        }

        let description = self.command.description();
        if !description.is_empty() {
            text.push_str(&format!("{} - {}\n\n", self.name, description));
        }

        text.push_str(&format!("{USAGE} {}", self.name));
        if let Some(line) = self.line_usage() {
            text.push_str(&format!(" {line}"));
        }
        text.push('\n');

        let defaults = self.flag_defaults();
        if !defaults.is_empty() {
            text.push_str(&format!("\n{OPTIONS_NAME}:\n{defaults}\n"));
        }

        let (params, extra) = self.command.parameter_usage();
        let formatted = format_parameters(&params, format_parameter);
        let mut printed = false;
        if !formatted.is_empty() {
            text.push_str(&format!("\n{PARAMETERS_NAME}: {formatted}"));
            printed = true;
        }
        if !extra.is_empty() {
            text.push_str(&format!("\n{extra}"));
            printed = true;
        }
        if printed {
            text.push('\n');
        }

        text
    }

    /// The bracketed argument groups for the usage line, if any.
    fn line_usage(&mut self) -> Option<String> {
        let mut groups = Vec::new();
        if !self.flag_defaults().is_empty() {
            groups.push(OPTIONS_NAME);
        }
        if !self.command.parameter_usage().0.is_empty() {
            groups.push(PARAMETERS_NAME);
        }

        match groups.len() {
            0 => None,
            1 => Some(format_argument(groups[0], true, true)),
            _ => Some(format_argument(
                &format_argument(&groups.join(ARGUMENT_SEPARATOR), true, false),
                true,
                true,
            )),
        }
    }

    fn flag_defaults(&mut self) -> String {
        let mut flags = FlagSet::new(&self.name);
        self.command.set_flags(&mut flags);
        flags.defaults()
    }
}
