//! The subcommand entity: a named, independently flagged and parameterized
//! unit of a multi-command program.

use std::io::{Read, Write};

use crate::command::{ExecuteFn, FlagsFn, ParameterUsageFn, SetParametersFn};
use crate::context::Context;
use crate::errors::Error;
use crate::flagset::FlagSet;
use crate::parameter::{Parameter, ParameterSetter};

/// One branch of a multi-command program, executed by a
/// [`crate::SubCommander`].
///
/// `name` must not overlap with other names or aliases registered on the
/// same dispatcher, and aliases resolve exactly like the name does. All
/// methods except `set_parameters` and `execute` may be called multiple
/// times to obtain help and error output, and must be idempotent.
pub trait SubCommand: ParameterSetter {
    /// Registry key and the name shown in usage output.
    fn name(&self) -> String;

    /// Alternate registry keys, listed alongside the name in help output.
    fn aliases(&self) -> Vec<String> {
        Vec::new()
    }

    /// One-line summary for the registry listing.
    fn synopsis(&self) -> String {
        String::new()
    }

    /// Longer description for this subcommand's own help output.
    fn description(&self) -> String {
        String::new()
    }

    /// Declare subcommand-specific flags. Must be idempotent.
    fn set_flags(&mut self, flags: &mut FlagSet) {
        let _ = flags;
    }

    /// Do the work. A returned error is surfaced verbatim by the dispatcher
    /// as an execution failure.
    fn execute(
        &mut self,
        ctx: &Context,
        stdin: &mut dyn Read,
        out: &mut dyn Write,
        out_err: &mut dyn Write,
    ) -> anyhow::Result<()>;
}

/// Closure-backed [`SubCommand`] implementation; absent fields fall back to
/// zero behavior exactly like [`crate::CommandStruct`].
#[derive(Default)]
pub struct SubCommandStruct {
    pub name: String,
    pub aliases: Vec<String>,
    pub synopsis: String,
    pub description: String,
    pub flags: Option<FlagsFn>,
    pub parameter_usage: Option<ParameterUsageFn>,
    pub set_parameters: Option<SetParametersFn>,
    pub execute: Option<ExecuteFn>,
}

impl ParameterSetter for SubCommandStruct {
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

impl SubCommand for SubCommandStruct {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn aliases(&self) -> Vec<String> {
        self.aliases.clone()
    }

    fn synopsis(&self) -> String {
        self.synopsis.clone()
    }

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_command_struct_zero_values() {
        let mut sub = SubCommandStruct { name: "noop".into(), ..Default::default() };
        assert_eq!(sub.name(), "noop");
        assert!(sub.aliases().is_empty());
        assert_eq!(sub.synopsis(), "");
        assert_eq!(sub.description(), "");
        assert!(sub.set_parameters(&[]).is_ok());

        let ctx = Context::new();
        let mut stdin = std::io::empty();
        let mut out = Vec::new();
        let mut out_err = Vec::new();
        assert!(sub.execute(&ctx, &mut stdin, &mut out, &mut out_err).is_ok());
    }
}
