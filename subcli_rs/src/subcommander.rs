//! Multi-command dispatch: registry, global flags, resolution, and
//! contextual help rendering.
//!
//! Dispatch runs in fixed order: parse global flags up to the first
//! non-flag token, take the next token as the subcommand selector, resolve
//! it by name or alias, classify the remaining tokens against the
//! subcommand's flags (plus the global flags unless mixing is disallowed),
//! hand over the captured parameters, then execute. Every failure maps to
//! one [`Error`] variant and, except for execution failures, renders
//! contextual help to the error stream.
//!
//! A `SubCommander` owns its registry; there is no process-global state.
//! It is not safe for concurrent use - callers needing concurrency use
//! independent instances.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::rc::Rc;

use crate::argparse::{ParameterFlagMode, TERMINATOR, parse_arguments};
use crate::context::Context;
use crate::errors::Error;
use crate::flagset::{FlagSet, FlagSetter};
use crate::parameter::{Parameter, ParameterSetter, format_parameter, format_parameters};
use crate::subcommand::SubCommand;
use crate::usage::{
    ARGUMENT_SEPARATOR, GLOBAL_OPTIONS_NAME, PARAMETERS_NAME, SUB_COMMANDS_NAME, SUB_COMMAND_NAME,
    SUB_COMMAND_OPTIONS_NAME, USAGE, format_argument,
};

/// Registers multiple [`SubCommand`]s and executes one of them from raw
/// command line arguments.
///
/// Configuration fields are public and read at dispatch time; set them
/// before calling [`SubCommander::execute`]. Registering a subcommand whose
/// flags collide with the global flags panics: that is an author error, not
/// a runtime condition.
pub struct SubCommander {
    /// Program name used in help and error output, usually `args[0]`.
    pub command_name: String,

    /// Declarer for flags that are legal before the subcommand name (and,
    /// unless disallowed below, after it too). Set this before registering
    /// subcommands so name collisions surface at registration time.
    pub global_flags: Option<Box<dyn FlagSetter>>,

    /// When true, global flags are only legal before the subcommand name;
    /// a global-looking flag after it is an ordinary unrecognized flag.
    pub disallow_global_flags_with_sub_command: bool,

    /// Ordering discipline for the subcommand's own argument segment.
    pub mode: ParameterFlagMode,

    names: BTreeMap<String, Registered>,
    aliases: BTreeMap<String, Registered>,
}

impl SubCommander {
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            global_flags: None,
            disallow_global_flags_with_sub_command: false,
            mode: ParameterFlagMode::default(),
            names: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Register `sub` under its name and aliases, overwriting any previous
    /// registration for a colliding key.
    ///
    /// When global/subcommand flag mixing is allowed and global flags are
    /// already configured, the combined declaration is probed immediately so
    /// a flag-name collision aborts here instead of at dispatch time.
    pub fn register(&mut self, sub: impl SubCommand + 'static) {
        let mut sub = sub;
        if !self.disallow_global_flags_with_sub_command {
            if let Some(global) = &mut self.global_flags {
                let mut probe = FlagSet::new(sub.name());
                sub.set_flags(&mut probe);
                global.set_flags(&mut probe);
            }
        }
        self.insert(Registered::External(Rc::new(RefCell::new(sub))));
    }

    /// Register the built-in `help` subcommand, which takes the name of
    /// another subcommand and prints that subcommand's usage. Empty
    /// `synopsis`/`description` select the defaults.
    pub fn register_help(&mut self, name: &str, synopsis: &str, description: &str, aliases: &[&str]) {
        let synopsis = if synopsis.is_empty() {
            format!("Prints help information for a {SUB_COMMAND_NAME}")
        } else {
            synopsis.to_string()
        };
        let description = if description.is_empty() {
            format!(
                "{synopsis}. This includes usage information about the {SUB_COMMAND_NAME}'s \
                 {PARAMETERS_NAME} and {SUB_COMMAND_OPTIONS_NAME}"
            )
        } else {
            description.to_string()
        };
        self.insert(Registered::Builtin(Rc::new(RefCell::new(Builtin {
            kind: BuiltinKind::Help,
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            synopsis,
            description,
            target: None,
        }))));
    }

    /// Register the built-in `list` subcommand, which prints the registry
    /// listing. Empty `synopsis`/`description` select the defaults.
    pub fn register_list(&mut self, name: &str, synopsis: &str, description: &str, aliases: &[&str]) {
        let synopsis = if synopsis.is_empty() {
            format!("Prints available {SUB_COMMANDS_NAME}")
        } else {
            synopsis.to_string()
        };
        let description = if description.is_empty() { synopsis.clone() } else { description.to_string() };
        self.insert(Registered::Builtin(Rc::new(RefCell::new(Builtin {
            kind: BuiltinKind::List,
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            synopsis,
            description,
            target: None,
        }))));
    }

    fn insert(&mut self, entry: Registered) {
        self.names.insert(entry.name(), entry.clone());
        for alias in entry.aliases() {
            self.aliases.insert(alias, entry.clone());
        }
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
        let mut resolved: Option<Registered> = None;
        let result = self.dispatch(ctx, args, stdin, out, out_err, &mut resolved);
        let Err(err) = result else { return Ok(()) };

        match &err {
            Error::ParsingGlobalArgs(_) => {
                let text = if err.is_help_requested() {
                    self.render_command_help(None, true)
                } else {
                    self.render_command_help(Some(&err), true)
                };
                let _ = out_err.write_all(text.as_bytes());
            }
            Error::UnsuppliedSubCommand | Error::UnknownSubCommand(_) => {
                let text = self.render_command_help(Some(&err), false);
                let _ = out_err.write_all(text.as_bytes());
            }
            Error::ParsingSubCommand(_) => {
                if let Some(entry) = resolved {
                    let text = if err.is_help_requested() {
                        self.render_sub_command_help(&entry)
                    } else {
                        self.render_sub_command_error(&err, &entry)
                    };
                    let _ = out_err.write_all(text.as_bytes());
                }
            }
            // Execution failures are the application's own output; print
            // nothing on its behalf.
            _ => {}
        }
        Err(err)
    }

    fn dispatch(
        &mut self,
        ctx: &Context,
        args: &[String],
        stdin: &mut dyn Read,
        out: &mut dyn Write,
        out_err: &mut dyn Write,
        resolved: &mut Option<Registered>,
    ) -> Result<(), Error> {
        let mut flags = FlagSet::new(&self.command_name);
        if let Some(global) = &mut self.global_flags {
            global.set_flags(&mut flags);
        }
        let mut rest =
            flags.parse(args).map_err(|e| Error::ParsingGlobalArgs(Box::new(e)))?;
        if rest.first().map(String::as_str) == Some(TERMINATOR) {
            rest.remove(0);
        }

        if rest.is_empty() {
            return Err(Error::UnsuppliedSubCommand);
        }
        let name = rest.remove(0);
        let Some(entry) = self.lookup(&name).cloned() else {
            tracing::debug!(name = %name, "unknown sub_command");
            return Err(Error::UnknownSubCommand(name));
        };
        *resolved = Some(entry.clone());
        tracing::debug!(sub_command = %entry.name(), "dispatching");

        let mut flags = FlagSet::new(entry.name());
        entry.set_flags(&mut flags);
        if !self.disallow_global_flags_with_sub_command {
            if let Some(global) = &mut self.global_flags {
                global.set_flags(&mut flags);
            }
        }

        let params = parse_arguments(&flags, &rest, self.mode)
            .map_err(|e| Error::ParsingSubCommand(Box::new(e)))?;
        entry
            .set_parameters(&params)
            .map_err(|e| Error::ParsingSubCommand(Box::new(e)))?;

        match &entry {
            Registered::External(sub) => sub
                .borrow_mut()
                .execute(ctx, stdin, out, out_err)
                .map_err(Error::ExecutingSubCommand),
            Registered::Builtin(builtin) => {
                let (kind, target) = {
                    let builtin = builtin.borrow();
                    (builtin.kind, builtin.target.clone())
                };
                self.execute_builtin(kind, target, out, out_err)
                    .map_err(Error::ExecutingSubCommand)
            }
        }
    }

    fn execute_builtin(
        &mut self,
        kind: BuiltinKind,
        target: Option<String>,
        out: &mut dyn Write,
        out_err: &mut dyn Write,
    ) -> anyhow::Result<()> {
        match kind {
            BuiltinKind::Help => {
                let target = target.expect("help target captured during parameter phase");
                match self.lookup(&target).cloned() {
                    Some(entry) => {
                        let text = self.render_sub_command_help(&entry);
                        let _ = out.write_all(text.as_bytes());
                        Ok(())
                    }
                    None => {
                        let err = Error::UnknownSubCommand(target);
                        let text = self.render_command_help(Some(&err), false);
                        let _ = out_err.write_all(text.as_bytes());
                        Err(err.into())
                    }
                }
            }
            BuiltinKind::List => {
                let listing = self.render_available_sub_commands();
                let _ = out.write_all(listing.as_bytes());
                let _ = out.write_all(b"\n");
                Ok(())
            }
        }
    }

    fn lookup(&self, name: &str) -> Option<&Registered> {
        self.names.get(name).or_else(|| self.aliases.get(name))
    }

    // ------------------------------------------------------------------
    // Help and error rendering
    // ------------------------------------------------------------------

    /// Top-level help: optional error line, usage line, optionally the
    /// global options section, and the registry listing.
    fn render_command_help(&mut self, err: Option<&Error>, globals: bool) -> String {
        let mut text = String::new();
        if let Some(err) = err {
            text.push_str(&format!("{err}\n\n"));
        }

        text.push_str(&format!("{USAGE} {}", self.command_name));
        if self.global_flag_count() > 0 {
            text.push_str(&format!(" {}", format_argument(GLOBAL_OPTIONS_NAME, true, true)));
        }
        text.push_str(&format!(" {}", format_argument(SUB_COMMAND_NAME, false, false)));
        let joined =
            format!("{SUB_COMMAND_OPTIONS_NAME}{ARGUMENT_SEPARATOR}{PARAMETERS_NAME}");
        text.push_str(&format!(
            " {}\n",
            format_argument(&format_argument(&joined, true, false), true, true)
        ));

        if globals {
            let defaults = self.global_defaults();
            if !defaults.is_empty() {
                text.push_str(&format!("\n{GLOBAL_OPTIONS_NAME}:\n{defaults}\n"));
            }
        }

        let listing = self.render_available_sub_commands();
        if !listing.is_empty() {
            text.push_str(&format!("\n{listing}\n"));
        }
        text
    }

    /// A subcommand's help: name/aliases/description header, blank line,
    /// then its usage block.
    fn render_sub_command_help(&mut self, entry: &Registered) -> String {
        let mut text = entry.header_description();
        text.push_str("\n\n");
        text.push_str(&self.render_sub_command_usage(entry));
        text
    }

    /// A subcommand's parse-failure output: error line, blank line, then
    /// its usage block.
    fn render_sub_command_error(&mut self, err: &Error, entry: &Registered) -> String {
        let mut text = format!("{err}\n\n");
        text.push_str(&self.render_sub_command_usage(entry));
        text
    }

    fn render_sub_command_usage(&mut self, entry: &Registered) -> String {
        let mut text = format!("{USAGE} ... {}", entry.name());
        if let Some(line) = self.sub_command_line_usage(entry) {
            text.push_str(&format!(" {line}"));
        }
        text.push('\n');

        if !self.disallow_global_flags_with_sub_command {
            let defaults = self.global_defaults();
            if !defaults.is_empty() {
                text.push_str(&format!("\n{GLOBAL_OPTIONS_NAME}:\n{defaults}\n"));
            }
        }

        let defaults = sub_command_defaults(entry);
        if !defaults.is_empty() {
            text.push_str(&format!("\n{SUB_COMMAND_OPTIONS_NAME}:\n{defaults}\n"));
        }

        let (params, extra) = entry.parameter_usage();
        let mut rendered = format_parameters(&params, format_parameter);
        if !extra.is_empty() {
            if !rendered.is_empty() {
                rendered.push('\n');
            }
            rendered.push_str(&extra);
        }
        if !rendered.is_empty() {
            text.push_str(&format!("\n{PARAMETERS_NAME}: {rendered}\n"));
        }
        text
    }

    fn sub_command_line_usage(&mut self, entry: &Registered) -> Option<String> {
        let mut groups = Vec::new();
        if !self.disallow_global_flags_with_sub_command && self.global_flag_count() > 0 {
            groups.push(GLOBAL_OPTIONS_NAME);
        }
        if sub_command_flag_count(entry) > 0 {
            groups.push(SUB_COMMAND_OPTIONS_NAME);
        }
        if !entry.parameter_usage().0.is_empty() {
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

    /// Registry listing: `sub_commands:` plus one line per primary name in
    /// sorted order, aliases sorted and joined with ", ", column-padded to
    /// max(16, longest entry + 4), followed by the synopsis.
    fn render_available_sub_commands(&self) -> String {
        if self.names.is_empty() {
            return String::new();
        }

        let name_aliases: Vec<String> =
            self.names.values().map(Registered::name_aliases).collect();
        let longest = name_aliases.iter().map(String::len).max().unwrap_or(0);
        let pad = usize::max(16, longest + 4);

        let mut text = format!("{SUB_COMMANDS_NAME}:");
        for (entry, listed) in self.names.values().zip(&name_aliases) {
            text.push_str(&format!("\n  {listed:<pad$}{}", entry.synopsis()));
        }
        text
    }

    fn global_flag_count(&mut self) -> usize {
        let mut flags = FlagSet::new(&self.command_name);
        if let Some(global) = &mut self.global_flags {
            global.set_flags(&mut flags);
        }
        flags.declared()
    }

    fn global_defaults(&mut self) -> String {
        let mut flags = FlagSet::new(&self.command_name);
        if let Some(global) = &mut self.global_flags {
            global.set_flags(&mut flags);
        }
        flags.defaults()
    }
}

fn sub_command_flag_count(entry: &Registered) -> usize {
    let mut flags = FlagSet::new(entry.name());
    entry.set_flags(&mut flags);
    flags.declared()
}

fn sub_command_defaults(entry: &Registered) -> String {
    let mut flags = FlagSet::new(entry.name());
    entry.set_flags(&mut flags);
    flags.defaults()
}

// ----------------------------------------------------------------------
// Registry entries
// ----------------------------------------------------------------------

/// A registry entry: either an application subcommand or one of the
/// dispatcher's built-ins. Built-ins need the registry itself to execute,
/// so the dispatcher runs them instead of going through a trait object.
#[derive(Clone)]
enum Registered {
    External(Rc<RefCell<dyn SubCommand>>),
    Builtin(Rc<RefCell<Builtin>>),
}

#[derive(Clone, Copy)]
enum BuiltinKind {
    Help,
    List,
}

struct Builtin {
    kind: BuiltinKind,
    name: String,
    aliases: Vec<String>,
    synopsis: String,
    description: String,
    /// Captured target for the help builtin.
    target: Option<String>,
}

impl Registered {
    fn name(&self) -> String {
        match self {
            Registered::External(sub) => sub.borrow().name(),
            Registered::Builtin(builtin) => builtin.borrow().name.clone(),
        }
    }

    fn aliases(&self) -> Vec<String> {
        match self {
            Registered::External(sub) => sub.borrow().aliases(),
            Registered::Builtin(builtin) => builtin.borrow().aliases.clone(),
        }
    }

    fn synopsis(&self) -> String {
        match self {
            Registered::External(sub) => sub.borrow().synopsis(),
            Registered::Builtin(builtin) => builtin.borrow().synopsis.clone(),
        }
    }

    fn description(&self) -> String {
        match self {
            Registered::External(sub) => sub.borrow().description(),
            Registered::Builtin(builtin) => builtin.borrow().description.clone(),
        }
    }

    fn set_flags(&self, flags: &mut FlagSet) {
        if let Registered::External(sub) = self {
            sub.borrow_mut().set_flags(flags);
        }
    }

    fn parameter_usage(&self) -> (Vec<Parameter>, String) {
        match self {
            Registered::External(sub) => sub.borrow().parameter_usage(),
            Registered::Builtin(builtin) => match builtin.borrow().kind {
                BuiltinKind::Help => {
                    let param = Parameter {
                        name: SUB_COMMAND_NAME.to_string(),
                        optional: false,
                        many: false,
                    };
                    let usage = format!(
                        "{} is the {SUB_COMMAND_NAME} to provide help for",
                        format_parameter(&param)
                    );
                    (vec![param], usage)
                }
                BuiltinKind::List => (Vec::new(), String::new()),
            },
        }
    }

    fn set_parameters(&self, params: &[String]) -> Result<(), Error> {
        match self {
            Registered::External(sub) => sub.borrow_mut().set_parameters(params),
            Registered::Builtin(builtin) => {
                let mut builtin = builtin.borrow_mut();
                match builtin.kind {
                    BuiltinKind::Help => {
                        if params.len() > 1 {
                            return Err(Error::TooManyParameters);
                        }
                        let Some(target) = params.first() else {
                            return Err(Error::RequiredParameterNotSet {
                                name: SUB_COMMAND_NAME.to_string(),
                                many: false,
                            });
                        };
                        builtin.target = Some(target.clone());
                        Ok(())
                    }
                    BuiltinKind::List => {
                        if params.is_empty() { Ok(()) } else { Err(Error::TooManyParameters) }
                    }
                }
            }
        }
    }

    /// `name, a1, a2 - description` header; aliases sorted, description
    /// omitted when empty.
    fn header_description(&self) -> String {
        let mut text = self.name_aliases();
        let description = self.description();
        if !description.is_empty() {
            text.push_str(&format!(" - {description}"));
        }
        text
    }

    fn name_aliases(&self) -> String {
        let mut aliases = self.aliases();
        aliases.sort();
        let mut parts = vec![self.name()];
        parts.extend(aliases);
        parts.join(", ")
    }
}
