//! The flag collaborator: typed declarations, prefix-only parsing, and
//! defaults rendering.
//!
//! A [`FlagSet`] only ever consumes flags from the *front* of a token stream
//! and stops permanently at the first token it cannot read as a flag. The
//! interleaving of flags with positional parameters is layered on top by
//! [`crate::argparse`], which drives `parse` repeatedly.
//!
//! Declarations write through shared destinations (`Rc<Cell<T>>` /
//! `Rc<RefCell<String>>`), so declaring the same flags onto a fresh
//! `FlagSet` rebinds the same destinations. Dispatchers rely on that for
//! their help-rendering passes: declaration must be a pure function of
//! static configuration.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::errors::Error;

enum FlagKind {
    Bool,
    Int,
    Float,
    String,
}

impl FlagKind {
    fn label(&self) -> &'static str {
        match self {
            FlagKind::Bool => "",
            FlagKind::Int => "int",
            FlagKind::Float => "float",
            FlagKind::String => "string",
        }
    }
}

struct Flag {
    kind: FlagKind,
    default: String,
    usage: String,
    apply: Box<dyn Fn(&str) -> Result<(), String>>,
}

/// A set of declared flags plus the machinery to parse them off the front of
/// a token stream.
///
/// Token forms: `-name`, `--name`, `-name=value`, and for non-boolean flags a
/// value in the following token. Boolean flags never consume a following
/// token. An undeclared `-h` or `-help` reports [`Error::HelpRequested`].
/// A lone `-`, an empty token, any token not starting with `-`, and
/// everything after the literal `--` terminator stop the parse.
pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, Flag>,
}

impl FlagSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), flags: BTreeMap::new() }
    }

    /// Name this set was created with (the command or program name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of declared flags.
    pub fn declared(&self) -> usize {
        self.flags.len()
    }

    /// Declare a boolean flag writing through `dest`. `dest` is reset to
    /// `default` immediately.
    pub fn bool_var(&mut self, dest: &Rc<Cell<bool>>, name: &str, default: bool, usage: &str) {
        dest.set(default);
        let dest = Rc::clone(dest);
        self.declare(name, FlagKind::Bool, default.to_string(), usage, move |raw| {
            dest.set(parse_bool(raw)?);
            Ok(())
        });
    }

    /// Declare an integer flag writing through `dest`.
    pub fn int_var(&mut self, dest: &Rc<Cell<i64>>, name: &str, default: i64, usage: &str) {
        dest.set(default);
        let dest = Rc::clone(dest);
        self.declare(name, FlagKind::Int, default.to_string(), usage, move |raw| {
            let value = raw.parse::<i64>().map_err(|e| e.to_string())?;
            dest.set(value);
            Ok(())
        });
    }

    /// Declare a float flag writing through `dest`.
    pub fn float_var(&mut self, dest: &Rc<Cell<f64>>, name: &str, default: f64, usage: &str) {
        dest.set(default);
        let dest = Rc::clone(dest);
        self.declare(name, FlagKind::Float, default.to_string(), usage, move |raw| {
            let value = raw.parse::<f64>().map_err(|e| e.to_string())?;
            dest.set(value);
            Ok(())
        });
    }

    /// Declare a string flag writing through `dest`.
    pub fn string_var(&mut self, dest: &Rc<RefCell<String>>, name: &str, default: &str, usage: &str) {
        *dest.borrow_mut() = default.to_string();
        let dest = Rc::clone(dest);
        self.declare(name, FlagKind::String, format!("{default:?}"), usage, move |raw| {
            *dest.borrow_mut() = raw.to_string();
            Ok(())
        });
    }

    fn declare<F>(&mut self, name: &str, kind: FlagKind, default: String, usage: &str, apply: F)
    where
        F: Fn(&str) -> Result<(), String> + 'static,
    {
        // Redeclaring a name is an author error (typically a collision
        // between global and subcommand declarers), never a runtime
        // condition. Abort immediately.
        if self.flags.contains_key(name) {
            panic!("{}: flag -{name} redefined", self.name);
        }
        self.flags.insert(
            name.to_string(),
            Flag { kind, default, usage: usage.to_string(), apply: Box::new(apply) },
        );
    }

    /// Consume a maximal flag prefix of `args` and return the unconsumed
    /// remainder.
    ///
    /// The remainder starts at the first non-flag token or at the `--`
    /// terminator, whichever stopped the parse; the terminator itself is
    /// left unconsumed. A `--` consumed as some flag's value has no special
    /// meaning.
    pub fn parse(&self, args: &[String]) -> Result<Vec<String>, Error> {
        let mut next = 0;
        while next < args.len() {
            let token = &args[next];
            // Stops at (not after) the terminator so callers can tell a
            // terminator boundary from an ordinary non-flag token.
            if token.len() < 2 || !token.starts_with('-') || token == "--" {
                break;
            }

            let mut name = &token[1..];
            if let Some(stripped) = name.strip_prefix('-') {
                name = stripped;
            }
            if name.is_empty() || name.starts_with('-') || name.starts_with('=') {
                return Err(Error::BadFlagSyntax(token.clone()));
            }

            let (name, inline) = match name.split_once('=') {
                Some((n, v)) => (n, Some(v.to_string())),
                None => (name, None),
            };

            let Some(flag) = self.flags.get(name) else {
                if name == "h" || name == "help" {
                    return Err(Error::HelpRequested);
                }
                return Err(Error::FlagNotDefined(name.to_string()));
            };

            next += 1;
            let raw = match flag.kind {
                // Boolean flags take their value only from `-name=value`.
                FlagKind::Bool => inline.unwrap_or_else(|| "true".to_string()),
                _ => match inline {
                    Some(v) => v,
                    None => {
                        let Some(value) = args.get(next) else {
                            return Err(Error::FlagNeedsArgument(name.to_string()));
                        };
                        next += 1;
                        value.clone()
                    }
                },
            };

            (flag.apply)(&raw).map_err(|reason| Error::InvalidFlagValue {
                name: name.to_string(),
                value: raw.clone(),
                reason,
            })?;
        }
        Ok(args[next..].to_vec())
    }

    /// Render the declared flags, one line per flag, sorted by name:
    /// `  -name type  usage (default value)`. The type label is omitted for
    /// boolean flags and string defaults are quoted.
    pub fn defaults(&self) -> String {
        let mut lines = Vec::with_capacity(self.flags.len());
        for (name, flag) in &self.flags {
            let label = flag.kind.label();
            let mut line = if label.is_empty() {
                format!("  -{name}")
            } else {
                format!("  -{name} {label}")
            };
            line.push_str("  ");
            line.push_str(&flag.usage);
            line.push_str(&format!(" (default {})", flag.default));
            lines.push(line);
        }
        lines.join("\n")
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err("invalid boolean value".to_string()),
    }
}

/// Anything that declares flags onto a [`FlagSet`].
///
/// Implementations are called 0..N times with different sets (help passes
/// plus the real parse) and must be idempotent: each call rebinds the same
/// destinations freshly.
pub trait FlagSetter {
    fn set_flags(&mut self, flags: &mut FlagSet);
}

/// Closure adapter for [`FlagSetter`].
pub struct FlagSetterFn<F>(pub F);

impl<F: FnMut(&mut FlagSet)> FlagSetter for FlagSetterFn<F> {
    fn set_flags(&mut self, flags: &mut FlagSet) {
        (self.0)(flags)
    }
}
