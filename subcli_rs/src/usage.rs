//! Shared vocabulary and argument-group formatting for help output.
//!
//! Every piece of help and error text rendered by [`crate::Commander`] and
//! [`crate::SubCommander`] is assembled from these constants, so callers that
//! pipe the output can rely on a stable shape.

/// Keyword that opens every usage line.
pub const USAGE: &str = "usage:";

/// Section name for single-command flag defaults.
pub const OPTIONS_NAME: &str = "options";

/// Name of a single positional parameter in messages.
pub const PARAMETER_NAME: &str = "parameter";

/// Section name for positional parameter usage.
pub const PARAMETERS_NAME: &str = "parameters";

/// Argument-group name for dispatcher-level flags.
pub const GLOBAL_OPTIONS_NAME: &str = "global_options";

/// Argument-group name for the subcommand selector.
pub const SUB_COMMAND_NAME: &str = "sub_command";

/// Section name for the registry listing.
pub const SUB_COMMANDS_NAME: &str = "sub_commands";

/// Argument-group name for subcommand-specific flags.
pub const SUB_COMMAND_OPTIONS_NAME: &str = "sub_command_options";

/// Separator between argument groups joined into one bracket group.
pub const ARGUMENT_SEPARATOR: &str = " | ";

/// Format an argument group for a usage line.
///
/// A required group renders as `<name>`, an optional one as `[name]`, with a
/// `...` suffix inside the brackets when multiple values are accepted:
///
/// ```
/// use subcli::usage::format_argument;
///
/// assert_eq!(format_argument("sub_command", false, false), "<sub_command>");
/// assert_eq!(format_argument("options", true, true), "[options...]");
/// ```
///
/// Joined groups are built by nesting: the inner call brackets the joined
/// names, the outer call adds the repetition, e.g. `[[options | parameters]...]`.
pub fn format_argument(name: &str, optional: bool, many: bool) -> String {
    let mut result = name.to_string();
    if many {
        result.push_str("...");
    }
    if optional {
        format!("[{result}]")
    } else {
        format!("<{result}>")
    }
}
