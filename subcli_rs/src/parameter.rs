//! Positional parameter metadata, the parameter contract, and formatting.

use crate::errors::Error;

/// Descriptive metadata for one positional parameter.
///
/// A `Parameter` never holds a captured value; it only drives usage rendering
/// and arity messaging. Order within a [`ParameterSetter::parameter_usage`]
/// list is the positional order on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    /// Name as it appears in help and error output (upper-cased there).
    pub name: String,

    /// Whether the parameter may be absent. False means required.
    pub optional: bool,

    /// Whether the parameter accepts a variable number of values.
    pub many: bool,
}

/// The parameter contract: an ordered slot description plus a setter that
/// receives the full captured list exactly once per run.
///
/// `parameter_usage` may be called any number of times while rendering help;
/// `set_parameters` is called at most once, only after classification
/// succeeded, and may reject the captured list.
pub trait ParameterSetter {
    /// Ordered parameter slots plus free-form extra usage text.
    fn parameter_usage(&self) -> (Vec<Parameter>, String) {
        (Vec::new(), String::new())
    }

    /// Receive the captured parameter list.
    fn set_parameters(&mut self, params: &[String]) -> Result<(), Error> {
        let _ = params;
        Ok(())
    }
}

/// Upper-case a parameter name for help output.
pub fn format_parameter_name(name: &str) -> String {
    name.to_uppercase()
}

/// Render one parameter: `<NAME>`, `<NAME...>`, `[NAME]`, or `[NAME...]`.
pub fn format_parameter(p: &Parameter) -> String {
    let mut result = format_parameter_name(&p.name);
    if p.many {
        result.push_str("...");
    }
    if p.optional {
        format!("[{result}]")
    } else {
        format!("<{result}>")
    }
}

/// Render each parameter with `format` and join the results with spaces.
pub fn format_parameters<F>(params: &[Parameter], format: F) -> String
where
    F: Fn(&Parameter) -> String,
{
    params.iter().map(format).collect::<Vec<_>>().join(" ")
}
