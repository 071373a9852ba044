//! Shared helpers for the unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::flagset::{FlagSet, FlagSetter};

/// A declaration closure that registers one string flag per name, with
/// `<name>_default` / `<name>_usage` filler values.
pub(crate) fn strings_flags(names: &[&str]) -> impl FnMut(&mut FlagSet) + 'static {
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    move |flags: &mut FlagSet| {
        for name in &names {
            let dest = Rc::new(RefCell::new(String::new()));
            flags.string_var(&dest, name, &format!("{name}_default"), &format!("{name}_usage"));
        }
    }
}

/// A [`FlagSetter`] declaring one flag of each type, with inspectable
/// destinations: `<prefix>int`, `<prefix>string`, and `<prefix>bool`.
pub(crate) struct SimpleFlags {
    pub prefix: String,
    pub int: Rc<Cell<i64>>,
    pub string: Rc<RefCell<String>>,
    pub enabled: Rc<Cell<bool>>,
}

impl SimpleFlags {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            int: Rc::default(),
            string: Rc::default(),
            enabled: Rc::default(),
        }
    }
}

impl FlagSetter for SimpleFlags {
    fn set_flags(&mut self, flags: &mut FlagSet) {
        flags.int_var(&self.int, &format!("{}int", self.prefix), 0, "int_usage");
        flags.string_var(&self.string, &format!("{}string", self.prefix), "", "string_usage");
        flags.bool_var(&self.enabled, &format!("{}bool", self.prefix), false, "bool_usage");
    }
}
