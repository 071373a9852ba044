//! Minimal multi-command program built on subcli.
//!
//! ```bash
//! cargo run --example todo -- add "buy milk" "call home"
//! cargo run --example todo -- -verbose add x
//! cargo run --example todo -- help add
//! cargo run --example todo -- list
//! ```

use std::cell::Cell;
use std::io::Write as _;
use std::process::ExitCode;
use std::rc::Rc;

use subcli::{Error, FlagSet, FlagSetterFn, Parameter, SubCommandStruct, SubCommander};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let verbose = Rc::new(Cell::new(false));
    let verbose_global = Rc::clone(&verbose);

    let mut cli = SubCommander::new("todo");
    cli.global_flags = Some(Box::new(FlagSetterFn(move |f: &mut FlagSet| {
        f.bool_var(&verbose_global, "verbose", false, "chatty output");
    })));

    let priority = Rc::new(Cell::new(0));
    let priority_in = Rc::clone(&priority);
    let items: Rc<std::cell::RefCell<Vec<String>>> = Rc::default();
    let items_in = Rc::clone(&items);
    let verbose_in = Rc::clone(&verbose);

    cli.register(SubCommandStruct {
        name: "add".into(),
        aliases: vec!["a".into()],
        synopsis: "Adds items to the list".into(),
        description: "Adds one or more items to the todo list".into(),
        flags: Some(Box::new(move |f: &mut FlagSet| {
            f.int_var(&priority_in, "priority", 0, "item priority");
        })),
        parameter_usage: Some(Box::new(|| {
            (
                vec![Parameter { name: "item".into(), optional: false, many: true }],
                "the items to add".into(),
            )
        })),
        set_parameters: Some(Box::new(move |params| {
            if params.is_empty() {
                return Err(Error::RequiredParameterNotSet { name: "item".into(), many: true });
            }
            *items.borrow_mut() = params.to_vec();
            Ok(())
        })),
        execute: Some(Box::new(move |_ctx, _stdin, out, _err| {
            for item in items_in.borrow().iter() {
                if verbose_in.get() {
                    writeln!(out, "added {item:?} with priority {}", priority.get())?;
                } else {
                    writeln!(out, "added {item:?}")?;
                }
            }
            Ok(())
        })),
        ..Default::default()
    });

    cli.register_help("help", "", "", &["h"]);
    cli.register_list("list", "", "", &["ls"]);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match cli.execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_status().unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
