#![forbid(unsafe_code)]

//! cmdtree: declarative command-line binding
//!
//! Commands declare typed parameters, receive their parsed values in a handler
//! and compose into groups that share one [`RuntimeContext`]. Parsing happens
//! against fresh per-call state, so a tree can be invoked any number of times.
//!
//! ```
//! use cmdtree::{Command, Parameter, run_isolated};
//! use std::io::Write;
//!
//! let greet = Command::builder("greet")
//!     .param("name", Parameter::string().help("Who to greet"))
//!     .param("loud", Parameter::boolean().long("--loud"))
//!     .handler(|inv| {
//!         let name: String = inv.get("name")?;
//!         let loud: bool = inv.get("loud")?;
//!         let text = if loud { name.to_uppercase() } else { name };
//!         writeln!(inv.out(), "hello {}", text)?;
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//!
//! let result = run_isolated(&greet.into(), vec!["ada".into(), "--loud".into()]);
//! assert_eq!(result.stdout, "hello ADA\n");
//! ```

pub mod command;
pub mod console;
pub mod context;
pub mod error;
pub mod param;
pub mod parser;
pub mod runner;
pub mod tools;

// Re-export types for convenient access
pub use command::{Command, CommandBuilder, CommandNode, Group, GroupBuilder, Invocation};
pub use console::Console;
pub use context::{ContextError, RuntimeContext};
pub use error::{CliError, CliResult, DefinitionError};
pub use param::{ChoiceEnum, ChoiceSet, Parameter, ParameterKind, Value};
pub use parser::{FromArgs, FromValue, ParameterSet, ParseOutcome, ParsedArgs};
pub use runner::{RunResult, run, run_and_exit, run_isolated};
