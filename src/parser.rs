//! Token parsing against a registered set of parameters

mod parsed;
mod set;

pub use parsed::{FromArgs, FromValue, ParsedArgs};
pub use set::{GroupParse, HELP_FLAG, ParameterSet, ParseOutcome, VERSION_FLAG};
