//! Typed parameter definitions
//!
//! A [`Parameter`] describes one bindable argument: which kind of value it
//! holds, which flags select it, its default and its help text. Parameters are
//! declared without a name and receive one when registered on a command.

mod choice;
mod definition;
mod help;
mod value;

pub use choice::{ChoiceEnum, ChoiceMember, ChoiceSet, flag_from_name};
pub use definition::{Parameter, ParameterKind, PathCheck};
pub use help::HELP_COL_LENGTH;
pub(crate) use help::align as align_help;
pub use value::Value;
