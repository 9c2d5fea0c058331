//! Commands, groups and dispatch across a command tree
//!
//! A tree is declared once at start-up with [`Command::builder`] and
//! [`Group::builder`]. Registering a child pushes the parent's
//! [`RuntimeContext`] into it, so every node of a tree shares one context.
//! After that the tree is only read: [`CommandNode::invoke`] parses an argument
//! vector against a fresh parser state and dispatches it.

mod group;
mod help;
mod invocation;
mod leaf;

pub use group::{Group, GroupBuilder};
pub use invocation::{Handler, Invocation};
pub use leaf::{Command, CommandBuilder};

use crate::console::Console;
use crate::context::RuntimeContext;
use crate::error::{CliResult, DefinitionError};
use crate::param::Parameter;
use crate::parser::ParameterSet;
use std::io::Write;

/// Name under which a parameter is replaced by the injected context
pub const CONTEXT_PARAM: &str = "context";

/// A node of a command tree
pub enum CommandNode {
    Command(Command),
    Group(Group),
}

impl CommandNode {
    pub fn name(&self) -> &str {
        match self {
            CommandNode::Command(command) => command.name(),
            CommandNode::Group(group) => group.name(),
        }
    }

    pub fn about(&self) -> Option<&str> {
        match self {
            CommandNode::Command(command) => command.about(),
            CommandNode::Group(group) => group.about(),
        }
    }

    /// First line of the description, shown in a parent's command list
    pub fn summary(&self) -> Option<&str> {
        summary_of(self.about())
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            CommandNode::Command(command) => command.version(),
            CommandNode::Group(group) => group.version(),
        }
    }

    pub fn context(&self) -> &RuntimeContext {
        match self {
            CommandNode::Command(command) => command.context(),
            CommandNode::Group(group) => group.context(),
        }
    }

    /// Replaces the node's context, recursing into children
    pub fn set_context(&mut self, context: &RuntimeContext) {
        match self {
            CommandNode::Command(command) => command.set_context(context),
            CommandNode::Group(group) => group.set_context(context),
        }
    }

    pub fn render_help(&self) -> String {
        match self {
            CommandNode::Command(command) => command.render_help(),
            CommandNode::Group(group) => group.render_help(),
        }
    }

    /// Parses `argv` and runs the node, returning the exit code
    pub fn invoke(&self, argv: &[String], console: &mut Console, isolated: bool) -> CliResult<i32> {
        match self {
            CommandNode::Command(command) => command.invoke(argv, console, isolated),
            CommandNode::Group(group) => group.invoke(argv, console, isolated),
        }
    }
}

impl From<Command> for CommandNode {
    fn from(command: Command) -> Self {
        CommandNode::Command(command)
    }
}

impl From<Group> for CommandNode {
    fn from(group: Group) -> Self {
        CommandNode::Group(group)
    }
}

fn summary_of(about: Option<&str>) -> Option<&str> {
    about.and_then(|text| text.lines().map(str::trim).find(|line| !line.is_empty()))
}

/// Builds the parameter set shared by command and group builders
///
/// The Version parameter goes first; a parameter named `context` is always
/// registered as the injected Context kind.
fn build_parameter_set(
    version: Option<&str>,
    params: Vec<(String, Parameter)>,
    context: &RuntimeContext,
) -> Result<ParameterSet, DefinitionError> {
    let mut set = ParameterSet::new();
    if let Some(version) = version {
        set.add("version", Parameter::version(version))?;
    }
    for (name, parameter) in params {
        let parameter = if name == CONTEXT_PARAM {
            Parameter::context()
        } else {
            parameter
        };
        set.add(&name, parameter)?;
    }
    set.set_context(context);
    Ok(set)
}

fn write_version(console: &mut Console, version: Option<&str>) -> CliResult<i32> {
    writeln!(console.out(), "{}", version.unwrap_or_default())?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_first_non_empty_line() {
        assert_eq!(summary_of(Some("\n  Clean names.\n\nLonger text")), Some("Clean names."));
        assert_eq!(summary_of(Some("")), None);
        assert_eq!(summary_of(None), None);
    }

    #[test]
    fn test_build_parameter_set_registers_version_first() {
        let context = RuntimeContext::with_cwd("/tmp");
        let set = build_parameter_set(
            Some("1.0.0"),
            vec![("name".to_string(), Parameter::string())],
            &context,
        )
        .unwrap();
        assert_eq!(set.parameters()[0].name(), "version");
        assert!(set.has_version());
    }

    #[test]
    fn test_context_name_is_special_cased() {
        let context = RuntimeContext::with_cwd("/tmp");
        let set = build_parameter_set(
            None,
            vec![(CONTEXT_PARAM.to_string(), Parameter::string())],
            &context,
        )
        .unwrap();
        let parameter = set.get(CONTEXT_PARAM).unwrap();
        assert_eq!(*parameter.kind(), crate::param::ParameterKind::Context);
        assert_eq!(set.positionals().count(), 0);
    }
}
