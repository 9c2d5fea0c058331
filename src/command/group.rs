use super::help::HelpPage;
use super::invocation::{Handler, Invocation, call_handler};
use super::leaf::CommandBuilder;
use super::{CONTEXT_PARAM, CommandNode, build_parameter_set, write_version};
use crate::console::Console;
use crate::context::RuntimeContext;
use crate::error::{CliError, CliResult, DefinitionError};
use crate::param::Parameter;
use crate::parser::{ParameterSet, ParseOutcome};
use log::debug;

/// A command that routes to named children
///
/// The group's own handler runs before a matched child, which makes it the
/// place to prepare shared context. Without a matched child the group prints
/// its help, or runs its handler when direct execution is allowed.
pub struct Group {
    name: String,
    about: Option<String>,
    version: Option<String>,
    params: ParameterSet,
    context: RuntimeContext,
    handler: Option<Handler>,
    allow_direct_execution: bool,
    children: Vec<CommandNode>,
}

/// Declares a [`Group`]
pub struct GroupBuilder {
    name: String,
    about: Option<String>,
    version: Option<String>,
    params: Vec<(String, Parameter)>,
    context: Option<RuntimeContext>,
    handler: Option<Handler>,
    allow_direct_execution: bool,
    children: Vec<CommandNode>,
}

impl Group {
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder {
            name: name.into(),
            about: None,
            version: None,
            params: Vec::new(),
            context: None,
            handler: None,
            allow_direct_execution: false,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn context(&self) -> &RuntimeContext {
        &self.context
    }

    pub fn allows_direct_execution(&self) -> bool {
        self.allow_direct_execution
    }

    /// Children in registration order
    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// Registers a built node, pushing this group's context into it
    pub fn add_child(&mut self, child: impl Into<CommandNode>) -> Result<(), DefinitionError> {
        let mut child = child.into();
        if self.child(child.name()).is_some() {
            return Err(DefinitionError::DuplicateCommand(child.name().to_string()));
        }
        child.set_context(&self.context);
        self.children.push(child);
        Ok(())
    }

    /// Builds a command relative to this group and registers it
    pub fn add_command(&mut self, command: CommandBuilder) -> Result<(), DefinitionError> {
        let command = command.context(self.context.clone()).build()?;
        self.add_child(command)
    }

    /// Builds a nested group relative to this group and registers it
    pub fn add_group(&mut self, group: GroupBuilder) -> Result<(), DefinitionError> {
        let group = group.context(self.context.clone()).build()?;
        self.add_child(group)
    }

    pub fn set_context(&mut self, context: &RuntimeContext) {
        self.context = context.clone();
        self.params.set_context(context);
        for child in &mut self.children {
            child.set_context(context);
        }
    }

    pub fn render_help(&self) -> String {
        let mut console = Console::captured();
        // Writing into an in-memory buffer cannot fail
        let _ = self.help_page().write(console.out());
        console.into_captured().0
    }

    fn help_page(&self) -> HelpPage<'_> {
        HelpPage {
            name: &self.name,
            about: self.about.as_deref(),
            params: &self.params,
            commands: self
                .children
                .iter()
                .map(|child| (child.name(), child.summary()))
                .collect(),
        }
    }

    fn write_help(&self, console: &mut Console) -> CliResult<i32> {
        self.help_page().write(console.out())?;
        Ok(0)
    }

    /// Parses `argv` up to the first child name and dispatches
    ///
    /// Tokens after the child name, including `--help` and `--version`, belong
    /// to the child.
    pub fn invoke(&self, argv: &[String], console: &mut Console, isolated: bool) -> CliResult<i32> {
        debug!("invoking group `{}` with {} token(s)", self.name, argv.len());
        let names: Vec<&str> = self.children.iter().map(CommandNode::name).collect();
        let parse = self.params.parse_group(argv, &names)?;

        let args = match parse.outcome {
            ParseOutcome::VersionRequested => {
                return write_version(console, self.version.as_deref());
            }
            ParseOutcome::HelpRequested => return self.write_help(console),
            ParseOutcome::Parsed(args) => args,
        };

        if let Some((name, rest)) = parse.child {
            // `parse_group` only matches names taken from `self.children`
            let child = self.child(&name).ok_or_else(|| {
                CliError::extra_argument(format!("Extra argument provided `{}`", name))
            })?;
            let invocation = Invocation::new(&self.name, args, self.context.clone(), console);
            let code = call_handler(self.handler.as_ref(), invocation, isolated)?;
            if code != 0 {
                debug!("group `{}` handler failed, skipping `{}`", self.name, name);
                return Ok(code);
            }
            debug!("group `{}` dispatching to `{}`", self.name, name);
            return child.invoke(&rest, console, isolated);
        }

        if self.allow_direct_execution {
            let invocation = Invocation::new(&self.name, args, self.context.clone(), console);
            return call_handler(self.handler.as_ref(), invocation, isolated);
        }
        self.write_help(console)
    }
}

impl GroupBuilder {
    /// Description shown in help; its first line is the summary
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, parameter: Parameter) -> Self {
        self.params.push((name.into(), parameter));
        self
    }

    pub fn context_param(self) -> Self {
        self.param(CONTEXT_PARAM, Parameter::context())
    }

    pub fn context(mut self, context: RuntimeContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> anyhow::Result<()> + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Runs the group's own handler when no child is named
    pub fn allow_direct_execution(mut self, allow: bool) -> Self {
        self.allow_direct_execution = allow;
        self
    }

    pub fn command(mut self, command: super::Command) -> Self {
        self.children.push(command.into());
        self
    }

    pub fn group(mut self, group: Group) -> Self {
        self.children.push(group.into());
        self
    }

    pub fn build(self) -> Result<Group, DefinitionError> {
        let context = self.context.unwrap_or_default();
        let params = build_parameter_set(self.version.as_deref(), self.params, &context)?;
        let mut group = Group {
            name: self.name,
            about: self.about,
            version: self.version,
            params,
            context,
            handler: self.handler,
            allow_direct_execution: self.allow_direct_execution,
            children: Vec::new(),
        };
        for child in self.children {
            group.add_child(child)?;
        }
        Ok(group)
    }
}
