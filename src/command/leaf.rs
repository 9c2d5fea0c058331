use super::help::HelpPage;
use super::invocation::{Handler, Invocation, call_handler};
use super::{CONTEXT_PARAM, build_parameter_set, write_version};
use crate::console::Console;
use crate::context::RuntimeContext;
use crate::error::{CliResult, DefinitionError};
use crate::param::Parameter;
use crate::parser::{ParameterSet, ParseOutcome};
use log::debug;

/// A leaf command bound to a handler
pub struct Command {
    name: String,
    about: Option<String>,
    version: Option<String>,
    params: ParameterSet,
    context: RuntimeContext,
    handler: Option<Handler>,
}

/// Declares a [`Command`]
pub struct CommandBuilder {
    name: String,
    about: Option<String>,
    version: Option<String>,
    params: Vec<(String, Parameter)>,
    context: Option<RuntimeContext>,
    handler: Option<Handler>,
}

impl Command {
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            about: None,
            version: None,
            params: Vec::new(),
            context: None,
            handler: None,
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

    pub fn set_context(&mut self, context: &RuntimeContext) {
        self.context = context.clone();
        self.params.set_context(context);
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
            commands: Vec::new(),
        }
    }

    /// Parses `argv` and runs the handler
    ///
    /// `--version` and `--help` print and return 0 without calling the handler.
    pub fn invoke(&self, argv: &[String], console: &mut Console, isolated: bool) -> CliResult<i32> {
        debug!("invoking command `{}` with {} token(s)", self.name, argv.len());
        match self.params.parse_command(argv)? {
            ParseOutcome::VersionRequested => write_version(console, self.version.as_deref()),
            ParseOutcome::HelpRequested => {
                self.help_page().write(console.out())?;
                Ok(0)
            }
            ParseOutcome::Parsed(args) => {
                let invocation = Invocation::new(&self.name, args, self.context.clone(), console);
                let code = call_handler(self.handler.as_ref(), invocation, isolated)?;
                debug!("command `{}` finished with exit code {}", self.name, code);
                Ok(code)
            }
        }
    }
}

impl CommandBuilder {
    /// Description shown in help; its first line is the summary
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Registers `--version`, printing `version`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Registers `parameter` under `name`; positionals fill in this order
    pub fn param(mut self, name: impl Into<String>, parameter: Parameter) -> Self {
        self.params.push((name.into(), parameter));
        self
    }

    /// Registers the injected runtime context under `context`
    pub fn context_param(self) -> Self {
        self.param(CONTEXT_PARAM, Parameter::context())
    }

    /// Uses `context` instead of a fresh one
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

    pub fn build(self) -> Result<Command, DefinitionError> {
        let context = self.context.unwrap_or_default();
        let params = build_parameter_set(self.version.as_deref(), self.params, &context)?;
        Ok(Command {
            name: self.name,
            about: self.about,
            version: self.version,
            params,
            context,
            handler: self.handler,
        })
    }
}
