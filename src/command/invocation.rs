use crate::console::Console;
use crate::context::RuntimeContext;
use crate::error::{CliError, CliResult};
use crate::param::ChoiceEnum;
use crate::parser::{FromArgs, FromValue, ParsedArgs};
use log::debug;
use termcolor::WriteColor;

/// Callable bound to a command or group
pub type Handler = Box<dyn Fn(&mut Invocation<'_>) -> anyhow::Result<()>>;

/// Everything a handler receives for one call
pub struct Invocation<'a> {
    command: &'a str,
    args: ParsedArgs,
    context: RuntimeContext,
    console: &'a mut Console,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        command: &'a str,
        args: ParsedArgs,
        context: RuntimeContext,
        console: &'a mut Console,
    ) -> Self {
        Invocation {
            command,
            args,
            context,
            console,
        }
    }

    /// Name of the command being run
    pub fn command_name(&self) -> &str {
        self.command
    }

    /// Builds the command's typed argument record
    pub fn args<T: FromArgs>(&self) -> CliResult<T> {
        T::from_args(&self.args)
    }

    pub fn parsed(&self) -> &ParsedArgs {
        &self.args
    }

    pub fn get<T: FromValue>(&self, name: &str) -> CliResult<T> {
        self.args.get(name)
    }

    pub fn choice<E: ChoiceEnum>(&self, name: &str) -> CliResult<Option<E>> {
        self.args.choice(name)
    }

    pub fn context(&self) -> &RuntimeContext {
        &self.context
    }

    pub fn out(&mut self) -> &mut dyn WriteColor {
        self.console.out()
    }

    pub fn err(&mut self) -> &mut dyn WriteColor {
        self.console.err()
    }
}

/// Calls `handler` and maps its failure to an exit code or a framework error
///
/// With `isolated` set, a failure is logged and becomes exit code 1 instead of
/// propagating.
pub(crate) fn call_handler(
    handler: Option<&Handler>,
    mut invocation: Invocation<'_>,
    isolated: bool,
) -> CliResult<i32> {
    let Some(handler) = handler else {
        return Ok(0);
    };
    match handler(&mut invocation) {
        Ok(()) => Ok(0),
        Err(error) if isolated => {
            debug!(
                "handler of `{}` failed in isolated mode: {:#}",
                invocation.command, error
            );
            Ok(1)
        }
        Err(error) => Err(CliError::from_handler(error)),
    }
}
