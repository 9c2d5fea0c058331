//! Entry points that run a command tree against an argument vector

use crate::command::CommandNode;
use crate::console::Console;
use log::{debug, trace};
use serde::Serialize;
use termcolor::ColorChoice;

/// Outcome of one run
///
/// `stdout` and `stderr` are only populated by [`run_isolated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs `tree` on the process streams
///
/// `argv` defaults to the process arguments without the program name.
/// Framework failures are printed to standard error and become the exit code.
pub fn run(tree: &CommandNode, argv: Option<Vec<String>>) -> RunResult {
    let argv = argv.unwrap_or_else(|| {
        std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    });
    execute(tree, &argv, Console::terminal(ColorChoice::Auto))
}

/// Runs `tree` with both streams captured
///
/// Nothing reaches the real terminal and the process is never terminated,
/// which makes this the entry point for tests.
pub fn run_isolated(tree: &CommandNode, argv: Vec<String>) -> RunResult {
    execute(tree, &argv, Console::captured())
}

/// Runs `tree` with the process arguments and exits with its code
pub fn run_and_exit(tree: &CommandNode) -> ! {
    let result = run(tree, None);
    std::process::exit(result.exit_code)
}

/// Handler failures propagate as framework errors; isolation is left to direct
/// callers of [`CommandNode::invoke`]
fn execute(tree: &CommandNode, argv: &[String], mut console: Console) -> RunResult {
    trace!("running `{}` with argv {:?}", tree.name(), argv);
    let exit_code = match tree.invoke(argv, &mut console, false) {
        Ok(code) => code,
        Err(error) => {
            debug!("`{}` failed: {:?}", tree.name(), error);
            // A broken stderr leaves nothing else to report to
            let _ = console.error_line(error.message());
            error.exit_code()
        }
    };
    let (stdout, stderr) = console.into_captured();
    RunResult {
        exit_code,
        stdout,
        stderr,
    }
}
