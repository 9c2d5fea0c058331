#![forbid(unsafe_code)]

//! Output streams for help, version and handler output
//!
//! Commands never print directly. They write through a [`Console`], which is
//! either attached to the real terminal streams or captures everything into
//! in-memory buffers for isolated runs.

use std::io::Write;
use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Destination for standard output and standard error
pub enum Console {
    Terminal {
        stdout: StandardStream,
        stderr: StandardStream,
    },
    Captured {
        stdout: Buffer,
        stderr: Buffer,
    },
}

impl Console {
    /// Writes to the process streams with the given colour policy
    pub fn terminal(color_choice: ColorChoice) -> Self {
        Console::Terminal {
            stdout: StandardStream::stdout(color_choice),
            stderr: StandardStream::stderr(color_choice),
        }
    }

    /// Captures both streams into uncoloured buffers
    pub fn captured() -> Self {
        Console::Captured {
            stdout: Buffer::no_color(),
            stderr: Buffer::no_color(),
        }
    }

    pub fn out(&mut self) -> &mut dyn WriteColor {
        match self {
            Console::Terminal { stdout, .. } => stdout,
            Console::Captured { stdout, .. } => stdout,
        }
    }

    pub fn err(&mut self) -> &mut dyn WriteColor {
        match self {
            Console::Terminal { stderr, .. } => stderr,
            Console::Captured { stderr, .. } => stderr,
        }
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, Console::Captured { .. })
    }

    /// Writes `message` to standard error in red, followed by a newline
    pub fn error_line(&mut self, message: &str) -> std::io::Result<()> {
        let stderr = self.err();
        stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        write!(stderr, "{}", message)?;
        stderr.reset()?;
        writeln!(stderr)
    }

    /// Flushes and returns the captured `(stdout, stderr)` text
    ///
    /// A terminal console has nothing to return and yields empty strings.
    pub fn into_captured(self) -> (String, String) {
        match self {
            Console::Terminal {
                mut stdout,
                mut stderr,
            } => {
                let _ = stdout.flush();
                let _ = stderr.flush();
                (String::new(), String::new())
            }
            Console::Captured { stdout, stderr } => (
                String::from_utf8_lossy(&stdout.into_inner()).into_owned(),
                String::from_utf8_lossy(&stderr.into_inner()).into_owned(),
            ),
        }
    }
}
