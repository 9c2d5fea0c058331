//! Help page rendering for commands and groups

use crate::param::ParameterKind;
use crate::parser::ParameterSet;
use std::io::{self, Write};
use termcolor::{ColorSpec, WriteColor};

const INDENT: &str = "    ";
const HELP_LINE: &str = "--help                        Show help and exit.";

/// The pieces of one help page
pub(crate) struct HelpPage<'a> {
    pub name: &'a str,
    pub about: Option<&'a str>,
    pub params: &'a ParameterSet,
    /// `(name, one-line summary)` of each child, empty for leaf commands
    pub commands: Vec<(&'a str, Option<&'a str>)>,
}

impl HelpPage<'_> {
    pub fn write(&self, out: &mut dyn WriteColor) -> io::Result<()> {
        let mut usage = format!("Usage: {} [OPTIONS]", self.name);
        for var in self.params.arg_vars() {
            usage.push(' ');
            usage.push_str(&var);
        }
        if !self.commands.is_empty() {
            usage.push_str(" COMMAND [ARGS]...");
        }
        writeln!(out, "{}", usage)?;

        if let Some(about) = self.about {
            writeln!(out)?;
            for line in about.lines() {
                if line.trim().is_empty() {
                    writeln!(out)?;
                } else {
                    writeln!(out, "\t{}", line.trim_end())?;
                }
            }
        }

        let positionals: Vec<String> = self
            .params
            .positionals()
            .filter(|p| p.help_text().is_some() || p.env_var().is_some())
            .map(|p| p.help_line())
            .collect();
        if !positionals.is_empty() {
            section(out, "Arguments:")?;
            for line in positionals {
                entry(out, &line)?;
            }
        }

        section(out, "Options:")?;
        for parameter in self.params.named() {
            if *parameter.kind() == ParameterKind::Context {
                continue;
            }
            entry(out, &parameter.help_line())?;
        }
        entry(out, HELP_LINE)?;

        if !self.commands.is_empty() {
            section(out, "Commands:")?;
            for (name, summary) in &self.commands {
                let line = match summary {
                    Some(summary) => crate::param::align_help(name.to_string(), summary),
                    None => name.to_string(),
                };
                entry(out, &line)?;
            }
        }
        Ok(())
    }
}

fn section(out: &mut dyn WriteColor, title: &str) -> io::Result<()> {
    writeln!(out)?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "{}", title)?;
    out.reset()?;
    writeln!(out)?;
    writeln!(out)
}

/// Writes one indented entry; continuation lines keep their own indentation
fn entry(out: &mut dyn WriteColor, line: &str) -> io::Result<()> {
    let mut lines = line.lines();
    if let Some(first) = lines.next() {
        writeln!(out, "{}{}", INDENT, first)?;
    }
    for rest in lines {
        writeln!(out, "{}", rest)?;
    }
    Ok(())
}
