#![forbid(unsafe_code)]

//! Parameter registration and the token scanning state machine
//!
//! A [`ParameterSet`] is immutable once a command is built. Each parse starts
//! from a fresh [`ScanState`] derived from it, so container accumulation and
//! consumed flags never leak from one invocation into the next.

use super::parsed::ParsedArgs;
use crate::context::RuntimeContext;
use crate::error::{CliError, CliResult, DefinitionError};
use crate::param::{Parameter, ParameterKind, Value};
use log::trace;
use std::collections::{HashMap, VecDeque};

/// Reserved flag that requests help output
pub const HELP_FLAG: &str = "--help";

/// Flag registered by a Version parameter
pub const VERSION_FLAG: &str = "--version";

const FLAG_PREFIX: char = '-';

/// Result of scanning an argument vector
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(ParsedArgs),
    HelpRequested,
    VersionRequested,
}

/// Result of scanning an argument vector for a group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupParse {
    pub outcome: ParseOutcome,
    /// Matched child name and the tokens that follow it
    pub child: Option<(String, Vec<String>)>,
}

/// Ordered positional definitions plus a flag table for named ones
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    definitions: Vec<Parameter>,
    positional: Vec<usize>,
    flags: HashMap<String, usize>,
}

/// Mutable state of one parse
struct ScanState {
    positional: VecDeque<usize>,
    flags: HashMap<String, usize>,
    accumulators: HashMap<usize, Vec<String>>,
    args: ParsedArgs,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `parameter` to `name` and registers it
    pub fn add(&mut self, name: &str, parameter: Parameter) -> Result<(), DefinitionError> {
        if self.get(name).is_some() {
            return Err(DefinitionError::DuplicateName(name.to_string()));
        }
        let parameter = parameter.bind(name);
        let flags = parameter.flags();
        for flag in &flags {
            if !flag.starts_with(FLAG_PREFIX) {
                return Err(DefinitionError::InvalidFlag {
                    name: name.to_string(),
                    flag: flag.clone(),
                });
            }
            if flag == HELP_FLAG {
                return Err(DefinitionError::ReservedFlag(flag.clone()));
            }
            if self.flags.contains_key(flag) || flags.iter().filter(|f| *f == flag).count() > 1 {
                return Err(DefinitionError::DuplicateFlag {
                    name: name.to_string(),
                    flag: flag.clone(),
                });
            }
        }

        let index = self.definitions.len();
        if parameter.is_positional() {
            self.positional.push(index);
        } else {
            for flag in flags {
                self.flags.insert(flag, index);
            }
        }
        self.definitions.push(parameter);
        Ok(())
    }

    /// Pushes `context` into every Context parameter
    pub fn set_context(&mut self, context: &RuntimeContext) {
        for parameter in &mut self.definitions {
            parameter.inject_context(context);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.definitions.iter().find(|p| p.name() == name)
    }

    /// All parameters in declaration order
    pub fn parameters(&self) -> &[Parameter] {
        &self.definitions
    }

    pub fn positionals(&self) -> impl Iterator<Item = &Parameter> {
        self.positional.iter().map(|&i| &self.definitions[i])
    }

    /// Named parameters that can be selected by a flag, in declaration order
    pub fn named(&self) -> impl Iterator<Item = &Parameter> {
        self.definitions
            .iter()
            .filter(|p| !p.is_positional() && *p.kind() != ParameterKind::Context)
    }

    pub fn has_version(&self) -> bool {
        self.definitions
            .iter()
            .any(|p| *p.kind() == ParameterKind::Version)
    }

    /// Variable names of the positional parameters, for the usage line
    pub fn arg_vars(&self) -> Vec<String> {
        self.positionals().map(Parameter::var).collect()
    }

    /// Parses the argument vector of a leaf command
    pub fn parse_command(&self, argv: &[String]) -> CliResult<ParseOutcome> {
        self.scan(argv, &[]).map(|parse| parse.outcome)
    }

    /// Parses the argument vector of a group
    ///
    /// Scanning stops at the first token equal to one of `children`; that
    /// token and everything after it are handed back for delegation.
    pub fn parse_group(&self, argv: &[String], children: &[&str]) -> CliResult<GroupParse> {
        self.scan(argv, children)
    }

    fn begin(&self) -> ScanState {
        ScanState {
            positional: self.positional.iter().copied().collect(),
            flags: self.flags.clone(),
            accumulators: HashMap::new(),
            args: ParsedArgs::default(),
        }
    }

    /// True for `--help`, and for `--version` when a Version parameter is registered
    fn is_short_circuit(&self, token: &str) -> bool {
        token == HELP_FLAG || (token == VERSION_FLAG && self.has_version())
    }

    fn scan(&self, argv: &[String], children: &[&str]) -> CliResult<GroupParse> {
        let mut state = self.begin();
        let mut child = None;

        let mut position = 0;
        while position < argv.len() {
            let token = &argv[position];
            position += 1;

            if token == HELP_FLAG {
                return Ok(GroupParse {
                    outcome: ParseOutcome::HelpRequested,
                    child: None,
                });
            }
            if token == VERSION_FLAG && self.has_version() {
                return Ok(GroupParse {
                    outcome: ParseOutcome::VersionRequested,
                    child: None,
                });
            }
            if children.contains(&token.as_str()) {
                trace!("matched subcommand `{}` at position {}", token, position - 1);
                child = Some((token.clone(), argv[position..].to_vec()));
                break;
            }
            if token.starts_with(FLAG_PREFIX) {
                if self.consume_flag(&mut state, token, argv.get(position))? {
                    position += 1;
                }
            } else {
                self.consume_positional(&mut state, token)?;
            }
        }

        self.finish(state).map(|args| GroupParse {
            outcome: ParseOutcome::Parsed(args),
            child,
        })
    }

    /// Consumes one flag token
    ///
    /// Returns true when the following token was taken as the flag's value.
    fn consume_flag(
        &self,
        state: &mut ScanState,
        token: &str,
        next: Option<&String>,
    ) -> CliResult<bool> {
        let (flag, inline) = match token.split_once('=') {
            Some((flag, value)) => (flag, Some(value)),
            None => (token, None),
        };
        let Some(index) = state.flags.remove(flag) else {
            return Err(CliError::extra_argument(format!(
                "Extra argument provided with flag `{}`",
                flag
            )));
        };
        let parameter = &self.definitions[index];
        trace!("flag `{}` selects parameter `{}`", flag, parameter.name());

        let (value, took_next) = match (inline, next) {
            (Some(value), _) => (value, false),
            (None, _) if !parameter.takes_value() => (flag, false),
            // Left for the scan loop, which short-circuits on it
            (None, Some(next)) if self.is_short_circuit(next) => return Ok(false),
            (None, Some(next)) => (next.as_str(), true),
            (None, None) => {
                return Err(CliError::arguments_missing(format!(
                    "Missing value for flag `{}`",
                    flag
                )));
            }
        };

        let accumulator = state.accumulators.entry(index).or_default();
        let parsed = parameter.parse(flag, value, accumulator)?;
        state.args.insert_named(parameter.name(), Some(parsed));

        if parameter.is_container() {
            state.flags.insert(flag.to_string(), index);
        } else {
            for other in parameter.flags() {
                state.flags.remove(&other);
            }
        }
        Ok(took_next)
    }

    fn consume_positional(&self, state: &mut ScanState, token: &str) -> CliResult<()> {
        let Some(index) = state.positional.pop_front() else {
            return Err(CliError::extra_argument(format!(
                "Extra argument provided `{}`",
                token
            )));
        };
        let parameter = &self.definitions[index];
        trace!("token `{}` fills positional `{}`", token, parameter.name());

        let accumulator = state.accumulators.entry(index).or_default();
        let parsed = parameter.parse(token, token, accumulator)?;
        state.args.push_positional(parameter.name(), parsed);
        Ok(())
    }

    /// Checks for unfilled positionals and fills unsupplied named parameters
    fn finish(&self, state: ScanState) -> CliResult<ParsedArgs> {
        let ScanState {
            positional,
            mut args,
            ..
        } = state;

        if !positional.is_empty() {
            let missing: Vec<String> = positional
                .iter()
                .map(|&i| self.definitions[i].metavar())
                .collect();
            return Err(CliError::arguments_missing(format!(
                "Missing argument for positional arguments {}",
                missing.join(", ")
            )));
        }

        for parameter in &self.definitions {
            if parameter.is_positional()
                || *parameter.kind() == ParameterKind::Version
                || args.contains(parameter.name())
            {
                continue;
            }
            // An unsupplied container holds its (empty) accumulator, not its default
            let value = if parameter.is_container() {
                Some(Value::List(Vec::new()))
            } else {
                parameter.default_value().cloned()
            };
            args.insert_named(parameter.name(), value);
        }
        Ok(args)
    }
}
