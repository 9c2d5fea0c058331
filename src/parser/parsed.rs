//! Parsed argument values and typed access to them

use crate::context::RuntimeContext;
use crate::error::{CliError, CliResult};
use crate::param::{ChoiceEnum, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Values produced by one successful parse
///
/// Positional values keep declaration order. Every named parameter has an
/// entry; it is `None` when the flag was absent and no default was declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    positional: Vec<(String, Value)>,
    named: BTreeMap<String, Option<Value>>,
}

impl ParsedArgs {
    pub(crate) fn push_positional(&mut self, name: &str, value: Value) {
        self.positional.push((name.to_string(), value));
    }

    pub(crate) fn insert_named(&mut self, name: &str, value: Option<Value>) {
        self.named.insert(name.to_string(), value);
    }

    /// True when `name` was declared, whether or not it holds a value
    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name) || self.positional.iter().any(|(n, _)| n == name)
    }

    /// Value bound to `name`, positional or named
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.positional
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .or_else(|| self.named.get(name).and_then(Option::as_ref))
    }

    pub fn positional_values(&self) -> Vec<&Value> {
        self.positional.iter().map(|(_, v)| v).collect()
    }

    pub fn named_values(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.named.iter().map(|(n, v)| (n.as_str(), v.as_ref()))
    }

    /// Reads `name` as `T`
    ///
    /// Use `Option<T>` for named parameters declared without a default.
    pub fn get<T: FromValue>(&self, name: &str) -> CliResult<T> {
        T::from_value(name, self.value(name))
    }

    /// Reads a `Choice` or `ChoiceByFlag` parameter as its enumeration
    pub fn choice<E: ChoiceEnum>(&self, name: &str) -> CliResult<Option<E>> {
        match self.value(name) {
            None => Ok(None),
            Some(Value::Choice(value)) => E::from_value(value).map(Some).ok_or_else(|| {
                CliError::parsing(format!("Unknown choice `{}` for `{}`", value, name))
            }),
            Some(other) => Err(mismatch(name, "choice", other)),
        }
    }

    /// The injected runtime context, if a Context parameter was declared
    pub fn context(&self) -> Option<RuntimeContext> {
        self.named.values().find_map(|v| match v {
            Some(Value::Context(context)) => Some(context.clone()),
            _ => None,
        })
    }
}

/// Conversion from a parsed value to a concrete Rust type
pub trait FromValue: Sized {
    fn from_value(name: &str, value: Option<&Value>) -> CliResult<Self>;
}

/// A per-command record built from its parsed arguments
///
/// ```
/// use cmdtree::{CliResult, FromArgs, ParsedArgs};
///
/// struct Greet {
///     name: String,
///     loud: bool,
/// }
///
/// impl FromArgs for Greet {
///     fn from_args(args: &ParsedArgs) -> CliResult<Self> {
///         Ok(Greet {
///             name: args.get("name")?,
///             loud: args.get("loud")?,
///         })
///     }
/// }
/// ```
pub trait FromArgs: Sized {
    fn from_args(args: &ParsedArgs) -> CliResult<Self>;
}

impl FromArgs for ParsedArgs {
    fn from_args(args: &ParsedArgs) -> CliResult<Self> {
        Ok(args.clone())
    }
}

fn mismatch(name: &str, expected: &str, found: &Value) -> CliError {
    CliError::parsing(format!(
        "Parameter `{}` holds a {} value, not {}",
        name,
        found.type_name(),
        expected
    ))
}

fn absent(name: &str) -> CliError {
    CliError::parsing(format!("Parameter `{}` has no value", name))
}

macro_rules! impl_from_value {
    ($ty:ty, $expected:literal, $($pattern:pat => $result:expr),+) => {
        impl FromValue for $ty {
            fn from_value(name: &str, value: Option<&Value>) -> CliResult<Self> {
                match value {
                    $(Some($pattern) => Ok($result),)+
                    Some(other) => Err(mismatch(name, $expected, other)),
                    None => Err(absent(name)),
                }
            }
        }
    };
}

impl_from_value!(String, "string",
    Value::Str(s) => s.clone(),
    Value::Choice(s) => s.clone(),
    Value::Version(s) => s.clone()
);
impl_from_value!(i64, "integer", Value::Int(i) => *i);
impl_from_value!(f64, "float",
    Value::Float(f) => *f,
    Value::Int(i) => *i as f64
);
impl_from_value!(bool, "boolean", Value::Bool(b) => *b);
impl_from_value!(Vec<String>, "list", Value::List(items) => items.clone());
impl_from_value!(PathBuf, "path", Value::Path(path) => path.clone());
impl_from_value!(RuntimeContext, "context", Value::Context(context) => context.clone());

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(name: &str, value: Option<&Value>) -> CliResult<Self> {
        match value {
            None => Ok(None),
            Some(_) => T::from_value(name, value).map(Some),
        }
    }
}
