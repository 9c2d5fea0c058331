use super::choice::{ChoiceEnum, ChoiceSet};
use super::value::Value;
use crate::error::{CliError, CliResult};
use std::path::PathBuf;

/// Filesystem checks applied to `File` and `Directory` parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathCheck {
    /// Fail when the path does not exist
    pub exists: bool,
    /// Return the absolute, canonical form of the path
    pub resolve: bool,
}

/// The closed set of parameter variants
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    String,
    Integer,
    Float,
    /// Flag presence toggles away from the default; never consumes a value
    Boolean,
    /// Every occurrence appends to an ordered sequence
    StringList,
    /// The token must equal the `value()` of one member
    Choice(ChoiceSet),
    /// Each member is exposed as its own long flag
    ChoiceByFlag(ChoiceSet),
    File(PathCheck),
    Directory(PathCheck),
    /// Injected with the runtime context, never read from argv
    Context,
    /// Registers `--version`, which short-circuits parsing
    Version,
}

impl ParameterKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterKind::String => "string",
            ParameterKind::Integer => "integer",
            ParameterKind::Float => "float",
            ParameterKind::Boolean => "boolean",
            ParameterKind::StringList => "list",
            ParameterKind::Choice(_) | ParameterKind::ChoiceByFlag(_) => "choice",
            ParameterKind::File(_) => "file",
            ParameterKind::Directory(_) => "directory",
            ParameterKind::Context => "context",
            ParameterKind::Version => "version",
        }
    }

    /// Container parameters accumulate instead of being replaced
    pub fn is_container(&self) -> bool {
        matches!(self, ParameterKind::StringList)
    }
}

/// One bindable argument
///
/// Built with the kind constructors and the chained setters, then bound to a
/// name when registered on a command. A parameter with neither a default nor
/// a flag is positional; anything else is a named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    short_flag: Option<String>,
    long_flag: Option<String>,
    default: Option<Value>,
    help: Option<String>,
    env: Option<String>,
    kind: ParameterKind,
}

impl Parameter {
    fn of_kind(kind: ParameterKind) -> Self {
        Parameter {
            name: String::new(),
            short_flag: None,
            long_flag: None,
            default: None,
            help: None,
            env: None,
            kind,
        }
    }

    pub fn string() -> Self {
        Self::of_kind(ParameterKind::String)
    }

    pub fn integer() -> Self {
        Self::of_kind(ParameterKind::Integer)
    }

    pub fn float() -> Self {
        Self::of_kind(ParameterKind::Float)
    }

    /// Boolean flag, defaulting to `false`
    pub fn boolean() -> Self {
        Self::of_kind(ParameterKind::Boolean).default(false)
    }

    /// Repeatable string flag, defaulting to an empty list
    pub fn string_list() -> Self {
        Self::of_kind(ParameterKind::StringList).default(Vec::<String>::new())
    }

    pub fn choice<E: ChoiceEnum>() -> Self {
        Self::of_kind(ParameterKind::Choice(ChoiceSet::of::<E>()))
    }

    pub fn choice_by_flag<E: ChoiceEnum>() -> Self {
        Self::of_kind(ParameterKind::ChoiceByFlag(ChoiceSet::of::<E>()))
    }

    pub fn file() -> Self {
        Self::of_kind(ParameterKind::File(PathCheck::default()))
    }

    pub fn directory() -> Self {
        Self::of_kind(ParameterKind::Directory(PathCheck::default()))
    }

    pub fn context() -> Self {
        Self::of_kind(ParameterKind::Context)
    }

    pub fn version(version: impl Into<String>) -> Self {
        let mut parameter = Self::of_kind(ParameterKind::Version)
            .long("--version")
            .help("Program version");
        parameter.default = Some(Value::Version(version.into()));
        parameter
    }

    pub fn short(mut self, flag: impl Into<String>) -> Self {
        self.short_flag = Some(flag.into());
        self
    }

    pub fn long(mut self, flag: impl Into<String>) -> Self {
        self.long_flag = Some(flag.into());
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the default of a `Choice` or `ChoiceByFlag` parameter
    pub fn default_choice<E: ChoiceEnum>(mut self, choice: E) -> Self {
        self.default = Some(Value::Choice(choice.value().to_string()));
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Names an environment variable as a secondary default source
    ///
    /// The variable is shown in help output; argv parsing does not read it.
    pub fn env(mut self, variable: impl Into<String>) -> Self {
        self.env = Some(variable.into());
        self
    }

    /// Requires the path to exist (`File` and `Directory` only)
    pub fn exists(mut self, exists: bool) -> Self {
        if let ParameterKind::File(check) | ParameterKind::Directory(check) = &mut self.kind {
            check.exists = exists;
        }
        self
    }

    /// Resolves the path to an absolute one (`File` and `Directory` only)
    pub fn resolve(mut self, resolve: bool) -> Self {
        if let ParameterKind::File(check) | ParameterKind::Directory(check) = &mut self.kind {
            check.resolve = resolve;
        }
        self
    }

    /// Binds the parameter to its name
    ///
    /// A named parameter with a default but no long flag gets one derived
    /// from the name.
    pub(crate) fn bind(mut self, name: &str) -> Self {
        self.name = name.to_string();
        let flagless = self.short_flag.is_none() && self.long_flag.is_none();
        let derives_flag = !matches!(
            self.kind,
            ParameterKind::ChoiceByFlag(_) | ParameterKind::Context | ParameterKind::Version
        );
        if flagless && derives_flag && self.default.is_some() {
            self.long_flag = Some(format!("--{}", name.to_lowercase().replace('_', "-")));
        }
        self
    }

    pub(crate) fn inject_context(&mut self, context: &crate::context::RuntimeContext) {
        if self.kind == ParameterKind::Context {
            self.default = Some(Value::Context(context.clone()));
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_flag(&self) -> Option<&str> {
        self.short_flag.as_deref()
    }

    pub fn long_flag(&self) -> Option<&str> {
        self.long_flag.as_deref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn env_var(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// True when a bare flag takes the following token as its value
    pub fn takes_value(&self) -> bool {
        !matches!(
            self.kind,
            ParameterKind::Boolean
                | ParameterKind::ChoiceByFlag(_)
                | ParameterKind::Context
                | ParameterKind::Version
        )
    }

    /// True when the parameter is filled by position rather than by flag
    pub fn is_positional(&self) -> bool {
        match self.kind {
            ParameterKind::ChoiceByFlag(_) | ParameterKind::Context | ParameterKind::Version => {
                false
            }
            _ => self.default.is_none() && self.short_flag.is_none() && self.long_flag.is_none(),
        }
    }

    /// Every flag string that selects this parameter
    pub fn flags(&self) -> Vec<String> {
        match &self.kind {
            ParameterKind::ChoiceByFlag(set) => set.flags(),
            ParameterKind::Context => Vec::new(),
            _ => self
                .short_flag
                .iter()
                .chain(self.long_flag.iter())
                .cloned()
                .collect(),
        }
    }

    /// Display form used in messages, e.g. `<COUNT type=integer>`
    pub fn metavar(&self) -> String {
        format!("<{} type={}>", self.var(), self.kind.type_name())
    }

    /// Display form used in the usage line, e.g. `COUNT`
    pub fn var(&self) -> String {
        self.name.to_uppercase()
    }

    /// Converts one raw token into this parameter's typed value
    ///
    /// `flag` is the flag the token was supplied with (the token itself for
    /// flag-only kinds), `accumulator` is this parameter's per-parse container.
    pub fn parse(&self, flag: &str, raw: &str, accumulator: &mut Vec<String>) -> CliResult<Value> {
        match &self.kind {
            ParameterKind::String => Ok(Value::Str(raw.to_string())),
            ParameterKind::Integer => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| self.conversion_error(raw)),
            ParameterKind::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| self.conversion_error(raw)),
            ParameterKind::Boolean => {
                let default = matches!(self.default, Some(Value::Bool(true)));
                Ok(Value::Bool(!default))
            }
            ParameterKind::StringList => {
                accumulator.push(raw.to_string());
                Ok(Value::List(accumulator.clone()))
            }
            ParameterKind::Choice(set) => set
                .by_value(raw)
                .map(|member| Value::Choice(member.value.clone()))
                .ok_or_else(|| self.choice_error(raw, set)),
            ParameterKind::ChoiceByFlag(set) => set
                .by_flag(flag)
                .map(|member| Value::Choice(member.value.clone()))
                .ok_or_else(|| self.choice_error(flag, set)),
            ParameterKind::File(check) => self.parse_path(raw, *check, false),
            ParameterKind::Directory(check) => self.parse_path(raw, *check, true),
            ParameterKind::Version => Ok(self
                .default
                .clone()
                .unwrap_or_else(|| Value::Version(String::new()))),
            ParameterKind::Context => Err(CliError::parsing(format!(
                "Parameter {} cannot be supplied on the command line",
                self.metavar()
            ))),
        }
    }

    fn parse_path(&self, raw: &str, check: PathCheck, directory: bool) -> CliResult<Value> {
        let path = PathBuf::from(raw);
        let display = self.display_flag();
        let exists = path.exists();

        if check.exists && !exists {
            return Err(CliError::parsing(format!(
                "Invalid value for {} provided path `{}` does not exist",
                display,
                path.display()
            )));
        }
        if exists && directory && !path.is_dir() {
            return Err(CliError::parsing(format!(
                "Invalid value for {} provided path `{}` is not a directory",
                display,
                path.display()
            )));
        }
        if exists && !directory && !path.is_file() {
            return Err(CliError::parsing(format!(
                "Invalid value for {} provided path `{}` is not a file",
                display,
                path.display()
            )));
        }

        if !check.resolve {
            return Ok(Value::Path(path));
        }
        let resolved = if exists {
            path.canonicalize()
        } else {
            std::path::absolute(&path)
        };
        resolved.map(Value::Path).map_err(|e| {
            CliError::parsing(format!(
                "Invalid value for {} could not resolve `{}`: {}",
                display,
                path.display(),
                e
            ))
        })
    }

    /// The flag a user would recognise this parameter by
    fn display_flag(&self) -> String {
        self.short_flag
            .clone()
            .or_else(|| self.long_flag.clone())
            .unwrap_or_else(|| self.metavar())
    }

    fn conversion_error(&self, raw: &str) -> CliError {
        CliError::parsing(format!(
            "Error parsing value for {}; Provided value={}; Expected type={}",
            self.metavar(),
            raw,
            self.kind.type_name()
        ))
    }

    fn choice_error(&self, raw: &str, set: &ChoiceSet) -> CliError {
        CliError::parsing(format!(
            "Error parsing value for {}; Provided value={}; Expected value from {}",
            self.metavar(),
            raw,
            set.values_display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Shape {
        Circle,
        Square,
    }

    crate::choice_enum!(Shape {
        Circle => "circle",
        Square => "square",
    });

    fn parse(parameter: &Parameter, raw: &str) -> CliResult<Value> {
        let mut accumulator = Vec::new();
        parameter.parse(raw, raw, &mut accumulator)
    }

    #[test]
    fn test_positional_versus_named() {
        assert!(Parameter::string().bind("name").is_positional());
        assert!(!Parameter::string().short("-n").bind("name").is_positional());
        assert!(!Parameter::integer().default(3).bind("count").is_positional());
        assert!(!Parameter::boolean().bind("verbose").is_positional());
        assert!(!Parameter::choice_by_flag::<Shape>().bind("shape").is_positional());
        assert!(!Parameter::context().bind("context").is_positional());
    }

    #[test]
    fn test_bind_derives_long_flag_from_name() {
        let parameter = Parameter::integer().default(3).bind("max_depth");
        assert_eq!(parameter.long_flag(), Some("--max-depth"));
        assert_eq!(parameter.flags(), vec!["--max-depth"]);

        let explicit = Parameter::integer().short("-d").default(3).bind("max_depth");
        assert_eq!(explicit.long_flag(), None);
        assert_eq!(explicit.flags(), vec!["-d"]);
    }

    #[test]
    fn test_metavar_and_var() {
        let parameter = Parameter::integer().bind("count");
        assert_eq!(parameter.metavar(), "<COUNT type=integer>");
        assert_eq!(parameter.var(), "COUNT");
    }

    #[test]
    fn test_integer_and_float_conversion() {
        let count = Parameter::integer().bind("count");
        assert_eq!(parse(&count, "42").unwrap(), Value::Int(42));
        assert_eq!(parse(&count, "-7").unwrap(), Value::Int(-7));

        let ratio = Parameter::float().bind("ratio");
        assert_eq!(parse(&ratio, "0.25").unwrap(), Value::Float(0.25));
    }

    #[test]
    fn test_conversion_error_names_parameter_and_value() {
        let count = Parameter::integer().bind("count");
        let error = parse(&count, "twelve").unwrap_err();
        assert!(matches!(error, CliError::Parsing { .. }));
        assert_eq!(
            error.message(),
            "Error parsing value for <COUNT type=integer>; Provided value=twelve; Expected type=integer"
        );
    }

    #[test]
    fn test_boolean_negates_default_and_ignores_token() {
        let off = Parameter::boolean().long("--fast").bind("fast");
        assert_eq!(parse(&off, "--fast").unwrap(), Value::Bool(true));
        assert_eq!(parse(&off, "false").unwrap(), Value::Bool(true));

        let on = Parameter::boolean().default(true).long("--color").bind("color");
        assert_eq!(parse(&on, "true").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_string_list_accumulates() {
        let names = Parameter::string_list().short("-n").bind("names");
        let mut accumulator = Vec::new();
        names.parse("-n", "a", &mut accumulator).unwrap();
        let value = names.parse("-n", "b", &mut accumulator).unwrap();
        assert_eq!(value, Value::List(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_choice_by_value() {
        let shape = Parameter::choice::<Shape>().long("--shape").bind("shape");
        assert_eq!(
            parse(&shape, "square").unwrap(),
            Value::Choice("square".to_string())
        );

        let error = parse(&shape, "triangle").unwrap_err();
        assert!(error.message().contains("Provided value=triangle"));
        assert!(error.message().contains("{circle, square}"));
    }

    #[test]
    fn test_choice_by_flag_looks_up_flag() {
        let shape = Parameter::choice_by_flag::<Shape>().bind("shape");
        assert_eq!(shape.flags(), vec!["--circle", "--square"]);

        let mut accumulator = Vec::new();
        let value = shape.parse("--circle", "--circle", &mut accumulator).unwrap();
        assert_eq!(value, Value::Choice("circle".to_string()));
    }

    #[test]
    fn test_file_must_exist_when_requested() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");
        let file = Parameter::file().long("--input").exists(true).bind("input");

        let error = parse(&file, missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(error, CliError::Parsing { .. }));
        assert_eq!(error.exit_code(), 1);
        assert!(error.message().contains("--input"));
        assert!(error.message().contains("missing.txt"));
        assert!(error.message().contains("does not exist"));
    }

    #[test]
    fn test_file_rejects_directory_and_directory_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("notes.txt");
        fs::write(&file_path, "x").unwrap();

        let file = Parameter::file().long("--input").bind("input");
        let error = parse(&file, temp_dir.path().to_str().unwrap()).unwrap_err();
        assert!(error.message().contains("is not a file"));

        let directory = Parameter::directory().long("--out").bind("out");
        let error = parse(&directory, file_path.to_str().unwrap()).unwrap_err();
        assert!(error.message().contains("is not a directory"));
    }

    #[test]
    fn test_missing_path_is_accepted_without_exists() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("later.txt");
        let file = Parameter::file().long("--output").bind("output");
        assert_eq!(
            parse(&file, missing.to_str().unwrap()).unwrap(),
            Value::Path(missing)
        );
    }

    #[test]
    fn test_resolve_returns_canonical_path() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        let dotted = nested.join("..").join("nested");

        let directory = Parameter::directory()
            .long("--root")
            .exists(true)
            .resolve(true)
            .bind("root");
        let value = parse(&directory, dotted.to_str().unwrap()).unwrap();
        assert_eq!(value, Value::Path(nested.canonicalize().unwrap()));
    }

    #[test]
    fn test_exists_and_resolve_ignored_on_other_kinds() {
        let parameter = Parameter::string().exists(true).resolve(true);
        assert_eq!(parameter.kind(), &ParameterKind::String);
    }
}
