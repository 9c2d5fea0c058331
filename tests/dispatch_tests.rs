//! Integration tests for parsing and dispatch through `run_isolated`
//!
//! Every tree here is declared through the public builders and run with
//! captured output, so each test observes exactly what a user would see.

use cmdtree::{
    CliError, Command, CommandNode, Group, Parameter, ParameterSet, ParseOutcome, RuntimeContext,
    choice_enum, run_isolated,
};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use tempfile::TempDir;

type Calls = Rc<RefCell<Vec<String>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Blue,
}

choice_enum!(Color {
    Red => "RED",
    Blue => "BLUE",
});

/// Helper to turn string literals into an argument vector
fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

fn parse(set: &ParameterSet, tokens: &[&str]) -> Result<ParseOutcome, CliError> {
    set.parse_command(&argv(tokens))
}

fn parsed(set: &ParameterSet, tokens: &[&str]) -> cmdtree::ParsedArgs {
    match parse(set, tokens) {
        Ok(ParseOutcome::Parsed(args)) => args,
        other => panic!("expected parsed arguments for {:?}, got {:?}", tokens, other),
    }
}

/// Group `tool` with children `a` and `b`, each recording its argv value
fn tool(calls: &Calls) -> CommandNode {
    let child = |name: &'static str| {
        let calls = calls.clone();
        Command::builder(name)
            .param("value", Parameter::string())
            .handler(move |inv| {
                let value: String = inv.get("value")?;
                calls.borrow_mut().push(format!("{}({})", name, value));
                Ok(())
            })
            .build()
            .unwrap()
    };
    let group_calls = calls.clone();
    Group::builder("tool")
        .about("Two children.")
        .context_param()
        .handler(move |inv| {
            let context: RuntimeContext = inv.get("context")?;
            context.set("prepared", true)?;
            group_calls.borrow_mut().push("setup".to_string());
            Ok(())
        })
        .command(child("a"))
        .command(child("b"))
        .build()
        .unwrap()
        .into()
}

mod positional_tests {
    use super::*;

    #[test]
    fn test_missing_positionals_named_in_declaration_order() {
        let mut set = ParameterSet::new();
        set.add("first", Parameter::string()).unwrap();
        set.add("second", Parameter::integer()).unwrap();
        set.add("third", Parameter::float()).unwrap();

        let error = parse(&set, &["x"]).unwrap_err();
        assert!(matches!(error, CliError::ArgumentsMissing { .. }));
        assert_eq!(
            error.message(),
            "Missing argument for positional arguments <SECOND type=integer>, <THIRD type=float>"
        );

        let error = parse(&set, &[]).unwrap_err();
        assert_eq!(
            error.message(),
            "Missing argument for positional arguments <FIRST type=string>, <SECOND type=integer>, <THIRD type=float>"
        );
    }
}

mod flag_tests {
    use super::*;

    #[test]
    fn test_repeated_scalar_flag_is_extra_argument() {
        let mut set = ParameterSet::new();
        set.add("count", Parameter::integer().short("-c").long("--count"))
            .unwrap();

        let error = parse(&set, &["--count", "1", "-c", "2"]).unwrap_err();
        assert!(matches!(error, CliError::ExtraArgument { .. }));
        assert_eq!(error.message(), "Extra argument provided with flag `-c`");
    }

    #[test]
    fn test_container_flag_accumulates_in_order() {
        let mut set = ParameterSet::new();
        set.add("tag", Parameter::string_list().short("-t").long("--tag"))
            .unwrap();

        let args = parsed(&set, &["-t", "one", "--tag=two", "-t", "three"]);
        assert_eq!(args.get::<Vec<String>>("tag").unwrap(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_accumulators_do_not_leak_between_parses() {
        let mut set = ParameterSet::new();
        set.add("tag", Parameter::string_list().long("--tag")).unwrap();

        parsed(&set, &["--tag", "first"]);
        let args = parsed(&set, &["--tag", "second"]);
        assert_eq!(args.get::<Vec<String>>("tag").unwrap(), vec!["second"]);
    }

    #[test]
    fn test_inline_and_separate_values_agree() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("input.txt");
        std::fs::write(&file, "").unwrap();
        let file = file.to_str().unwrap().to_string();

        let cases: Vec<(Parameter, &str)> = vec![
            (Parameter::string(), "text"),
            (Parameter::integer(), "-42"),
            (Parameter::float(), "2.5"),
            (Parameter::choice::<Color>(), "BLUE"),
            (Parameter::file().exists(true), file.as_str()),
            (Parameter::directory(), "."),
        ];

        for (parameter, raw) in cases {
            let mut set = ParameterSet::new();
            set.add("opt", parameter.long("--opt")).unwrap();

            let inline = parsed(&set, &[&format!("--opt={}", raw)]);
            let separate = parsed(&set, &["--opt", raw]);
            assert_eq!(inline.value("opt"), separate.value("opt"), "value {}", raw);
            assert!(inline.value("opt").is_some());
        }
    }

    #[test]
    fn test_boolean_presence_negates_default() {
        let mut set = ParameterSet::new();
        set.add("quiet", Parameter::boolean().long("--quiet")).unwrap();
        set.add("color", Parameter::boolean().default(true).long("--no-color"))
            .unwrap();

        let absent = parsed(&set, &[]);
        assert!(!absent.get::<bool>("quiet").unwrap());
        assert!(absent.get::<bool>("color").unwrap());

        let present = parsed(&set, &["--quiet=ignored", "--no-color"]);
        assert!(present.get::<bool>("quiet").unwrap());
        assert!(!present.get::<bool>("color").unwrap());
    }

    #[test]
    fn test_choice_by_flag_registers_member_flags() {
        let mut set = ParameterSet::new();
        set.add("color", Parameter::choice_by_flag::<Color>()).unwrap();

        let args = parsed(&set, &["--red"]);
        assert_eq!(args.choice::<Color>("color").unwrap(), Some(Color::Red));

        let error = parse(&set, &["--red", "--blue"]).unwrap_err();
        assert!(matches!(error, CliError::ExtraArgument { .. }));
        assert_eq!(error.message(), "Extra argument provided with flag `--blue`");

        let error = parse(&set, &["--green"]).unwrap_err();
        assert!(matches!(error, CliError::ExtraArgument { .. }));
    }
}

mod command_tests {
    use super::*;

    #[test]
    fn test_help_short_circuits_before_later_tokens() {
        let calls: Calls = Rc::default();
        let recorded = calls.clone();
        let command: CommandNode = Command::builder("count")
            .param("n", Parameter::integer())
            .handler(move |_| {
                recorded.borrow_mut().push("called".to_string());
                Ok(())
            })
            .build()
            .unwrap()
            .into();

        // `not-a-number` would fail conversion if it were scanned
        let result = run_isolated(&command, argv(&["--help", "not-a-number", "extra"]));
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.starts_with("Usage: count [OPTIONS] N"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_help_after_value_flag_still_prints_help() {
        let calls: Calls = Rc::default();
        let recorded = calls.clone();
        let command: CommandNode = Command::builder("greet")
            .param("name", Parameter::string().long("--name"))
            .handler(move |_| {
                recorded.borrow_mut().push("called".to_string());
                Ok(())
            })
            .build()
            .unwrap()
            .into();

        let result = run_isolated(&command, argv(&["--name", "--help"]));
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.starts_with("Usage: greet"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_file_names_flag_and_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        let command: CommandNode = Command::builder("load")
            .param(
                "config",
                Parameter::file().short("-c").long("--config").exists(true),
            )
            .build()
            .unwrap()
            .into();

        let result = run_isolated(&command, argv(&["--config", missing.to_str().unwrap()]));
        assert_eq!(result.exit_code, 1);
        assert_eq!(
            result.stderr,
            format!(
                "Invalid value for -c provided path `{}` does not exist\n",
                missing.display()
            )
        );
    }

    #[test]
    fn test_handler_writes_are_captured() {
        let command: CommandNode = Command::builder("both")
            .handler(|inv| {
                writeln!(inv.out(), "to stdout")?;
                writeln!(inv.err(), "to stderr")?;
                Ok(())
            })
            .build()
            .unwrap()
            .into();

        let result = run_isolated(&command, Vec::new());
        assert_eq!(result.stdout, "to stdout\n");
        assert_eq!(result.stderr, "to stderr\n");
    }
}

mod group_tests {
    use super::*;

    #[test]
    fn test_group_dispatches_remaining_argv_to_child() {
        let calls: Calls = Rc::default();
        let tree = tool(&calls);

        let result = run_isolated(&tree, argv(&["a", "x"]));
        assert_eq!(result.exit_code, 0);
        assert_eq!(*calls.borrow(), vec!["setup", "a(x)"]);
    }

    #[test]
    fn test_empty_argv_prints_group_help() {
        let calls: Calls = Rc::default();
        let tree = tool(&calls);

        let result = run_isolated(&tree, Vec::new());
        assert_eq!(result.exit_code, 0);
        assert!(calls.borrow().is_empty());
        assert!(result.stdout.starts_with("Usage: tool [OPTIONS] COMMAND [ARGS]..."));
        assert!(result.stdout.contains("Commands:"));
        assert!(!tree.context().contains("prepared"));
    }

    #[test]
    fn test_children_see_context_prepared_by_group() {
        let calls: Calls = Rc::default();
        let tree = tool(&calls);

        run_isolated(&tree, argv(&["b", "y"]));

        let CommandNode::Group(group) = &tree else {
            panic!("tool is a group");
        };
        let child = group.child("b").unwrap();
        assert!(child.context().same_as(tree.context()));
        assert_eq!(child.context().get::<bool>("prepared"), Some(true));
    }

    #[test]
    fn test_unknown_child_is_extra_argument() {
        let calls: Calls = Rc::default();
        let result = run_isolated(&tool(&calls), argv(&["c"]));
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "Extra argument provided `c`\n");
    }

    #[test]
    fn test_tree_can_be_invoked_repeatedly() {
        let calls: Calls = Rc::default();
        let tree = tool(&calls);

        run_isolated(&tree, argv(&["a", "1"]));
        run_isolated(&tree, argv(&["b", "2"]));
        assert_eq!(*calls.borrow(), vec!["setup", "a(1)", "setup", "b(2)"]);
    }
}
