use super::definition::{Parameter, ParameterKind};

/// Column at which help descriptions start
pub const HELP_COL_LENGTH: usize = 30;

impl Parameter {
    /// One help entry: the flag column followed by the description
    ///
    /// Positional parameters show their variable name in the flag column.
    pub fn help_line(&self) -> String {
        let mut line = match self.kind() {
            ParameterKind::ChoiceByFlag(set) => set.flags().join(", "),
            _ if self.is_positional() => self.var(),
            _ => self.flags().join(", "),
        };
        if let ParameterKind::Choice(set) = self.kind() {
            let values: Vec<&str> = set.members().iter().map(|m| m.value.as_str()).collect();
            line.push_str(&format!("  [{}]", values.join("|")));
        }

        let description = match (self.help_text(), self.env_var()) {
            (Some(help), Some(env)) => format!("{} [env: {}]", help, env),
            (Some(help), None) => help.to_string(),
            (None, Some(env)) => format!("[env: {}]", env),
            (None, None) => return line,
        };
        align(line, &description)
    }
}

/// Pads `left` to the help column and appends `description`
///
/// When `left` already reaches the column, the description moves to the
/// next line, indented past the column.
pub(crate) fn align(mut left: String, description: &str) -> String {
    let width = left.chars().count();
    if width < HELP_COL_LENGTH {
        left.push_str(&" ".repeat(HELP_COL_LENGTH - width));
        left.push_str(description);
    } else {
        left.push('\n');
        left.push_str(&" ".repeat(HELP_COL_LENGTH + 4));
        left.push_str(description);
    }
    left
}
