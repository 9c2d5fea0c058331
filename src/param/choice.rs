//! Enumerated choices for `Choice` and `ChoiceByFlag` parameters

/// An enumeration whose members can be selected on the command line
///
/// `name()` is the member identifier (it becomes the flag of a
/// `ChoiceByFlag` parameter), `value()` is the string a `Choice` parameter
/// matches tokens against. Use [`choice_enum!`](crate::choice_enum) to
/// implement it for a plain enum.
pub trait ChoiceEnum: Copy + 'static {
    const VARIANTS: &'static [Self];

    fn name(self) -> &'static str;

    fn value(self) -> &'static str;

    /// Finds the member whose `value()` equals `value`
    fn from_value(value: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.value() == value)
    }
}

/// Implements [`ChoiceEnum`] for a fieldless enum
///
/// ```
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Color {
///     Red,
///     DarkBlue,
/// }
///
/// cmdtree::choice_enum!(Color {
///     Red => "red",
///     DarkBlue => "dark-blue",
/// });
///
/// use cmdtree::ChoiceEnum;
/// assert_eq!(Color::DarkBlue.name(), "DarkBlue");
/// assert_eq!(Color::from_value("red"), Some(Color::Red));
/// ```
#[macro_export]
macro_rules! choice_enum {
    ($ty:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        impl $crate::ChoiceEnum for $ty {
            const VARIANTS: &'static [Self] = &[$($ty::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => stringify!($variant)),+
                }
            }

            fn value(self) -> &'static str {
                match self {
                    $($ty::$variant => $value),+
                }
            }
        }
    };
}

/// One member of a [`ChoiceSet`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceMember {
    pub name: String,
    pub value: String,
}

impl ChoiceMember {
    /// Long flag that selects this member in a `ChoiceByFlag` parameter
    pub fn flag(&self) -> String {
        flag_from_name(&self.name)
    }
}

/// Type-erased table of the members of a [`ChoiceEnum`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSet {
    members: Vec<ChoiceMember>,
}

impl ChoiceSet {
    pub fn of<E: ChoiceEnum>() -> Self {
        ChoiceSet {
            members: E::VARIANTS
                .iter()
                .map(|v| ChoiceMember {
                    name: v.name().to_string(),
                    value: v.value().to_string(),
                })
                .collect(),
        }
    }

    pub fn members(&self) -> &[ChoiceMember] {
        &self.members
    }

    pub fn by_value(&self, value: &str) -> Option<&ChoiceMember> {
        self.members.iter().find(|m| m.value == value)
    }

    pub fn by_flag(&self, flag: &str) -> Option<&ChoiceMember> {
        self.members.iter().find(|m| m.flag() == flag)
    }

    /// Member flags in declaration order
    pub fn flags(&self) -> Vec<String> {
        self.members.iter().map(ChoiceMember::flag).collect()
    }

    /// Legal values rendered as `{a, b, c}` for error messages
    pub fn values_display(&self) -> String {
        let values: Vec<&str> = self.members.iter().map(|m| m.value.as_str()).collect();
        format!("{{{}}}", values.join(", "))
    }
}

/// Derives a long flag from an identifier
///
/// The identifier is split at case boundaries, lower-cased, and underscores
/// become hyphens: `RED` → `--red`, `DRY_RUN` → `--dry-run`,
/// `DryRun` → `--dry-run`, `output_dir` → `--output-dir`.
pub fn flag_from_name(name: &str) -> String {
    let mut flag = String::from("--");
    let mut previous: Option<char> = None;
    for c in name.chars() {
        if c.is_uppercase()
            && let Some(p) = previous
            && (p.is_lowercase() || p.is_ascii_digit())
        {
            flag.push('-');
        }
        if c == '_' {
            flag.push('-');
        } else {
            flag.extend(c.to_lowercase());
        }
        previous = Some(c);
    }
    flag
}
