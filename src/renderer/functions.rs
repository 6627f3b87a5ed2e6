use crate::{
    constants::{
        functions as names, DEFAULT_INDENT_LEVEL, MAX_INDENT_BYTES, MAX_INDENT_LEVEL,
        MIN_INDENT_LEVEL,
    },
    error::{Error, Result},
    settings::Settings,
};
use indexmap::IndexMap;
use log::trace;
use std::{fmt, sync::Arc};

/// A function callable from fragments.
///
/// Each variant fixes the arity and the argument kinds, so a function is
/// checked when it is registered rather than when a fragment calls it.
/// With pipeline syntax (`{{ value | fn(..) }}`) the piped value is bound
/// to the last positional argument.
#[derive(Clone)]
pub enum Function {
    /// `fn(s)`
    Unary(Arc<dyn Fn(&str) -> String + Send + Sync>),
    /// `fn(a, s)`
    Binary(Arc<dyn Fn(&str, &str) -> String + Send + Sync>),
    /// `fn(count, s)`, fails when the output would be too large
    Indent(Arc<dyn Fn(i64, &str) -> Result<String> + Send + Sync>),
    /// `fn(condition, a, b)`
    Ternary(Arc<dyn Fn(bool, &str, &str) -> String + Send + Sync>),
}

impl Function {
    pub fn unary(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self::Unary(Arc::new(f))
    }

    pub fn binary(f: impl Fn(&str, &str) -> String + Send + Sync + 'static) -> Self {
        Self::Binary(Arc::new(f))
    }

    pub fn indent(f: impl Fn(i64, &str) -> Result<String> + Send + Sync + 'static) -> Self {
        Self::Indent(Arc::new(f))
    }

    pub fn ternary(f: impl Fn(bool, &str, &str) -> String + Send + Sync + 'static) -> Self {
        Self::Ternary(Arc::new(f))
    }

    /// Number of positional arguments the function takes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) | Self::Indent(_) => 2,
            Self::Ternary(_) => 3,
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Unary(_) => "Unary",
            Self::Binary(_) => "Binary",
            Self::Indent(_) => "Indent",
            Self::Ternary(_) => "Ternary",
        };
        f.debug_tuple(kind).finish()
    }
}

/// Named functions in registration order.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: IndexMap<String, Function>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the built-in functions for the given settings.
    pub fn builtin(settings: &Settings) -> Result<Self> {
        builtin_functions(settings)
    }

    /// Adds a function, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, function: Function) -> &mut Self {
        let name = name.into();
        if self.functions.insert(name.clone(), function).is_some() {
            trace!("Function '{name}' overridden");
        }
        self
    }

    /// Adds a function, failing if the name is already taken.
    pub fn try_insert(&mut self, name: &str, function: Function) -> Result<&mut Self> {
        if self.functions.contains_key(name) {
            return Err(Error::DuplicateFunction(name.to_string()));
        }
        self.functions.insert(name.to_string(), function);
        Ok(self)
    }

    /// Merges `other` into this table. Entries of `other` win on collision.
    pub fn merge(&mut self, other: FunctionTable) -> &mut Self {
        for (name, function) in other.functions {
            self.insert(name, function);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Function)> {
        self.functions
            .iter()
            .map(|(name, function)| (name.as_str(), function))
    }
}

impl<N: Into<String>> FromIterator<(N, Function)> for FunctionTable {
    fn from_iter<I: IntoIterator<Item = (N, Function)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, function) in iter {
            table.insert(name, function);
        }
        table
    }
}

/// Builds the table of built-in functions parameterized by `settings`.
///
/// Registering the same built-in name twice is a programming error and
/// fails the whole construction.
pub fn builtin_functions(settings: &Settings) -> Result<FunctionTable> {
    let mut table = FunctionTable::new();

    table.try_insert(names::DEFAULT, Function::binary(default_value))?;
    table.try_insert(names::TRIM, Function::binary(trim))?;
    table.try_insert(names::TRIM_LEFT, Function::binary(trim_left))?;
    table.try_insert(names::TRIM_RIGHT, Function::binary(trim_right))?;
    table.try_insert(names::TRIM_PREFIX, Function::binary(trim_prefix))?;
    table.try_insert(names::TRIM_SUFFIX, Function::binary(trim_suffix))?;
    table.try_insert(names::TERNARY, Function::ternary(ternary))?;

    let indent_settings = settings.clone();
    table.try_insert(
        names::INDENT,
        Function::indent(move |extra, marker| {
            generate_indentation(extra, marker, &indent_settings)
        }),
    )?;

    let name_settings = settings.clone();
    table.try_insert(
        names::NAME,
        Function::unary(move |name| sanitize_name(name, &name_settings)),
    )?;

    let table_settings = settings.clone();
    table.try_insert(
        names::SANITIZE_TABLE,
        Function::unary(move |value| sanitize_table_cell(value, &table_settings)),
    )?;

    Ok(table)
}

/// Returns `value` unless it is empty, in which case `fallback` is used.
pub fn default_value(fallback: &str, value: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Strips leading and trailing characters contained in `cutset`.
pub fn trim(cutset: &str, s: &str) -> String {
    s.trim_matches(|c: char| cutset.contains(c)).to_string()
}

pub fn trim_left(cutset: &str, s: &str) -> String {
    s.trim_start_matches(|c: char| cutset.contains(c))
        .to_string()
}

pub fn trim_right(cutset: &str, s: &str) -> String {
    s.trim_end_matches(|c: char| cutset.contains(c)).to_string()
}

/// Removes one leading occurrence of `prefix`.
pub fn trim_prefix(prefix: &str, s: &str) -> String {
    s.strip_prefix(prefix).unwrap_or(s).to_string()
}

/// Removes one trailing occurrence of `suffix`.
pub fn trim_suffix(suffix: &str, s: &str) -> String {
    s.strip_suffix(suffix).unwrap_or(s).to_string()
}

pub fn ternary(condition: bool, if_true: &str, if_false: &str) -> String {
    let picked = if condition { if_true } else { if_false };
    picked.to_string()
}

/// Escapes underscores when `settings.escape_characters` is set.
pub fn sanitize_name(name: &str, settings: &Settings) -> String {
    if settings.escape_characters {
        name.replace('_', "\\_")
    } else {
        name.to_string()
    }
}

/// Repeats `marker` `base + extra` times.
///
/// `base` is the configured indent level when it lies within
/// `MIN_INDENT_LEVEL..=MAX_INDENT_LEVEL`, otherwise `DEFAULT_INDENT_LEVEL`.
/// Output longer than `MAX_INDENT_BYTES` is rejected.
pub fn generate_indentation(extra: i64, marker: &str, settings: &Settings) -> Result<String> {
    if marker.is_empty() {
        return Ok(String::new());
    }
    let base = if (MIN_INDENT_LEVEL..=MAX_INDENT_LEVEL).contains(&settings.indent_level) {
        settings.indent_level
    } else {
        DEFAULT_INDENT_LEVEL
    };
    let count = usize::try_from(base.saturating_add(extra)).unwrap_or(0);
    match count.checked_mul(marker.len()) {
        Some(bytes) if bytes <= MAX_INDENT_BYTES => Ok(marker.repeat(count)),
        _ => Err(Error::IndentationTooLarge {
            extra,
            limit: MAX_INDENT_BYTES,
        }),
    }
}

/// Makes `value` fit in a single table cell.
pub fn sanitize_table_cell(value: &str, settings: &Settings) -> String {
    let value = value.trim();
    let value = if settings.escape_pipe {
        value.replace('|', "\\|")
    } else {
        value.to_string()
    };
    value
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(escape: bool) -> Settings {
        Settings {
            escape_characters: escape,
            escape_pipe: escape,
            ..Settings::default()
        }
    }

    fn with_indent_level(indent_level: i64) -> Settings {
        Settings {
            indent_level,
            ..Settings::default()
        }
    }

    fn call_binary(table: &FunctionTable, name: &str, a: &str, b: &str) -> String {
        match table.get(name) {
            Some(Function::Binary(f)) => f(a, b),
            other => panic!("{name} is not a binary function: {other:?}"),
        }
    }

    #[test]
    fn test_builtin_names() {
        let table = builtin_functions(&settings(true)).unwrap();
        for name in [
            "default",
            "indent",
            "name",
            "ternary",
            "trim",
            "trimLeft",
            "trimRight",
            "trimPrefix",
            "trimSuffix",
            "sanitizeTable",
        ] {
            assert!(table.contains(name), "function {name} is not defined");
        }
        assert_eq!(table.get("indent").unwrap().arity(), 2);
        assert_eq!(table.get("name").unwrap().arity(), 1);
        assert_eq!(table.get("ternary").unwrap().arity(), 3);
    }

    #[test]
    fn test_default() {
        let table = builtin_functions(&settings(true)).unwrap();
        assert_eq!(call_binary(&table, "default", "a", "b"), "b");
        assert_eq!(call_binary(&table, "default", "a", ""), "a");
        assert_eq!(call_binary(&table, "default", "", "b"), "b");
        assert_eq!(call_binary(&table, "default", "", ""), "");
    }

    #[test]
    fn test_trim_family() {
        let table = builtin_functions(&settings(true)).unwrap();
        let cases = [
            ("trim", [("   foo   ", "foo"), ("foo", "foo"), ("", "")]),
            ("trimLeft", [("   foo   ", "foo   "), ("foo", "foo"), ("", "")]),
            ("trimRight", [("   foo   ", "   foo"), ("foo", "foo"), ("", "")]),
            ("trimPrefix", [("   foo   ", "  foo   "), ("foo", "foo"), ("", "")]),
            ("trimSuffix", [("   foo   ", "   foo  "), ("foo", "foo"), ("", "")]),
        ];
        for (name, inputs) in cases {
            for (input, expected) in inputs {
                let actual = call_binary(&table, name, " ", input);
                assert_eq!(actual, expected, "{name}({input:?})");
            }
            let actual = call_binary(&table, name, "", "foo");
            assert_eq!(actual, "foo", "{name} with empty cutset");
        }
    }

    #[test]
    fn test_indent_builtin() {
        let table = builtin_functions(&with_indent_level(0)).unwrap();
        let Some(Function::Indent(indent)) = table.get("indent") else {
            panic!("indent is not registered as an indent function");
        };
        assert_eq!(indent(0, "#").unwrap(), "##");
        assert_eq!(indent(1, "#").unwrap(), "###");
        assert_eq!(indent(2, "#").unwrap(), "####");
        assert_eq!(indent(3, "#").unwrap(), "#####");
    }

    #[test]
    fn test_name_builtin() {
        let escaped = builtin_functions(&settings(true)).unwrap();
        let plain = builtin_functions(&settings(false)).unwrap();
        let call = |table: &FunctionTable, input: &str| match table.get("name") {
            Some(Function::Unary(f)) => f(input),
            other => panic!("name is not a unary function: {other:?}"),
        };

        assert_eq!(call(&escaped, "foo"), "foo");
        assert_eq!(call(&escaped, "foo_bar"), "foo\\_bar");
        assert_eq!(call(&plain, "foo_bar"), "foo_bar");
        assert_eq!(call(&escaped, ""), "");
    }

    #[test]
    fn test_sanitize_name() {
        let cases = [
            ("abcdefgh", "abcdefgh", "abcdefgh"),
            ("abcd_efgh", "abcd\\_efgh", "abcd_efgh"),
            ("_abcdefgh", "\\_abcdefgh", "_abcdefgh"),
            ("abcd__efgh", "abcd\\_\\_efgh", "abcd__efgh"),
            ("_", "\\_", "_"),
            ("", "", ""),
        ];
        for (input, escaped, plain) in cases {
            assert_eq!(sanitize_name(input, &settings(true)), escaped);
            assert_eq!(sanitize_name(input, &settings(false)), plain);
        }
    }

    #[test]
    fn test_generate_indentation() {
        let cases = [
            (2, 1, "###"),
            (0, 2, "####"),
            (4, 3, "#######"),
            (0, 0, "##"),
            (6, 1, "###"),
        ];
        for (base, extra, expected) in cases {
            let actual = generate_indentation(extra, "#", &with_indent_level(base)).unwrap();
            assert_eq!(actual, expected, "base={base} extra={extra}");
        }
    }

    #[test]
    fn test_generate_indentation_length_and_monotonicity() {
        for base in -1..8 {
            let settings = with_indent_level(base);
            let mut previous = 0;
            for extra in -3..6 {
                let out = generate_indentation(extra, "ab", &settings).unwrap();
                assert_eq!(out.len() % 2, 0);
                assert!(out.len() >= previous);
                previous = out.len();
            }
        }
        let out = generate_indentation(3, "", &Settings::default()).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_generate_indentation_limit() {
        let settings = with_indent_level(2);
        let largest = MAX_INDENT_BYTES as i64 - 2;

        let out = generate_indentation(largest, "#", &settings).unwrap();
        assert_eq!(out.len(), MAX_INDENT_BYTES);

        let err = generate_indentation(largest + 1, "#", &settings).unwrap_err();
        assert!(matches!(err, Error::IndentationTooLarge { .. }));

        let err = generate_indentation(i64::MAX, "##", &settings).unwrap_err();
        assert!(matches!(
            err,
            Error::IndentationTooLarge {
                extra: i64::MAX,
                ..
            }
        ));
    }

    #[test]
    fn test_sanitize_table_cell() {
        assert_eq!(sanitize_table_cell(" a | b ", &settings(true)), "a \\| b");
        assert_eq!(sanitize_table_cell("a | b", &settings(false)), "a | b");
        assert_eq!(
            sanitize_table_cell("line one  \nline two\n", &settings(true)),
            "line one<br>line two"
        );
    }

    #[test]
    fn test_try_insert_rejects_duplicates() {
        let mut table = FunctionTable::new();
        table.try_insert("trim", Function::binary(trim)).unwrap();
        let err = table
            .try_insert("trim", Function::binary(trim_left))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateFunction(name) if name == "trim"));
    }

    #[test]
    fn test_merge_overrides_existing_names() {
        let mut table = builtin_functions(&settings(true)).unwrap();
        let before = table.len();
        let custom: FunctionTable = [
            ("name", Function::unary(|s| s.to_uppercase())),
            ("shout", Function::unary(|s| format!("{s}!"))),
        ]
        .into_iter()
        .collect();

        table.merge(custom);

        assert_eq!(table.len(), before + 1);
        match table.get("name") {
            Some(Function::Unary(f)) => assert_eq!(f("foo_bar"), "FOO_BAR"),
            other => panic!("unexpected function: {other:?}"),
        }
    }
}
