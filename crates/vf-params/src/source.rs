//! Where parameters come from.

use std::fmt;
use std::path::PathBuf;

/// Parameter file used when no argument is given.
pub const DEFAULT_PARAM_FILE: &str = "case.params";

/// Loading strategy for a [`crate::ParameterStore`].
///
/// Both variants go through the same line rules, so a case written with
/// inline literals behaves exactly like the same case read from a file.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamSource {
    /// A `key=value` file on disk.
    File(PathBuf),
    /// Literal `key=value` text held in memory.
    Inline(String),
}

impl ParamSource {
    /// Build inline text from `(key, value)` pairs.
    pub fn inline<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut text = String::new();
        for (key, value) in pairs {
            text.push_str(key.as_ref());
            text.push('=');
            text.push_str(value.as_ref());
            text.push('\n');
        }
        ParamSource::Inline(text)
    }
}

impl Default for ParamSource {
    fn default() -> Self {
        ParamSource::File(PathBuf::from(DEFAULT_PARAM_FILE))
    }
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSource::File(path) => write!(f, "{}", path.display()),
            ParamSource::Inline(_) => write!(f, "<inline>"),
        }
    }
}

/// Pick the parameter file from positional arguments (program name excluded).
///
/// The first argument wins when present and non-empty; otherwise
/// [`DEFAULT_PARAM_FILE`]. Nothing is read here.
pub fn select_source_from_args<I, S>(args: I) -> ParamSource
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match args.into_iter().next() {
        Some(first) if !first.as_ref().is_empty() => {
            ParamSource::File(PathBuf::from(first.as_ref()))
        }
        _ => ParamSource::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_argument_selects_file() {
        let source = select_source_from_args(["run7.params", "ignored"]);
        assert_eq!(source, ParamSource::File(PathBuf::from("run7.params")));
    }

    #[test]
    fn missing_or_empty_argument_falls_back() {
        let none: [&str; 0] = [];
        assert_eq!(select_source_from_args(none), ParamSource::default());
        assert_eq!(
            select_source_from_args([""]),
            ParamSource::File(PathBuf::from(DEFAULT_PARAM_FILE))
        );
    }

    #[test]
    fn inline_pairs_render_as_lines() {
        let source = ParamSource::inline([("Oh", "0.01"), ("De", "1e30")]);
        assert_eq!(source, ParamSource::Inline("Oh=0.01\nDe=1e30\n".to_string()));
        assert_eq!(source.to_string(), "<inline>");
    }
}
