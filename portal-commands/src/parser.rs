//! Invocation parser. Turns one console line into a structured invocation.
//!
//! Rules:
//! - the first whitespace token, lower-cased, is the command (even `-x`);
//! - `--key value` is a long option; the value is taken only if the next
//!   token exists and does not start with `-`, otherwise it is empty;
//! - `-x` is a boolean flag stored as `"true"`;
//! - everything else is a positional argument, in order.
//!
//! Parsing never fails.

use std::collections::BTreeMap;

/// One parsed console line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
    pub options: BTreeMap<String, String>,
}

impl Invocation {
    /// Option lookup. Options are parsed but not yet consumed by handlers.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }
}

/// Parse a raw input line.
pub fn parse(raw: &str) -> Invocation {
    let mut tokens = raw.split_whitespace().peekable();
    let Some(first) = tokens.next() else {
        return Invocation::default();
    };

    let mut invocation = Invocation {
        command: first.to_lowercase(),
        ..Default::default()
    };

    while let Some(token) = tokens.next() {
        if let Some(key) = token.strip_prefix("--") {
            let value = match tokens.peek() {
                Some(next) if !next.starts_with('-') => tokens.next().unwrap_or_default(),
                _ => "",
            };
            invocation.options.insert(key.to_string(), value.to_string());
        } else if let Some(key) = token.strip_prefix('-') {
            invocation.options.insert(key.to_string(), "true".to_string());
        } else {
            invocation.args.push(token.to_string());
        }
    }

    invocation
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_command_with_positional() {
        let inv = parse("show 5");
        assert_eq!(inv.command, "show");
        assert_eq!(inv.args, vec!["5"]);
        assert!(inv.options.is_empty());
    }

    #[test]
    fn test_parse_keeps_positional_order() {
        let inv = parse("search Rick Sanchez");
        assert_eq!(inv.command, "search");
        assert_eq!(inv.args, vec!["Rick", "Sanchez"]);
    }

    #[test]
    fn test_parse_long_option_with_value() {
        let inv = parse("fetch --page 2");
        assert_eq!(inv.command, "fetch");
        assert!(inv.args.is_empty());
        assert_eq!(inv.options, options(&[("page", "2")]));
        assert_eq!(inv.option("page"), Some("2"));
    }

    #[test]
    fn test_parse_long_option_without_value() {
        let inv = parse("list --verbose -x");
        assert_eq!(inv.options, options(&[("verbose", ""), ("x", "true")]));
    }

    #[test]
    fn test_parse_long_option_at_end() {
        let inv = parse("list --all");
        assert_eq!(inv.options, options(&[("all", "")]));
    }

    #[test]
    fn test_parse_flag_is_true() {
        let inv = parse("list -v extra");
        assert_eq!(inv.options, options(&[("v", "true")]));
        assert_eq!(inv.args, vec!["extra"]);
    }

    #[test]
    fn test_parse_dash_first_token_is_command() {
        let inv = parse("-x");
        assert_eq!(inv.command, "-x");
        assert!(inv.args.is_empty());
        assert!(inv.options.is_empty());
    }

    #[test]
    fn test_parse_lowercases_command_only() {
        let inv = parse("  SEARCH   Rick  ");
        assert_eq!(inv.command, "search");
        assert_eq!(inv.args, vec!["Rick"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse(""), Invocation::default());
        assert_eq!(parse("   \t "), Invocation::default());
        assert!(parse("").is_empty());
    }
}
