//! Token scanning for templated strings
//!
//! Two token families are recognized:
//! - collection variables, written `{{name}}`
//! - dynamic variables, written `$name`, `{$name}` or `{{$name}}`
//!
//! Dynamic names are a `$` followed by ASCII letters only, so `$5` or
//! `$ name` are plain text.

use std::ops::Range;

/// A `{{...}}` reference found in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The trimmed text between the braces.
    pub name: String,

    /// Whether the name starts with `$`.
    pub is_builtin: bool,

    /// Byte range of the whole token, braces included.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        let name = name.into();
        let is_builtin = name.starts_with('$');
        Self {
            name,
            is_builtin,
            span,
        }
    }
}

/// A dynamic variable token in any of its three wrappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicToken {
    /// Name including the leading `$`.
    pub name: String,

    /// Byte range of the whole token, wrapper included.
    pub span: Range<usize>,
}

/// Finds every `{{name}}` reference, in order.
///
/// ```
/// use workbench_application::variable_resolver::parser::parse_variables;
///
/// let refs = parse_variables("{{base}}/users/{{$randomUUID}}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "base");
/// assert!(refs[1].is_builtin);
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find("{{") {
        let start = cursor + offset;
        let name_start = start + 2;
        let Some(close) = input[name_start..].find("}}") else {
            break;
        };
        let end = name_start + close + 2;

        let name = input[name_start..name_start + close].trim();
        if !name.is_empty() {
            references.push(VariableReference::new(name, start..end));
        }
        cursor = end;
    }

    references
}

/// Finds every dynamic variable token, in order.
///
/// A wrapper that is opened but not closed degrades to the bare `$name`
/// inside it.
#[must_use]
pub fn parse_dynamic_tokens(input: &str) -> Vec<DynamicToken> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let (open, close): (usize, &[u8]) = if bytes[i..].starts_with(b"{{$") {
            (3, b"}}")
        } else if bytes[i..].starts_with(b"{$") {
            (2, b"}")
        } else if bytes[i] == b'$' {
            (1, b"")
        } else {
            i += 1;
            continue;
        };

        let dollar = i + open - 1;
        let mut end = dollar + 1;
        while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
            end += 1;
        }
        if end == dollar + 1 {
            i += 1;
            continue;
        }

        let name = input[dollar..end].to_string();
        if bytes[end..].starts_with(close) {
            tokens.push(DynamicToken {
                name,
                span: i..end + close.len(),
            });
            i = end + close.len();
        } else {
            tokens.push(DynamicToken {
                name,
                span: dollar..end,
            });
            i = end;
        }
    }

    tokens
}

/// Returns true if the input may contain a token of either family.
#[must_use]
pub fn has_tokens(input: &str) -> bool {
    input.contains('$') || (input.contains("{{") && input.contains("}}"))
}

/// Names of the collection variables referenced by the input, in order.
#[must_use]
pub fn extract_variable_names(input: &str) -> Vec<String> {
    parse_variables(input)
        .into_iter()
        .filter(|r| !r.is_builtin)
        .map(|r| r.name)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(tokens: &[DynamicToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_parse_simple_variable() {
        let refs = parse_variables("{{name}}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert!(!refs[0].is_builtin);
        assert_eq!(refs[0].span, 0..8);
    }

    #[test]
    fn test_parse_variables_in_url() {
        let refs = parse_variables("https://{{host}}:{{port}}/{{path}}?key={{api_key}}");
        let found: Vec<_> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(found, vec!["host", "port", "path", "api_key"]);
    }

    #[test]
    fn test_parse_with_whitespace() {
        let refs = parse_variables("{{ name }}");
        assert_eq!(refs[0].name, "name");
    }

    #[test]
    fn test_unclosed_and_empty_variables() {
        assert!(parse_variables("{{name").is_empty());
        assert!(parse_variables("{{}}").is_empty());
        assert!(parse_variables("{{   }}").is_empty());
        assert!(parse_variables("{name}").is_empty());
    }

    #[test]
    fn test_adjacent_variables() {
        let input = "{{a}}{{b}}{{c}}";
        let refs = parse_variables(input);
        assert_eq!(refs.len(), 3);
        assert_eq!(&input[refs[2].span.clone()], "{{c}}");
    }

    #[test]
    fn test_dynamic_wrappings() {
        let input = "$randomInt {$randomInt} {{$randomInt}}";
        let tokens = parse_dynamic_tokens(input);
        assert_eq!(names(&tokens), vec!["$randomInt"; 3]);
        assert_eq!(&input[tokens[0].span.clone()], "$randomInt");
        assert_eq!(&input[tokens[1].span.clone()], "{$randomInt}");
        assert_eq!(&input[tokens[2].span.clone()], "{{$randomInt}}");
    }

    #[test]
    fn test_dynamic_names_are_letters_only() {
        let input = "price: $5, id: $guid2";
        let tokens = parse_dynamic_tokens(input);
        assert_eq!(names(&tokens), vec!["$guid"]);
        assert_eq!(tokens[0].span, 15..20);
    }

    #[test]
    fn test_unclosed_wrapper_degrades_to_bare_token() {
        let input = "{{$randomWord";
        let tokens = parse_dynamic_tokens(input);
        assert_eq!(names(&tokens), vec!["$randomWord"]);
        assert_eq!(&input[tokens[0].span.clone()], "$randomWord");
    }

    #[test]
    fn test_dynamic_scan_handles_multibyte_text() {
        let tokens = parse_dynamic_tokens("héllo → $timestamp ✓");
        assert_eq!(names(&tokens), vec!["$timestamp"]);
    }

    #[test]
    fn test_extract_variable_names_skips_dynamic() {
        let names = extract_variable_names("{{a}} {{$randomInt}} {{b}}");
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_has_tokens() {
        assert!(has_tokens("{{name}}"));
        assert!(has_tokens("$randomInt"));
        assert!(!has_tokens("plain text"));
        assert!(!has_tokens("{{incomplete"));
    }
}
