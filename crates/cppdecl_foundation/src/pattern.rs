//! Bracket/separator pattern parsing for template instantiations and call
//! invocations.
//!
//! A [`PatternParser`] is configured with an open token, a close token and
//! an argument separator. The same algorithm serves `Name<A, B>` template
//! instantiations ([`PatternParser::TEMPLATES`]) and `name(a, b)` call
//! invocations ([`PatternParser::CALL_INVOCATION`]).
//!
//! # Example
//!
//! ```
//! use cppdecl_foundation::PatternParser;
//!
//! let parser = PatternParser::TEMPLATES;
//! let (name, args) = parser.split("std::map<int,std::vector<char> >").unwrap();
//! assert_eq!(name, "std::map");
//! assert_eq!(args, vec!["int", "std::vector<char>"]);
//! assert_eq!(
//!     parser.normalize("std::map<int,std::vector<char> >"),
//!     "std::map< int, std::vector< char > >"
//! );
//! ```

use crate::error::{Error, Result};

/// A `(name, args)` pair produced by splitting a pattern.
pub type Split = (String, Vec<String>);

/// Generic bracket/separator tokenizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternParser {
    open: char,
    close: char,
    separator: char,
}

impl PatternParser {
    /// Parser for template instantiations: `<`, `>`, `,`.
    pub const TEMPLATES: PatternParser = PatternParser::new('<', '>', ',');

    /// Parser for call invocations: `(`, `)`, `,`.
    pub const CALL_INVOCATION: PatternParser = PatternParser::new('(', ')', ',');

    /// Creates a parser for the given open, close and separator tokens.
    #[must_use]
    pub const fn new(open: char, close: char, separator: char) -> Self {
        Self {
            open,
            close,
            separator,
        }
    }

    /// Returns the open token.
    #[must_use]
    pub const fn open(&self) -> char {
        self.open
    }

    /// Returns the close token.
    #[must_use]
    pub const fn close(&self) -> char {
        self.close
    }

    /// Returns true if the last top-level `::` segment of `text` contains
    /// an open token before any close token.
    #[must_use]
    pub fn has_pattern(&self, text: &str) -> bool {
        let segment = self.last_segment(text);
        let Some(open) = segment.find(self.open) else {
            return false;
        };
        segment.find(self.close).is_some_and(|close| open < close)
    }

    /// Returns the text before the first open token, trimmed.
    ///
    /// Text without a pattern is returned unchanged.
    #[must_use]
    pub fn name(&self, text: &str) -> String {
        if !self.has_pattern(text) {
            return text.to_string();
        }
        match text.find(self.open) {
            Some(pos) => text[..pos].trim().to_string(),
            None => text.to_string(),
        }
    }

    /// Splits the argument list found between the first open token and
    /// the last close token.
    ///
    /// Separators nested inside brackets are not top-level separators.
    /// Empty arguments are dropped, so `Name< >` has no arguments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if the open or close token is missing, if
    /// they coincide or are out of order, or if the brackets between them
    /// are unbalanced.
    pub fn args(&self, text: &str) -> Result<Vec<String>> {
        let begin = text.find(self.open);
        let end = text.rfind(self.close);
        let (begin, end) = match (begin, end) {
            (Some(b), Some(e)) if b < e => (b, e),
            (None, _) => {
                return Err(Error::invalid_pattern(
                    text,
                    format!("missing '{}'", self.open),
                ));
            }
            (_, None) => {
                return Err(Error::invalid_pattern(
                    text,
                    format!("missing '{}'", self.close),
                ));
            }
            _ => {
                return Err(Error::invalid_pattern(
                    text,
                    format!("'{}' does not precede '{}'", self.open, self.close),
                ));
            }
        };

        let inner = text[begin + 1..end].trim_matches(' ');
        self.check_balanced(text, inner)?;

        let mut args = Vec::new();
        let mut previous = 0;
        loop {
            match self.find_separator(inner, previous) {
                Some(found) => {
                    args.push(inner[previous..found].trim().to_string());
                    previous = found + 1;
                }
                None => {
                    args.push(inner[previous..].trim().to_string());
                    break;
                }
            }
        }
        args.retain(|arg| !arg.is_empty());
        Ok(args)
    }

    /// Finds the first balanced bracket group at or after `start`.
    ///
    /// Returns the byte indices of the opening and the matching closing
    /// token, or `None` when there is no open token or the depth never
    /// returns to zero.
    #[must_use]
    pub fn find_args(&self, text: &str, start: usize) -> Option<(usize, usize)> {
        let first = text.get(start..)?.find(self.open)? + start;
        let mut previous = first + 1;
        loop {
            let found = self.find_separator(text, previous)?;
            if text[found..].starts_with(self.close) {
                return Some((first, found));
            }
            previous = found + 1;
        }
    }

    /// Splits `text` into its name and argument list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if `text` has no pattern or malformed
    /// brackets.
    pub fn split(&self, text: &str) -> Result<Split> {
        if !self.has_pattern(text) {
            return Err(Error::invalid_pattern(
                text,
                format!("no '{}...{}' pattern", self.open, self.close),
            ));
        }
        Ok((self.name(text), self.args(text)?))
    }

    /// Splits `text` and, depth-first, every argument that itself carries
    /// a pattern.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if `text` or any nested argument is
    /// malformed.
    pub fn split_recursive(&self, text: &str) -> Result<Vec<Split>> {
        let mut to_go = vec![text.to_string()];
        let mut answer = Vec::new();
        while let Some(current) = to_go.pop() {
            let (name, args) = self.split(&current)?;
            for arg in &args {
                if self.has_pattern(arg) {
                    to_go.push(arg.clone());
                }
            }
            answer.push((name, args));
        }
        Ok(answer)
    }

    /// Joins a name and arguments using canonical spacing.
    ///
    /// `join("A", [])` is `A< >`, `join("A", ["x"])` is `A< x >` and
    /// `join("A", ["x", "y"])` is `A< x, y >`. Empty arguments are skipped.
    #[must_use]
    pub fn join<S: AsRef<str>>(&self, name: &str, args: &[S]) -> String {
        let args: Vec<&str> = args
            .iter()
            .map(AsRef::as_ref)
            .filter(|a| !a.is_empty())
            .collect();
        let body = if args.is_empty() {
            " ".to_string()
        } else {
            format!(" {} ", args.join(&format!("{} ", self.separator)))
        };
        format!("{name}{}{body}{}", self.open, self.close)
    }

    /// Joins a name and arguments without any padding: `A<x,y>`.
    #[must_use]
    pub fn join_compact<S: AsRef<str>>(&self, name: &str, args: &[S]) -> String {
        let args: Vec<&str> = args
            .iter()
            .map(AsRef::as_ref)
            .filter(|a| !a.is_empty())
            .collect();
        format!(
            "{name}{}{}{}",
            self.open,
            args.join(&self.separator.to_string()),
            self.close
        )
    }

    /// Re-joins `text` and all nested patterns in canonical form.
    ///
    /// Text that does not parse is returned unchanged.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        if !self.has_pattern(text) {
            return text.to_string();
        }
        match self.split(text) {
            Ok((name, args)) => {
                let args: Vec<String> = args.iter().map(|a| self.normalize(a)).collect();
                self.join(&name, &args)
            }
            Err(_) => text.to_string(),
        }
    }

    /// Returns the part of `text` after the last `::` that is not nested
    /// inside brackets.
    #[must_use]
    pub fn last_segment<'a>(&self, text: &'a str) -> &'a str {
        let bytes = text.as_bytes();
        let mut depth = 0usize;
        let mut segment_start = 0;
        let mut i = 0;
        while i < bytes.len() {
            let ch = bytes[i] as char;
            if ch == self.open {
                depth += 1;
            } else if ch == self.close {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && bytes[i] == b':' && bytes.get(i + 1) == Some(&b':') {
                segment_start = i + 2;
                i += 1;
            }
            i += 1;
        }
        &text[segment_start..]
    }

    /// Finds the next top-level separator or the close token that ends
    /// the current group, starting at `start`.
    fn find_separator(&self, text: &str, start: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (offset, ch) in text.get(start..)?.char_indices() {
            if ch == self.separator {
                if depth == 0 {
                    return Some(start + offset);
                }
            } else if ch == self.open {
                depth += 1;
            } else if ch == self.close {
                if depth == 0 {
                    return Some(start + offset);
                }
                depth -= 1;
            }
        }
        None
    }

    fn check_balanced(&self, text: &str, inner: &str) -> Result<()> {
        let mut depth = 0usize;
        for ch in inner.chars() {
            if ch == self.open {
                depth += 1;
            } else if ch == self.close {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::invalid_pattern(text, format!("unmatched '{}'", self.close))
                })?;
            }
        }
        if depth != 0 {
            return Err(Error::invalid_pattern(
                text,
                format!("unmatched '{}'", self.open),
            ));
        }
        Ok(())
    }
}

/// Returns true if `text` is a template instantiation such as `A<int>`.
#[must_use]
pub fn is_instantiation(text: &str) -> bool {
    PatternParser::TEMPLATES.has_pattern(text)
}

/// Returns true if `text` is a call invocation such as `f(1, 2)`.
#[must_use]
pub fn is_call_invocation(text: &str) -> bool {
    PatternParser::CALL_INVOCATION.has_pattern(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: PatternParser = PatternParser::TEMPLATES;
    const C: PatternParser = PatternParser::CALL_INVOCATION;

    #[test]
    fn has_pattern_on_last_segment() {
        assert!(T.has_pattern("std::vector<int>"));
        assert!(T.has_pattern("std::vector<std::string>"));
        assert!(!T.has_pattern("ns::A<int>::B"));
        assert!(!T.has_pattern("plain"));
        assert!(!T.has_pattern("broken>x<"));
    }

    #[test]
    fn name_is_text_before_first_open() {
        assert_eq!(T.name("std::vector< int >"), "std::vector");
        assert_eq!(T.name("no_pattern"), "no_pattern");
        assert_eq!(C.name("  f (1, 2)"), "f");
    }

    #[test]
    fn args_respect_nesting() {
        let args = T.args("map<int, pair<int, char>, less<int> >").unwrap();
        assert_eq!(args, vec!["int", "pair<int, char>", "less<int>"]);
    }

    #[test]
    fn args_of_empty_instantiation() {
        assert!(T.args("A< >").unwrap().is_empty());
        assert!(T.args("A<>").unwrap().is_empty());
    }

    #[test]
    fn args_rejects_missing_tokens() {
        assert!(T.args("vector").is_err());
        assert!(T.args("vector<int").is_err());
        assert!(T.args("vector>int<").is_err());
    }

    #[test]
    fn args_rejects_unbalanced_nesting() {
        let err = T.args("A<B<int>").unwrap_err();
        assert!(matches!(
            err.kind,
            crate::ErrorKind::InvalidPattern { .. }
        ));
    }

    #[test]
    fn find_args_returns_outer_group() {
        assert_eq!(C.find_args("foo(a,(b,c),d)", 3), Some((3, 13)));
        assert_eq!(C.find_args("foo(a,(b,c),d)", 4), Some((6, 10)));
    }

    #[test]
    fn find_args_not_found() {
        assert_eq!(C.find_args("foo(a,(b,c", 0), None);
        assert_eq!(C.find_args("foo", 0), None);
        assert_eq!(C.find_args("foo()", 99), None);
    }

    #[test]
    fn split_requires_pattern() {
        assert!(T.split("int").is_err());
        let (name, args) = T.split("A<x, y>").unwrap();
        assert_eq!(name, "A");
        assert_eq!(args, vec!["x", "y"]);
    }

    #[test]
    fn split_recursive_is_depth_first() {
        let parts = T
            .split_recursive("A< B< C<int> >, D<char> >")
            .unwrap();
        let names: Vec<&str> = parts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn join_canonical_spacing() {
        assert_eq!(T.join::<&str>("A", &[]), "A< >");
        assert_eq!(T.join("A", &["x"]), "A< x >");
        assert_eq!(T.join("A", &["x", "y"]), "A< x, y >");
        assert_eq!(C.join("f", &["1", "2"]), "f( 1, 2 )");
    }

    #[test]
    fn join_compact_has_no_padding() {
        assert_eq!(T.join_compact("map", &["K", "V"]), "map<K,V>");
        assert_eq!(T.join_compact("vector", &["int"]), "vector<int>");
    }

    #[test]
    fn normalize_equivalent_spellings() {
        let a = T.normalize("std::vector<int,std::allocator<int>>");
        let b = T.normalize("std::vector< int , std::allocator< int > >");
        assert_eq!(a, b);
        assert_eq!(a, "std::vector< int, std::allocator< int > >");
    }

    #[test]
    fn helpers() {
        assert!(is_instantiation("A<int>"));
        assert!(!is_instantiation("A"));
        assert!(is_call_invocation("f(x)"));
        assert!(!is_call_invocation("f"));
    }
}
