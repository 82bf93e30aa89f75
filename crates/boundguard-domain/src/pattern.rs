//! Glob-like element patterns with positional captures.
//!
//! Syntax, per `/`-separated segment:
//! - `**` as a whole segment matches zero or more segments
//! - `*` matches any run of characters inside one segment
//! - `?` matches exactly one character
//! - anything else is literal
//!
//! Every `*` and `**` is a capture group, numbered left to right. Matching is
//! non-greedy: the shortest candidate is tried first, so captures are deterministic.

use crate::error::{PathError, PathErrorKind};
use crate::model::{Captures, ElementDefinition, MatchMode};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Literal(String),
    Star,
    Question,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    AnyDepth,
    Glob(Vec<Token>),
}

/// A pattern split into segments, ready for matching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledPattern {
    segments: Vec<Segment>,
}

impl CompiledPattern {
    pub fn compile(text: &str) -> Result<Self, String> {
        if text.is_empty() {
            return Err("pattern is empty".to_string());
        }
        if let Some(c) = text.chars().find(|c| matches!(c, '[' | ']' | '{' | '}' | '!' | '\\')) {
            return Err(format!("unsupported character '{c}'"));
        }

        let mut segments = Vec::new();
        for raw in text.split('/') {
            if raw.is_empty() {
                return Err("pattern contains an empty segment".to_string());
            }
            if raw == "**" {
                // Consecutive `**` segments are equivalent to one.
                if segments.last() != Some(&Segment::AnyDepth) {
                    segments.push(Segment::AnyDepth);
                }
                continue;
            }
            if raw.contains("**") {
                return Err(format!("'**' must be a whole segment (found '{raw}')"));
            }
            segments.push(Segment::Glob(tokenize(raw)));
        }

        Ok(Self { segments })
    }

    /// Number of capture groups (`*` and `**`) in this pattern.
    pub fn wildcards(&self) -> usize {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::AnyDepth => 1,
                Segment::Glob(tokens) => tokens.iter().filter(|t| **t == Token::Star).count(),
            })
            .sum()
    }

    /// Match a whole list of path segments, appending captured text to `caps`.
    fn match_segments(&self, path: &[&str], caps: &mut Vec<String>) -> bool {
        match_segments(&self.segments, path, caps)
    }
}

fn tokenize(segment: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    for c in segment.chars() {
        match c {
            '*' | '?' => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(if c == '*' { Token::Star } else { Token::Question });
            }
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

fn match_segments(pattern: &[Segment], path: &[&str], caps: &mut Vec<String>) -> bool {
    let Some((first, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match first {
        Segment::AnyDepth => {
            for take in 0..=path.len() {
                caps.push(path[..take].join("/"));
                if match_segments(rest, &path[take..], caps) {
                    return true;
                }
                caps.pop();
            }
            false
        }
        Segment::Glob(tokens) => {
            let Some((head, tail)) = path.split_first() else {
                return false;
            };
            let mark = caps.len();
            if match_tokens(tokens, head, caps) && match_segments(rest, tail, caps) {
                return true;
            }
            caps.truncate(mark);
            false
        }
    }
}

fn match_tokens(tokens: &[Token], text: &str, caps: &mut Vec<String>) -> bool {
    let Some((first, rest)) = tokens.split_first() else {
        return text.is_empty();
    };

    match first {
        Token::Literal(lit) => match text.strip_prefix(lit.as_str()) {
            Some(remaining) => match_tokens(rest, remaining, caps),
            None => false,
        },
        Token::Question => {
            let mut chars = text.chars();
            match chars.next() {
                Some(_) => match_tokens(rest, chars.as_str(), caps),
                None => false,
            }
        }
        Token::Star => {
            let boundaries = text
                .char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(text.len()));
            for end in boundaries {
                caps.push(text[..end].to_string());
                if match_tokens(rest, &text[end..], caps) {
                    return true;
                }
                caps.pop();
            }
            false
        }
    }
}

/// Split a normalized project-relative path into segments.
pub fn split_path(path: &str) -> Result<Vec<&str>, PathError> {
    let fail = |kind| {
        Err(PathError {
            path: path.to_string(),
            kind,
        })
    };

    if path.is_empty() {
        return fail(PathErrorKind::Empty);
    }
    if path.contains('\\') {
        return fail(PathErrorKind::Backslash);
    }
    if path.starts_with('/') || path.as_bytes().get(1) == Some(&b':') {
        return fail(PathErrorKind::Absolute);
    }

    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return fail(PathErrorKind::EmptySegment);
    }
    if segments.iter().any(|s| *s == "." || *s == "..") {
        return fail(PathErrorKind::DotSegment);
    }
    Ok(segments)
}

/// An element definition with its patterns compiled.
#[derive(Clone, Debug)]
pub struct CompiledElement {
    pub definition: ElementDefinition,
    base: Option<CompiledPattern>,
    pattern: CompiledPattern,
}

impl CompiledElement {
    /// Compile both patterns. The error is a human-readable reason.
    pub fn compile(definition: ElementDefinition) -> Result<Self, (String, String)> {
        let base = match definition.base_pattern.as_deref() {
            Some(b) => Some(CompiledPattern::compile(b).map_err(|e| (b.to_string(), e))?),
            None => None,
        };
        let pattern = CompiledPattern::compile(&definition.pattern)
            .map_err(|e| (definition.pattern.clone(), e))?;
        Ok(Self {
            definition,
            base,
            pattern,
        })
    }

    pub fn wildcards(&self) -> usize {
        self.base.as_ref().map(|b| b.wildcards()).unwrap_or(0) + self.pattern.wildcards()
    }

    /// Match already-split path segments.
    pub fn match_segments(&self, segments: &[&str]) -> Option<Captures> {
        let mut caps = Vec::new();
        let matched = match self.definition.mode {
            MatchMode::Full => {
                let split = match &self.base {
                    Some(base) => (0..=segments.len()).find(|&k| {
                        caps.clear();
                        base.match_segments(&segments[..k], &mut caps)
                            && self.pattern.match_segments(&segments[k..], &mut caps)
                    }),
                    None => self
                        .pattern
                        .match_segments(segments, &mut caps)
                        .then_some(0),
                };
                split.is_some()
            }
            MatchMode::File => (0..=segments.len()).any(|k| {
                caps.clear();
                let base_ok = match &self.base {
                    Some(base) => base.match_segments(&segments[..k], &mut caps),
                    None => true,
                };
                base_ok && self.pattern.match_segments(&segments[k..], &mut caps)
            }),
        };

        matched.then(|| {
            self.definition
                .capture_names
                .iter()
                .cloned()
                .zip(caps)
                .collect()
        })
    }
}

/// Match `path` against one element definition.
///
/// Returns `None` when the path does not satisfy the definition (or the path or
/// pattern is malformed), `Some(captures)` otherwise.
pub fn match_path(path: &str, definition: &ElementDefinition) -> Option<Captures> {
    let segments = split_path(path).ok()?;
    let compiled = CompiledElement::compile(definition.clone()).ok()?;
    compiled.match_segments(&segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(pairs: &[(&str, &str)]) -> Captures {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn full_mode_requires_entire_path() {
        let def = ElementDefinition::full("main", "src/main.ts");
        assert_eq!(match_path("src/main.ts", &def), Some(Captures::new()));
        assert_eq!(match_path("app/src/main.ts", &def), None);
        assert_eq!(match_path("src/main.ts.bak", &def), None);
    }

    #[test]
    fn full_mode_with_base_anchors_both_patterns() {
        let mut def =
            ElementDefinition::full("app-view", "views/*.vue").with_captures(&["app", "view"]);
        def.base_pattern = Some("apps/*".to_string());

        assert_eq!(
            match_path("apps/admin/views/Home.vue", &def),
            Some(caps(&[("app", "admin"), ("view", "Home")]))
        );
        assert_eq!(match_path("apps/admin/extra/views/Home.vue", &def), None);
        assert_eq!(match_path("repo/apps/admin/views/Home.vue", &def), None);
        assert_eq!(match_path("apps/admin/views/Home.ts", &def), None);
    }

    #[test]
    fn file_mode_with_base_captures_domain_name() {
        let def = ElementDefinition::file("domain-api", Some("src/domains"), "*/api/**/*.ts")
            .with_captures(&["domainName"]);

        assert_eq!(
            match_path("src/domains/billing/api/account.ts", &def),
            Some(caps(&[("domainName", "billing")]))
        );
        assert_eq!(
            match_path("src/domains/billing/api/v1/http/account.ts", &def),
            Some(caps(&[("domainName", "billing")]))
        );
        assert_eq!(match_path("src/domains/billing/store/account.ts", &def), None);
        assert_eq!(match_path("lib/domains/billing/api/account.ts", &def), None);
    }

    #[test]
    fn file_mode_base_must_cover_the_whole_prefix() {
        let def = ElementDefinition::file("domain-index", Some("src/domains"), "*/index.ts")
            .with_captures(&["domainName"]);
        assert_eq!(
            match_path("src/domains/billing/index.ts", &def),
            Some(caps(&[("domainName", "billing")]))
        );
        assert_eq!(match_path("src/domains/billing/nested/index.ts", &def), None);
    }

    #[test]
    fn file_mode_without_base_accepts_any_prefix() {
        let def = ElementDefinition::file("shared", None, "src/shared/**/*.ts");
        assert!(match_path("src/shared/format.ts", &def).is_some());
        assert!(match_path("src/shared/dates/format.ts", &def).is_some());
        assert!(match_path("packages/web/src/shared/format.ts", &def).is_some());
        assert!(match_path("src/shared/Button.vue", &def).is_none());
    }

    #[test]
    fn star_stays_inside_one_segment() {
        let def = ElementDefinition::file("core-http", None, "src/core/http/*.ts");
        assert!(match_path("src/core/http/client.ts", &def).is_some());
        assert!(match_path("src/core/http/nested/client.ts", &def).is_none());
    }

    #[test]
    fn question_mark_matches_one_character() {
        let def = ElementDefinition::full("versioned", "src/v?/*.ts").with_captures(&["file"]);
        assert_eq!(
            match_path("src/v1/api.ts", &def),
            Some(caps(&[("file", "api")]))
        );
        assert!(match_path("src/v10/api.ts", &def).is_none());
    }

    #[test]
    fn captures_are_positional_across_base_and_pattern() {
        let def = ElementDefinition::file("page", Some("apps/*"), "pages/*.vue")
            .with_captures(&["app", "page"]);
        assert_eq!(
            match_path("apps/admin/pages/Users.vue", &def),
            Some(caps(&[("app", "admin"), ("page", "Users")]))
        );
    }

    #[test]
    fn compile_rejects_unsupported_syntax() {
        assert!(CompiledPattern::compile("").is_err());
        assert!(CompiledPattern::compile("src//x.ts").is_err());
        assert!(CompiledPattern::compile("src/**.ts").is_err());
        assert!(CompiledPattern::compile("src/*.{ts,vue}").is_err());
        assert_eq!(
            CompiledPattern::compile("*/api/**/*.ts").map(|p| p.wildcards()),
            Ok(3)
        );
    }

    #[test]
    fn split_path_rejects_malformed_paths() {
        let kind = |p: &str| split_path(p).err().map(|e| e.kind);
        assert_eq!(kind(""), Some(PathErrorKind::Empty));
        assert_eq!(kind("/src/main.ts"), Some(PathErrorKind::Absolute));
        assert_eq!(kind("C:/src/main.ts"), Some(PathErrorKind::Absolute));
        assert_eq!(kind("src\\main.ts"), Some(PathErrorKind::Backslash));
        assert_eq!(kind("src//main.ts"), Some(PathErrorKind::EmptySegment));
        assert_eq!(kind("src/main.ts/"), Some(PathErrorKind::EmptySegment));
        assert_eq!(kind("./src/main.ts"), Some(PathErrorKind::DotSegment));
        assert_eq!(kind("src/../main.ts"), Some(PathErrorKind::DotSegment));
        assert_eq!(split_path("src/main.ts"), Ok(vec!["src", "main.ts"]));
    }
}
