//! Built-in pattern syntaxes for string-like elements.
//!
//! - `Exact` / `Prefix` / `Suffix`: plain string comparisons.
//! - `Glob`: `*` (any run, crosses `/`), `?` (one char), `[a-z]`, `[!x]`, `\` escape.
//! - `ServletPath`: `/` (default), `""` (root), `/foo/*` (prefix), `*.ext`
//!   (extension), anything else starting with `/` is exact.

use super::pattern::PatternSyntax;
use crate::error::{Result, SieveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Prefix,
    Suffix,
    Glob,
    ServletPath,
}

/// Pre-parsed pattern produced by [`MatchMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledPattern {
    Exact(String),
    Prefix(String),
    Suffix(String),
    Glob(Vec<GlobToken>),
    Servlet(ServletSpec),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobToken {
    Literal(char),
    AnyChar,
    Star,
    Class { negated: bool, items: Vec<ClassItem> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassItem {
    Single(char),
    Range(char, char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServletSpec {
    /// `/`
    Default,
    /// `""`
    Root,
    /// `/foo/*`, stored without the trailing `/*`.
    Prefix(String),
    /// `*.ext`, stored as `.ext`.
    Extension(String),
    Exact(String),
}

impl<E> PatternSyntax<E> for MatchMode
where
    E: AsRef<str> + Send + Sync,
{
    type Compiled = CompiledPattern;

    fn compile(&self, pattern: &E) -> Result<CompiledPattern> {
        let p = pattern.as_ref();
        match self {
            MatchMode::Exact => Ok(CompiledPattern::Exact(non_empty(p)?.to_string())),
            MatchMode::Prefix => Ok(CompiledPattern::Prefix(non_empty(p)?.to_string())),
            MatchMode::Suffix => Ok(CompiledPattern::Suffix(non_empty(p)?.to_string())),
            MatchMode::Glob => compile_glob(p).map(CompiledPattern::Glob),
            MatchMode::ServletPath => compile_servlet(p).map(CompiledPattern::Servlet),
        }
    }

    fn matches(&self, compiled: &CompiledPattern, candidate: &E) -> bool {
        let c = candidate.as_ref();
        match compiled {
            CompiledPattern::Exact(p) => c == p,
            CompiledPattern::Prefix(p) => c.starts_with(p.as_str()),
            CompiledPattern::Suffix(p) => c.ends_with(p.as_str()),
            CompiledPattern::Glob(tokens) => glob_match(tokens, c),
            CompiledPattern::Servlet(spec) => servlet_match(spec, c),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Prefix => "prefix",
            MatchMode::Suffix => "suffix",
            MatchMode::Glob => "glob",
            MatchMode::ServletPath => "servlet_path",
        }
    }
}

fn non_empty(p: &str) -> Result<&str> {
    if p.is_empty() {
        return Err(SieveError::invalid_pattern(p, "empty pattern"));
    }
    Ok(p)
}

fn compile_glob(p: &str) -> Result<Vec<GlobToken>> {
    non_empty(p)?;
    let mut out = Vec::new();
    let mut chars = p.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '*' => {
                // collapse runs of `*`
                if out.last() != Some(&GlobToken::Star) {
                    out.push(GlobToken::Star);
                }
            }
            '?' => out.push(GlobToken::AnyChar),
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| SieveError::invalid_pattern(p, "trailing escape"))?;
                out.push(GlobToken::Literal(escaped));
            }
            '[' => out.push(compile_class(p, &mut chars)?),
            other => out.push(GlobToken::Literal(other)),
        }
    }
    Ok(out)
}

fn compile_class(p: &str, chars: &mut std::str::Chars<'_>) -> Result<GlobToken> {
    let mut negated = false;
    let mut items = Vec::new();
    let mut first = true;

    loop {
        let ch = chars
            .next()
            .ok_or_else(|| SieveError::invalid_pattern(p, "unterminated character class"))?;
        match ch {
            '!' | '^' if first && !negated => {
                negated = true;
                continue;
            }
            ']' => break,
            _ => {}
        }
        first = false;

        let lo = if ch == '\\' {
            chars
                .next()
                .ok_or_else(|| SieveError::invalid_pattern(p, "trailing escape"))?
        } else {
            ch
        };

        // `a-z` range unless `-` is the last char before `]`
        let mut lookahead = chars.clone();
        if lookahead.next() == Some('-') {
            match lookahead.next() {
                Some(']') | None => items.push(ClassItem::Single(lo)),
                Some(hi) => {
                    if hi < lo {
                        return Err(SieveError::invalid_pattern(
                            p,
                            format!("reversed range {lo}-{hi}"),
                        ));
                    }
                    items.push(ClassItem::Range(lo, hi));
                    *chars = lookahead;
                }
            }
        } else {
            items.push(ClassItem::Single(lo));
        }
    }

    if items.is_empty() {
        return Err(SieveError::invalid_pattern(p, "empty character class"));
    }
    Ok(GlobToken::Class { negated, items })
}

impl GlobToken {
    fn matches_char(&self, c: char) -> bool {
        match self {
            GlobToken::Literal(l) => *l == c,
            GlobToken::AnyChar => true,
            GlobToken::Star => false,
            GlobToken::Class { negated, items } => {
                let hit = items.iter().any(|item| match *item {
                    ClassItem::Single(s) => s == c,
                    ClassItem::Range(lo, hi) => (lo..=hi).contains(&c),
                });
                hit != *negated
            }
        }
    }
}

/// Iterative wildcard match with single-star backtracking.
fn glob_match(tokens: &[GlobToken], candidate: &str) -> bool {
    let text: Vec<char> = candidate.chars().collect();
    let (mut t, mut s) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while s < text.len() {
        if let Some(tok) = tokens.get(t) {
            if *tok == GlobToken::Star {
                star = Some((t, s));
                t += 1;
                continue;
            }
            if tok.matches_char(text[s]) {
                t += 1;
                s += 1;
                continue;
            }
        }
        match star {
            Some((st, ss)) => {
                t = st + 1;
                s = ss + 1;
                star = Some((st, ss + 1));
            }
            None => return false,
        }
    }

    tokens[t..].iter().all(|tok| *tok == GlobToken::Star)
}

fn compile_servlet(p: &str) -> Result<ServletSpec> {
    if p.is_empty() {
        return Ok(ServletSpec::Root);
    }
    if p == "/" {
        return Ok(ServletSpec::Default);
    }

    if let Some(ext) = p.strip_prefix("*.") {
        if ext.is_empty() {
            return Err(SieveError::invalid_pattern(p, "empty extension"));
        }
        if ext.contains('/') || ext.contains('*') {
            return Err(SieveError::invalid_pattern(
                p,
                "extension spec must not contain '/' or further '*'",
            ));
        }
        return Ok(ServletSpec::Extension(format!(".{ext}")));
    }

    if !p.starts_with('/') {
        return Err(SieveError::invalid_pattern(
            p,
            "servlet path spec must start with '/' or '*.'",
        ));
    }

    if let Some(prefix) = p.strip_suffix("/*") {
        if prefix.contains('*') {
            return Err(SieveError::invalid_pattern(p, "'*' only allowed as trailing '/*'"));
        }
        return Ok(ServletSpec::Prefix(prefix.to_string()));
    }

    if p.contains('*') {
        return Err(SieveError::invalid_pattern(p, "'*' only allowed as trailing '/*'"));
    }
    Ok(ServletSpec::Exact(p.to_string()))
}

fn servlet_match(spec: &ServletSpec, c: &str) -> bool {
    match spec {
        ServletSpec::Default => true,
        ServletSpec::Root => c == "/",
        ServletSpec::Exact(p) => c == p,
        ServletSpec::Prefix(p) => {
            c == p || (c.starts_with(p.as_str()) && c[p.len()..].starts_with('/'))
        }
        ServletSpec::Extension(ext) => {
            let last = c.rsplit('/').next().unwrap_or(c);
            last.len() > ext.len() && last.ends_with(ext.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(mode: MatchMode, p: &str) -> Result<CompiledPattern> {
        PatternSyntax::<&str>::compile(&mode, &p)
    }

    fn hit(mode: MatchMode, p: &str, c: &str) -> bool {
        match compile(mode, p) {
            Ok(compiled) => PatternSyntax::<&str>::matches(&mode, &compiled, &c),
            Err(_) => false,
        }
    }

    #[test]
    fn plain_modes() {
        assert!(hit(MatchMode::Exact, "/a", "/a"));
        assert!(!hit(MatchMode::Exact, "/a", "/a/b"));
        assert!(hit(MatchMode::Prefix, "/a", "/abc"));
        assert!(hit(MatchMode::Suffix, ".png", "/img/x.png"));
        assert!(!hit(MatchMode::Suffix, ".png", "/img/x.jpg"));
    }

    #[test]
    fn empty_pattern_is_invalid_for_string_modes() {
        for mode in [MatchMode::Exact, MatchMode::Prefix, MatchMode::Suffix, MatchMode::Glob] {
            assert!(matches!(
                compile(mode, ""),
                Err(SieveError::InvalidPattern { .. })
            ));
        }
    }

    #[test]
    fn glob_star_and_question() {
        assert!(hit(MatchMode::Glob, "/api/*", "/api/users"));
        assert!(hit(MatchMode::Glob, "/api/*", "/api/"));
        assert!(hit(MatchMode::Glob, "/api/*", "/api/v1/users"));
        assert!(!hit(MatchMode::Glob, "/api/*", "/static/img"));
        assert!(!hit(MatchMode::Glob, "/api/*", "/api"));
        assert!(hit(MatchMode::Glob, "*.example.com", "cdn.example.com"));
        assert!(hit(MatchMode::Glob, "user-??", "user-42"));
        assert!(!hit(MatchMode::Glob, "user-??", "user-4"));
        assert!(hit(MatchMode::Glob, "a*b*c", "aXXbYYc"));
        assert!(!hit(MatchMode::Glob, "a*b*c", "aXXbYY"));
        assert!(hit(MatchMode::Glob, "**", ""));
    }

    #[test]
    fn glob_classes_and_escapes() {
        assert!(hit(MatchMode::Glob, "v[0-9]", "v7"));
        assert!(!hit(MatchMode::Glob, "v[0-9]", "vx"));
        assert!(hit(MatchMode::Glob, "v[!0-9]", "vx"));
        assert!(hit(MatchMode::Glob, "[ab-]", "-"));
        assert!(hit(MatchMode::Glob, "literal\\*", "literal*"));
        assert!(!hit(MatchMode::Glob, "literal\\*", "literalX"));
    }

    #[test]
    fn glob_rejects_malformed() {
        for bad in ["[abc", "[]", "[!]", "x\\", "[z-a]"] {
            assert!(
                matches!(compile(MatchMode::Glob, bad), Err(SieveError::InvalidPattern { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn servlet_prefix_extension_default() {
        assert!(hit(MatchMode::ServletPath, "/api/*", "/api/users"));
        assert!(hit(MatchMode::ServletPath, "/api/*", "/api"));
        assert!(!hit(MatchMode::ServletPath, "/api/*", "/apix"));
        assert!(!hit(MatchMode::ServletPath, "/api/*", "/static/img"));
        assert!(hit(MatchMode::ServletPath, "/*", "/anything"));
        assert!(hit(MatchMode::ServletPath, "*.jsp", "/a/b/page.jsp"));
        assert!(!hit(MatchMode::ServletPath, "*.jsp", "/a/b.jsp/page"));
        assert!(!hit(MatchMode::ServletPath, "*.jsp", "/a/.jsp"));
        assert!(hit(MatchMode::ServletPath, "/", "/whatever/at/all"));
        assert!(hit(MatchMode::ServletPath, "", "/"));
        assert!(!hit(MatchMode::ServletPath, "", "/x"));
        assert!(hit(MatchMode::ServletPath, "/exact", "/exact"));
        assert!(!hit(MatchMode::ServletPath, "/exact", "/exact/more"));
    }

    #[test]
    fn servlet_rejects_malformed() {
        for bad in ["api/*", "/a/*/b", "/a*", "*.a/b", "*.*", "*."] {
            assert!(
                matches!(
                    compile(MatchMode::ServletPath, bad),
                    Err(SieveError::InvalidPattern { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }
}
