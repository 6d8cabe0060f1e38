//! Path template compilation.
//!
//! # Responsibilities
//! - Tokenize a template into literal text and parameter keys
//! - Build an anchored regex that tests a path and captures parameters
//! - Render a concrete path from a parameter set (inverse of matching)
//!
//! # Template Grammar
//! ```text
//! /users/:id            named parameter, one segment
//! /users/:id(\d+)       named parameter with custom pattern
//! /files/:path*         optional, repeated
//! /tags/:tag+           required, repeated
//! /docs/:section?       optional
//! /legacy/(.*)          unnamed parameter, keyed by index
//! *                     wildcard, captured as `pathMatch`
//! \:                    escaped literal character
//! ```
//!
//! A `/` or `.` directly before a parameter belongs to the parameter and is
//! dropped together with it when an optional parameter is absent.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{FillError, PatternError};
use crate::location::encoding::{decode_component, encode_asterisk, encode_pretty};
use crate::location::Params;

/// Param key under which the first unnamed group (a bare `*`) is reported.
pub const PATH_MATCH: &str = "pathMatch";

/// Options that change how a template matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternOptions {
    /// Match letters case-sensitively.
    pub sensitive: bool,
    /// A trailing slash is significant.
    pub strict: bool,
}

/// Name of a parameter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyName {
    Named(String),
    /// Unnamed groups are numbered in declaration order.
    Index(usize),
}

impl KeyName {
    /// The key used in a [`Params`] map.
    pub fn param_name(&self) -> Cow<'_, str> {
        match self {
            KeyName::Named(name) => Cow::Borrowed(name),
            KeyName::Index(0) => Cow::Borrowed(PATH_MATCH),
            KeyName::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    fn lookup<'p>(&self, params: &'p Params) -> Option<&'p String> {
        match self {
            KeyName::Named(name) => params.get(name),
            KeyName::Index(0) => params.get(PATH_MATCH).or_else(|| params.get("0")),
            KeyName::Index(index) => params.get(&index.to_string()),
        }
    }
}

/// A parameter placeholder inside a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub name: KeyName,
    /// `/`, `.` or empty.
    pub prefix: String,
    pub delimiter: char,
    pub optional: bool,
    pub repeat: bool,
    /// The prefix is followed by more text inside the same segment.
    pub partial: bool,
    pub asterisk: bool,
    /// Regex source for a single value.
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Param(Key),
}

/// A parameter found while scanning, before prefix handling.
struct Scanned {
    name: Option<String>,
    pattern: Option<String>,
    modifier: Option<char>,
    asterisk: bool,
    end: usize,
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Scans a `(...)` group starting at `start`. Unescaped parentheses are not
/// allowed inside.
fn scan_group(chars: &[char], start: usize) -> Option<(String, usize)> {
    if chars.get(start) != Some(&'(') {
        return None;
    }
    let mut body = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let escaped = chars.get(i + 1)?;
                body.push('\\');
                body.push(*escaped);
                i += 2;
            }
            '(' => return None,
            ')' => {
                if body.is_empty() {
                    return None;
                }
                return Some((body, i + 1));
            }
            c => {
                body.push(c);
                i += 1;
            }
        }
    }
    None
}

fn scan_modifier(chars: &[char], at: usize) -> (Option<char>, usize) {
    match chars.get(at) {
        Some(&c @ ('+' | '*' | '?')) => (Some(c), at + 1),
        _ => (None, at),
    }
}

fn scan_param(chars: &[char], start: usize) -> Option<Scanned> {
    match chars.get(start)? {
        ':' => {
            let mut end = start + 1;
            while end < chars.len() && is_word(chars[end]) {
                end += 1;
            }
            if end == start + 1 {
                return None;
            }
            let name: String = chars[start + 1..end].iter().collect();
            let mut pattern = None;
            if let Some((group, after)) = scan_group(chars, end) {
                pattern = Some(group);
                end = after;
            }
            let (modifier, end) = scan_modifier(chars, end);
            Some(Scanned {
                name: Some(name),
                pattern,
                modifier,
                asterisk: false,
                end,
            })
        }
        '(' => {
            let (group, after) = scan_group(chars, start)?;
            let (modifier, end) = scan_modifier(chars, after);
            Some(Scanned {
                name: None,
                pattern: Some(group),
                modifier,
                asterisk: false,
                end,
            })
        }
        '*' => Some(Scanned {
            name: None,
            pattern: None,
            modifier: None,
            asterisk: true,
            end: start + 1,
        }),
        _ => None,
    }
}

/// `$` in a user pattern is a literal, not an anchor.
fn escape_group(group: &str) -> String {
    let mut escaped = String::with_capacity(group.len());
    let mut chars = group.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                escaped.push('\\');
                if let Some(next) = chars.next() {
                    escaped.push(next);
                }
            }
            '$' => escaped.push_str("\\$"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Splits a template into tokens.
pub fn parse(template: &str) -> Vec<Token> {
    let chars: Vec<char> = template.chars().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut next_index = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\' {
            match chars.get(i + 1) {
                Some(&escaped) => {
                    literal.push(escaped);
                    i += 2;
                }
                None => {
                    literal.push('\\');
                    i += 1;
                }
            }
            continue;
        }

        let (prefix, scanned) = match chars[i] {
            c @ ('/' | '.') => match scan_param(&chars, i + 1) {
                Some(scanned) => (Some(c), Some(scanned)),
                None => (None, None),
            },
            _ => (None, scan_param(&chars, i)),
        };
        let Some(scanned) = scanned else {
            literal.push(chars[i]);
            i += 1;
            continue;
        };

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }

        let next = chars.get(scanned.end).copied();
        let partial = matches!((prefix, next), (Some(p), Some(n)) if n != p);
        let delimiter = prefix.unwrap_or('/');
        let name = match scanned.name {
            Some(name) => KeyName::Named(name),
            None => {
                next_index += 1;
                KeyName::Index(next_index - 1)
            }
        };
        let pattern = match scanned.pattern {
            Some(group) => escape_group(&group),
            None if scanned.asterisk => ".*".to_string(),
            None => format!("[^{}]+?", regex::escape(&delimiter.to_string())),
        };

        tokens.push(Token::Param(Key {
            name,
            prefix: prefix.map(String::from).unwrap_or_default(),
            delimiter,
            optional: matches!(scanned.modifier, Some('?' | '*')),
            repeat: matches!(scanned.modifier, Some('+' | '*')),
            partial,
            asterisk: scanned.asterisk,
            pattern,
        }));
        i = scanned.end;
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

fn tokens_to_source(tokens: &[Token], strict: bool) -> String {
    let mut route = String::new();
    for token in tokens {
        match token {
            Token::Literal(text) => route.push_str(&regex::escape(text)),
            Token::Param(key) => {
                let prefix = regex::escape(&key.prefix);
                let mut capture = format!("(?:{})", key.pattern);
                if key.repeat {
                    capture = format!("{capture}(?:{prefix}{capture})*");
                }
                let capture = match (key.optional, key.partial) {
                    (true, false) => format!("(?:{prefix}({capture}))?"),
                    (true, true) => format!("{prefix}({capture})?"),
                    (false, _) => format!("{prefix}({capture})"),
                };
                route.push_str(&capture);
            }
        }
    }

    if !strict {
        if route.ends_with('/') {
            route.pop();
        }
        route.push_str("(?:/)?");
    }
    format!("^{route}$")
}

fn build_regex(template: &str, source: &str, sensitive: bool) -> Result<Regex, PatternError> {
    RegexBuilder::new(source)
        .case_insensitive(!sensitive)
        .build()
        .map_err(|source| PatternError::InvalidRegex {
            template: template.to_string(),
            source,
        })
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct Pattern {
    tokens: Vec<Token>,
    regex: Regex,
    /// One validator per key, in key order.
    validators: Vec<Regex>,
}

impl Pattern {
    /// Compile a template.
    pub fn compile(template: &str, options: PatternOptions) -> Result<Self, PatternError> {
        let tokens = parse(template);
        let regex = build_regex(template, &tokens_to_source(&tokens, options.strict), options.sensitive)?;
        let validators = tokens
            .iter()
            .filter_map(|token| match token {
                Token::Param(key) => Some(key),
                Token::Literal(_) => None,
            })
            .map(|key| build_regex(template, &format!("^(?:{})$", key.pattern), options.sensitive))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tokens,
            regex,
            validators,
        })
    }

    /// Parameter keys in capture order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Param(key) => Some(key),
            Token::Literal(_) => None,
        })
    }

    /// Names of the parameters that must be present to fill this template.
    pub fn required_params(&self) -> Vec<String> {
        self.keys()
            .filter(|key| !key.optional)
            .map(|key| key.name.param_name().into_owned())
            .collect()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Test `path` and extract decoded parameter values.
    ///
    /// Optional parameters that did not participate are absent.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        let mut params = Params::new();
        for (index, key) in self.keys().enumerate() {
            if let Some(value) = captures.get(index + 1) {
                params.insert(key.name.param_name().into_owned(), decode_component(value.as_str()));
            }
        }
        Some(params)
    }

    /// Render a concrete path from `params`.
    pub fn fill(&self, params: &Params) -> Result<String, FillError> {
        let mut path = String::new();
        let mut validators = self.validators.iter();

        for token in &self.tokens {
            let key = match token {
                Token::Literal(text) => {
                    path.push_str(text);
                    continue;
                }
                Token::Param(key) => key,
            };
            let validator = validators.next();

            let Some(value) = key.name.lookup(params) else {
                if key.optional {
                    if key.partial {
                        path.push_str(&key.prefix);
                    }
                    continue;
                }
                return Err(FillError::MissingParam {
                    param: key.name.param_name().into_owned(),
                });
            };

            let segment = if key.asterisk {
                encode_asterisk(value)
            } else {
                encode_pretty(value)
            };
            if validator.is_some_and(|validator| !validator.is_match(&segment)) {
                return Err(FillError::Mismatch {
                    param: key.name.param_name().into_owned(),
                    pattern: key.pattern.clone(),
                    value: segment,
                });
            }

            path.push_str(&key.prefix);
            path.push_str(&segment);
        }

        Ok(path)
    }
}

/// Param names that occur more than once in `template`.
pub fn duplicate_params(template: &str) -> Vec<String> {
    let mut seen = Vec::new();
    let mut duplicates = Vec::new();
    for token in parse(template) {
        if let Token::Param(key) = token {
            let name = key.name.param_name().into_owned();
            if seen.contains(&name) {
                if !duplicates.contains(&name) {
                    duplicates.push(name);
                }
            } else {
                seen.push(name);
            }
        }
    }
    duplicates
}
