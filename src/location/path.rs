//! Path string utilities.

/// A path split into its path, query and hash parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedPath<'a> {
    pub path: &'a str,
    /// Without the leading `?`.
    pub query: &'a str,
    /// Including the leading `#`.
    pub hash: &'a str,
}

pub fn parse_path(path: &str) -> ParsedPath<'_> {
    let (rest, hash) = match path.find('#') {
        Some(index) => path.split_at(index),
        None => (path, ""),
    };
    let (path, query) = match rest.find('?') {
        Some(index) => (&rest[..index], &rest[index + 1..]),
        None => (rest, ""),
    };
    ParsedPath { path, query, hash }
}

/// Resolve `relative` against `base` like a filesystem path.
///
/// Without `append` the last segment of `base` is replaced, so `b` against
/// `/a` is `/b`; with `append` it is `/a/b`.
pub fn resolve_path(relative: &str, base: &str, append: bool) -> String {
    match relative.chars().next() {
        Some('/') => return relative.to_string(),
        Some('?' | '#') => return format!("{base}{relative}"),
        _ => {}
    }

    let mut stack: Vec<&str> = base.split('/').collect();
    if !append || stack.last().is_some_and(|last| last.is_empty()) {
        stack.pop();
    }

    for segment in relative.split('/') {
        match segment {
            ".." => {
                stack.pop();
            }
            "." => {}
            segment => stack.push(segment),
        }
    }

    if stack.first() != Some(&"") {
        stack.insert(0, "");
    }
    stack.join("/")
}

/// Collapse runs of `/` into one.
pub fn clean_path(path: &str) -> String {
    let mut cleaned = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && cleaned.ends_with('/') {
            continue;
        }
        cleaned.push(c);
    }
    cleaned
}
