//! Query string codec.

use std::fmt;

use crate::location::encoding::{decode_component, encode_query};
use crate::location::{Query, QueryValue};

/// Converts between query strings and [`Query`] maps.
pub trait QueryCodec: Send + Sync + fmt::Debug {
    /// Parse a query string, with or without its leading `?`.
    fn parse(&self, query: &str) -> Query;

    /// Render a query map, including the leading `?` when non-empty.
    fn stringify(&self, query: &Query) -> String;
}

/// `a=1&a=2&flag` style codec. `+` decodes to a space.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultQueryCodec;

impl QueryCodec for DefaultQueryCodec {
    fn parse(&self, query: &str) -> Query {
        parse_query(query)
    }

    fn stringify(&self, query: &Query) -> String {
        stringify_query(query)
    }
}

pub fn parse_query(query: &str) -> Query {
    let mut parsed = Query::new();
    let trimmed = query.trim();
    let trimmed = trimmed
        .strip_prefix(['?', '#', '&'])
        .unwrap_or(trimmed);

    for param in trimmed.split('&').filter(|param| !param.is_empty()) {
        let param = param.replace('+', " ");
        let mut parts = param.splitn(2, '=');
        let key = decode_component(parts.next().unwrap_or_default());
        let value = parts.next().map(decode_component);

        match parsed.get_mut(&key) {
            None => {
                parsed.insert(key, QueryValue::Single(value));
            }
            Some(existing) => {
                *existing = match std::mem::replace(existing, QueryValue::List(Vec::new())) {
                    QueryValue::Single(first) => QueryValue::List(vec![first, value]),
                    QueryValue::List(mut values) => {
                        values.push(value);
                        QueryValue::List(values)
                    }
                };
            }
        }
    }

    parsed
}

pub fn stringify_query(query: &Query) -> String {
    let pair = |key: &str, value: &Option<String>| match value {
        Some(value) => format!("{}={}", encode_query(key), encode_query(value)),
        None => encode_query(key),
    };

    let parts: Vec<String> = query
        .iter()
        .map(|(key, value)| match value {
            QueryValue::Single(value) => pair(key, value),
            QueryValue::List(values) => values
                .iter()
                .map(|value| pair(key, value))
                .collect::<Vec<_>>()
                .join("&"),
        })
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

/// Parse an inline query and overlay `extra`; keys in `extra` win.
pub fn resolve_query(inline: &str, extra: &Query, codec: &dyn QueryCodec) -> Query {
    let mut parsed = codec.parse(inline);
    for (key, value) in extra {
        parsed.insert(key.clone(), value.clone());
    }
    parsed
}
