//! End-to-end resolution against compiled route tables.

use std::sync::Arc;

use route_resolver::location::{Query, QueryCodec, QueryValue};
use route_resolver::routing::{is_included_route, is_same_route, PropsSpec};
use route_resolver::{Location, Matcher, PatternCache, Redirect, RedirectTarget, RouteConfig, RouterOptions};

mod common;

#[test]
fn test_named_route_scenario() {
    let matcher = common::matcher(vec![RouteConfig::new("/users/:id").name("user")]);

    let route = matcher.match_route(Location::named("user").with_param("id", "7"), None, None);
    assert_eq!(route.path, "/users/7");
    assert_eq!(route.params.len(), 1);
    assert_eq!(route.params["id"], "7");
    assert_eq!(route.matched.len(), 1);
}

#[test]
fn test_redirect_scenario() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/a").redirect("/b"),
        RouteConfig::new("/b").name("b"),
    ]);

    let route = matcher.match_route("/a", None, None);
    assert_eq!(route.matched[0].path, "/b");
    assert_eq!(route.name.as_deref(), Some("b"));
    let from = route.redirected_from.as_ref().unwrap();
    assert_eq!(from.path.as_deref(), Some("/a"));
}

#[test]
fn test_no_match_scenario() {
    let matcher = common::matcher(vec![RouteConfig::new("/a"), RouteConfig::new("/b/:id")]);

    let route = matcher.match_route("/does-not-exist?x=1#top", None, None);
    assert!(route.matched.is_empty());
    assert_eq!(route.path, "/does-not-exist");
    assert_eq!(route.hash, "#top");
    assert_eq!(route.full_path, "/does-not-exist?x=1#top");
}

#[test]
fn test_relative_params_scenario() {
    let matcher = common::matcher(common::app_routes());
    let current = matcher.match_route("/list/2", None, None);
    assert_eq!(current.name.as_deref(), Some("list"));

    let route = matcher.match_route(Location::params([("page", "3")]), Some(&current), None);
    assert_eq!(route.name.as_deref(), Some("list"));
    assert_eq!(route.params["page"], "3");
    assert_eq!(route.path, "/list/3");
}

#[test]
fn test_relative_params_on_unnamed_route_refill_template() {
    let matcher = common::matcher(vec![RouteConfig::new("/shop/:category/:item")]);
    let current = matcher.match_route("/shop/books/42", None, None);

    let route = matcher.match_route(Location::params([("item", "43")]), Some(&current), None);
    assert_eq!(route.path, "/shop/books/43");
    assert_eq!(route.params["category"], "books");
}

#[test]
fn test_wildcards_sort_last() {
    let matcher = common::matcher(common::app_routes());
    let paths = matcher.table().path_list();
    assert_eq!(paths.last().map(String::as_str), Some("*"));
    assert_eq!(paths[0], "");
    assert_eq!(paths[1], "/users/:id/posts");

    assert_eq!(matcher.match_route("/users/9", None, None).name.as_deref(), Some("user"));
    let fallback = matcher.match_route("/nowhere/at/all", None, None);
    assert_eq!(fallback.name.as_deref(), Some("not-found"));
    assert_eq!(fallback.params["pathMatch"], "/nowhere/at/all");
}

#[test]
fn test_wildcard_stays_last_after_add_routes() {
    let mut matcher = common::matcher(vec![RouteConfig::new("*"), RouteConfig::new("/a")]);
    matcher.add_routes(&[RouteConfig::new("/b").name("b")]).unwrap();

    assert_eq!(matcher.table().path_list(), ["/a", "/b", "*"]);
    assert_eq!(matcher.match_route("/b", None, None).name.as_deref(), Some("b"));
}

#[test]
fn test_leftmost_priority_among_overlapping_routes() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/docs/:page").name("page"),
        RouteConfig::new("/docs/intro").name("intro"),
    ]);
    assert_eq!(matcher.match_route("/docs/intro", None, None).name.as_deref(), Some("page"));
}

#[test]
fn test_nested_routes_match_ancestor_chain() {
    let matcher = common::matcher(common::app_routes());

    let route = matcher.match_route("/users/5/posts", None, None);
    assert_eq!(common::matched_paths(&route), ["/users/:id", "/users/:id/posts"]);
    assert_eq!(route.params["id"], "5");
    assert_eq!(route.name.as_deref(), Some("user-posts"));
    assert!(route.meta.is_empty());
}

#[test]
fn test_meta_comes_from_leaf() {
    let matcher = common::matcher(common::app_routes());
    let route = matcher.match_route("/users/5", None, None);
    assert_eq!(route.meta.get("auth"), Some(&serde_json::Value::Bool(true)));
}

#[test]
fn test_redirect_keeps_query_and_hash() {
    let matcher = common::matcher(common::app_routes());

    let route = matcher.match_route("/old-user/4?tab=x#bio", None, None);
    assert_eq!(route.path, "/users/4");
    assert_eq!(route.query["tab"], QueryValue::from("x"));
    assert_eq!(route.hash, "#bio");
    assert_eq!(route.full_path, "/users/4?tab=x#bio");
    assert_eq!(
        route.redirected_from.as_ref().and_then(|from| from.path.as_deref()),
        Some("/old-user/4")
    );
}

#[test]
fn test_redirect_with_explicit_empty_query() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/a").redirect(RedirectTarget::path("/b").with_query(Query::new())),
        RouteConfig::new("/b"),
    ]);

    let route = matcher.match_route("/a?keep=no#h", None, None);
    assert_eq!(route.path, "/b");
    assert!(route.query.is_empty());
    assert_eq!(route.hash, "#h");
}

#[test]
fn test_redirect_to_named_route_inherits_params() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/people/:id").redirect(RedirectTarget::named("user")),
        RouteConfig::new("/users/:id").name("user"),
    ]);

    let route = matcher.match_route("/people/12?x=1", None, None);
    assert_eq!(route.path, "/users/12");
    assert_eq!(route.name.as_deref(), Some("user"));
    assert_eq!(route.query["x"], QueryValue::from("1"));
}

#[test]
fn test_redirect_overrides_fields_independently() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/a").redirect(RedirectTarget::path("/b").with_hash("top")),
        RouteConfig::new("/b"),
    ]);

    let route = matcher.match_route("/a?q=1#old", None, None);
    assert_eq!(route.hash, "#top");
    assert_eq!(route.query["q"], QueryValue::from("1"));
}

#[test]
fn test_computed_redirect_sees_would_be_route() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/legacy/:id").redirect(Redirect::computed(|route| {
            RedirectTarget::path(format!("/users/{}", route.params["id"]))
        })),
        RouteConfig::new("/users/:id").name("user"),
    ]);

    let route = matcher.match_route("/legacy/8", None, None);
    assert_eq!(route.path, "/users/8");
    assert_eq!(route.name.as_deref(), Some("user"));
}

#[test]
fn test_redirect_chain_keeps_first_location() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/one").redirect("/two"),
        RouteConfig::new("/two").redirect("/three"),
        RouteConfig::new("/three").name("three"),
    ]);

    let route = matcher.match_route("/one", None, None);
    assert_eq!(route.name.as_deref(), Some("three"));
    assert_eq!(
        route.redirected_from.as_ref().and_then(|from| from.path.as_deref()),
        Some("/one")
    );
}

#[test]
fn test_redirect_cycle_is_bounded() {
    let options = RouterOptions {
        max_redirects: 3,
        ..RouterOptions::default()
    };
    let routes = [RouteConfig::new("/ping").redirect("/pong"), RouteConfig::new("/pong").redirect("/ping")];
    let matcher = Matcher::new(&routes, options).unwrap();

    assert!(matcher.match_route("/ping", None, None).matched.is_empty());
}

#[test]
fn test_alias_shares_canonical_record() {
    let matcher = common::matcher(common::app_routes());

    let canonical = matcher.match_route("/users/3", None, None);
    let aliased = matcher.match_route("/u/4", None, None);

    assert!(Arc::ptr_eq(canonical.record().unwrap(), aliased.record().unwrap()));
    assert_eq!(aliased.params["id"], "4");
    assert_eq!(aliased.path, "/u/4");
    assert_eq!(aliased.name.as_deref(), Some("user"));

    canonical.record().unwrap().register_instance("default", Some(11));
    assert_eq!(aliased.record().unwrap().instance("default"), Some(11));
}

#[test]
fn test_alias_children_resolve_to_canonical_children() {
    let matcher = common::matcher(common::app_routes());

    let aliased = matcher.match_route("/u/4/posts", None, None);
    let canonical = matcher.match_route("/users/4/posts", None, None);
    assert!(Arc::ptr_eq(aliased.record().unwrap(), canonical.record().unwrap()));
    assert_eq!(common::matched_paths(&aliased), ["/users/:id", "/users/:id/posts"]);
}

#[test]
fn test_repeated_param_captures_rest() {
    let matcher = common::matcher(common::app_routes());

    let route = matcher.match_route("/files/a/b/c.txt", None, None);
    assert_eq!(route.name.as_deref(), Some("files"));
    assert_eq!(route.params["path"], "a/b/c.txt");

    let empty = matcher.match_route("/files", None, None);
    assert_eq!(empty.name.as_deref(), Some("files"));
    assert!(empty.params.get("path").is_none());
}

#[test]
fn test_case_sensitivity() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/About").name("about"),
        RouteConfig::new("/Exact").name("exact").case_sensitive(true),
    ]);

    assert_eq!(matcher.match_route("/about", None, None).name.as_deref(), Some("about"));
    assert!(matcher.match_route("/exact", None, None).matched.is_empty());
    assert!(matcher.match_route("/Exact", None, None).is_matched());
}

#[test]
fn test_strict_trailing_slash() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/loose"),
        RouteConfig::new("/tight/").strict(true),
    ]);

    assert!(matcher.match_route("/loose/", None, None).is_matched());
    assert!(matcher.match_route("/tight/", None, None).is_matched());
    assert!(!matcher.match_route("/tight", None, None).is_matched());
}

#[test]
fn test_params_are_decoded() {
    let matcher = common::matcher(vec![RouteConfig::new("/tags/:tag").name("tag")]);

    let route = matcher.match_route("/tags/caf%C3%A9%20bar", None, None);
    assert_eq!(route.params["tag"], "café bar");
}

#[test]
fn test_repeated_query_keys_become_lists() {
    let matcher = common::matcher(vec![RouteConfig::new("/search")]);

    let route = matcher.match_route("/search?tag=a&tag=b&flag", None, None);
    assert_eq!(route.query["tag"], QueryValue::from(vec!["a", "b"]));
    assert_eq!(route.query["flag"], QueryValue::Single(None));
}

#[test]
fn test_props_resolution() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/users/:id").props(PropsSpec::Params),
        RouteConfig::new("/static")
            .components("default", "Main")
            .components("side", "Side")
            .named_props("side", PropsSpec::computed(|route| {
                let mut props = serde_json::Map::new();
                props.insert("path".into(), route.path.clone().into());
                props
            })),
    ]);

    let user = matcher.match_route("/users/2", None, None);
    let props = user.record().unwrap().resolve_props("default", &user).unwrap();
    assert_eq!(props["id"], "2");

    let page = matcher.match_route("/static", None, None);
    let record = page.record().unwrap();
    assert!(record.resolve_props("default", &page).is_none());
    assert_eq!(record.resolve_props("side", &page).unwrap()["path"], "/static");
    assert_eq!(record.component("side").map(|c| c.as_str()), Some("Side"));
}

#[test]
fn test_resolve_relative_and_appended_paths() {
    let matcher = common::matcher(common::app_routes());
    let current = matcher.match_route("/users/5/posts", None, None);

    let sibling = matcher.resolve("profile", Some(&current), false);
    assert_eq!(sibling.route.path, "/users/5/profile");

    let appended = matcher.resolve("profile", Some(&current), true);
    assert_eq!(appended.route.path, "/users/5/posts/profile");

    let flagged = matcher.resolve(Location::path("profile").appended(), Some(&current), false);
    assert_eq!(flagged.route.path, "/users/5/posts/profile");

    let up = matcher.resolve("../7", Some(&current), false);
    assert_eq!(up.route.path, "/users/7");
}

#[test]
fn test_resolve_reports_pre_redirect_href() {
    let matcher = common::matcher(common::app_routes());

    let resolution = matcher.resolve("/old-user/1?a=b", None, false);
    assert_eq!(resolution.route.path, "/users/1");
    assert_eq!(resolution.full_path, "/old-user/1?a=b");
    assert_eq!(resolution.location.path.as_deref(), Some("/old-user/1"));
}

#[test]
fn test_same_and_included_routes() {
    let matcher = common::matcher(common::app_routes());

    let a = matcher.match_route("/users/5/", None, None);
    let b = matcher.match_route("/users/5", None, None);
    assert!(is_same_route(&a, &b));

    let child = matcher.match_route("/users/5/posts", None, None);
    assert!(is_included_route(&child, &b));
    assert!(!is_included_route(&b, &child));
}

#[test]
fn test_shared_pattern_cache() {
    let cache = PatternCache::new();
    let routes = [RouteConfig::new("/users/:id"), RouteConfig::new("/a")];
    let first = Matcher::with_cache(&routes, RouterOptions::default(), cache.clone()).unwrap();
    let second = Matcher::with_cache(&routes, RouterOptions::default(), cache.clone()).unwrap();

    assert_eq!(cache.len(), 2);
    assert_eq!(first.cache().len(), 2);
    assert!(Arc::ptr_eq(
        &first.table().by_path("/users/:id").unwrap().pattern,
        &second.table().by_path("/users/:id").unwrap().pattern
    ));
}

#[test]
fn test_duplicate_declarations_are_inert() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/dup").name("first"),
        RouteConfig::new("/dup").name("second"),
        RouteConfig::new("/other").name("first"),
    ]);

    assert_eq!(matcher.table().path_list(), ["/dup", "/other"]);
    assert_eq!(matcher.match_route("/dup", None, None).name.as_deref(), Some("first"));
    assert_eq!(matcher.table().by_name("first").unwrap().path, "/dup");
}

/// `a=1;b=2` style query strings.
#[derive(Debug)]
struct SemicolonCodec;

impl QueryCodec for SemicolonCodec {
    fn parse(&self, query: &str) -> Query {
        query
            .trim_start_matches('?')
            .split(';')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), QueryValue::from(value)),
                None => (pair.to_string(), QueryValue::Single(None)),
            })
            .collect()
    }

    fn stringify(&self, query: &Query) -> String {
        let pairs: Vec<String> = query
            .iter()
            .map(|(key, value)| match value {
                QueryValue::Single(Some(value)) => format!("{key}={value}"),
                QueryValue::Single(None) => key.clone(),
                QueryValue::List(values) => values
                    .iter()
                    .map(|value| format!("{key}={}", value.as_deref().unwrap_or_default()))
                    .collect::<Vec<_>>()
                    .join(";"),
            })
            .collect();
        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join(";"))
        }
    }
}

#[test]
fn test_custom_query_codec_is_used_throughout() {
    let matcher = common::matcher(vec![
        RouteConfig::new("/a").name("a"),
        RouteConfig::new("/old").redirect("/a"),
    ])
    .with_query_codec(SemicolonCodec);

    let route = matcher.match_route("/a?x=1;y=2", None, None);
    assert_eq!(route.query.len(), 2);
    assert_eq!(route.query["x"], QueryValue::from("1"));
    assert_eq!(route.query["y"], QueryValue::from("2"));
    assert_eq!(route.full_path, "/a?x=1;y=2");

    let resolution = matcher.resolve("/old?x=1;y=2", None, false);
    assert_eq!(resolution.route.path, "/a");
    assert_eq!(resolution.route.full_path, "/a?x=1;y=2");
    assert_eq!(resolution.full_path, "/old?x=1;y=2");
    assert_eq!(
        resolution.route.redirected_from_path(matcher.codec()).as_deref(),
        Some("/old?x=1;y=2")
    );
}

#[test]
fn test_named_route_with_missing_param_falls_back_to_root_path() {
    let matcher = common::matcher(vec![RouteConfig::new("/users/:id").name("user")]);

    let route = matcher.match_route(Location::named("user"), None, None);
    assert_eq!(route.path, "/");
    assert_eq!(route.full_path, "/");
    assert_eq!(route.matched.len(), 1);
    assert_eq!(route.matched[0].path, "/users/:id");
    assert!(route.params.is_empty());
}
