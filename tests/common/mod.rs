//! Shared utilities for integration tests.

use route_resolver::{Matcher, RouteConfig, RouterOptions};

/// Build a matcher over `routes` with default options and a fresh cache.
pub fn matcher(routes: Vec<RouteConfig>) -> Matcher {
    Matcher::new(&routes, RouterOptions::default()).unwrap()
}

/// Paths of the matched chain, root first.
#[allow(dead_code)]
pub fn matched_paths(route: &route_resolver::Route) -> Vec<&str> {
    route.matched.iter().map(|record| record.path.as_str()).collect()
}

/// A small application-shaped route table.
#[allow(dead_code)]
pub fn app_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/").name("home").component("Home"),
        RouteConfig::new("*").name("not-found").component("NotFound"),
        RouteConfig::new("/users/:id")
            .name("user")
            .alias("/u/:id")
            .component("User")
            .meta("auth", true)
            .child(RouteConfig::new("posts").name("user-posts").component("UserPosts"))
            .child(RouteConfig::new("profile").component("UserProfile")),
        RouteConfig::new("/list/:page").name("list").component("List"),
        RouteConfig::new("/files/:path*").name("files"),
        RouteConfig::new("/old-user/:id").redirect("/users/:id"),
    ]
}
