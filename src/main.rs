//! Route table inspection CLI.
//!
//! Loads a TOML route table and resolves locations against it.
//!
//! ```text
//! route-resolver --routes routes.toml resolve "/users/7?tab=posts"
//! route-resolver --routes routes.toml resolve --name user --param id=7
//! route-resolver --routes routes.toml table
//! route-resolver --routes routes.toml check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use route_resolver::config::loader::read_config;
use route_resolver::config::validation::validate_routes;
use route_resolver::observability::init_logging;
use route_resolver::{Location, Matcher, RawLocation, Route, RouteTable};

#[derive(Parser)]
#[command(name = "route-resolver")]
#[command(about = "Resolve locations against a declarative route table", long_about = None)]
struct Cli {
    /// Route table file (TOML)
    #[arg(short, long, default_value = "routes.toml")]
    routes: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a location and print the matched route
    Resolve {
        /// Path with optional query and hash
        location: Option<String>,

        /// Resolve a named route instead of a path
        #[arg(long)]
        name: Option<String>,

        /// Route param as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Resolve relative to this path
        #[arg(long)]
        current: Option<String>,

        /// Append relative paths to the current path
        #[arg(long)]
        append: bool,
    },
    /// Print the compiled route table in priority order, with the name index
    Table,
    /// Validate the route table and report every issue
    Check,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got \"{raw}\""))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = read_config(&cli.routes)?;
    init_logging(&config.observability.log_level);

    if let Commands::Check = cli.command {
        let issues = validate_routes(&config.routes);
        for issue in &issues {
            let kind = if issue.is_defect() { "defect" } else { "warning" };
            println!("{kind}: {issue}");
        }
        let defects = issues.iter().filter(|issue| issue.is_defect()).count();
        println!("{} route(s), {} issue(s), {} defect(s)", config.routes.len(), issues.len(), defects);
        return Ok(if defects == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let matcher = Matcher::from_config(&config)?;
    tracing::debug!(records = matcher.table().len(), path = %cli.routes.display(), "Route table loaded");

    match cli.command {
        Commands::Resolve {
            location,
            name,
            params,
            current,
            append,
        } => {
            let current = current.map(|path| matcher.match_route(path.as_str(), None, None));
            let raw = match (name, location) {
                (Some(name), _) => RawLocation::Location(Location::named(name).with_params(params)),
                (None, Some(path)) if params.is_empty() => RawLocation::Path(path),
                (None, path) => {
                    let mut target = Location::default().with_params(params);
                    target.path = path;
                    RawLocation::Location(target)
                }
            };

            let resolution = matcher.resolve(raw, current.as_ref(), append);
            let mut view = route_view(&resolution.route);
            view["href"] = Value::String(resolution.full_path);
            println!("{}", serde_json::to_string_pretty(&view)?);

            Ok(if resolution.route.is_matched() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Commands::Table => {
            println!("{}", serde_json::to_string_pretty(&table_view(matcher.table()))?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => Ok(ExitCode::SUCCESS),
    }
}

fn route_view(route: &Route) -> Value {
    json!({
        "name": route.name,
        "path": route.path,
        "fullPath": route.full_path,
        "params": route.params,
        "query": route.query,
        "hash": route.hash,
        "meta": route.meta,
        "matched": route.matched.iter().map(|record| {
            json!({
                "path": record.path,
                "name": record.name,
                "components": record.components,
            })
        }).collect::<Vec<_>>(),
        "redirectedFrom": route.redirected_from.as_ref().map(|location| {
            json!({
                "name": location.name,
                "path": location.path,
                "params": location.params,
                "query": location.query,
                "hash": location.hash,
            })
        }),
    })
}

fn table_view(table: &RouteTable) -> Value {
    let records: Vec<Value> = table
        .records_by_priority()
        .map(|record| {
            json!({
                "id": record.id.index(),
                "path": record.path,
                "name": record.name,
                "parent": record.parent.map(|id| id.index()),
                "aliasOf": record.match_as,
                "redirects": record.redirect.is_some(),
                "requiredParams": record.pattern.required_params(),
            })
        })
        .collect();

    let mut names: Vec<&str> = table.names().collect();
    names.sort_unstable();
    let names: serde_json::Map<String, Value> = names
        .into_iter()
        .filter_map(|name| {
            table
                .by_name(name)
                .map(|record| (name.to_string(), Value::String(record.path.clone())))
        })
        .collect();

    json!({
        "routes": records,
        "names": names,
    })
}
