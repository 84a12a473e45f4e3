use anyhow::{bail, Context, Result};
use clap::Parser;
use pizzadrone_cli::{edinburgh_demo, load_scenario, Scenario};
use pizzadrone_core::{FlightRules, LngLat};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario JSON file (origin, destination, central_area, no_fly_zones)
    #[arg(long, conflicts_with = "demo")]
    scenario: Option<PathBuf>,

    /// Use the built-in Edinburgh delivery
    #[arg(long)]
    demo: bool,

    /// Plan on a running server instead of locally (e.g. http://localhost:8080).
    /// The server applies its own flight rules.
    #[arg(
        long,
        conflicts_with_all = ["step_length", "proximity", "max_moves", "max_expansions"]
    )]
    server: Option<String>,

    /// Distance covered by one move, in degrees
    #[arg(long, default_value_t = 0.00015)]
    step_length: f64,

    /// Arrival threshold, in degrees
    #[arg(long, default_value_t = 0.00015)]
    proximity: f64,

    /// Maximum route length in moves
    #[arg(long, default_value_t = 2000)]
    max_moves: usize,

    /// Stop the search after this many node expansions
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Write the route as GeoJSON to this file
    #[arg(long)]
    geojson: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pizzadrone_core=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let scenario = match (&args.scenario, args.demo) {
        (Some(path), _) => load_scenario(path)?,
        (None, true) => edinburgh_demo(),
        (None, false) => bail!("pass --scenario <file> or --demo"),
    };

    println!(
        "Planning '{}': ({}, {}) -> {} ({}, {})",
        scenario.name,
        scenario.origin.lng,
        scenario.origin.lat,
        scenario.destination_name,
        scenario.destination.lng,
        scenario.destination.lat
    );

    match &args.server {
        Some(url) => plan_remote(url, &scenario, args.geojson.as_deref()),
        None => plan_local(&args, &scenario),
    }
}

fn plan_local(args: &Args, scenario: &Scenario) -> Result<()> {
    let rules = FlightRules {
        step_length: args.step_length,
        proximity_threshold: args.proximity,
        max_moves: args.max_moves,
        max_expansions: args.max_expansions,
        ..FlightRules::default()
    };

    let plan = scenario.plan(&rules)?;
    if plan.found() {
        println!("Route: {} moves, {} nodes visited", plan.moves(), plan.nodes_visited);
        if plan.path.len() > rules.max_moves {
            println!("Warning: route exceeds the {} move budget", rules.max_moves);
        }
    } else if plan.budget_exhausted {
        println!("No route within {} expansions", plan.nodes_visited);
    } else {
        println!("No route exists ({} nodes visited)", plan.nodes_visited);
    }

    if let Some(path) = &args.geojson {
        write_geojson(path, &scenario.geojson(&plan.path))?;
    }
    Ok(())
}

fn plan_remote(url: &str, scenario: &Scenario, geojson: Option<&Path>) -> Result<()> {
    let base = url.trim_end_matches('/');
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?;

    let resp = client
        .post(format!("{}/v1/routes/plan", base))
        .json(&scenario.plan_request())
        .send()
        .context("send plan request")?;
    let status = resp.status();
    let body: Value = resp.json().context("decode plan response")?;
    if !status.is_success() {
        bail!("server returned {}: {}", status, body);
    }

    let path: Vec<LngLat> = serde_json::from_value(body["path"].clone())?;
    if path.is_empty() {
        println!("No route exists ({} nodes visited)", body["nodes_visited"]);
    } else {
        println!(
            "Route: {} moves, {} nodes visited (server)",
            body["moves"], body["nodes_visited"]
        );
    }

    if let Some(out) = geojson {
        write_geojson(out, &scenario.geojson(&path))?;
    }
    Ok(())
}

fn write_geojson(path: &Path, geojson: &Value) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(geojson)?)
        .with_context(|| format!("write {}", path.display()))?;
    println!("GeoJSON written to {}", path.display());
    Ok(())
}
