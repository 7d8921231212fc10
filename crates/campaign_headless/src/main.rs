//! Headless campaign runner.
//!
//! Loads a scenario record directory, optionally applies a RON run plan
//! (move orders to issue, ticks to advance), runs the order engine, and
//! prints where every troop ended up. Designed for CI checks and
//! balance experiments without a UI.
//!
//! # Usage
//!
//! ```bash
//! # Advance a scenario by one tick
//! cargo run -p campaign_headless -- path/to/scenario
//!
//! # Issue orders from a plan, run 10 ticks, save the result
//! cargo run -p campaign_headless -- path/to/scenario --plan march.ron --save out/
//! ```
//!
//! Logs go to stderr; the troop summary goes to stdout.

mod runplan;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campaign_core::math::MapPoint;
use campaign_core::pathfind::DirectPathFinder;
use campaign_core::scenario::GameScenario;
use campaign_core::troop::Order;

use runplan::RunPlan;

#[derive(Parser)]
#[command(name = "campaign_headless")]
#[command(about = "Headless campaign scenario runner")]
#[command(version)]
struct Cli {
    /// Scenario record directory to load
    scenario: PathBuf,

    /// RON run plan with orders to issue and ticks to advance
    #[arg(short, long)]
    plan: Option<PathBuf>,

    /// Ticks to advance (overridden by the plan if one is given)
    #[arg(short, long, default_value = "1")]
    ticks: u32,

    /// Directory to save the advanced scenario into
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let plan = match &cli.plan {
        Some(path) => match RunPlan::load(path) {
            Ok(plan) => plan,
            Err(e) => {
                eprintln!("Failed to load run plan: {e}");
                std::process::exit(1);
            }
        },
        None => RunPlan {
            ticks: cli.ticks,
            orders: Vec::new(),
        },
    };

    let mut scenario = match GameScenario::load(&cli.scenario, Box::new(DirectPathFinder)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load scenario: {e}");
            std::process::exit(1);
        }
    };

    for order in &plan.orders {
        let target = MapPoint::new(order.target.0, order.target.1);
        match scenario.troops.get_mut(order.troop) {
            Some(troop) => {
                tracing::info!(troop = order.troop, target = %target, "issuing move order");
                troop.give_move_to_order(target);
            }
            None => {
                eprintln!("Run plan refers to unknown troop {}", order.troop);
                std::process::exit(1);
            }
        }
    }

    for tick in 0..plan.ticks {
        if let Err(e) = scenario.run_troop_orders() {
            eprintln!("Order execution failed at tick {tick}: {e}");
            std::process::exit(1);
        }
    }

    println!("Scenario: {}", scenario.survey.title);
    println!("Ticks advanced: {}", plan.ticks);
    if scenario.troops.is_empty() {
        println!("No troops on the map.");
    }
    for troop in &scenario.troops {
        let faction = scenario
            .troop_faction(troop.id)
            .map_or("unaligned", |f| f.name.as_str());
        let order = match troop.order {
            Order::Idle => "idle".to_string(),
            Order::MoveTo(target) => format!("moving to {target}"),
        };
        println!(
            "Troop {} [{faction}] at {} - {order}",
            troop.id, troop.location
        );
    }

    if let Some(dir) = &cli.save {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Cannot create save directory '{}': {e}", dir.display());
            std::process::exit(1);
        }
        if let Err(e) = scenario.save(dir) {
            eprintln!("Failed to save scenario: {e}");
            std::process::exit(1);
        }
        eprintln!("Saved advanced scenario to: {}", dir.display());
    }
}
