//! world-runner: headless runner for the Chronica kernel.
//!
//! Usage:
//!   world-runner --seed 12345 --ticks 720 --db run.db
//!   world-runner --seed 12345 --config engine.json

mod demo;

use anyhow::Result;
use chronica_core::{
    archive::RunArchive,
    config::EngineConfig,
    engine::SimEngine,
    event::WorldEvent,
};
use std::collections::BTreeMap;
use std::env;
use std::rc::Rc;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 720u64);
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => EngineConfig::load(&w[1])?,
        None => EngineConfig::default(),
    };

    println!("Chronica — world-runner");
    println!("  seed:  {seed}");
    println!("  ticks: {ticks}");
    println!("  db:    {db}");
    println!();

    let archive = Rc::new(RunArchive::open(db)?);
    archive.migrate()?;

    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    let started_at = chrono::Utc::now().to_rfc3339();
    archive.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"), &started_at)?;

    let mut engine = SimEngine::with_config(run_id.clone(), seed, config);
    engine.register(Box::new(demo::SettlementSystem::new()));
    engine.register(Box::new(demo::RaidSystem::new()));
    engine.attach_archive(Rc::clone(&archive));

    engine.run_ticks(ticks)?;
    print_summary(&engine);
    Ok(())
}

fn print_summary(engine: &SimEngine) {
    let log = engine.bus().log();
    let date = engine.clock.current_date();

    let mut by_category: BTreeMap<&'static str, usize> = BTreeMap::new();
    for event in log.all() {
        *by_category.entry(event.category.name()).or_default() += 1;
    }
    let peak: Option<&WorldEvent> = log.all().iter().max_by_key(|e| e.significance);

    println!("=== RUN SUMMARY ===");
    println!("  run_id:     {}", engine.run_id);
    println!("  final tick: {}", engine.clock.current_tick());
    println!(
        "  world date: year {}, month {}, day {}",
        date.year, date.month, date.day
    );
    println!("  events:     {}", log.len());
    for (category, count) in &by_category {
        println!("    {category:<12} {count}");
    }
    if let Some(event) = peak {
        println!();
        println!(
            "  most significant: [{}] {} (tick {}, significance {})",
            event.category.name(),
            event.subtype,
            event.timestamp,
            event.significance
        );
        if let Some(tree) = log.cascade(event.id, 5) {
            println!(
                "  its cascade: {} event(s), deepest level {}",
                tree.count(),
                tree.deepest()
            );
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
