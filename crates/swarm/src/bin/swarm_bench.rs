//! # SWARM Tick Benchmark
//!
//! Populates one archetype with seeded random entities and times move +
//! damage ticks over it.
//!
//! ## Usage
//!
//! ```bash
//! swarm_bench --entities 1000000 --iters 50 --config swarm.toml --seed 42
//! ```

use std::path::PathBuf;

use swarm_core::SwarmConfig;
use swarm::{run_bench, BenchConfig};

fn print_usage() {
    println!("Usage: swarm_bench [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -n, --entities <NUM>    Entities to spawn (default: 1000000)");
    println!("  -i, --iters <NUM>       Ticks to time (default: 50)");
    println!("  -c, --config <FILE>     Engine settings (TOML)");
    println!("  -s, --seed <SEED>       Population seed (default: 42)");
    println!("  -h, --help              Show this help");
}

fn main() {
    // Parse command line arguments (simple parsing, no external deps)
    let args: Vec<String> = std::env::args().collect();
    let mut bench = BenchConfig::default();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--entities" | "-n" => {
                if i + 1 < args.len() {
                    bench.entities = args[i + 1].parse().unwrap_or(bench.entities);
                    i += 1;
                }
            }
            "--iters" | "-i" => {
                if i + 1 < args.len() {
                    bench.iters = args[i + 1].parse().unwrap_or(bench.iters);
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--seed" | "-s" => {
                if i + 1 < args.len() {
                    bench.seed = args[i + 1].parse().unwrap_or(bench.seed);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(2);
            }
        }
        i += 1;
    }

    if let Some(path) = &config_path {
        bench.swarm = match SwarmConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("FATAL: {}: {e}", path.display());
                std::process::exit(1);
            }
        };
    }

    println!("┌─ CONFIGURATION ──────────────────────────────────────────┐");
    println!("│ Entities:           {}", bench.entities);
    println!("│ Iterations:         {}", bench.iters);
    println!("│ Seed:               {}", bench.seed);
    println!("│ Chunk Capacity:     {}", bench.swarm.storage.chunk_capacity);
    println!("│ Vector Width:       {}", bench.swarm.executor.vector_width);
    println!("│ Intrinsics:         {}", bench.swarm.executor.allow_intrinsics);
    match bench.swarm.executor.worker_count {
        Some(n) => println!("│ Workers:            {n}"),
        None => println!("│ Workers:            auto"),
    }
    println!("└──────────────────────────────────────────────────────────┘");
    println!();

    let report = match run_bench(&bench) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    };

    println!("┌─ REPORT ─────────────────────────────────────────────────┐");
    println!("│ Entities:           {}", report.entities);
    println!("│ Chunks:             {}", report.chunks);
    println!("│ Backend:            {}", report.backend);
    println!("│ Workers:            {}", report.workers);
    println!(
        "│ Populate:           {:.6}s",
        report.populate_time.as_secs_f64()
    );
    println!("│ Total:              {:.6}s", report.total_time.as_secs_f64());
    println!(
        "│ Per Iteration:      {:.9}s",
        report.per_iter().as_secs_f64()
    );
    println!(
        "│ Throughput:         {:.2} M entity-ticks/s",
        report.entity_updates_per_sec() / 1_000_000.0
    );
    println!("└──────────────────────────────────────────────────────────┘");
}
