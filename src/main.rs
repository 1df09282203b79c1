//! Sparse Life CLI - Run a background simulation from JSON configuration.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use sparse_life::{
    compute::LifeEngine,
    driver::SimulationDriver,
    schema::SimulationConfig,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [generations]", args[0]);
        eprintln!();
        eprintln!("Run a Game of Life simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  generations  Number of generations to consume (default: 100)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        eprintln!("Built-in patterns are listed with --patterns flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    if args[1] == "--patterns" {
        let library = sparse_life::PatternLibrary::builtin();
        for name in library.names() {
            println!("{}", name);
        }
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let generations: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = SimulationConfig::from_json_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    let library = config.library().unwrap_or_else(|e| {
        eprintln!("Error loading patterns: {}", e);
        std::process::exit(1);
    });

    let mut engine = LifeEngine::with_bounds(config.board);
    if let Some(seed) = config.driver.rng_seed {
        engine = engine.with_rng_seed(seed);
    }
    let initial = config.seed.apply(&mut engine, &library).unwrap_or_else(|e| {
        eprintln!("Error seeding board: {}", e);
        std::process::exit(1);
    });

    println!("Sparse Life Simulation");
    println!("======================");
    println!("Board: {}x{}", config.board.x_max + 1, config.board.y_max + 1);
    println!("Seed: {:?}", config.seed);
    println!("Queue capacity: {}", config.driver.queue_capacity);
    println!("Generations: {}", generations);
    println!();
    println!("Initial population: {}", initial);
    println!();

    let mut driver = SimulationDriver::new(engine, config.driver.clone()).unwrap_or_else(|e| {
        eprintln!("Error creating driver: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = driver.start() {
        eprintln!("Error starting driver: {}", e);
        std::process::exit(1);
    }

    println!("Running simulation...");
    let start = Instant::now();
    let mut consumed = 0u64;
    let mut last = None;

    while consumed < generations {
        let Some(snapshot) = driver.try_take_snapshot() else {
            thread::sleep(Duration::from_millis(1));
            continue;
        };
        consumed += 1;

        // Print progress every 10%
        if consumed % (generations / 10).max(1) == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  Generation {}: population={}, {:.1} gen/s",
                snapshot.generation,
                snapshot.population(),
                consumed as f32 / elapsed
            );
        }
        last = Some(snapshot);
    }

    driver.stop();
    let elapsed = start.elapsed();

    println!();
    if let Some(snapshot) = last {
        println!("Final state:");
        println!("  Generation: {}", snapshot.generation);
        println!("  Population: {}", snapshot.population());
        match snapshot.extent() {
            Some((min, max)) => println!("  Extent: {:?} - {:?}", min, max),
            None => println!("  Extent: empty"),
        }
        println!();
    }
    println!(
        "Time: {:.2}s ({:.1} gen/s)",
        elapsed.as_secs_f32(),
        consumed as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = SimulationConfig::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => {
            println!("Example configuration (config.json):");
            println!("{}", json);
        }
        Err(e) => eprintln!("Error serializing example config: {}", e),
    }
}
