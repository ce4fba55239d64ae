//! Trilane CLI - search for a robust lane partition from a JSON scenario.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use trilane::compute::SearchEngine;
use trilane::schema::{AdversaryTeam, Scenario, SearchConfig};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.json>", args[0]);
        eprintln!();
        eprintln!("Search for the most robust three-lane split of a unit pool.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  scenario.json  Path to a scenario file (pool, adversary, search settings)");
        eprintln!();
        eprintln!("An example scenario is printed with the --example flag.");
        process::exit(1);
    }

    if args[1] == "--example" {
        print_example_scenario();
        return;
    }

    let scenario_path = PathBuf::from(&args[1]);
    let scenario_str = fs::read_to_string(&scenario_path).unwrap_or_else(|e| {
        eprintln!("Error reading scenario file: {}", e);
        process::exit(1);
    });
    let scenario: Scenario = serde_json::from_str(&scenario_str).unwrap_or_else(|e| {
        eprintln!("Error parsing scenario: {}", e);
        process::exit(1);
    });

    let search = scenario.search.clone();
    let adversary = scenario.adversary.clone();

    println!("Trilane Partition Search");
    println!("========================");
    println!(
        "Pool: {} units, lanes of {}",
        scenario.pool.len(),
        search.lane_size
    );
    println!(
        "GA: population {}, {} generations, crossover {}, mutation {}, tournament {}, elitism {}",
        search.ga.population_size,
        search.ga.generations,
        search.ga.crossover_rate,
        search.ga.mutation_rate,
        search.ga.tournament_size,
        search.ga.elitism
    );
    println!(
        "Battle: {} trials per matchup, k = {}, degradation {:.0}%-{:.0}%",
        search.battle.trials_per_matchup,
        search.battle.k_factor,
        search.battle.degradation_range.0 * 100.0,
        search.battle.degradation_range.1 * 100.0
    );
    println!(
        "Universal lane: P(win) >= {} vs every lane, bonus {} each, {} for all three",
        search.fitness.universal_threshold,
        search.fitness.universal_lane_bonus,
        search.fitness.all_universal_bonus
    );
    println!();

    let mut engine = SearchEngine::new(scenario).unwrap_or_else(|e| {
        eprintln!("Invalid scenario: {}", e);
        process::exit(1);
    });

    let start = Instant::now();
    let result = engine.run_with_callback(|progress| {
        println!(
            "Gen {}/{}: best={:.4} (gen best={:.4}, avg={:.4}, universal={}, matchups={})",
            progress.generation + 1,
            progress.total_generations,
            progress.best_fitness,
            progress.generation_best,
            progress.avg_fitness,
            progress.universal_lanes,
            progress.cached_matchups
        );
    });
    let elapsed = start.elapsed();

    println!();
    println!(
        "Search finished in {:.1}s ({} evaluations)",
        elapsed.as_secs_f64(),
        result.evaluations
    );
    println!();
    println!("Best total fitness: {:.4}", result.record.total);
    println!(
        "  Robustness, min P(win >= 2 of 3) vs any assignment: {:.4}",
        result.record.worst_case_win2
    );
    println!("  Universal lanes: {}", result.record.universal_lanes);
    println!(
        "  Max P(win >= 2 of 3) vs the friendliest assignment: {:.4}",
        result.record.best_case_win2
    );
    println!(
        "  Associated P(win all 3): {:.4}",
        result.record.best_case_win_all
    );
    println!();
    println!("Optimized lanes (sorted ascending):");
    for (slot, lane) in result.lanes().iter().enumerate() {
        println!("  Slot {}: {:?}", slot + 1, lane);
    }
    println!();
    println!("Friendliest-assignment detail:");
    for detail in &result.record.best_case_detail {
        println!(
            "  Slot {} vs '{}': P(win) = {:.4}",
            detail.slot + 1,
            detail.enemy,
            detail.win_probability
        );
        println!("    My roster:    {:?}", detail.roster);
        println!("    Enemy roster: {:?}", adversary.lane(detail.enemy));
    }
}

fn print_example_scenario() {
    let scenario = Scenario {
        pool: vec![
            1383, 1390, 1401, 1409, 1452, 1454, 1467, 1498, 1625, 1647, //
            1780, 1842, 1842, 1862, 1902, 1963, 1999, 2330, 2381, 3761, //
            1419, 1465, 1487, 1495, 1517, 1537, 1549, 1578, 1582, 1599, //
            1649, 1699, 1718, 1840, 1860, 1921, 1940, 2477, 2808, 2940, //
            1292, 1297, 1300, 1301, 1316, 1321, 1324, 1327, 1328, 1331, //
            1331, 1339, 1344, 1350, 1352, 1356, 1359, 1359, 1367, 1375,
        ],
        adversary: AdversaryTeam {
            left: vec![
                1361, 1364, 1367, 1368, 1370, 1371, 1373, 1374, 1380, 1386, //
                1388, 1393, 1401, 1409, 1423, 1429, 1441, 1442, 1457, 1465,
            ],
            middle: vec![
                1466, 1469, 1479, 1488, 1572, 1646, 1697, 1732, 1753, 1803, //
                1819, 1858, 1884, 2002, 2014, 2060, 2123, 2149, 2545, 3060,
            ],
            right: vec![
                1468, 1475, 1483, 1497, 1504, 1564, 1624, 1680, 1722, 1737, //
                1776, 1818, 1819, 1869, 1908, 2008, 2023, 2297, 2869, 3064,
            ],
        },
        search: SearchConfig::default(),
    };

    println!("Example scenario (scenario.json):");
    println!("{}", serde_json::to_string_pretty(&scenario).unwrap());
}
