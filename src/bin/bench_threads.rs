//! Thread-scaling benchmark for RowLife.
//!
//! Runs the same random board at several thread counts and reports timing.
//! Use with `--release` for meaningful results.

use rand::RngCore;
use rand::SeedableRng;
use row_life::rowlife::{Board, FinalBoard, RowLifeConfig, run};
use std::time::Instant;

const SIDE: usize = 1024;
const DENSITY: f64 = 0.42;
const GENERATIONS: u64 = 100;

fn seed_board(side: usize, density: f64, seed: u64) -> Board {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;
    let mask: Vec<u8> = (0..side * side)
        .map(|_| (rng.next_u64() <= threshold) as u8)
        .collect();
    Board::from_alive_mask(side, side, &mask).expect("benchmark board dimensions are valid")
}

fn bench(board: Board, threads: usize) -> (f64, FinalBoard) {
    let start = Instant::now();
    let result = run(board, GENERATIONS, RowLifeConfig::default().thread_count(threads))
        .expect("failed to run benchmark");
    (start.elapsed().as_secs_f64() * 1000.0, result)
}

fn main() {
    let board = seed_board(SIDE, DENSITY, 0x5EED_1234_ABCD_EF01);
    let max_threads = num_cpus::get().max(1);
    let mut thread_counts = vec![1usize, 2, 4, 8, 16];
    thread_counts.retain(|&t| t < max_threads);
    thread_counts.push(max_threads);

    println!(
        "{:<10} {:>8} {:>12} {:>10} {:>12}",
        "Grid", "Threads", "Total(ms)", "Avg(ms)", "Population"
    );
    println!("{}", "-".repeat(56));

    let mut reference: Option<FinalBoard> = None;
    for threads in thread_counts {
        let (total_ms, result) = bench(board.clone(), threads);
        println!(
            "{:<10} {:>8} {:>12.1} {:>10.4} {:>12}",
            format!("{SIDE}x{SIDE}"),
            threads,
            total_ms,
            total_ms / GENERATIONS as f64,
            result.population()
        );
        match &reference {
            Some(expected) => assert_eq!(
                expected, &result,
                "{threads}-thread result differs from single-threaded"
            ),
            None => reference = Some(result),
        }
    }
}
