use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use row_life::rowlife::{Board, FinalBoard, RowLife, RowLifeConfig, run};

fn engine(board: Board, threads: usize) -> RowLife {
    RowLife::with_config(board, RowLifeConfig::default().thread_count(threads)).unwrap()
}

fn live_set(result: &FinalBoard) -> HashSet<(usize, usize)> {
    result.live_cells().into_iter().collect()
}

fn assert_counts_exact(engine: &RowLife) {
    let torus = engine.torus();
    let board = Board::from_cells(torus.nrows(), torus.ncols(), engine.cells().to_vec()).unwrap();
    assert_eq!(
        board.count_mismatch(),
        None,
        "count invariant broken at generation {}",
        engine.generation()
    );
}

fn step_naive(
    cells: &HashSet<(usize, usize)>,
    nrows: usize,
    ncols: usize,
) -> HashSet<(usize, usize)> {
    let mut next = HashSet::new();
    for row in 0..nrows {
        for col in 0..ncols {
            let mut neighbors = 0;
            for dr in [nrows - 1, 0, 1] {
                for dc in [ncols - 1, 0, 1] {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    if cells.contains(&((row + dr) % nrows, (col + dc) % ncols)) {
                        neighbors += 1;
                    }
                }
            }
            let alive = cells.contains(&(row, col));
            let next_alive = if alive {
                neighbors == 2 || neighbors == 3
            } else {
                neighbors == 3
            };
            if next_alive {
                next.insert((row, col));
            }
        }
    }
    next
}

fn random_alive(nrows: usize, ncols: usize, density: f64, seed: u64) -> Vec<(usize, usize)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut cells = Vec::new();
    for row in 0..nrows {
        for col in 0..ncols {
            if rng.random_bool(density) {
                cells.push((row, col));
            }
        }
    }
    cells
}

#[test]
fn blinker_oscillates() {
    let horizontal = [(1, 0), (1, 1), (1, 2)];
    let vertical: HashSet<_> = [(0, 1), (1, 1), (2, 1)].into_iter().collect();

    let one = run(
        Board::from_alive(5, 5, horizontal).unwrap(),
        1,
        RowLifeConfig::default().thread_count(2),
    )
    .unwrap();
    assert_eq!(live_set(&one), vertical);

    let two = run(
        Board::from_alive(5, 5, horizontal).unwrap(),
        2,
        RowLifeConfig::default().thread_count(2),
    )
    .unwrap();
    assert_eq!(live_set(&two), horizontal.into_iter().collect());
}

#[test]
fn block_is_stable() {
    let block = [(3, 3), (3, 4), (4, 3), (4, 4)];
    let mut engine = engine(Board::from_alive(10, 10, block).unwrap(), 3);
    for _ in 0..25 {
        engine.step();
        assert_eq!(engine.population(), 4);
        for &(row, col) in &block {
            assert!(engine.is_alive(row, col), "expected alive at ({row},{col})");
        }
    }
    assert_counts_exact(&engine);
}

#[test]
fn block_straddling_the_wrap_is_stable() {
    let block = [(0, 0), (0, 7), (7, 0), (7, 7)];
    let result = run(
        Board::from_alive(8, 8, block).unwrap(),
        9,
        RowLifeConfig::default().thread_count(4),
    )
    .unwrap();
    assert_eq!(live_set(&result), block.into_iter().collect());
}

#[test]
fn corners_are_neighbors_across_the_wrap() {
    let board = Board::from_alive(6, 9, [(0, 0), (5, 8)]).unwrap();
    let torus = board.torus();
    assert_eq!(board.cells()[torus.index(0, 0)].neighbor_count(), 1);
    assert_eq!(board.cells()[torus.index(5, 8)].neighbor_count(), 1);
    // The third wrapped corner sees both.
    assert_eq!(board.cells()[torus.index(0, 8)].neighbor_count(), 2);

    // Add (5,0): now (0,8) is born from three corner neighbors.
    let board = Board::from_alive(6, 9, [(0, 0), (5, 8), (5, 0)]).unwrap();
    let result = run(board, 1, RowLifeConfig::default().thread_count(3)).unwrap();
    assert!(result.is_alive(0, 8));
}

#[test]
fn glider_returns_home_after_crossing_the_torus() {
    // A glider moves one cell diagonally every 4 generations; on a 12x12 torus
    // it is back where it started after 48.
    let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
    let mut engine = engine(Board::from_alive(12, 12, glider).unwrap(), 5);
    engine.step_n(4);
    let shifted: HashSet<_> = glider.iter().map(|&(r, c)| (r + 1, c + 1)).collect();
    for &(row, col) in &shifted {
        assert!(engine.is_alive(row, col));
    }
    assert_eq!(engine.population(), 5);
    engine.step_n(44);
    assert_eq!(live_set(&engine.finish()), glider.into_iter().collect());
}

#[test]
fn matches_naive_reference() {
    let (nrows, ncols) = (23, 17);
    let alive = random_alive(nrows, ncols, 0.35, 0xC0FFEE);
    let mut expected: HashSet<_> = alive.iter().copied().collect();
    let mut engine = engine(Board::from_alive(nrows, ncols, alive).unwrap(), 4);

    for generation in 1..=30 {
        expected = step_naive(&expected, nrows, ncols);
        engine.step();
        let got: HashSet<_> = (0..nrows)
            .flat_map(|r| (0..ncols).map(move |c| (r, c)))
            .filter(|&(r, c)| engine.is_alive(r, c))
            .collect();
        assert_eq!(got, expected, "mismatch at generation {generation}");
        assert_counts_exact(&engine);
    }
}

#[test]
fn thread_count_does_not_change_result() {
    let hardware = num_cpus::get().max(1);
    for (nrows, ncols, seed) in [(64, 48, 11u64), (37, 53, 22), (7, 90, 33)] {
        let alive = random_alive(nrows, ncols, 0.4, seed);
        let reference = run(
            Board::from_alive(nrows, ncols, alive.clone()).unwrap(),
            40,
            RowLifeConfig::default().thread_count(1),
        )
        .unwrap();
        for threads in [2, 3, hardware, nrows, nrows + 5] {
            let result = run(
                Board::from_alive(nrows, ncols, alive.clone()).unwrap(),
                40,
                RowLifeConfig::default().thread_count(threads),
            )
            .unwrap();
            assert_eq!(
                result.as_bytes(),
                reference.as_bytes(),
                "{nrows}x{ncols} seed {seed} differs at {threads} threads"
            );
        }
    }
}

#[test]
fn counts_stay_exact_on_tiny_boards() {
    for (nrows, ncols) in [(1, 1), (1, 5), (2, 2), (2, 7), (3, 3), (5, 1)] {
        for seed in 0..4u64 {
            let alive = random_alive(nrows, ncols, 0.5, seed);
            let mut engine = engine(Board::from_alive(nrows, ncols, alive).unwrap(), 4);
            for _ in 0..6 {
                engine.step();
                assert_counts_exact(&engine);
            }
        }
    }
}

#[test]
fn final_board_is_reduced_to_alive_bit() {
    let alive = random_alive(20, 20, 0.3, 7);
    let mut engine = engine(Board::from_alive(20, 20, alive).unwrap(), 2);
    engine.step_n(3);
    let expected: Vec<u8> = engine.cells().iter().map(|c| c.is_alive() as u8).collect();
    let result = engine.finish();
    assert_eq!(result.as_bytes(), expected.as_slice());
}
