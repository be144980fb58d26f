use tracing::{info, trace, warn};

use super::board::{Board, FinalBoard};
use super::cell::Cell;
use super::error::Result;
use super::scheduler::{GenerationScheduler, RowChunk};
use super::torus::Torus;

const THREADS_ENV: &str = "ROWLIFE_THREADS";
const MAX_THREADS_ENV: &str = "ROWLIFE_MAX_THREADS";

#[inline]
fn auto_thread_count() -> usize {
    num_cpus::get().max(1)
}

/// Resolve the thread count from a config, falling back to auto-detect.
fn resolve_thread_count(config: &RowLifeConfig) -> usize {
    let mut threads = config.thread_count.unwrap_or_else(auto_thread_count);
    if let Some(cap) = config.max_threads {
        threads = threads.min(cap);
    }
    threads.max(1)
}

fn env_usize(name: &str) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!(var = name, value = %raw, "ignoring non-positive or unparseable value");
            None
        }
    }
}

/// Configuration for a RowLife engine instance.
///
/// The thread count is fixed for the lifetime of the engine.
#[derive(Clone, Debug, Default)]
pub struct RowLifeConfig {
    /// Number of worker threads.
    /// `None` means one per logical CPU.
    pub thread_count: Option<usize>,
    /// Hard upper bound on threads regardless of auto-detection.
    pub max_threads: Option<usize>,
}

impl RowLifeConfig {
    /// Read `ROWLIFE_THREADS` and `ROWLIFE_MAX_THREADS`.
    pub fn from_env() -> Self {
        Self {
            thread_count: env_usize(THREADS_ENV),
            max_threads: env_usize(MAX_THREADS_ENV),
        }
    }

    /// Set an explicit thread count.
    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = Some(n.max(1));
        self
    }

    /// Set a hard upper bound on threads.
    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }

    /// The thread count an engine built from this config will use.
    pub fn resolved_threads(&self) -> usize {
        resolve_thread_count(self)
    }
}

/// Toroidal Life engine owning the current/next buffer pair.
pub struct RowLife {
    current: Vec<Cell>,
    next: Vec<Cell>,
    scheduler: GenerationScheduler,
    pool: rayon::ThreadPool,
    threads: usize,
    generation: u64,
}

impl RowLife {
    pub fn new(board: Board) -> Result<Self> {
        Self::with_config(board, RowLifeConfig::default())
    }

    /// Create an engine with explicit configuration. `board` must already
    /// carry correct neighbor counts.
    pub fn with_config(board: Board, config: RowLifeConfig) -> Result<Self> {
        let threads = resolve_thread_count(&config);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("rowlife-{i}"))
            .build()?;
        let scheduler = GenerationScheduler::new(board.torus(), threads);
        let current = board.into_cells();
        let next = vec![Cell::DEAD; current.len()];

        Ok(Self {
            current,
            next,
            scheduler,
            pool,
            threads,
            generation: 0,
        })
    }

    pub fn step(&mut self) {
        self.step_n(1);
    }

    pub fn step_n(&mut self, n: u64) {
        let Self {
            current,
            next,
            scheduler,
            pool,
            generation,
            ..
        } = self;
        pool.install(|| {
            for _ in 0..n {
                let changed = scheduler.advance(current, next);
                std::mem::swap(current, next);
                *generation += 1;
                trace!(generation = *generation, changed, "generation complete");
            }
        });
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn torus(&self) -> Torus {
        self.scheduler.torus()
    }

    /// Packed cells of the current generation.
    pub fn cells(&self) -> &[Cell] {
        &self.current
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.current[self.torus().index(row, col)].is_alive()
    }

    pub fn population(&self) -> u64 {
        self.current.iter().filter(|c| c.is_alive()).count() as u64
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn chunks(&self) -> &[RowChunk] {
        self.scheduler.chunks()
    }

    /// Reduce the current generation to alive/dead bytes, releasing the
    /// companion buffer.
    pub fn finish(self) -> FinalBoard {
        let Self {
            current, scheduler, ..
        } = self;
        FinalBoard::reduce(scheduler.torus(), current)
    }
}

/// Advance `board` by `gens_max` generations and return the alive/dead result.
pub fn run(board: Board, gens_max: u64, config: RowLifeConfig) -> Result<FinalBoard> {
    let mut engine = RowLife::with_config(board, config)?;
    let torus = engine.torus();
    info!(
        nrows = torus.nrows(),
        ncols = torus.ncols(),
        gens_max,
        threads = engine.threads(),
        chunks = engine.chunks().len(),
        "running"
    );
    engine.step_n(gens_max);
    Ok(engine.finish())
}
