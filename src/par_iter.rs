//! This module provides a `Worker` implementation which uses a rayon
//! parallel iterator to perform work.

use harness::{Bench, Timing};
use prime::Verdict;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::io;
use std::sync::Arc;
use worker::{Context, Worker};

/// A `Worker` implementation which maps every number to its verdict with a
/// parallel iterator and lets rayon decide how to split the work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RayonWorker(());

impl RayonWorker {
    fn new() -> Self {
        RayonWorker(())
    }
}

impl Default for RayonWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker for RayonWorker {
    fn name(&self) -> &'static str {
        "Parallel iterator"
    }

    fn do_work(self, inputs: &Arc<Vec<i64>>, ctx: &Arc<Context>) {
        let inputs: &[i64] = inputs;

        // Collecting blocks until every item has been mapped.
        let verdicts: Vec<Verdict> = inputs.par_iter()
            .map(|&n| ctx.check(n))
            .collect();

        debug!(
            "{} of {} inputs are prime",
            verdicts.iter().filter(|&&v| v == Verdict::Prime).count(),
            verdicts.len()
        );
    }
}

/// Run the benchmark harness for a `RayonWorker`.
pub fn run(bench: &Bench) -> io::Result<Timing> {
    bench.run_worker(RayonWorker::new())
}
