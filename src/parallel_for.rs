//! This module provides a `Worker` implementation which uses a rayon scope
//! as a structured parallel for-each loop.

use harness::{Bench, Timing};
use rayon;
use std::io;
use std::sync::Arc;
use worker::{Context, Worker};

/// A `Worker` implementation which spawns one scoped rayon job per number.
///
/// The scope cannot end until every job spawned inside it has finished,
/// so returning from it is the completion signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParallelForWorker(());

impl ParallelForWorker {
    fn new() -> Self {
        ParallelForWorker(())
    }
}

impl Default for ParallelForWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker for ParallelForWorker {
    fn name(&self) -> &'static str {
        "Parallel for-each"
    }

    fn do_work(self, inputs: &Arc<Vec<i64>>, ctx: &Arc<Context>) {
        // Scoped jobs may borrow from the enclosing stack frame, so there is
        // no need to clone the context for every item.
        let ctx: &Context = ctx;

        rayon::scope(|s| {
            for &n in inputs.iter() {
                s.spawn(move |_| { ctx.check(n); });
            }
        });
    }
}

/// Run the benchmark harness for a `ParallelForWorker`.
pub fn run(bench: &Bench) -> io::Result<Timing> {
    bench.run_worker(ParallelForWorker::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use worker::testing::{assert_runs_to_completion, expected_lines, sample_inputs};

    #[test]
    fn processes_every_input() {
        let inputs = sample_inputs();
        let lines = assert_runs_to_completion(ParallelForWorker::default(), inputs.clone());
        assert_eq!(lines, expected_lines(&inputs));
    }

    #[test]
    fn empty_input() {
        assert!(assert_runs_to_completion(ParallelForWorker::default(), Vec::new()).is_empty());
    }
}
