//! This module provides a `Worker` implementation which checks every number
//! directly on the calling thread.

use harness::{Bench, Timing};
use std::io;
use std::sync::Arc;
use worker::{Context, Worker};

/// A `Worker` implementation which sequentially processes data.
///
/// Blocks the runner thread for the whole run, which makes it the baseline
/// the other strategies are compared against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequentialWorker(());

impl SequentialWorker {
    fn new() -> Self {
        SequentialWorker(())
    }
}

impl Default for SequentialWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker for SequentialWorker {
    fn name(&self) -> &'static str {
        "Main thread"
    }

    fn do_work(self, inputs: &Arc<Vec<i64>>, ctx: &Arc<Context>) {
        for &n in inputs.iter() {
            ctx.check(n);
        }
    }
}

/// Run the benchmark harness for a `SequentialWorker`.
pub fn run(bench: &Bench) -> io::Result<Timing> {
    bench.run_worker(SequentialWorker::new())
}
