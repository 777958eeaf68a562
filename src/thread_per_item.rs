//! This module provides a `Worker` implementation which spawns a dedicated
//! OS thread for every single number.

use harness::{Bench, Timing};
use std::io;
use std::sync::Arc;
use std::thread;
use worker::{Context, Worker};

/// A `Worker` implementation which spawns one thread per input.
///
/// Every thread carries its own stack and scheduling overhead, so this is
/// usually far slower than reusing a handful of threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadPerItemWorker(());

impl ThreadPerItemWorker {
    fn new() -> Self {
        ThreadPerItemWorker(())
    }
}

impl Default for ThreadPerItemWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker for ThreadPerItemWorker {
    fn name(&self) -> &'static str {
        "Thread"
    }

    fn do_work(self, inputs: &Arc<Vec<i64>>, ctx: &Arc<Context>) {
        let join_handles: Vec<_> = inputs.iter()
            .map(|&n| {
                let ctx = ctx.clone();
                thread::Builder::new()
                    .name(String::from("is-prime"))
                    .spawn(move || { ctx.check(n); })
                    .expect("failed to spawn worker thread")
            })
            .collect();

        // Joining every handle replaces polling the counter
        for jh in join_handles {
            jh.join().expect("failed to join worker thread");
        }
    }
}

/// Run the benchmark harness for a `ThreadPerItemWorker`.
pub fn run(bench: &Bench) -> io::Result<Timing> {
    bench.run_worker(ThreadPerItemWorker::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use worker::testing::{assert_runs_to_completion, expected_lines, sample_inputs};

    #[test]
    fn processes_every_input() {
        let inputs = sample_inputs();
        let lines = assert_runs_to_completion(ThreadPerItemWorker::default(), inputs.clone());
        assert_eq!(lines, expected_lines(&inputs));
    }

    #[test]
    fn empty_input() {
        assert!(assert_runs_to_completion(ThreadPerItemWorker::default(), Vec::new()).is_empty());
    }
}
