//! This module provides a `Worker` implementation which uses futures
//! and tokio to perform work.

use futures::future::{join_all, lazy};
use futures::sync::oneshot;
use futures::Future;
use harness::{Bench, Timing};
use prime::Verdict;
use std::io;
use std::sync::Arc;
use tokio;
use worker::{Context, Worker};

/// A `Worker` implementation which builds one deferred task per number,
/// starts them all on a tokio runtime, and then blocks until every task
/// has reported back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokioWorker(());

impl TokioWorker {
    fn new() -> Self {
        TokioWorker(())
    }
}

impl Default for TokioWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker for TokioWorker {
    fn name(&self) -> &'static str {
        "Task"
    }

    fn do_work(self, inputs: &Arc<Vec<i64>>, ctx: &Arc<Context>) {
        let mut rt = tokio::runtime::Runtime::new()
            .expect("failed to create a tokio `Runtime`");

        // `lazy` defers the check until the runtime first polls the task,
        // so building the tasks does not start any work.
        let tasks: Vec<_> = inputs.iter()
            .map(|&n| {
                let ctx = ctx.clone();
                let (tx, rx) = oneshot::channel::<Verdict>();
                let task = lazy(move || {
                    // Nobody may be listening anymore, which is fine
                    let _ = tx.send(ctx.check(n));
                    Ok::<(), ()>(())
                });
                (task, rx)
            })
            .collect();

        let mut receivers = Vec::with_capacity(tasks.len());
        for (task, rx) in tasks {
            rt.spawn(task);
            receivers.push(rx);
        }

        // Wait for every task in bulk.
        let verdicts = rt.block_on(join_all(receivers))
            .expect("a task was dropped before reporting its verdict");

        debug!(
            "{} tasks finished, {} primes",
            verdicts.len(),
            verdicts.iter().filter(|&&v| v == Verdict::Prime).count()
        );

        rt.shutdown_on_idle()
            .wait()
            .expect("failed to shut down the tokio runtime");
    }
}

/// Run the benchmark harness for a `TokioWorker`.
pub fn run(bench: &Bench) -> io::Result<Timing> {
    bench.run_worker(TokioWorker::new())
}
