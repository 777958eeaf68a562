//! This module provides a `Worker` implementation which uses its own
//! blocking threadpool to process data.

use harness::{Bench, Timing};
use num_cpus;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use worker::{Context, Worker};

/// A `Worker` implementation which uses its own blocking threadpool
/// to process data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadPoolWorker {
    size: usize,
}

impl ThreadPoolWorker {
    fn new() -> Self {
        Self::with_size(num_cpus::get())
    }

    /// Create a pool with exactly `size` threads (at least one).
    pub fn with_size(size: usize) -> Self {
        ThreadPoolWorker {
            size: size.max(1),
        }
    }
}

impl Default for ThreadPoolWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker for ThreadPoolWorker {
    fn name(&self) -> &'static str {
        "Thread pool"
    }

    fn do_work(self, inputs: &Arc<Vec<i64>>, ctx: &Arc<Context>) {
        // Although there are plenty of great crates which implement
        // efficient threadpools, we'll implement our own simple one for
        // illustrative purposes. Reusing the same worker threads is much
        // cheaper than spinning up a new thread for each number.
        debug!("starting a pool of {} threads", self.size);
        let mut join_handles = Vec::with_capacity(self.size);

        // The standard library's mpsc receiver cannot be shared between
        // threads, so every pool thread gets its own channel and we hand
        // out work in a round robin fashion.
        let thread_senders = {
            let mut thread_senders = Vec::with_capacity(self.size);

            for _ in 0..self.size {
                let (parent_tx, worker_rx) = channel();
                thread_senders.push(parent_tx);

                let ctx = ctx.clone();
                let jh = thread::Builder::new()
                    .name(String::from("pool"))
                    .spawn(move || thread_worker(worker_rx, &ctx))
                    .expect("failed to spawn pool thread");
                join_handles.push(jh);
            }

            thread_senders
        };

        let mut iter = (0..thread_senders.len()).cycle();
        for &n in inputs.iter() {
            let next_sender_idx = iter.next().expect("should never get none on cycle");
            let _ = thread_senders[next_sender_idx].send(n);
        }

        // Drop the channel handles to the workers which will signal them to exit
        // once their queues are drained.
        drop(thread_senders);

        for jh in join_handles {
            jh.join().expect("failed to join pool thread");
        }
    }
}

fn thread_worker(rx: Receiver<i64>, ctx: &Context) {
    while let Ok(n) = rx.recv() {
        ctx.check(n);
    }
}

/// Run the benchmark harness for a `ThreadPoolWorker` sized to the machine.
pub fn run(bench: &Bench) -> io::Result<Timing> {
    bench.run_worker(ThreadPoolWorker::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use worker::testing::{assert_runs_to_completion, expected_lines, sample_inputs};

    #[test]
    fn processes_every_input() {
        let inputs = sample_inputs();
        let lines = assert_runs_to_completion(ThreadPoolWorker::default(), inputs.clone());
        assert_eq!(lines, expected_lines(&inputs));
    }

    #[test]
    fn more_threads_than_inputs() {
        let inputs = vec![2, 3, 4];
        let lines = assert_runs_to_completion(ThreadPoolWorker::with_size(16), inputs.clone());
        assert_eq!(lines, expected_lines(&inputs));
    }

    #[test]
    fn zero_size_still_has_a_thread() {
        assert_eq!(ThreadPoolWorker::with_size(0), ThreadPoolWorker::with_size(1));

        let inputs = sample_inputs();
        let lines = assert_runs_to_completion(ThreadPoolWorker::with_size(0), inputs.clone());
        assert_eq!(lines, expected_lines(&inputs));
    }
}
