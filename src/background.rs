//! This module provides a `Worker` implementation which runs every number as
//! a detached background job that reports back through events.
//!
//! Each job raises a `Started` event, a `Progress` event whenever its trial
//! division crosses another quarter of the divisor range, and a final
//! `Completed` event. The events travel over a channel to the runner thread,
//! which hands them to a set of `Hooks` and stops once every job has
//! completed.

use harness::{Bench, Timing};
use prime::Classification;
use rayon;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::channel;
use worker::{Context, Worker};

/// A notification sent from a background job to the runner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    /// The job for this number has begun.
    Started(i64),
    /// The job for this number has searched this percentage of its divisors.
    Progress(i64, u8),
    /// The job has finished and produced this classification.
    Completed(Classification),
}

/// Callbacks invoked on the runner thread as events arrive.
///
/// The default implementations only trace the event.
pub trait Hooks {
    /// Called when a job starts checking `n`.
    fn started(&mut self, n: i64) {
        trace!("started {}", n);
    }

    /// Called when the job checking `n` reports `percent` progress.
    fn progress_changed(&mut self, n: i64, percent: u8) {
        trace!("{}: {}%", n, percent);
    }

    /// Called when a job has finished.
    fn completed(&mut self, result: Classification) {
        trace!("completed {}", result);
    }
}

impl<'a, H: Hooks + ?Sized> Hooks for &'a mut H {
    fn started(&mut self, n: i64) {
        (**self).started(n)
    }

    fn progress_changed(&mut self, n: i64, percent: u8) {
        (**self).progress_changed(n, percent)
    }

    fn completed(&mut self, result: Classification) {
        (**self).completed(result)
    }
}

/// `Hooks` which only trace every event.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TraceHooks;

impl Hooks for TraceHooks {}

/// A `Worker` implementation which starts one background job per number on
/// the rayon pool and waits for all of their completion events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackgroundWorker<H> {
    hooks: H,
}

impl BackgroundWorker<TraceHooks> {
    fn new() -> Self {
        Self::with_hooks(TraceHooks)
    }
}

impl<H: Hooks> BackgroundWorker<H> {
    /// Create a worker which reports every event to `hooks`.
    pub fn with_hooks(hooks: H) -> Self {
        BackgroundWorker { hooks }
    }
}

impl Default for BackgroundWorker<TraceHooks> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hooks> Worker for BackgroundWorker<H> {
    fn name(&self) -> &'static str {
        "Background worker for each number"
    }

    fn do_work(mut self, inputs: &Arc<Vec<i64>>, ctx: &Arc<Context>) {
        let (tx, rx) = channel();

        for &n in inputs.iter() {
            let tx = tx.clone();
            let ctx = ctx.clone();

            rayon::spawn(move || {
                // The runner only stops listening after our `Completed`
                // event, so send failures can be ignored.
                let _ = tx.send(Event::Started(n));
                let verdict = ctx.check_with_progress(n, |percent| {
                    let _ = tx.send(Event::Progress(n, percent));
                });
                let _ = tx.send(Event::Completed(Classification { n, verdict }));
            });
        }

        // Only the jobs hold senders now, so the loop below also ends if a
        // job panics before completing.
        drop(tx);

        let mut remaining = inputs.len();
        for event in rx.iter() {
            match event {
                Event::Started(n) => self.hooks.started(n),
                Event::Progress(n, percent) => self.hooks.progress_changed(n, percent),
                Event::Completed(result) => {
                    self.hooks.completed(result);
                    remaining -= 1;
                },
            }

            if remaining == 0 {
                break;
            }
        }

        debug!("background workers finished with {} outstanding", remaining);
    }
}

/// Run the benchmark harness for a `BackgroundWorker`.
pub fn run(bench: &Bench) -> io::Result<Timing> {
    bench.run_worker(BackgroundWorker::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prime::Verdict;
    use std::collections::HashMap;
    use worker::testing::{assert_runs_to_completion, expected_lines, sample_inputs};

    #[derive(Default)]
    struct Recorder {
        started: Vec<i64>,
        progress: HashMap<i64, Vec<u8>>,
        completed: Vec<Classification>,
    }

    impl Hooks for Recorder {
        fn started(&mut self, n: i64) {
            self.started.push(n);
        }

        fn progress_changed(&mut self, n: i64, percent: u8) {
            self.progress.entry(n).or_insert_with(Vec::new).push(percent);
        }

        fn completed(&mut self, result: Classification) {
            self.completed.push(result);
        }
    }

    #[test]
    fn processes_every_input() {
        let inputs = sample_inputs();
        let lines = assert_runs_to_completion(BackgroundWorker::default(), inputs.clone());
        assert_eq!(lines, expected_lines(&inputs));
    }

    #[test]
    fn hooks_fire_for_every_job() {
        let inputs: Vec<i64> = (0..100).map(|i| 1_000_000 + i).collect();
        let mut recorder = Recorder::default();

        assert_runs_to_completion(BackgroundWorker::with_hooks(&mut recorder), inputs.clone());

        let mut started = recorder.started.clone();
        started.sort();
        assert_eq!(started, inputs);

        let mut completed: Vec<_> = recorder.completed.iter().map(|c| c.n).collect();
        completed.sort();
        assert_eq!(completed, inputs);

        for n in &inputs {
            let progress = &recorder.progress[n];
            assert_eq!(progress.last(), Some(&100), "{}", n);
            assert!(progress.windows(2).all(|w| w[0] < w[1]), "{}: {:?}", n, progress);
        }
    }

    #[test]
    fn completion_events_carry_verdicts() {
        let mut recorder = Recorder::default();
        assert_runs_to_completion(BackgroundWorker::with_hooks(&mut recorder), vec![2, 3, 4, 17, 18, 19]);

        let mut completed = recorder.completed.clone();
        completed.sort_by_key(|c| c.n);
        let verdicts: Vec<_> = completed.iter().map(|c| c.verdict).collect();

        assert_eq!(verdicts, vec![
            Verdict::Prime,
            Verdict::Prime,
            Verdict::Composite,
            Verdict::Prime,
            Verdict::Composite,
            Verdict::Prime,
        ]);
    }

    #[test]
    fn empty_input() {
        assert!(assert_runs_to_completion(BackgroundWorker::default(), Vec::new()).is_empty());
    }
}
