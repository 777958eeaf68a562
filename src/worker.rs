//! This module defines the interfaces that will be used by the various
//! dispatch strategies, along with the shared per-run state they all report to.

use prime::{trial_division, Classification, Rule, Verdict};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// State shared by every item of a benchmark run.
///
/// Owns the primality rule, the completion counter and the output sink.
/// Writing a classification line is the only critical section, so lines
/// from concurrent items never interleave.
pub struct Context {
    rule: Rule,
    processed: AtomicUsize,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Context {
    /// Create a context which writes its output into `out`.
    pub fn new(rule: Rule, out: Box<dyn Write + Send>) -> Self {
        Context {
            rule,
            processed: AtomicUsize::new(0),
            out: Mutex::new(out),
        }
    }

    /// The number of items classified since the last `reset`.
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    /// Zero the completion counter before the next strategy runs.
    pub fn reset(&self) {
        self.processed.store(0, Ordering::SeqCst);
    }

    /// Classify `n`, print the result, and count it as processed.
    pub fn check(&self, n: i64) -> Verdict {
        self.check_with_progress(n, |_| ())
    }

    /// Same as `check`, but forwards trial division progress to `progress`.
    pub fn check_with_progress<F>(&self, n: i64, progress: F) -> Verdict
        where F: FnMut(u8),
    {
        let verdict = trial_division(n, self.rule, progress);

        if let Err(e) = self.writeln(format_args!("{}", Classification { n, verdict })) {
            warn!("failed to write classification of {}: {}", n, e);
        }

        self.processed.fetch_add(1, Ordering::SeqCst);
        verdict
    }

    /// Write a single line to the output while holding the output lock.
    pub fn writeln(&self, line: ::std::fmt::Arguments) -> ::std::io::Result<()> {
        // A panicking writer can't leave a line half-counted, so a poisoned
        // lock is still safe to keep using.
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };

        out.write_fmt(line)?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

/// An interface which represents one way of dispatching the primality check
/// over every input.
///
/// This will allow us to define a single benchmark harness for invoking our
/// different parallelization strategies.
pub trait Worker {
    /// Get the name of this worker so we can print out how long it takes to run.
    fn name(&self) -> &'static str;

    /// Consume the worker and let it do the actual work.
    ///
    /// Every item of `inputs` must be passed through `ctx` exactly once, and
    /// this method must not return until all of them have been.
    fn do_work(self, inputs: &Arc<Vec<i64>>, ctx: &Arc<Context>);
}
