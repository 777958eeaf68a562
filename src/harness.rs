//! This module defines the benchmark harness which will drive each `Worker`
//! implementation and time how long it takes to run.

use prime::Rule;
use rand::SeedableRng;
use rand::distributions::Distribution;
use rand::distributions::uniform::Uniform;
use rand::rngs::StdRng;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use worker::{Context, Worker};

/// Settings for a whole benchmark run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Config {
    /// How many numbers each strategy checks.
    pub count: usize,
    /// Seed for the input generator. The same seed and count always produce
    /// the same inputs.
    pub seed: u64,
    /// Which primality rule to apply.
    pub rule: Rule,
    /// Whether to wait for the operator to press enter after each strategy.
    pub pause: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            count: 5000,
            seed: 1,
            rule: Rule::Strict,
            pause: true,
        }
    }
}

/// How long a single strategy took to get through every input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Timing {
    /// The name of the strategy.
    pub name: &'static str,
    /// When dispatch began.
    pub start: Instant,
    /// When the last item was known to be complete.
    pub end: Instant,
}

impl Timing {
    /// The wall clock time between `start` and `end`.
    pub fn elapsed(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} Evaluation took {:?}", self.name, self.elapsed())
    }
}

/// Generate `count` numbers in `[0, i32::MAX)` from a generator seeded
/// with `seed`.
pub fn generate_inputs(seed: u64, count: usize) -> Vec<i64> {
    let dist = Uniform::new(0, i64::from(::std::i32::MAX));
    let rng = &mut StdRng::from_seed(expand_seed(seed));

    (0..count).into_iter()
        .map(|_| dist.sample(rng))
        .collect()
}

fn expand_seed(seed: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (i, b) in bytes.iter_mut().take(8).enumerate() {
        *b = (seed >> (i * 8)) as u8;
    }
    bytes
}

/// A benchmark run: the shared inputs and context every strategy reports to.
pub struct Bench {
    config: Config,
    inputs: Arc<Vec<i64>>,
    ctx: Arc<Context>,
}

impl Bench {
    /// Generate the inputs described by `config` and send all output to `out`.
    pub fn new(config: Config, out: Box<dyn Write + Send>) -> Self {
        Bench {
            inputs: Arc::new(generate_inputs(config.seed, config.count)),
            ctx: Arc::new(Context::new(config.rule, out)),
            config,
        }
    }

    /// The numbers every strategy checks.
    pub fn inputs(&self) -> &[i64] {
        &self.inputs
    }

    /// Run a single strategy over every input and report how long it took.
    ///
    /// # Panics
    /// If the worker returns before every input has been counted.
    pub fn run_worker<W: Worker>(&self, worker: W) -> io::Result<Timing> {
        let name = worker.name();
        info!("running {} over {} inputs", name, self.inputs.len());

        self.ctx.reset();

        let start = Instant::now();
        worker.do_work(&self.inputs, &self.ctx);
        let end = Instant::now();

        assert_eq!(
            self.ctx.processed(), self.inputs.len(),
            "{} returned before every input was processed", name
        );

        let timing = Timing { name, start, end };
        self.ctx.writeln(format_args!("{}", timing))?;
        self.pause()?;

        Ok(timing)
    }

    /// Wait for the operator to press enter, unless pausing is disabled.
    pub fn pause(&self) -> io::Result<()> {
        if !self.config.pause {
            return Ok(());
        }

        self.ctx.writeln(format_args!("Press enter to continue"))?;

        let stdin = io::stdin();
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequential::SequentialWorker;
    use worker::testing::Capture;

    fn quiet(count: usize) -> Config {
        Config { count, pause: false, ..Config::default() }
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.count, 5000);
        assert_eq!(config.seed, 1);
        assert_eq!(config.rule, Rule::Strict);
        assert!(config.pause);
    }

    #[test]
    fn inputs_are_deterministic() {
        let first = generate_inputs(1, 5000);
        let second = generate_inputs(1, 5000);

        assert_eq!(first.len(), 5000);
        assert_eq!(first, second);
    }

    #[test]
    fn inputs_depend_on_seed() {
        assert_ne!(generate_inputs(1, 100), generate_inputs(2, 100));
    }

    #[test]
    fn inputs_stay_in_range() {
        let max = i64::from(::std::i32::MAX);
        assert!(generate_inputs(3, 5000).iter().all(|&n| n >= 0 && n < max));
    }

    #[test]
    fn shorter_runs_are_prefixes() {
        let long = generate_inputs(1, 100);
        let short = generate_inputs(1, 10);
        assert_eq!(&long[..10], &short[..]);
    }

    #[test]
    fn run_worker_prints_timing_line() {
        let capture = Capture::default();
        let bench = Bench::new(quiet(50), Box::new(capture.clone()));

        let timing = bench.run_worker(SequentialWorker::default()).unwrap();

        let lines = capture.lines();
        assert_eq!(timing.name, "Main thread");
        assert!(timing.end >= timing.start);
        assert_eq!(lines.len(), 51);
        assert!(lines[50].starts_with("Main thread Evaluation took "));
    }

    #[test]
    fn counter_is_reset_between_runs() {
        let capture = Capture::default();
        let bench = Bench::new(quiet(20), Box::new(capture.clone()));

        bench.run_worker(SequentialWorker::default()).unwrap();
        bench.run_worker(SequentialWorker::default()).unwrap();

        assert_eq!(capture.lines().len(), 42);
    }

    #[test]
    fn bench_uses_generated_inputs() {
        let bench = Bench::new(quiet(30), Box::new(Capture::default()));
        assert_eq!(bench.inputs(), &generate_inputs(1, 30)[..]);
    }
}
