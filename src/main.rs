//! This repo compares a few different ways of spreading the same CPU-bound
//! work (trial division primality checks) across threads in Rust, with the
//! use of several different community crates.
//!
//! Every strategy checks the same seeded list of numbers, prints one line
//! per number, and then reports how long it took. The numbers are not a
//! rigorous benchmark, but the code samples should be somewhat indicative of
//! the different paradigms.
//!
//! To see the examples in action, simply run `cargo run --release`, and set
//! `RUST_LOG=debug` for more detail.

#![deny(missing_docs)]

extern crate env_logger;
extern crate futures;
#[macro_use] extern crate log;
extern crate num_cpus;
extern crate rand;
extern crate rayon;
extern crate tokio;

use harness::{Bench, Config};
use std::io;

pub mod background;
pub mod harness;
pub mod par_iter;
pub mod parallel_for;
pub mod prime;
pub mod sequential;
pub mod thread_per_item;
pub mod threadpool;
pub mod tokio_worker;
pub mod worker;

fn main() -> io::Result<()> {
    env_logger::init();

    let config = Config::default();
    info!("checking {} numbers with seed {} ({:?} rule)", config.count, config.seed, config.rule);

    let bench = Bench::new(config, Box::new(io::stdout()));

    let timings = vec![
        sequential::run(&bench)?,
        thread_per_item::run(&bench)?,
        threadpool::run(&bench)?,
        tokio_worker::run(&bench)?,
        parallel_for::run(&bench)?,
        par_iter::run(&bench)?,
        background::run(&bench)?,
    ];

    for timing in &timings {
        info!("{:>36}: {:?}", timing.name, timing.elapsed());
    }

    bench.pause()
}
